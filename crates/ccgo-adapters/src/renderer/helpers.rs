//! Named helpers available to every template.
//!
//! | Helper           | Example                                          |
//! |------------------|--------------------------------------------------|
//! | `slugify`        | `{{slugify name}}`, `{{slugify name separator="_"}}` |
//! | `macro_safe`     | `{{macro_safe (upper name)}}`                    |
//! | `pascal_case`    | `{{pascal_case name}}`                           |
//! | `git_to_https`   | `{{git_to_https remote}}`                        |
//! | `git_user_name`  | `{{git_user_name "Anonymous"}}`                  |
//! | `git_user_email` | `{{git_user_email}}`                             |
//! | `current_year`   | `{{current_year}}`                               |
//! | `current_day`    | `{{current_day}}`                                |
//! | `lower`, `upper` | `{{lower name}}`                                 |

use std::sync::Arc;

use handlebars::{
    Context, Handlebars, Helper, HelperDef, RenderContext, RenderError, ScopedJson,
    handlebars_helper,
};
use serde_json::Value;

use ccgo_core::{
    application::{IdentityResolver, ports::IdentityField},
    domain::{calendar, text},
};

handlebars_helper!(slugify: |value: str, {separator: str = "-"}| text::slugify(value, separator));
handlebars_helper!(macro_safe: |value: str| text::macro_safe(value));
handlebars_helper!(pascal_case: |value: str| text::pascal_case(value));
handlebars_helper!(git_to_https: |url: str| text::git_to_https(url));
handlebars_helper!(lower: |value: str| value.to_lowercase());
handlebars_helper!(upper: |value: str| value.to_uppercase());

/// `git_user_name` / `git_user_email`; the optional first parameter is the
/// fallback.
struct IdentityHelper {
    resolver: Arc<IdentityResolver>,
    field: IdentityField,
}

impl HelperDef for IdentityHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let default = h.param(0).and_then(|p| p.value().as_str()).unwrap_or("");
        Ok(ScopedJson::Derived(Value::String(
            self.resolver.resolve(self.field, default),
        )))
    }
}

/// Date stamp, evaluated on every render.
struct DateHelper(fn() -> String);

impl HelperDef for DateHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        _: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        Ok(ScopedJson::Derived(Value::String((self.0)())))
    }
}

/// Register every helper on `hbs`.
pub fn register_helpers(hbs: &mut Handlebars<'_>, identity: Arc<IdentityResolver>) {
    hbs.register_helper("slugify", Box::new(slugify));
    hbs.register_helper("macro_safe", Box::new(macro_safe));
    hbs.register_helper("pascal_case", Box::new(pascal_case));
    hbs.register_helper("git_to_https", Box::new(git_to_https));
    hbs.register_helper("lower", Box::new(lower));
    hbs.register_helper("upper", Box::new(upper));
    hbs.register_helper(
        "git_user_name",
        Box::new(IdentityHelper {
            resolver: Arc::clone(&identity),
            field: IdentityField::UserName,
        }),
    );
    hbs.register_helper(
        "git_user_email",
        Box::new(IdentityHelper {
            resolver: identity,
            field: IdentityField::UserEmail,
        }),
    );
    hbs.register_helper("current_year", Box::new(DateHelper(calendar::current_year)));
    hbs.register_helper("current_day", Box::new(DateHelper(calendar::current_day)));
}

/// Names registered by [`register_helpers`].
pub const HELPER_NAMES: &[&str] = &[
    "slugify",
    "macro_safe",
    "pascal_case",
    "git_to_https",
    "lower",
    "upper",
    "git_user_name",
    "git_user_email",
    "current_year",
    "current_day",
];
