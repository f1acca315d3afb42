//! Handlebars-based template renderer.
//!
//! Non-strict by default: project templates routinely reference optional
//! variables inside `{{#if}}` blocks. Strict mode turns every missing
//! variable into an error. HTML escaping is disabled since the output is
//! source code and build files.

use std::sync::Arc;

use handlebars::Handlebars;
use serde_json::Value;

use ccgo_core::{
    application::{ApplicationError, IdentityResolver, ports::TemplateRenderer},
    error::CcgoResult,
};

use super::helpers::register_helpers;

/// [`TemplateRenderer`] over the `handlebars` crate with the ccgo helpers.
pub struct HandlebarsRenderer {
    hbs: Handlebars<'static>,
}

impl HandlebarsRenderer {
    /// Renderer whose identity helpers ask `identity`.
    pub fn new(identity: IdentityResolver) -> Self {
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);
        register_helpers(&mut hbs, Arc::new(identity));
        Self { hbs }
    }

    /// Error on variables missing from the context.
    pub fn strict(mut self, strict: bool) -> Self {
        self.hbs.set_strict_mode(strict);
        self
    }

    pub fn is_strict(&self) -> bool {
        self.hbs.strict_mode()
    }
}

impl Default for HandlebarsRenderer {
    fn default() -> Self {
        Self::new(IdentityResolver::default())
    }
}

impl TemplateRenderer for HandlebarsRenderer {
    fn render_str(&self, template: &str, context: &Value) -> CcgoResult<String> {
        self.hbs.render_template(template, context).map_err(|e| {
            ApplicationError::RenderingFailed {
                reason: e.to_string(),
            }
            .into()
        })
    }
}
