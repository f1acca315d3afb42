//! Pure string transforms exposed to templates.
//!
//! Every function here is total: any input yields some output, possibly
//! empty. None of them touch the environment.

use unicode_normalization::UnicodeNormalization;

/// Default separator used by [`slugify`].
pub const DEFAULT_SLUG_SEPARATOR: &str = "-";

/// Turn arbitrary text into a lowercase ASCII slug.
///
/// The input is NFKD-decomposed and anything left outside ASCII is dropped,
/// so `"Crème Brûlée"` becomes `"creme-brulee"`. Characters other than ASCII
/// word characters, whitespace and `-` are removed, then every run of `-`,
/// `_` or whitespace collapses into one `separator`. Leading and trailing
/// `-`, `_` and separator characters are trimmed.
///
/// ```
/// use ccgo_core::domain::text::slugify;
///
/// assert_eq!(slugify("Hello, World!", "-"), "hello-world");
/// assert_eq!(slugify("  snake__case  name ", "_"), "snake_case_name");
/// ```
pub fn slugify(value: &str, separator: &str) -> String {
    let ascii: String = value
        .nfkd()
        .filter(char::is_ascii)
        .collect::<String>()
        .to_ascii_lowercase();

    let mut slug = String::with_capacity(ascii.len());
    let mut in_run = false;
    for c in ascii.chars() {
        if c == '-' || c == '_' || is_slug_space(c) {
            if !in_run {
                slug.push_str(separator);
                in_run = true;
            }
        } else if c.is_ascii_alphanumeric() {
            slug.push(c);
            in_run = false;
        }
    }

    slug.trim_matches(|c: char| c == '-' || c == '_' || separator.contains(c))
        .to_string()
}

/// Whitespace as understood by the slug rules (ASCII only at this point).
fn is_slug_space(c: char) -> bool {
    c.is_ascii_whitespace() || matches!(c, '\x0b' | '\x1c'..='\x1f')
}

/// Make a name usable inside a C preprocessor macro: `-` becomes `_`.
///
/// ```
/// use ccgo_core::domain::text::macro_safe;
///
/// assert_eq!(macro_safe("ccgo-test-build"), "ccgo_test_build");
/// ```
pub fn macro_safe(value: &str) -> String {
    value.replace('-', "_")
}

/// Join hyphen-separated segments into a capitalised compound.
///
/// Each segment keeps its first character upper-cased and the remainder
/// lower-cased. Empty segments contribute nothing.
///
/// ```
/// use ccgo_core::domain::text::pascal_case;
///
/// assert_eq!(pascal_case("ccgo-test-build"), "CcgoTestBuild");
/// assert_eq!(pascal_case("a--b"), "Ab");
/// ```
pub fn pascal_case(value: &str) -> String {
    value
        .split('-')
        .filter(|segment| !segment.is_empty())
        .map(capitalize)
        .collect()
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => String::new(),
    }
}

/// Rewrite an SSH remote (`git@host:owner/repo.git`) as an HTTPS URL.
///
/// Best effort: strips a trailing `.git`, turns the first `:` into `/` and
/// replaces a leading `git@` with `https://`. Input of any other shape is not
/// validated and may come out mangled, e.g. an HTTPS URL loses its scheme
/// colon.
///
/// ```
/// use ccgo_core::domain::text::git_to_https;
///
/// assert_eq!(
///     git_to_https("git@github.com:user/repo.git"),
///     "https://github.com/user/repo"
/// );
/// ```
pub fn git_to_https(url: &str) -> String {
    let url = url.strip_suffix(".git").unwrap_or(url);
    let url = url.replacen(':', "/", 1);
    match url.strip_prefix("git@") {
        Some(rest) => format!("https://{rest}"),
        None => url,
    }
}
