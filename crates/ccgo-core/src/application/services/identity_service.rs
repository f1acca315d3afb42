//! Ordered identity lookup with a caller-supplied fallback.

use tracing::{debug, trace};

use crate::application::ports::{IdentityField, IdentitySource};

/// Queries identity sources in order; the first trimmed, non-empty answer
/// wins.
///
/// Sources never fail: a source that cannot answer returns `None` and the
/// next one is asked. When every source is silent the caller's default is
/// returned unchanged.
#[derive(Default)]
pub struct IdentityResolver {
    sources: Vec<Box<dyn IdentitySource>>,
}

impl IdentityResolver {
    pub fn new(sources: Vec<Box<dyn IdentitySource>>) -> Self {
        Self { sources }
    }

    pub fn with_source(mut self, source: Box<dyn IdentitySource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn resolve(&self, field: IdentityField, default: &str) -> String {
        for source in &self.sources {
            match source.lookup(field) {
                Some(value) if !value.trim().is_empty() => {
                    debug!(source = %source.name(), key = field.config_key(), "Identity resolved");
                    return value.trim().to_string();
                }
                _ => trace!(source = %source.name(), key = field.config_key(), "No answer"),
            }
        }
        debug!(key = field.config_key(), "Falling back to default identity");
        default.to_string()
    }

    pub fn user_name(&self, default: &str) -> String {
        self.resolve(IdentityField::UserName, default)
    }

    pub fn user_email(&self, default: &str) -> String {
        self.resolve(IdentityField::UserEmail, default)
    }
}
