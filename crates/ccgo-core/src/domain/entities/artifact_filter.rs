use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Predicate deciding whether a build artifact is left out of the outputs.
///
/// The orchestrator never hard-codes exclusions; it asks the filter about
/// every candidate path. [`ArtifactFilter::from_patterns`] gives the usual
/// "path contains one of these strings" behaviour.
#[derive(Clone)]
pub struct ArtifactFilter {
    excluded: Arc<dyn Fn(&Path) -> bool + Send + Sync>,
    description: String,
}

impl ArtifactFilter {
    /// Wrap an arbitrary predicate. `true` means excluded.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Path) -> bool + Send + Sync + 'static,
    {
        Self {
            excluded: Arc::new(predicate),
            description: "custom".into(),
        }
    }

    /// Exclude nothing.
    pub fn none() -> Self {
        Self {
            excluded: Arc::new(|_: &Path| false),
            description: "none".into(),
        }
    }

    /// Exclude every path whose string form contains one of `patterns`.
    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns
            .into_iter()
            .map(Into::into)
            .filter(|p| !p.is_empty())
            .collect();
        let description = if patterns.is_empty() {
            "none".to_string()
        } else {
            patterns.join(", ")
        };
        Self {
            excluded: Arc::new(move |path: &Path| {
                let path = path.to_string_lossy();
                patterns.iter().any(|p| path.contains(p.as_str()))
            }),
            description,
        }
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        (self.excluded)(path)
    }
}

impl Default for ArtifactFilter {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Debug for ArtifactFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactFilter")
            .field("excludes", &self.description)
            .finish()
    }
}

/// Which third-party components get merged into the release libraries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThirdPartyPolicy {
    /// Components whose name ends with this suffix are not merged by default.
    pub unmerged_suffix: String,
    /// Components merged even though they carry the suffix.
    pub merge_overrides: Vec<String>,
    /// Component that already bundles the STL; its presence suppresses the
    /// SDK's STL copy.
    pub stl_component: String,
}

impl ThirdPartyPolicy {
    pub fn with_overrides<I, S>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.merge_overrides = overrides.into_iter().map(Into::into).collect();
        self
    }

    pub fn should_merge(&self, component: &str) -> bool {
        if self.unmerged_suffix.is_empty() || !component.ends_with(&self.unmerged_suffix) {
            return true;
        }
        self.merge_overrides.iter().any(|name| name == component)
    }

    pub fn bundles_stl<'a>(&self, mut components: impl Iterator<Item = &'a str>) -> bool {
        components.any(|name| name == self.stl_component)
    }
}

impl Default for ThirdPartyPolicy {
    fn default() -> Self {
        Self {
            unmerged_suffix: "comm".into(),
            merge_overrides: Vec::new(),
            stl_component: "stdcomm".into(),
        }
    }
}
