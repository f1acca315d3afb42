use chrono::NaiveDateTime;

use crate::domain::text::macro_safe;

const TIMESTAMP_PREFIX: &str = "// Build time: ";

/// Version and revision stamped into the generated `verinfo.h`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionInfo {
    pub project: String,
    pub version: String,
    /// Short VCS revision, `unknown` when it cannot be determined.
    pub revision: String,
    /// Build tag (the chosen menu number).
    pub tag: String,
    pub built_at: NaiveDateTime,
}

impl RevisionInfo {
    /// Prefix of the generated macros, e.g. `MY_LIB` for `my-lib`.
    pub fn macro_prefix(&self) -> String {
        macro_safe(&self.project).to_ascii_uppercase()
    }

    /// Render the header file.
    pub fn render_header(&self) -> String {
        let prefix = self.macro_prefix();
        let guard = format!("{prefix}_VERINFO_H_");
        format!(
            "// Generated by ccgo, do not edit.\n\
             {TIMESTAMP_PREFIX}{built}\n\
             #ifndef {guard}\n\
             #define {guard}\n\
             \n\
             #define {prefix}_VERSION \"{version}\"\n\
             #define {prefix}_REVISION \"{revision}\"\n\
             #define {prefix}_BUILD_TAG \"{tag}\"\n\
             \n\
             #endif  // {guard}\n",
            built = self.built_at.format("%Y-%m-%d %H:%M:%S"),
            version = self.version,
            revision = self.revision,
            tag = self.tag,
        )
    }

    /// Whether two rendered headers differ in anything but the build time.
    pub fn same_content(a: &str, b: &str) -> bool {
        let strip = |s: &str| {
            s.lines()
                .filter(|line| !line.starts_with(TIMESTAMP_PREFIX))
                .map(str::to_string)
                .collect::<Vec<_>>()
        };
        strip(a) == strip(b)
    }
}
