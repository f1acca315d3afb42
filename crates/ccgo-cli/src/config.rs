//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; the core crate only ever sees the explicit values
//! derived from it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `CCGO_`-prefixed environment variables, `__` between sections
//!    (`CCGO_BUILD__SDK_ROOT`)
//! 3. The file given with `--config`, or else `.ccgo.toml` in the current
//!    directory layered over the user config file
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Name of the per-project configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".ccgo.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Project identity stamped into the revision header.
    pub project: ProjectConfig,
    /// Native build settings.
    pub build: BuildSettings,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Defaults to the project directory name.
    pub name: Option<String>,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    /// Falls back to the platform's SDK environment variables.
    pub sdk_root: Option<PathBuf>,
    pub generator: Option<String>,
    pub min_sdk_version: String,
    pub stl: String,
    pub jobs: u16,
    /// Directory overrides, relative to the project root.
    pub build_dir: Option<PathBuf>,
    pub symbols_dir: Option<PathBuf>,
    pub libs_dir: Option<PathBuf>,
    pub third_party_dir: Option<PathBuf>,
    pub revision_file: Option<PathBuf>,
    /// Artifacts whose path contains any of these are left out.
    pub exclude_libs: Vec<String>,
    /// `*comm` components merged anyway.
    pub merge_third_party: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: None,
            version: "1.0.0".into(),
        }
    }
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            sdk_root: None,
            generator: None,
            min_sdk_version: "10".into(),
            stl: "c++_shared".into(),
            jobs: 8,
            build_dir: None,
            symbols_dir: None,
            libs_dir: None,
            third_party_dir: None,
            revision_file: None,
            exclude_libs: Vec::new(),
            merge_third_party: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, files and the environment.
    ///
    /// An explicit `config_file` must exist; the implicit locations are
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let defaults = toml::to_string(&Self::default())
            .context("Failed to serialise default configuration")?;

        let mut builder =
            Config::builder().add_source(File::from_str(&defaults, FileFormat::Toml));

        match config_file {
            Some(path) => {
                builder = builder.add_source(File::from(path.as_path()).required(true));
            }
            None => {
                builder = builder
                    .add_source(File::from(Self::config_path()).required(false))
                    .add_source(File::from(Path::new(LOCAL_CONFIG_FILE)).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("CCGO")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("build.exclude_libs")
                .with_list_parse_key("build.merge_third_party"),
        );

        let config = builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize::<Self>()
            .context("Invalid configuration")?;
        Ok(config)
    }

    /// Path to the user configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.ccgo.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "ccgo", "ccgo")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_match_build_config_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.build.jobs, 8);
        assert_eq!(cfg.build.stl, "c++_shared");
        assert_eq!(cfg.build.min_sdk_version, "10");
        assert!(cfg.build.sdk_root.is_none());
    }

    #[test]
    fn default_no_color_is_false() {
        assert!(!AppConfig::default().output.no_color);
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ccgo.toml");
        fs::write(
            &path,
            "[build]\njobs = 2\nexclude_libs = [\"test_\"]\n\n[project]\nname = \"demo\"\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.build.jobs, 2);
        assert_eq!(cfg.build.exclude_libs, vec!["test_".to_string()]);
        assert_eq!(cfg.project.name.as_deref(), Some("demo"));
        assert_eq!(cfg.build.stl, "c++_shared");
    }

    #[test]
    fn missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(AppConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let raw = toml::to_string_pretty(&AppConfig::default()).unwrap();
        let back: AppConfig = toml::from_str(&raw).unwrap();
        assert_eq!(back.build.jobs, 8);
        assert_eq!(back.project.version, "1.0.0");
    }

    #[test]
    fn config_path_is_not_empty() {
        let p = AppConfig::config_path();
        assert!(!p.as_os_str().is_empty());
    }
}
