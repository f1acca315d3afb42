//! Domain value objects: Arch and BuildMode.
//!
//! Pure value types, equality by value, no identity. Platform-specific data
//! lives in `platform.rs`.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

// ── Arch ─────────────────────────────────────────────────────────────────────

/// A target CPU/ABI identifier such as `arm64-v8a`.
///
/// Invariant: non-empty, no whitespace, no path separators. The name is used
/// verbatim as a directory component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Arch(String);

impl Arch {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        if name.is_empty() {
            return Err(DomainError::InvalidArch {
                arch: name,
                reason: "name cannot be empty".into(),
            });
        }
        if name.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidArch {
                arch: name,
                reason: "name cannot contain whitespace".into(),
            });
        }
        if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
            return Err(DomainError::InvalidArch {
                arch: name,
                reason: "name cannot be a path".into(),
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Arch {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Arch {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Arch> for String {
    fn from(arch: Arch) -> Self {
        arch.0
    }
}

// ── BuildMode ─────────────────────────────────────────────────────────────────

/// Menu entry selecting how a build run behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// Remove the build-output directory, then build.
    Clean,
    /// Reuse the existing build-output directory.
    Incremental,
    /// Incremental build with a time-stamped log tag suffix.
    Test,
    /// Do nothing.
    Exit,
}

impl BuildMode {
    pub const ALL: [BuildMode; 4] = [Self::Clean, Self::Incremental, Self::Test, Self::Exit];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Incremental => "incremental",
            Self::Test => "test",
            Self::Exit => "exit",
        }
    }

    /// Number shown in the interactive menu.
    pub const fn menu_number(&self) -> u8 {
        match self {
            Self::Clean => 1,
            Self::Incremental => 2,
            Self::Test => 3,
            Self::Exit => 4,
        }
    }

    /// Whether the build-output directory survives between runs.
    pub const fn is_incremental(&self) -> bool {
        matches!(self, Self::Incremental | Self::Test)
    }

    /// Menu label for a project.
    pub fn describe(&self, project: &str) -> String {
        match self {
            Self::Clean => format!("Clean && build {project}."),
            Self::Incremental => format!("Build incrementally {project}."),
            Self::Test => "Build for so test.".into(),
            Self::Exit => "Exit.".into(),
        }
    }

    /// Extra CMake option this mode contributes, evaluated at `now`.
    pub fn target_option(&self, now: NaiveTime) -> Option<String> {
        match self {
            Self::Test => Some(format!(
                "-DCOMM_LOG_TAG_SUFFIX={}",
                now.format("%H%M%S")
            )),
            _ => None,
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "clean" => Ok(Self::Clean),
            "2" | "incremental" | "inc" => Ok(Self::Incremental),
            "3" | "test" => Ok(Self::Test),
            "4" | "exit" => Ok(Self::Exit),
            other => Err(DomainError::InvalidBuildMode(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arch_accepts_abi_names() {
        for name in ["armeabi-v7a", "arm64-v8a", "x86_64", "x86"] {
            assert_eq!(Arch::new(name).unwrap().as_str(), name);
        }
    }

    #[test]
    fn arch_rejects_paths_and_blanks() {
        assert!(Arch::new("").is_err());
        assert!(Arch::new("arm 64").is_err());
        assert!(Arch::new("../x86").is_err());
        assert!(Arch::new("..").is_err());
    }

    #[test]
    fn arch_deserialises_with_validation() {
        let ok: Arch = serde_json::from_str("\"arm64-v8a\"").unwrap();
        assert_eq!(ok.as_str(), "arm64-v8a");
        assert!(serde_json::from_str::<Arch>("\"a/b\"").is_err());
    }

    #[test]
    fn build_mode_parses_numbers_and_names() {
        assert_eq!("1".parse::<BuildMode>().unwrap(), BuildMode::Clean);
        assert_eq!("2".parse::<BuildMode>().unwrap(), BuildMode::Incremental);
        assert_eq!("Test".parse::<BuildMode>().unwrap(), BuildMode::Test);
        assert_eq!(" exit ".parse::<BuildMode>().unwrap(), BuildMode::Exit);
        assert!(matches!(
            "5".parse::<BuildMode>(),
            Err(DomainError::InvalidBuildMode(_))
        ));
    }

    #[test]
    fn menu_numbers_round_trip() {
        for mode in BuildMode::ALL {
            let parsed: BuildMode = mode.menu_number().to_string().parse().unwrap();
            assert_eq!(parsed, mode);
        }
    }

    #[test]
    fn test_mode_is_incremental_and_tagged() {
        let now = NaiveTime::from_hms_opt(9, 5, 7).unwrap();
        assert!(BuildMode::Test.is_incremental());
        assert!(!BuildMode::Clean.is_incremental());
        assert_eq!(
            BuildMode::Test.target_option(now).as_deref(),
            Some("-DCOMM_LOG_TAG_SUFFIX=090507")
        );
        assert_eq!(BuildMode::Incremental.target_option(now), None);
    }
}
