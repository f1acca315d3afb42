//! Target platforms and the SDK layout each one expects.
//!
//! A [`Platform`] knows where its SDK keeps the CMake toolchain file, the
//! strip tool and the STL shared library, and which CMake definitions select
//! it. Nothing here touches the filesystem; callers check existence through
//! the `Filesystem` port.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::build_config::BuildConfig,
    error::DomainError,
    value_objects::Arch,
};

/// A native platform the orchestrator can build for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// OpenHarmony / HarmonyOS native SDK.
    Ohos,
    /// Android NDK.
    Android,
}

const OHOS_ARCHS: &[&str] = &["armeabi-v7a", "arm64-v8a", "x86_64"];
const ANDROID_ARCHS: &[&str] = &["armeabi-v7a", "arm64-v8a", "x86_64", "x86"];

impl Platform {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ohos => "ohos",
            Self::Android => "android",
        }
    }

    /// Human-readable name for banners.
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Ohos => "OHOS(Open Harmony)",
            Self::Android => "Android",
        }
    }

    /// Environment variables naming the SDK root, in lookup order.
    pub const fn sdk_env_vars(&self) -> &'static [&'static str] {
        match self {
            Self::Ohos => &["OHOS_SDK_HOME", "HOS_SDK_HOME"],
            Self::Android => &["ANDROID_NDK_HOME", "ANDROID_NDK_ROOT", "NDK_ROOT"],
        }
    }

    /// Short description of the SDK for "please install" messages.
    pub const fn sdk_description(&self) -> &'static str {
        match self {
            Self::Ohos => "OHOS native SDK (OHOS_SDK_HOME)",
            Self::Android => "Android NDK (ANDROID_NDK_HOME)",
        }
    }

    pub const fn shared_lib_ext(&self) -> &'static str {
        "so"
    }

    /// Architectures built when the caller names none.
    pub fn default_archs(&self) -> Vec<Arch> {
        self.arch_names()
            .iter()
            .filter_map(|name| Arch::new(*name).ok())
            .collect()
    }

    /// The first supported architecture, used by the interactive menu.
    pub fn primary_arch(&self) -> Option<Arch> {
        self.default_archs().into_iter().next()
    }

    pub fn supports(&self, arch: &Arch) -> bool {
        self.arch_names().contains(&arch.as_str())
    }

    /// Architectures outside the known list. They are still built; only the
    /// SDK-specific lookups (such as the STL path) know nothing about them.
    pub fn unknown_archs<'a>(&self, archs: &'a [Arch]) -> Vec<&'a Arch> {
        archs.iter().filter(|arch| !self.supports(arch)).collect()
    }

    fn arch_names(&self) -> &'static [&'static str] {
        match self {
            Self::Ohos => OHOS_ARCHS,
            Self::Android => ANDROID_ARCHS,
        }
    }

    /// CMake toolchain file shipped with the SDK.
    pub fn toolchain_file(&self, sdk_root: &Path) -> PathBuf {
        match self {
            Self::Ohos => sdk_root.join("native/build/cmake/ohos.toolchain.cmake"),
            Self::Android => sdk_root.join("build/cmake/android.toolchain.cmake"),
        }
    }

    /// `llvm-strip` inside the SDK.
    pub fn strip_tool(&self, sdk_root: &Path) -> PathBuf {
        match self {
            Self::Ohos => sdk_root.join("native/llvm/bin/llvm-strip"),
            Self::Android => ndk_prebuilt(sdk_root).join("bin/llvm-strip"),
        }
    }

    /// STL shared library matching `arch`, if the SDK ships one for it.
    pub fn stl_library(&self, sdk_root: &Path, arch: &Arch) -> Option<PathBuf> {
        let triple = match (self, arch.as_str()) {
            (Self::Ohos, "armeabi-v7a") => "arm-linux-ohos",
            (Self::Ohos, "arm64-v8a") => "aarch64-linux-ohos",
            (Self::Ohos, "x86_64") => "x86_64-linux-ohos",
            (Self::Android, "armeabi-v7a") => "arm-linux-androideabi",
            (Self::Android, "arm64-v8a") => "aarch64-linux-android",
            (Self::Android, "x86_64") => "x86_64-linux-android",
            (Self::Android, "x86") => "i686-linux-android",
            _ => return None,
        };
        let lib = match self {
            Self::Ohos => sdk_root.join("native/llvm/lib").join(triple),
            Self::Android => ndk_prebuilt(sdk_root).join("sysroot/usr/lib").join(triple),
        };
        Some(lib.join("libc++_shared.so"))
    }

    /// Generator the platform needs on this host when none is configured.
    pub fn default_generator(&self) -> Option<&'static str> {
        if cfg!(windows) {
            Some("Unix Makefiles")
        } else {
            None
        }
    }

    /// Arguments for the CMake configure step.
    pub fn configure_args(&self, source_dir: &Path, config: &BuildConfig, arch: &Arch) -> Vec<String> {
        let sdk = config.sdk_root.display().to_string();
        let toolchain = self.toolchain_file(&config.sdk_root).display().to_string();

        let mut args = vec![source_dir.display().to_string()];
        if let Some(generator) = config
            .generator
            .as_deref()
            .or_else(|| self.default_generator())
        {
            args.push("-G".into());
            args.push(generator.into());
        }

        match self {
            Self::Ohos => args.extend([
                format!("-DOHOS_ARCH={arch}"),
                "-DOHOS=1".into(),
                "-D__OHOS__=1".into(),
                "-DCMAKE_BUILD_TYPE=Release".into(),
                "-DOHOS_PLATFORM=OHOS".into(),
                format!("-DCMAKE_TOOLCHAIN_FILE={toolchain}"),
                "-DOHOS_TOOLCHAIN=clang".into(),
                format!("-DOHOS_SDK_NATIVE={sdk}/native/"),
                format!("-DOHOS_SDK_NATIVE_PLATFORM=ohos-{}", config.min_platform_version),
                format!("-DOHOS_STL={}", config.stl),
            ]),
            Self::Android => args.extend([
                format!("-DANDROID_ABI={arch}"),
                "-DCMAKE_BUILD_TYPE=Release".into(),
                format!("-DCMAKE_TOOLCHAIN_FILE={toolchain}"),
                "-DANDROID_TOOLCHAIN=clang".into(),
                format!("-DANDROID_NDK={sdk}"),
                format!("-DANDROID_PLATFORM=android-{}", config.min_platform_version),
                format!("-DANDROID_STL={}", config.stl),
            ]),
        }

        if let Some(option) = config.target_option.as_deref() {
            args.extend(option.split_whitespace().map(str::to_string));
        }
        args
    }

    /// Arguments for the CMake build step, run inside the build directory.
    pub fn build_args(&self, config: &BuildConfig) -> Vec<String> {
        vec![
            "--build".into(),
            ".".into(),
            "--config".into(),
            "Release".into(),
            "--".into(),
            format!("-j{}", config.jobs),
        ]
    }
}

/// Host-specific prebuilt toolchain directory inside an NDK.
fn ndk_prebuilt(sdk_root: &Path) -> PathBuf {
    let host = if cfg!(target_os = "macos") {
        "darwin-x86_64"
    } else if cfg!(windows) {
        "windows-x86_64"
    } else {
        "linux-x86_64"
    };
    sdk_root.join("toolchains/llvm/prebuilt").join(host)
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ohos" | "harmony" | "openharmony" => Ok(Self::Ohos),
            "android" => Ok(Self::Android),
            other => Err(DomainError::InvalidPlatform(other.to_string())),
        }
    }
}
