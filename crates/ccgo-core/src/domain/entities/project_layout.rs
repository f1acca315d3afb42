use std::path::{Path, PathBuf};

use crate::domain::{platform::Platform, value_objects::Arch};

/// Where a build run reads and writes, relative to one project root.
///
/// Every path the orchestrator touches is derived from here, so the run
/// never depends on the process working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
    build_out: PathBuf,
    symbols_root: PathBuf,
    libs_root: PathBuf,
    third_party: PathBuf,
    revision_file: PathBuf,
}

impl ProjectLayout {
    /// Conventional layout for `platform` under `root`:
    ///
    /// ```text
    /// <root>/cmake_build/<platform>        build output
    /// <root>/<platform>/obj/local/<arch>   unstripped symbols
    /// <root>/<platform>/libs/<arch>        stripped libraries
    /// <root>/third_party                   third-party components
    /// <root>/include/<project>/verinfo.h   revision header
    /// ```
    pub fn conventional(root: impl Into<PathBuf>, platform: Platform, project: &str) -> Self {
        let root = root.into();
        let name = platform.as_str();
        Self {
            build_out: root.join("cmake_build").join(name),
            symbols_root: root.join(name).join("obj/local"),
            libs_root: root.join(name).join("libs"),
            third_party: root.join("third_party"),
            revision_file: root.join("include").join(project).join("verinfo.h"),
            root,
        }
    }

    /// Override the build-output directory (relative paths join the root).
    pub fn with_build_out(mut self, dir: impl AsRef<Path>) -> Self {
        self.build_out = self.root.join(dir);
        self
    }

    pub fn with_symbols_root(mut self, dir: impl AsRef<Path>) -> Self {
        self.symbols_root = self.root.join(dir);
        self
    }

    pub fn with_libs_root(mut self, dir: impl AsRef<Path>) -> Self {
        self.libs_root = self.root.join(dir);
        self
    }

    pub fn with_third_party(mut self, dir: impl AsRef<Path>) -> Self {
        self.third_party = self.root.join(dir);
        self
    }

    pub fn with_revision_file(mut self, file: impl AsRef<Path>) -> Self {
        self.revision_file = self.root.join(file);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn build_out(&self) -> &Path {
        &self.build_out
    }

    pub fn symbols_root(&self) -> &Path {
        &self.symbols_root
    }

    pub fn libs_root(&self) -> &Path {
        &self.libs_root
    }

    pub fn third_party(&self) -> &Path {
        &self.third_party
    }

    pub fn revision_file(&self) -> &Path {
        &self.revision_file
    }

    /// Unstripped output directory for `arch`.
    pub fn symbols_dir(&self, arch: &Arch) -> PathBuf {
        self.symbols_root.join(arch.as_str())
    }

    /// Stripped output directory for `arch`.
    pub fn libs_dir(&self, arch: &Arch) -> PathBuf {
        self.libs_root.join(arch.as_str())
    }

    /// `third_party/<component>/lib/<platform>/<arch>`.
    pub fn component_lib_dir(&self, component: &str, platform: Platform, arch: &Arch) -> PathBuf {
        self.third_party
            .join(component)
            .join("lib")
            .join(platform.as_str())
            .join(arch.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conventional_paths() {
        let layout = ProjectLayout::conventional("/p", Platform::Ohos, "demo");
        let arch = Arch::new("arm64-v8a").unwrap();

        assert_eq!(layout.build_out(), Path::new("/p/cmake_build/ohos"));
        assert_eq!(layout.symbols_dir(&arch), PathBuf::from("/p/ohos/obj/local/arm64-v8a"));
        assert_eq!(layout.libs_dir(&arch), PathBuf::from("/p/ohos/libs/arm64-v8a"));
        assert_eq!(layout.revision_file(), Path::new("/p/include/demo/verinfo.h"));
        assert_eq!(
            layout.component_lib_dir("zlib", Platform::Ohos, &arch),
            PathBuf::from("/p/third_party/zlib/lib/ohos/arm64-v8a")
        );
    }

    #[test]
    fn overrides_are_relative_to_root() {
        let layout = ProjectLayout::conventional("/p", Platform::Android, "demo")
            .with_build_out("out/android")
            .with_libs_root("dist/libs");
        assert_eq!(layout.build_out(), Path::new("/p/out/android"));
        assert_eq!(layout.libs_root(), Path::new("/p/dist/libs"));
    }
}
