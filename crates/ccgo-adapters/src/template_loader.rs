//! Directory-based template loader.
//!
//! A template is an ordinary directory tree. Every file and directory under
//! it becomes a node of the [`Template`]; paths and `*.hbs` file contents are
//! rendered at scaffold time.
//!
//! # Directory layout expected
//!
//! ```text
//! cpp-lib/
//! ├── template.toml                    ← optional manifest
//! ├── CMakeLists.txt.hbs               ← rendered, written as CMakeLists.txt
//! ├── include/{{project_name}}/
//! │   └── {{project_name}}.h.hbs
//! └── docs/logo.png                    ← copied byte-for-byte
//! ```
//!
//! # `template.toml` format
//!
//! ```toml
//! [template]
//! name        = "cpp-lib"              # optional, defaults to the dir name
//! description = "C++ library"          # optional
//!
//! [variables]                          # defaults, overridden by --var
//! project_name = "demo"
//! version      = "1.0.0"
//! with_tests   = true
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, instrument};
use walkdir::WalkDir;

use ccgo_core::{
    application::ApplicationError,
    domain::{DomainError, FileSpec, Template, TemplateNode},
    error::CcgoResult,
};

/// Manifest file name; never copied into the generated project.
pub const MANIFEST_FILE: &str = "template.toml";

// ── Manifest types ────────────────────────────────────────────────────────────

/// Deserialised representation of a `template.toml` file.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct TemplateManifest {
    #[serde(default)]
    pub template: TemplateSection,
    /// Default variables.
    #[serde(default)]
    pub variables: toml::Table,
}

/// `[template]` section.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct TemplateSection {
    pub name: Option<String>,
    pub description: Option<String>,
}

// ── Loader ────────────────────────────────────────────────────────────────────

/// Loads one [`Template`] from a directory tree.
///
/// # Example
///
/// ```no_run
/// use ccgo_adapters::template_loader::DirectoryTemplateLoader;
///
/// let template = DirectoryTemplateLoader::new("./templates/cpp-lib").load()?;
/// println!("{} files", template.file_count());
/// # Ok::<(), ccgo_core::error::CcgoError>(())
/// ```
pub struct DirectoryTemplateLoader {
    root: PathBuf,
}

impl DirectoryTemplateLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read the manifest and walk the tree.
    ///
    /// # Errors
    ///
    /// - [`ApplicationError::TemplateNotFound`] if the root is not a directory
    /// - [`DomainError::InvalidTemplate`] if the manifest does not parse or a
    ///   file cannot be read
    #[instrument(skip(self), fields(dir = %self.root.display()))]
    pub fn load(&self) -> CcgoResult<Template> {
        if !self.root.is_dir() {
            return Err(ApplicationError::TemplateNotFound {
                path: self.root.clone(),
            }
            .into());
        }

        let manifest = self.load_manifest()?;
        let name = manifest.template.name.clone().unwrap_or_else(|| {
            self.root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "template".into())
        });

        let mut template = Template::new(name);
        template.variables = toml_to_json(manifest.variables)?;
        template.nodes = self.walk()?;

        debug!(
            nodes = template.nodes.len(),
            variables = template.variables.len(),
            "Template loaded"
        );
        template.validate()?;
        Ok(template)
    }

    fn load_manifest(&self) -> CcgoResult<TemplateManifest> {
        let path = self.root.join(MANIFEST_FILE);
        if !path.is_file() {
            debug!("No manifest, using defaults");
            return Ok(TemplateManifest::default());
        }

        let raw = fs::read_to_string(&path).map_err(|e| {
            DomainError::InvalidTemplate(format!("failed to read '{}': {e}", path.display()))
        })?;
        let manifest = toml::from_str(&raw).map_err(|e| {
            DomainError::InvalidTemplate(format!("failed to parse '{}': {e}", path.display()))
        })?;
        Ok(manifest)
    }

    /// Every directory and file below the root, depth-first in name order.
    fn walk(&self) -> CcgoResult<Vec<TemplateNode>> {
        let mut nodes = Vec::new();
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.file_name() != ".git");

        for entry in walker {
            let entry = entry
                .map_err(|e| DomainError::InvalidTemplate(format!("directory walk error: {e}")))?;
            let rel = entry.path().strip_prefix(&self.root).map_err(|_| {
                DomainError::InvalidTemplate(format!(
                    "failed to relativise '{}' against '{}'",
                    entry.path().display(),
                    self.root.display()
                ))
            })?;

            if rel == Path::new(MANIFEST_FILE) {
                continue;
            }

            let path = normalize_path(&rel.to_string_lossy());

            if entry.file_type().is_dir() {
                nodes.push(TemplateNode::Directory(ccgo_core::domain::DirectorySpec {
                    path,
                }));
                continue;
            }

            if !entry.file_type().is_file() {
                continue; // Skip symlinks and other special types.
            }

            let content = fs::read(entry.path()).map_err(|e| {
                DomainError::InvalidTemplate(format!("failed to read file '{path}': {e}"))
            })?;
            nodes.push(TemplateNode::File(FileSpec {
                executable: is_executable(entry.path()),
                path,
                content,
            }));
        }

        Ok(nodes)
    }
}

/// Forward slashes only, no leading `./`.
fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    path.strip_prefix("./").unwrap_or(&path).to_string()
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_: &Path) -> bool {
    false
}

fn toml_to_json(table: toml::Table) -> CcgoResult<Map<String, Value>> {
    match serde_json::to_value(table) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Ok(Map::new()),
        Err(e) => Err(DomainError::InvalidTemplate(format!("invalid [variables]: {e}")).into()),
    }
}
