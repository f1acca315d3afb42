//! Project templates and the variables they are rendered with.
//!
//! A [`Template`] is a flat, ordered list of file and directory nodes whose
//! paths are relative to the template root. Paths may themselves contain
//! template expressions (`src/{{project_name}}.cc`). File contents are kept
//! as raw bytes so binary assets survive untouched; only files carrying the
//! [`TEMPLATE_SUFFIX`] are rendered.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::domain::error::DomainError;

/// Files ending with this suffix are rendered and lose it on output.
pub const TEMPLATE_SUFFIX: &str = ".hbs";

#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub name: String,
    pub nodes: Vec<TemplateNode>,
    /// Default variables, overridden by caller-supplied ones.
    pub variables: Map<String, Value>,
}

impl Template {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
            variables: Map::new(),
        }
    }

    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.nodes.push(TemplateNode::File(FileSpec {
            path: path.into(),
            content: content.into(),
            executable: false,
        }));
        self
    }

    pub fn with_node(mut self, node: TemplateNode) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn with_directory(mut self, path: impl Into<String>) -> Self {
        self.nodes
            .push(TemplateNode::Directory(DirectorySpec { path: path.into() }));
        self
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn file_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, TemplateNode::File(_)))
            .count()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.nodes.is_empty() {
            return Err(DomainError::InvalidTemplate(format!(
                "template '{}' contains no files",
                self.name
            )));
        }

        let mut seen = HashSet::new();
        for node in &self.nodes {
            let path = node.path();
            if path.starts_with('/') || path.starts_with('\\') {
                return Err(DomainError::AbsolutePathNotAllowed {
                    path: path.to_string(),
                });
            }
            if !seen.insert(path) {
                return Err(DomainError::DuplicatePath {
                    path: path.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TemplateNode {
    File(FileSpec),
    Directory(DirectorySpec),
}

impl TemplateNode {
    pub fn path(&self) -> &str {
        match self {
            TemplateNode::File(f) => &f.path,
            TemplateNode::Directory(d) => &d.path,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileSpec {
    /// Relative path, `/`-separated.
    pub path: String,
    pub content: Vec<u8>,
    pub executable: bool,
}

impl FileSpec {
    pub fn is_template(&self) -> bool {
        self.path.ends_with(TEMPLATE_SUFFIX)
    }

    /// Output path with the template suffix removed.
    pub fn output_path(&self) -> &str {
        self.path
            .strip_suffix(TEMPLATE_SUFFIX)
            .unwrap_or(&self.path)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectorySpec {
    pub path: String,
}

/// Variables a template is rendered with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderContext {
    variables: Map<String, Value>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Add `defaults` for every key not already set.
    pub fn with_defaults(mut self, defaults: &Map<String, Value>) -> Self {
        for (key, value) in defaults {
            self.variables
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.variables.get(key)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.variables.clone())
    }
}

impl FromIterator<(String, String)> for RenderContext {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            variables: iter
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect(),
        }
    }
}
