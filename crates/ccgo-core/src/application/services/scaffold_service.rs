//! Scaffold Service - generate a project from a template.
//!
//! 1. Merge template defaults with caller variables
//! 2. Render paths and `.hbs` files
//! 3. Write to filesystem, rolling back on failure

use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, TemplateRenderer},
    },
    domain::{
        DomainValidator as validator, FsEntry, ProjectStructure, RenderContext, Template,
        TemplateNode,
    },
    error::{CcgoError, CcgoResult},
};

/// How an existing destination is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScaffoldOptions {
    /// Replace an existing destination instead of refusing.
    pub force: bool,
}

/// Main scaffolding service.
pub struct ScaffoldService {
    renderer: Box<dyn TemplateRenderer>,
    filesystem: Box<dyn Filesystem>,
}

impl ScaffoldService {
    pub fn new(renderer: Box<dyn TemplateRenderer>, filesystem: Box<dyn Filesystem>) -> Self {
        Self {
            renderer,
            filesystem,
        }
    }

    /// Render `template` and write it under `output_root`.
    #[instrument(
        skip_all,
        fields(
            template = %template.name,
            output_path = %output_root.display()
        )
    )]
    pub fn scaffold(
        &self,
        template: &Template,
        context: RenderContext,
        output_root: &Path,
        options: ScaffoldOptions,
    ) -> CcgoResult<ProjectStructure> {
        let structure = self.render(template, context, output_root)?;
        info!(entries = structure.entry_count(), "Template rendered");

        self.write_structure(&structure, options)?;

        info!("Scaffold completed successfully");
        Ok(structure)
    }

    /// Render `template` without touching the filesystem.
    pub fn render(
        &self,
        template: &Template,
        context: RenderContext,
        output_root: &Path,
    ) -> CcgoResult<ProjectStructure> {
        validator::validate_template(template)?;

        let context = context.with_defaults(&template.variables).to_value();
        let mut structure = ProjectStructure::new(output_root);

        for node in &template.nodes {
            match node {
                TemplateNode::Directory(dir) => {
                    if let Some(path) = self.render_path(&dir.path, &context)? {
                        structure.add_directory(path);
                    }
                }
                TemplateNode::File(file) => {
                    let Some(path) = self.render_path(file.output_path(), &context)? else {
                        continue;
                    };
                    let content = if file.is_template() {
                        let source = std::str::from_utf8(&file.content).map_err(|e| {
                            ApplicationError::RenderingFailed {
                                reason: format!("{} is not UTF-8: {e}", file.path),
                            }
                        })?;
                        self.renderer.render_str(source, &context)?.into_bytes()
                    } else {
                        file.content.clone()
                    };
                    structure.add_file(path, content, file.executable);
                }
            }
        }

        validator::validate_project_structure(&structure)?;
        Ok(structure)
    }

    /// Render a single template string.
    pub fn render_str(&self, template: &str, context: &RenderContext) -> CcgoResult<String> {
        self.renderer.render_str(template, &context.to_value())
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    /// Render a relative path one segment at a time.
    ///
    /// A rendered segment that is absolute or contains `..` is an error. After
    /// that check, `None` when any segment renders empty, which lets templates
    /// make files conditional (`{{#if tests}}tests{{/if}}/x`).
    fn render_path(
        &self,
        path: &str,
        context: &serde_json::Value,
    ) -> CcgoResult<Option<PathBuf>> {
        let mut segments = Vec::new();
        for segment in path.split('/') {
            let rendered = if segment.contains("{{") {
                self.renderer.render_str(segment, context)?
            } else {
                segment.to_string()
            };
            ProjectStructure::check_contained(Path::new(&rendered))?;
            segments.push(rendered);
        }

        if segments.iter().any(|segment| segment.trim().is_empty()) {
            debug!(template_path = path, "Path rendered empty, skipping");
            return Ok(None);
        }
        Ok(Some(segments.iter().collect()))
    }

    /// Write project structure to filesystem with rollback on failure.
    fn write_structure(
        &self,
        structure: &ProjectStructure,
        options: ScaffoldOptions,
    ) -> CcgoResult<()> {
        if self.filesystem.exists(structure.root()) {
            if !options.force {
                return Err(ApplicationError::ProjectExists {
                    path: structure.root().to_path_buf(),
                }
                .into());
            }
            warn!(path = %structure.root().display(), "Replacing existing destination");
            self.filesystem.remove_dir_all(structure.root())?;
        }

        match self.write_all(structure) {
            Ok(()) => {
                info!("Successfully wrote all files");
                Ok(())
            }
            Err(e) => {
                warn!("Write failed, attempting rollback");
                self.rollback(structure.root())?;
                Err(e)
            }
        }
    }

    fn write_all(&self, structure: &ProjectStructure) -> CcgoResult<()> {
        self.filesystem.create_dir_all(structure.root())?;

        for entry in structure.entries() {
            let path = structure.root().join(entry.path());
            match entry {
                FsEntry::Directory(_) => self.filesystem.create_dir_all(&path)?,
                FsEntry::File(file) => {
                    if let Some(parent) = path.parent() {
                        self.filesystem.create_dir_all(parent)?;
                    }

                    self.filesystem.write_file(&path, &file.content)?;

                    if file.executable {
                        self.filesystem.set_permissions(&path, true)?;
                    }
                }
            }
        }

        Ok(())
    }

    fn rollback(&self, root: &Path) -> CcgoResult<()> {
        self.filesystem.remove_dir_all(root).map_err(|e| {
            warn!(error = %e, path = %root.display(), "Rollback failed");
            CcgoError::from(ApplicationError::RollbackFailed {
                path: root.to_path_buf(),
                reason: e.to_string(),
            })
        })?;
        info!("Rollback successful");
        Ok(())
    }
}
