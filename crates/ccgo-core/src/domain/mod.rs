//! Core domain layer for ccgo.
//!
//! Pure logic only: text transforms, platform profiles, build configuration,
//! output layout and reports, templates. All process and filesystem access
//! goes through the ports in [`crate::application::ports`].
//!
//! - **No I/O**: nothing here spawns processes or reads files
//! - **Explicit inputs**: the clock is read only by [`calendar`]'s
//!   `current_*` functions; everything else takes its inputs as arguments

pub mod calendar;
pub mod entities;
pub mod error;
pub mod platform;
pub mod text;
pub mod value_objects;

mod validation;

pub use entities::{
    artifact_filter::{ArtifactFilter, ThirdPartyPolicy},
    build_config::BuildConfig,
    build_report::{ArchFailure, ArchOutput, BuildReport},
    project_layout::ProjectLayout,
    project_structure::{DirectoryToCreate, FileToWrite, FsEntry, ProjectStructure},
    revision::RevisionInfo,
    template::{
        DirectorySpec, FileSpec, RenderContext, TEMPLATE_SUFFIX, Template, TemplateNode,
    },
};

pub use error::{DomainError, ErrorCategory};
pub use platform::Platform;
pub use value_objects::{Arch, BuildMode};

pub use validation::DomainValidator;
