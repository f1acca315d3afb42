pub mod artifact_filter;
pub mod build_config;
pub mod build_report;
pub mod project_layout;
pub mod project_structure;
pub mod revision;
pub mod template;

pub use crate::domain::DomainError;
pub use artifact_filter::{ArtifactFilter, ThirdPartyPolicy};
pub use build_config::BuildConfig;
pub use build_report::{ArchFailure, ArchOutput, BuildReport};
pub use project_layout::ProjectLayout;
pub use project_structure::ProjectStructure;
pub use revision::RevisionInfo;
pub use template::{RenderContext, Template, TemplateNode};
