//! Application services - orchestrate use cases.

pub mod build_service;
pub mod identity_service;
pub mod revision_service;
pub mod scaffold_service;

pub use build_service::{BuildEvent, BuildPlan, BuildService};
pub use identity_service::IdentityResolver;
pub use revision_service::{RevisionService, UNKNOWN_REVISION};
pub use scaffold_service::{ScaffoldOptions, ScaffoldService};
