//! Application layer for ccgo.
//!
//! - **Services**: use case orchestration (build, scaffold, revision, identity)
//! - **Ports**: traits for the filesystem, processes, rendering and identity
//! - **Errors**: application-specific error types
//!
//! Business rules live in `crate::domain`; this layer sequences them.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    BuildEvent, BuildPlan, BuildService, IdentityResolver, RevisionService, ScaffoldOptions,
    ScaffoldService,
};

pub use ports::{CommandRunner, Filesystem, IdentitySource, TemplateRenderer};

pub use error::ApplicationError;
