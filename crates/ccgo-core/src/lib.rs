//! ccgo Core - Hexagonal Architecture Implementation
//!
//! Domain and application layers for the ccgo native build and scaffolding
//! tool.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             ccgo-cli (CLI)              │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (BuildService, ScaffoldService, ...)   │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, CommandRunner, Renderer)   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     ccgo-adapters (Infrastructure)      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ccgo_core::prelude::*;
//! # fn demo(fs: Arc<dyn Filesystem>, runner: Arc<dyn CommandRunner>) -> CcgoResult<()> {
//! let platform = Platform::Ohos;
//! let plan = BuildPlan::new(
//!     platform,
//!     BuildConfig::new("/opt/ohos-sdk"),
//!     ProjectLayout::conventional("/work/demo", platform, "demo"),
//!     Vec::new(),
//! );
//! let report = BuildService::new(fs, runner).run(&plan)?.into_result()?;
//! println!("{} architectures built", report.succeeded.len());
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        BuildEvent, BuildPlan, BuildService, IdentityResolver, RevisionService, ScaffoldOptions,
        ScaffoldService,
        ports::{
            CommandOutput, CommandRunner, CommandSpec, CommandStatus, Filesystem, IdentityField,
            IdentitySource, TemplateRenderer,
        },
    };
    pub use crate::domain::{
        Arch, ArtifactFilter, BuildConfig, BuildMode, BuildReport, Platform, ProjectLayout,
        ProjectStructure, RenderContext, RevisionInfo, Template, ThirdPartyPolicy,
    };
    pub use crate::error::{CcgoError, CcgoResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
