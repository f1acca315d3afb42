//! Infrastructure adapters for ccgo.
//!
//! This crate implements the ports defined in `ccgo-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod git;
pub mod process;
pub mod renderer;
pub mod template_loader;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use git::{
    GitConfigScope, GitConfigSource, git_identity_resolver, git_user_email, git_user_name,
};
pub use process::SystemCommandRunner;
pub use renderer::HandlebarsRenderer;
pub use template_loader::DirectoryTemplateLoader;
