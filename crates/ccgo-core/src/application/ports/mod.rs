//! Application ports (traits) for external dependencies.
//!
//! Ports define what the application needs from the outside world. Adapters
//! in `ccgo-adapters` implement them.
//!
//! - `Filesystem`: file and directory operations
//! - `CommandRunner`: external processes (cmake, git, strip)
//! - `TemplateRenderer`: template rendering
//! - `IdentitySource`: one scope of version-control identity

pub mod output;

pub use output::{
    CommandOutput, CommandRunner, CommandSpec, CommandStatus, Filesystem, IdentityField,
    IdentitySource, TemplateRenderer,
};
