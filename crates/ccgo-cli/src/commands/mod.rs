//! One module per subcommand. Handlers translate arguments into core calls
//! and print results; no business logic lives here.

pub mod build;
pub mod completions;
pub mod config;
pub mod init;
pub mod new;
pub mod render;
