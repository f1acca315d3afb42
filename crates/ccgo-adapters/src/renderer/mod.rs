//! Template rendering adapters.

mod engine;
pub mod helpers;

pub use engine::HandlebarsRenderer;
pub use helpers::{HELPER_NAMES, register_helpers};
