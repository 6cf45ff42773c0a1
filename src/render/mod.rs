//! Output rendering (JSON, templates)

pub mod format;

pub use format::{format, OutputFormat};
