//! parse-nomad-config: load, merge and print Nomad agent configuration
//!
//! The library decodes HCL and JSON agent configuration files into a typed
//! configuration, merges configurations, and formats them as JSON or through
//! a handlebars template. The `parse-nomad-config` binary drives it from the
//! command line.

pub mod cli;
pub mod config;
pub mod error;
pub mod render;
pub mod version;

pub use config::{load_config, Config, Merge};
pub use error::{FormatError, LoadError};
