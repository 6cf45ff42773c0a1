//! Nomad agent configuration loading and merging
//!
//! Reads HCL and JSON agent configuration files into a typed [`Config`]
//! and merges configurations field by field. Settings the model does not
//! name are carried through untouched.

pub mod agent;
mod body;
mod compat;
pub mod loader;
pub mod merge;

pub use agent::Config;
pub use loader::{load_config, load_config_dir, parse_config_file};
pub use merge::Merge;
