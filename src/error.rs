//! Error types for configuration loading and output formatting

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn a file or directory into an agent configuration.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid HCL syntax in {}", path.display())]
    Syntax {
        path: PathBuf,
        #[source]
        source: hcl::Error,
    },

    #[error("failed to evaluate `{key}` in {}", path.display())]
    Eval {
        path: PathBuf,
        key: String,
        #[source]
        source: hcl::eval::Error,
    },

    #[error("invalid JSON syntax in {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration in {}", path.display())]
    Schema {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure to render a configuration for output.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("both json and template formatting are not allowed")]
    Conflict,

    #[error("error formatting the data as JSON")]
    Json(#[source] serde_json::Error),

    #[error("error formatting the data with the template")]
    Template(#[source] Box<handlebars::RenderError>),
}

impl From<handlebars::RenderError> for FormatError {
    fn from(err: handlebars::RenderError) -> Self {
        FormatError::Template(Box::new(err))
    }
}
