// error.rs — Error types for the check subsystem.
//
// Uses `thiserror` to derive the standard Rust `Error` trait automatically.
// RetrievalError belongs to the collaborators that fetch TrafficTargets;
// CheckError is what a Failed outcome carries.

use std::path::PathBuf;

use mh_smi::{describe_unsupported_routes, SmiError, UnsupportedRoutes};
use thiserror::Error;

/// Errors raised while obtaining TrafficTargets for a namespace.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// The manifest directory (or a file in it) could not be read.
    #[error("failed to read TrafficTarget manifests at {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The manifest discovery pattern could not be compiled.
    #[error("invalid manifest pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: glob::PatternError,
    },

    /// A manifest file exists but is not a valid TrafficTarget document.
    #[error("failed to load TrafficTargets from {path}: {source}")]
    Manifest { path: PathBuf, source: SmiError },

    /// An external backend (e.g., a cluster API client) failed.
    #[error("failed to list TrafficTargets: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl RetrievalError {
    /// Wrap an arbitrary backend error.
    pub fn backend(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        RetrievalError::Backend(error.into())
    }
}

/// Errors reported by a check.
#[derive(Debug, Error)]
pub enum CheckError {
    /// TrafficTargets could not be obtained; passed through unchanged.
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    /// Matched TrafficTargets reference route kinds the mesh cannot program.
    #[error("{}", describe_unsupported_routes(.unsupported))]
    UnsupportedRoutes { unsupported: UnsupportedRoutes },

    /// The requested operation is not implemented by this check.
    #[error("{operation} is not supported by check '{check}'")]
    NotSupported {
        check: &'static str,
        operation: &'static str,
    },
}

/// Errors loading mesh configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read mesh config at {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid mesh config: {0}")]
    Parse(#[from] serde_yaml::Error),
}
