// error.rs — Error types for the SMI model subsystem.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading SMI objects.
#[derive(Debug, Error)]
pub enum SmiError {
    /// Failed to read a manifest file from disk.
    #[error("failed to read manifest at {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A document is not valid YAML or does not have the expected shape.
    #[error("invalid manifest: {0}")]
    InvalidManifest(#[from] serde_yaml::Error),

    /// A TrafficTarget document declares an apiVersion outside the SMI access group.
    #[error("TrafficTarget '{name}' has unsupported apiVersion '{api_version}'")]
    UnsupportedApiVersion { name: String, api_version: String },
}
