//! TrafficTarget retrieval collaborators.
//!
//! Checks never talk to a cluster. They ask a [`TrafficTargetSource`] for the
//! TrafficTargets of a namespace and evaluate whatever comes back. Retry,
//! pagination and timeouts are the source's business.

use std::path::{Path, PathBuf};

use glob::{glob, Pattern};
use mh_smi::{load_traffic_targets, TrafficTarget};
use tracing::debug;

use crate::error::RetrievalError;

/// Supplies TrafficTargets for a namespace.
///
/// `Send + Sync` so checks sharing a source can run on separate threads.
pub trait TrafficTargetSource: Send + Sync {
    /// List the TrafficTargets in `namespace`, in a stable order.
    fn list_traffic_targets(&self, namespace: &str) -> Result<Vec<TrafficTarget>, RetrievalError>;
}

/// An in-memory set of TrafficTargets, e.g. already fetched by a caller.
#[derive(Debug, Clone, Default)]
pub struct StaticTrafficTargets {
    targets: Vec<TrafficTarget>,
}

impl StaticTrafficTargets {
    pub fn new(targets: Vec<TrafficTarget>) -> Self {
        Self { targets }
    }
}

impl TrafficTargetSource for StaticTrafficTargets {
    fn list_traffic_targets(&self, namespace: &str) -> Result<Vec<TrafficTarget>, RetrievalError> {
        Ok(self
            .targets
            .iter()
            .filter(|target| target.namespace() == namespace)
            .cloned()
            .collect())
    }
}

/// A directory of YAML manifests (`*.yaml`, `*.yml`).
///
/// Files are read on every call in path order, so edits show up on the next
/// check run. Non-TrafficTarget documents in the files are ignored.
#[derive(Debug, Clone)]
pub struct ManifestDirectory {
    root: PathBuf,
}

impl ManifestDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn manifest_paths(&self) -> Result<Vec<PathBuf>, RetrievalError> {
        if !self.root.is_dir() {
            return Err(RetrievalError::ReadFailed {
                path: self.root.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "manifest directory does not exist",
                ),
            });
        }

        let base = Pattern::escape(&self.root.to_string_lossy());
        let mut paths = Vec::new();
        for extension in ["yaml", "yml"] {
            let pattern = format!("{}/*.{}", base, extension);
            let entries = glob(&pattern).map_err(|source| RetrievalError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
            for entry in entries {
                let path = entry.map_err(|e| RetrievalError::ReadFailed {
                    path: e.path().to_path_buf(),
                    source: e.into(),
                })?;
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }
}

impl TrafficTargetSource for ManifestDirectory {
    fn list_traffic_targets(&self, namespace: &str) -> Result<Vec<TrafficTarget>, RetrievalError> {
        let mut targets = Vec::new();
        for path in self.manifest_paths()? {
            let loaded = load_traffic_targets(&path).map_err(|source| RetrievalError::Manifest {
                path: path.clone(),
                source,
            })?;
            debug!(path = %path.display(), count = loaded.len(), "loaded TrafficTargets");
            targets.extend(
                loaded
                    .into_iter()
                    .filter(|target| target.namespace() == namespace),
            );
        }
        Ok(targets)
    }
}
