// mesh.rs — Mesh traffic mode, mesh configuration and the permissive gate.
//
// In permissive traffic policy mode every meshed workload may talk to every
// other one, so SMI access policies are not consulted at all. The mode is
// read from the mesh's MeshConfig by the caller and passed into each run;
// checks never look it up themselves.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ConfigError;
use crate::outcome::Outcome;

/// Diagnostic reported when permissive mode short-circuits a check.
pub const PERMISSIVE_MODE_DIAGNOSTIC: &str = "Mesh is in permissive traffic policy mode: all meshed pods can communicate and SMI access policies are not applicable";

/// How the mesh treats traffic between meshed workloads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshTrafficMode {
    /// All-to-all communication; access policies are ignored.
    Permissive,
    /// Traffic is allowed only where an access policy permits it.
    #[default]
    PolicyEnforced,
}

impl MeshTrafficMode {
    pub fn from_permissive_flag(permissive: bool) -> Self {
        if permissive {
            MeshTrafficMode::Permissive
        } else {
            MeshTrafficMode::PolicyEnforced
        }
    }

    pub fn is_permissive(&self) -> bool {
        matches!(self, MeshTrafficMode::Permissive)
    }
}

/// Short-circuit policy evaluation when the mesh is permissive.
///
/// Returns the Diagnostic to report in permissive mode, `None` otherwise.
/// Every check that depends on access policy consults this before fetching
/// anything.
pub fn permissive_mode_gate(mode: MeshTrafficMode) -> Option<Outcome> {
    if mode.is_permissive() {
        info!("permissive traffic policy mode, skipping SMI access evaluation");
        Some(Outcome::diagnostic(PERMISSIVE_MODE_DIAGNOSTIC))
    } else {
        None
    }
}

/// The parts of a MeshConfig object that affect access evaluation.
///
/// ```yaml
/// apiVersion: config.openservicemesh.io/v1alpha1
/// kind: MeshConfig
/// metadata:
///   name: osm-mesh-config
/// spec:
///   traffic:
///     enablePermissiveTrafficPolicyMode: false
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MeshConfig {
    #[serde(default)]
    pub spec: MeshConfigSpec,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MeshConfigSpec {
    #[serde(default)]
    pub traffic: TrafficSpec,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrafficSpec {
    /// All meshed workloads may communicate when set.
    #[serde(default)]
    pub enable_permissive_traffic_policy_mode: bool,
}

impl MeshConfig {
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load a MeshConfig manifest from disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Try to load config, returning default (policy enforced) if it can't be read.
    ///
    /// A file that exists but fails to parse is logged at warn level.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(ConfigError::ReadFailed { source, .. }) => {
                debug!(path = %path.display(), error = %source, "no mesh config, enforcing policy");
                Self::default()
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "invalid mesh config, enforcing policy");
                Self::default()
            }
        }
    }

    pub fn traffic_mode(&self) -> MeshTrafficMode {
        let permissive = self.spec.traffic.enable_permissive_traffic_policy_mode;
        MeshTrafficMode::from_permissive_flag(permissive)
    }
}
