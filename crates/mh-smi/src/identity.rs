// identity.rs — Workload identities derived from pods.
//
// The evaluator never looks at a pod directly. Callers turn a pod snapshot
// into a WorkloadIdentity (namespace, name, labels, service account) and
// hand that to the matcher. In SMI the authorizing identity is the pod's
// service account; pods that do not name one run as `default`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SmiError;
use crate::traffic_target::{ObjectMeta, DEFAULT_NAMESPACE, SERVICE_ACCOUNT_KIND};

/// Service account Kubernetes assigns to pods that do not set one.
pub const DEFAULT_SERVICE_ACCOUNT: &str = "default";

/// The kind of identity a workload authenticates as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentityKind {
    ServiceAccount,
}

impl IdentityKind {
    /// The selector `kind` string that names this identity kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityKind::ServiceAccount => SERVICE_ACCOUNT_KIND,
        }
    }
}

impl fmt::Display for IdentityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable snapshot of who a pod is, taken at check time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadIdentity {
    /// Pod name.
    pub name: String,
    /// Pod namespace.
    pub namespace: String,
    /// Pod labels. Carried for reporting; matching never reads them.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    /// Service account the pod runs as.
    pub service_account: String,
}

impl WorkloadIdentity {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        service_account: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            labels: BTreeMap::new(),
            service_account: service_account.into(),
        }
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Identity kind. Every pod authenticates as its service account.
    pub fn kind(&self) -> IdentityKind {
        IdentityKind::ServiceAccount
    }

    /// The identity name a selector must carry to match this workload.
    pub fn identity_name(&self) -> &str {
        &self.service_account
    }

    /// `namespace/name`, as printed in diagnostics.
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

/// The subset of a Pod object needed to derive its identity.
///
/// Deserializes from a full Pod manifest; unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PodInfo {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: PodSpec,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PodSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account_name: Option<String>,
}

impl PodInfo {
    /// Parse a single Pod document.
    pub fn from_yaml(content: &str) -> Result<Self, SmiError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Derive the pod's workload identity.
    pub fn identity(&self) -> WorkloadIdentity {
        let service_account = self
            .spec
            .service_account_name
            .as_deref()
            .filter(|sa| !sa.is_empty())
            .unwrap_or(DEFAULT_SERVICE_ACCOUNT);
        WorkloadIdentity {
            name: self.metadata.name.clone(),
            namespace: self
                .metadata
                .namespace
                .clone()
                .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
            labels: self.metadata.labels.clone(),
            service_account: service_account.to_string(),
        }
    }
}

impl From<&PodInfo> for WorkloadIdentity {
    fn from(pod: &PodInfo) -> Self {
        pod.identity()
    }
}
