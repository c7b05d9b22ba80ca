// traffic_target.rs — SMI TrafficTarget definitions.
//
// A TrafficTarget authorizes traffic from a set of source identities to one
// destination identity, scoped by route rules. The shape mirrors the
// `access.smi-spec.io/v1alpha3` wire format so objects fetched from a
// cluster (or read from a manifest) deserialize directly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The SMI access API group.
pub const ACCESS_API_GROUP: &str = "access.smi-spec.io";

/// The apiVersion written when constructing TrafficTargets in code.
pub const TRAFFIC_TARGET_API_VERSION: &str = "access.smi-spec.io/v1alpha3";

/// The Kubernetes kind of a TrafficTarget.
pub const TRAFFIC_TARGET_KIND: &str = "TrafficTarget";

/// Subject kind for service account identities.
pub const SERVICE_ACCOUNT_KIND: &str = "ServiceAccount";

/// Namespace assumed for objects that do not declare one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Object metadata. Only the fields the evaluator reads are modelled.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    /// Object name.
    #[serde(default)]
    pub name: String,
    /// Object namespace. `None` means the `default` namespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Object labels.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

impl ObjectMeta {
    /// Create metadata for a namespaced object.
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Some(namespace.into()),
            labels: BTreeMap::new(),
        }
    }
}

/// An SMI TrafficTarget (access-control policy).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrafficTarget {
    #[serde(default = "TrafficTarget::default_api_version")]
    pub api_version: String,
    #[serde(default = "TrafficTarget::default_kind")]
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: TrafficTargetSpec,
}

impl TrafficTarget {
    fn default_api_version() -> String {
        TRAFFIC_TARGET_API_VERSION.to_string()
    }

    fn default_kind() -> String {
        TRAFFIC_TARGET_KIND.to_string()
    }

    /// Create a TrafficTarget in the given namespace.
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        spec: TrafficTargetSpec,
    ) -> Self {
        Self {
            api_version: Self::default_api_version(),
            kind: Self::default_kind(),
            metadata: ObjectMeta::new(name, namespace),
            spec,
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// The namespace this policy lives in, `default` when unset.
    pub fn namespace(&self) -> &str {
        self.metadata
            .namespace
            .as_deref()
            .unwrap_or(DEFAULT_NAMESPACE)
    }
}

/// TrafficTarget spec: who may send, who may receive, and over which routes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrafficTargetSpec {
    /// The identity allowed to receive traffic.
    pub destination: IdentityBindingSubject,

    /// Identities allowed to originate traffic, in declaration order.
    #[serde(default)]
    pub sources: Vec<IdentityBindingSubject>,

    /// Permitted traffic shapes, in declaration order.
    #[serde(default)]
    pub rules: Vec<TrafficTargetRule>,
}

/// A selector naming a workload identity.
///
/// Example: `{ kind: ServiceAccount, name: bookstore, namespace: default }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IdentityBindingSubject {
    /// Identity kind; only `ServiceAccount` is understood.
    pub kind: String,
    /// Service account name.
    pub name: String,
    /// Namespace of the identity. Unset matches a workload in any namespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Destination port. Informational; matching ignores it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl IdentityBindingSubject {
    /// A `ServiceAccount` subject without an explicit namespace.
    pub fn service_account(name: impl Into<String>) -> Self {
        Self {
            kind: SERVICE_ACCOUNT_KIND.to_string(),
            name: name.into(),
            namespace: None,
            port: None,
        }
    }

    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }
}

/// A route rule reference: `(kind, name, matches)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrafficTargetRule {
    /// Route kind (e.g., `HTTPRouteGroup`, `TCPRoute`).
    pub kind: String,
    /// Name of the referenced route object.
    pub name: String,
    /// Named matches within the route object.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matches: Vec<String>,
}

impl TrafficTargetRule {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            matches: Vec::new(),
        }
    }

    pub fn with_matches<I, S>(mut self, matches: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.matches = matches.into_iter().map(Into::into).collect();
        self
    }
}
