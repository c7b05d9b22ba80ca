//! # mh-smi
//!
//! SMI access-control model and evaluation primitives for Mesh Health.
//!
//! Given a set of [`TrafficTarget`] policies and a (source, destination)
//! pair of [`WorkloadIdentity`] snapshots, [`match_traffic_targets`] returns
//! the policies that explicitly authorize the flow, and
//! [`unsupported_route_kinds`] reports rules whose kind the mesh cannot
//! program.
//!
//! ## Key invariants
//!
//! - **Identity matching only**: a selector matches a workload when kind,
//!   service account are equal, and the namespace too when the selector sets
//!   one. No labels, prefixes or wildcards.
//! - **Order preserved**: match results follow the input policy order.
//! - **Pure**: nothing here performs I/O except the explicit manifest loaders.

pub mod error;
pub mod identity;
pub mod manifest;
pub mod matcher;
pub mod routes;
pub mod traffic_target;

pub use error::SmiError;
pub use identity::{IdentityKind, PodInfo, WorkloadIdentity};
pub use manifest::{load_traffic_targets, parse_traffic_targets};
pub use matcher::{destination_matches, match_traffic_targets, source_matches};
pub use routes::{
    describe_unsupported_routes, unsupported_route_kinds, UnsupportedRoutes,
    HTTP_ROUTE_GROUP_KIND, SUPPORTED_ROUTE_KINDS, TCP_ROUTE_KIND,
};
pub use traffic_target::{
    IdentityBindingSubject, ObjectMeta, TrafficTarget, TrafficTargetRule, TrafficTargetSpec,
};
