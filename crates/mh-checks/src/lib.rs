//! # mh-checks
//!
//! SMI access-policy diagnostic checks for Mesh Health.
//!
//! Each check implements [`Runnable`]: a description, a `run` that yields
//! exactly one [`Outcome`], and a suggestion for the human reading it.
//! Two checks exist for a (source pod, destination pod) pair:
//!
//! - [`TrafficTargetCheck`]: is the flow authorized by some TrafficTarget?
//! - [`RoutesValidityCheck`]: do the authorizing TrafficTargets only use
//!   supported route kinds?
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mh_checks::{AccessCheck, ManifestDirectory, MeshConfig, PodPair, Runnable};
//! use mh_smi::WorkloadIdentity;
//!
//! let mode = MeshConfig::load_or_default("mesh-config.yaml".as_ref()).traffic_mode();
//! let pair = PodPair::new(
//!     WorkloadIdentity::new("bookbuyer-1", "bookbuyer", "bookbuyer"),
//!     WorkloadIdentity::new("bookstore-1", "bookstore", "bookstore"),
//!     Arc::new(ManifestDirectory::new("manifests/")),
//! );
//! for check in AccessCheck::all(pair) {
//!     println!("{}", check.report(mode).to_json().unwrap());
//! }
//! ```
//!
//! ## Key invariants
//!
//! - **Permissive mode first**: no TrafficTargets are fetched when the mesh
//!   is permissive; both checks report a Diagnostic.
//! - **No match is not an error**: it is reported as a Diagnostic.
//! - **Read-only**: `fix_it` always returns [`CheckError::NotSupported`].

pub mod access;
pub mod error;
pub mod mesh;
pub mod outcome;
pub mod runnable;
pub mod source;

pub use access::{AccessCheck, PodPair, RoutesValidityCheck, TrafficTargetCheck};
pub use error::{CheckError, ConfigError, RetrievalError};
pub use mesh::{permissive_mode_gate, MeshConfig, MeshTrafficMode, PERMISSIVE_MODE_DIAGNOSTIC};
pub use outcome::{CheckReport, Outcome};
pub use runnable::Runnable;
pub use source::{ManifestDirectory, StaticTrafficTargets, TrafficTargetSource};
