// access.rs — SMI access checks for a (source pod, destination pod) pair.
//
// Both checks follow the same flow:
//
// 1. Permissive mode? → Diagnostic, stop (no TrafficTargets are fetched)
// 2. List TrafficTargets in the destination namespace → error? → Failed
// 3. Match them against the pair → none? → Diagnostic "not allowed"
//
// TrafficTargetCheck then reports which policies authorize the pair.
// RoutesValidityCheck instead validates the route kinds those policies use:
// any unsupported kind → Failed, otherwise Successful.

use std::fmt;
use std::sync::Arc;

use mh_smi::{
    match_traffic_targets, unsupported_route_kinds, TrafficTarget, WorkloadIdentity,
    SUPPORTED_ROUTE_KINDS,
};
use tracing::{info, warn};

use crate::error::{CheckError, RetrievalError};
use crate::mesh::{permissive_mode_gate, MeshTrafficMode};
use crate::outcome::Outcome;
use crate::runnable::Runnable;
use crate::source::TrafficTargetSource;

/// The workloads under test and where to find their TrafficTargets.
#[derive(Clone)]
pub struct PodPair {
    pub source: WorkloadIdentity,
    pub destination: WorkloadIdentity,
    targets: Arc<dyn TrafficTargetSource>,
}

impl PodPair {
    pub fn new(
        source: WorkloadIdentity,
        destination: WorkloadIdentity,
        targets: Arc<dyn TrafficTargetSource>,
    ) -> Self {
        Self {
            source,
            destination,
            targets,
        }
    }

    /// TrafficTargets in the destination namespace that authorize this pair.
    fn authorizing_targets(&self) -> Result<Vec<TrafficTarget>, RetrievalError> {
        let listed = self
            .targets
            .list_traffic_targets(&self.destination.namespace)?;
        Ok(match_traffic_targets(&listed, &self.source, &self.destination)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Steps 1-3 shared by every access check.
    ///
    /// `Err` carries the outcome to report immediately; `Ok` carries a
    /// non-empty list of authorizing TrafficTargets.
    fn evaluate(&self, mode: MeshTrafficMode) -> Result<Vec<TrafficTarget>, Outcome> {
        if let Some(outcome) = permissive_mode_gate(mode) {
            return Err(outcome);
        }

        let matched = self.authorizing_targets().map_err(|err| {
            warn!(error = %err, "failed to obtain TrafficTargets");
            Outcome::failed(err)
        })?;

        if matched.is_empty() {
            return Err(Outcome::diagnostic(format!(
                "Pod '{}' is not allowed to communicate to pod '{}' via any SMI TrafficTarget policy",
                self.source.qualified_name(),
                self.destination.qualified_name()
            )));
        }
        Ok(matched)
    }

    fn kubectl_hint(&self) -> String {
        format!(
            "To get relevant TrafficTargets, use: \"kubectl get traffictarget -n {} -o yaml\"",
            self.destination.namespace
        )
    }
}

impl fmt::Debug for PodPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PodPair")
            .field("source", &self.source)
            .field("destination", &self.destination)
            .finish_non_exhaustive()
    }
}

/// Is the source pod allowed to reach the destination pod by some TrafficTarget?
#[derive(Debug, Clone)]
pub struct TrafficTargetCheck {
    pair: PodPair,
}

impl TrafficTargetCheck {
    pub fn new(pair: PodPair) -> Self {
        Self { pair }
    }
}

impl Runnable for TrafficTargetCheck {
    fn name(&self) -> &'static str {
        "traffic_target"
    }

    fn description(&self) -> String {
        format!(
            "Checking whether there is a TrafficTarget with source pod {} and destination pod {}",
            self.pair.source.name, self.pair.destination.name
        )
    }

    fn run(&self, mode: MeshTrafficMode) -> Outcome {
        let matched = match self.pair.evaluate(mode) {
            Ok(matched) => matched,
            Err(outcome) => return outcome,
        };

        let names: Vec<&str> = matched.iter().map(|t| t.name()).collect();
        info!(
            source = %self.pair.source.qualified_name(),
            destination = %self.pair.destination.qualified_name(),
            traffic_targets = ?names,
            "pair authorized"
        );
        Outcome::diagnostic(format!(
            "Pod '{}' is allowed to communicate to pod '{}' via SMI TrafficTarget policy/policies: {}",
            self.pair.source.qualified_name(),
            self.pair.destination.qualified_name(),
            names.join(", ")
        ))
    }

    fn suggestion(&self) -> String {
        format!(
            "Check that source and destination pod are referred to in a TrafficTarget. {}",
            self.pair.kubectl_hint()
        )
    }
}

/// Do the TrafficTargets authorizing the pair only use supported route kinds?
#[derive(Debug, Clone)]
pub struct RoutesValidityCheck {
    pair: PodPair,
}

impl RoutesValidityCheck {
    pub fn new(pair: PodPair) -> Self {
        Self { pair }
    }
}

impl Runnable for RoutesValidityCheck {
    fn name(&self) -> &'static str {
        "routes_validity"
    }

    fn description(&self) -> String {
        format!(
            "Checking whether TrafficTargets with source pod {} and destination pod {} have valid routes ({})",
            self.pair.source.name,
            self.pair.destination.name,
            SUPPORTED_ROUTE_KINDS.join(" or ")
        )
    }

    fn run(&self, mode: MeshTrafficMode) -> Outcome {
        let matched = match self.pair.evaluate(mode) {
            Ok(matched) => matched,
            Err(outcome) => return outcome,
        };

        let unsupported = unsupported_route_kinds(&matched, SUPPORTED_ROUTE_KINDS);
        if unsupported.is_empty() {
            Outcome::Successful
        } else {
            Outcome::failed(CheckError::UnsupportedRoutes { unsupported })
        }
    }

    fn suggestion(&self) -> String {
        format!(
            "Check that TrafficTarget routes are of kind {}. {}",
            SUPPORTED_ROUTE_KINDS.join(" or "),
            self.pair.kubectl_hint()
        )
    }
}

/// The closed set of SMI access checks.
#[derive(Debug, Clone)]
pub enum AccessCheck {
    PolicyExistence(TrafficTargetCheck),
    RouteValidity(RoutesValidityCheck),
}

impl AccessCheck {
    /// Every access check for a pair, in the order a runner should report them.
    pub fn all(pair: PodPair) -> Vec<AccessCheck> {
        vec![
            AccessCheck::PolicyExistence(TrafficTargetCheck::new(pair.clone())),
            AccessCheck::RouteValidity(RoutesValidityCheck::new(pair)),
        ]
    }

    fn inner(&self) -> &dyn Runnable {
        match self {
            AccessCheck::PolicyExistence(check) => check as &dyn Runnable,
            AccessCheck::RouteValidity(check) => check as &dyn Runnable,
        }
    }
}

impl Runnable for AccessCheck {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn description(&self) -> String {
        self.inner().description()
    }

    fn run(&self, mode: MeshTrafficMode) -> Outcome {
        self.inner().run(mode)
    }

    fn suggestion(&self) -> String {
        self.inner().suggestion()
    }
}
