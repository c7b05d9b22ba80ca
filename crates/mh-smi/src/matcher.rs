// matcher.rs — TrafficTarget matching for a (source, destination) pair.
//
// A TrafficTarget authorizes a flow when:
//
// 1. Its destination subject names the destination workload's identity
// 2. At least one of its source subjects names the source workload's identity
//
// A subject names a workload when, exactly:
//
// - subject.kind == workload identity kind ("ServiceAccount")
// - subject.name == workload service account
// - subject.namespace == workload namespace, only when the subject sets one
//
// There is no prefix, wildcard or label-selector matching. An empty result is
// a normal answer ("no policy permits this flow"), never an error.

use tracing::debug;

use crate::identity::WorkloadIdentity;
use crate::traffic_target::{IdentityBindingSubject, TrafficTarget};

/// Return the TrafficTargets that authorize `source` to reach `destination`.
///
/// Results keep the input order and are not deduplicated: a pair may be
/// covered by several policies and every one is reported.
pub fn match_traffic_targets<'a>(
    targets: &'a [TrafficTarget],
    source: &WorkloadIdentity,
    destination: &WorkloadIdentity,
) -> Vec<&'a TrafficTarget> {
    targets
        .iter()
        .filter(|target| {
            if !destination_matches(target, destination) {
                debug!(
                    traffic_target = %target.name(),
                    destination = %destination.qualified_name(),
                    "destination does not match"
                );
                return false;
            }
            if !source_matches(target, source) {
                debug!(
                    traffic_target = %target.name(),
                    source = %source.qualified_name(),
                    "no source subject matches"
                );
                return false;
            }
            debug!(traffic_target = %target.name(), "TrafficTarget authorizes pair");
            true
        })
        .collect()
}

/// Does the TrafficTarget's destination subject name `workload`?
pub fn destination_matches(target: &TrafficTarget, workload: &WorkloadIdentity) -> bool {
    subject_matches(&target.spec.destination, workload)
}

/// Does any of the TrafficTarget's source subjects name `workload`?
pub fn source_matches(target: &TrafficTarget, workload: &WorkloadIdentity) -> bool {
    target
        .spec
        .sources
        .iter()
        .any(|subject| subject_matches(subject, workload))
}

fn subject_matches(subject: &IdentityBindingSubject, workload: &WorkloadIdentity) -> bool {
    subject.kind == workload.kind().as_str()
        && subject.name == workload.identity_name()
        && subject
            .namespace
            .as_deref()
            .map_or(true, |namespace| namespace == workload.namespace)
}
