// bookstore.rs — End-to-end scenarios for the SMI access checks.
//
// Exercises both checks the way a check runner would, against the bookstore
// demo topology:
//
//   bookstore-client (default) ──▶ bookstore (default)
//
//   1. One TrafficTarget authorizing the pair over an HTTPRouteGroup
//   2. No TrafficTargets at all
//   3. A TrafficTarget referencing a UDPRoute
//   4. Permissive mode with a spy source
//   5. TrafficTargets read from a manifest directory, pods parsed from YAML
//
// VERIFY:
//   - Existence check: Diagnostic naming the policy, or "not allowed"
//   - Validity check: Successful, Failed naming the bad route, or the same
//     "not allowed" Diagnostic when nothing matches
//   - Permissive mode never touches the TrafficTarget source

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mh_checks::{
    AccessCheck, ManifestDirectory, MeshConfig, MeshTrafficMode, Outcome, PodPair,
    RetrievalError, RoutesValidityCheck, Runnable, StaticTrafficTargets, TrafficTargetCheck,
    TrafficTargetSource,
};
use mh_smi::{
    IdentityBindingSubject, PodInfo, TrafficTarget, TrafficTargetRule, TrafficTargetSpec,
    WorkloadIdentity,
};

fn bookstore_client() -> WorkloadIdentity {
    WorkloadIdentity::new("bookstore-client-6b8c", "default", "bookstore-client")
        .with_label("app", "bookstore-client")
}

fn bookstore() -> WorkloadIdentity {
    WorkloadIdentity::new("bookstore-v1-77c4", "default", "bookstore").with_label("app", "bookstore")
}

fn bookstore_access(rule_kind: &str) -> TrafficTarget {
    TrafficTarget::new(
        "bookstore-access",
        "default",
        TrafficTargetSpec {
            destination: IdentityBindingSubject::service_account("bookstore"),
            sources: vec![IdentityBindingSubject::service_account("bookstore-client")],
            rules: vec![TrafficTargetRule::new(rule_kind, "bookstore-service-routes")
                .with_matches(["buy-a-book"])],
        },
    )
}

fn pair(targets: Vec<TrafficTarget>) -> PodPair {
    PodPair::new(
        bookstore_client(),
        bookstore(),
        Arc::new(StaticTrafficTargets::new(targets)),
    )
}

#[test]
fn authorized_pair_with_http_routes() {
    let pair = pair(vec![bookstore_access("HTTPRouteGroup")]);

    let existence = TrafficTargetCheck::new(pair.clone()).run(MeshTrafficMode::PolicyEnforced);
    let message = existence.message().expect("expected a diagnostic");
    assert!(message.contains("is allowed to communicate"));
    assert!(message.contains("bookstore-access"));

    let validity = RoutesValidityCheck::new(pair).run(MeshTrafficMode::PolicyEnforced);
    assert!(validity.is_successful());
}

#[test]
fn tcp_routes_are_valid() {
    let check = RoutesValidityCheck::new(pair(vec![bookstore_access("TCPRoute")]));
    let validity = check.run(MeshTrafficMode::PolicyEnforced);
    assert!(validity.is_successful());
}

#[test]
fn no_policies_is_a_diagnostic_not_a_failure() {
    let expected = "Pod 'default/bookstore-client-6b8c' is not allowed to communicate to pod 'default/bookstore-v1-77c4' via any SMI TrafficTarget policy";

    for check in AccessCheck::all(pair(vec![])) {
        let outcome = check.run(MeshTrafficMode::PolicyEnforced);
        assert_eq!(outcome.message(), Some(expected), "check {}", check.name());
    }
}

#[test]
fn udp_route_fails_validity() {
    let pair = pair(vec![bookstore_access("UDPRoute")]);

    // The flow itself is still authorized.
    let existence = TrafficTargetCheck::new(pair.clone()).run(MeshTrafficMode::PolicyEnforced);
    assert!(existence.is_diagnostic());

    match RoutesValidityCheck::new(pair).run(MeshTrafficMode::PolicyEnforced) {
        Outcome::Failed { error } => {
            let message = error.to_string();
            assert!(message.contains("bookstore-access"));
            assert!(message.contains("UDPRoute"));
        }
        other => panic!("expected Failed, got {:?}", other),
    }
}

/// Spy source: counts every retrieval.
struct SpySource {
    calls: AtomicUsize,
}

impl TrafficTargetSource for SpySource {
    fn list_traffic_targets(&self, _: &str) -> Result<Vec<TrafficTarget>, RetrievalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![bookstore_access("UDPRoute")])
    }
}

#[test]
fn permissive_mode_never_evaluates_policies() {
    let spy = Arc::new(SpySource {
        calls: AtomicUsize::new(0),
    });
    let pair = PodPair::new(bookstore_client(), bookstore(), spy.clone());

    let mode =
        MeshConfig::from_yaml("spec:\n  traffic:\n    enablePermissiveTrafficPolicyMode: true\n")
            .unwrap()
            .traffic_mode();
    assert_eq!(mode, MeshTrafficMode::Permissive);

    for check in AccessCheck::all(pair.clone()) {
        assert!(check.run(mode).is_diagnostic());
    }
    assert_eq!(spy.calls.load(Ordering::SeqCst), 0);

    // Same pair, policy enforced: the UDPRoute is now evaluated.
    let outcome = RoutesValidityCheck::new(pair).run(MeshTrafficMode::PolicyEnforced);
    assert!(outcome.is_failed());
    assert_eq!(spy.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn manifests_and_pods_from_yaml() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("bookstore.yaml"),
        r#"
apiVersion: access.smi-spec.io/v1alpha3
kind: TrafficTarget
metadata:
  name: bookstore-access
  namespace: bookstore
spec:
  destination:
    kind: ServiceAccount
    name: bookstore
    namespace: bookstore
  rules:
    - kind: HTTPRouteGroup
      name: bookstore-service-routes
      matches: [buy-a-book, books-bought]
  sources:
    - kind: ServiceAccount
      name: bookbuyer
      namespace: bookbuyer
---
apiVersion: specs.smi-spec.io/v1alpha4
kind: HTTPRouteGroup
metadata:
  name: bookstore-service-routes
  namespace: bookstore
spec:
  matches:
    - name: buy-a-book
      pathRegex: ".*a-book.*new"
"#,
    )
    .unwrap();

    let buyer = PodInfo::from_yaml(
        "metadata:\n  name: bookbuyer-5c8d\n  namespace: bookbuyer\nspec:\n  serviceAccountName: bookbuyer\n",
    )
    .unwrap();
    let store = PodInfo::from_yaml(
        "metadata:\n  name: bookstore-v2-9f1a\n  namespace: bookstore\nspec:\n  serviceAccountName: bookstore\n",
    )
    .unwrap();
    let thief = PodInfo::from_yaml(
        "metadata:\n  name: bookthief-1\n  namespace: bookthief\nspec:\n  serviceAccountName: bookthief\n",
    )
    .unwrap();

    let source: Arc<ManifestDirectory> = Arc::new(ManifestDirectory::new(dir.path()));

    let allowed = PodPair::new(buyer.identity(), store.identity(), source.clone());
    let report = AccessCheck::all(allowed)
        .iter()
        .map(|check| check.report(MeshTrafficMode::PolicyEnforced))
        .collect::<Vec<_>>();
    assert!(report[0]
        .outcome
        .message()
        .unwrap()
        .contains("via SMI TrafficTarget policy/policies: bookstore-access"));
    assert!(report[1].outcome.is_successful());
    assert!(report[1].to_json().unwrap().contains("\"status\": \"successful\""));

    let denied = PodPair::new(thief.identity(), store.identity(), source);
    let outcome = TrafficTargetCheck::new(denied).run(MeshTrafficMode::PolicyEnforced);
    assert!(outcome.message().unwrap().contains("is not allowed"));
}

#[test]
fn kubectl_list_dump_with_unqualified_source() {
    // `kubectl get traffictarget -n bookstore -o yaml` saved to disk; the
    // source subject carries no namespace.
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("traffictargets.yaml"),
        r#"
apiVersion: v1
kind: List
items:
  - apiVersion: access.smi-spec.io/v1alpha3
    kind: TrafficTarget
    metadata:
      name: bookstore-access
      namespace: bookstore
    spec:
      destination:
        kind: ServiceAccount
        name: bookstore
        namespace: bookstore
      rules:
        - kind: TCPRoute
          name: bookstore-tcp
      sources:
        - kind: ServiceAccount
          name: bookbuyer
metadata:
  resourceVersion: ""
"#,
    )
    .unwrap();

    let pair = PodPair::new(
        WorkloadIdentity::new("bookbuyer-1", "bookbuyer", "bookbuyer"),
        WorkloadIdentity::new("bookstore-1", "bookstore", "bookstore"),
        Arc::new(ManifestDirectory::new(dir.path())),
    );
    let existence = TrafficTargetCheck::new(pair.clone()).run(MeshTrafficMode::PolicyEnforced);
    assert!(existence
        .message()
        .unwrap()
        .contains("via SMI TrafficTarget policy/policies: bookstore-access"));
    assert!(RoutesValidityCheck::new(pair)
        .run(MeshTrafficMode::PolicyEnforced)
        .is_successful());
}

#[test]
fn broken_manifest_directory_fails_both_checks() {
    let pair = PodPair::new(
        bookstore_client(),
        bookstore(),
        Arc::new(ManifestDirectory::new("/nonexistent/mesh-manifests")),
    );
    for check in AccessCheck::all(pair) {
        let outcome = check.run(MeshTrafficMode::PolicyEnforced);
        assert!(outcome.is_failed());
        assert!(outcome
            .error()
            .unwrap()
            .to_string()
            .contains("/nonexistent/mesh-manifests"));
    }
}
