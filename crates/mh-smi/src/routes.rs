// routes.rs — Route kind validation for matched TrafficTargets.
//
// The mesh only programs HTTPRouteGroup and TCPRoute rules. A TrafficTarget
// that references any other kind authorizes nothing for that rule, which is
// a misconfiguration worth failing a check over.

use std::collections::BTreeMap;

use tracing::warn;

use crate::traffic_target::TrafficTarget;

pub const HTTP_ROUTE_GROUP_KIND: &str = "HTTPRouteGroup";
pub const TCP_ROUTE_KIND: &str = "TCPRoute";

/// Route kinds the mesh understands.
pub const SUPPORTED_ROUTE_KINDS: &[&str] = &[HTTP_ROUTE_GROUP_KIND, TCP_ROUTE_KIND];

/// TrafficTarget name → unsupported rule kind.
///
/// A `BTreeMap` so aggregated messages list policies in a stable order.
pub type UnsupportedRoutes = BTreeMap<String, String>;

/// Collect rules whose kind is not in `supported`.
///
/// Each offending policy is recorded once. When a policy has several
/// unsupported rules, the last one seen wins.
pub fn unsupported_route_kinds<'a, I>(matched: I, supported: &[&str]) -> UnsupportedRoutes
where
    I: IntoIterator<Item = &'a TrafficTarget>,
{
    let mut unsupported = UnsupportedRoutes::new();
    for target in matched {
        for rule in &target.spec.rules {
            if !supported.contains(&rule.kind.as_str()) {
                warn!(
                    traffic_target = %target.name(),
                    kind = %rule.kind,
                    rule = %rule.name,
                    "TrafficTarget references unsupported route kind"
                );
                unsupported.insert(target.name().to_string(), rule.kind.clone());
            }
        }
    }
    unsupported
}

/// Render one message naming every offending policy and its route kind.
pub fn describe_unsupported_routes(unsupported: &UnsupportedRoutes) -> String {
    let offenders = unsupported
        .iter()
        .map(|(target, kind)| format!("{}: {}", target, kind))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "expected routes of kind {}, found the following TrafficTargets with unsupported routes: {}",
        SUPPORTED_ROUTE_KINDS.join(" or "),
        offenders
    )
}
