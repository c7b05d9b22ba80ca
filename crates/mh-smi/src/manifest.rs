// manifest.rs — Loading TrafficTargets from YAML manifests.
//
// Manifests may hold several `---`-separated documents of mixed kinds, the
// way a repo of mesh config does. A `kind: List` document, which is what
// `kubectl get ... -o yaml` prints, is flattened into its `items`. Only
// TrafficTarget objects are returned; other kinds (HTTPRouteGroup, TCPRoute,
// Services) are skipped. Empty documents are ignored.

use std::path::Path;

use serde::Deserialize;
use serde_yaml::Value;
use tracing::debug;

use crate::error::SmiError;
use crate::traffic_target::{TrafficTarget, ACCESS_API_GROUP, TRAFFIC_TARGET_KIND};

/// Kind of the wrapper object `kubectl get -o yaml` emits for collections.
pub const LIST_KIND: &str = "List";

/// Parse every TrafficTarget object in `content`, in document order.
///
/// Items of a `List` document are visited in place of the list itself.
pub fn parse_traffic_targets(content: &str) -> Result<Vec<TrafficTarget>, SmiError> {
    let mut targets = Vec::new();

    for document in serde_yaml::Deserializer::from_str(content) {
        let value = Value::deserialize(document)?;
        if value.is_null() {
            continue;
        }

        if kind_of(&value) == Some(LIST_KIND) {
            let items = match value.get("items") {
                Some(Value::Sequence(items)) => items.clone(),
                _ => Vec::new(),
            };
            debug!(count = items.len(), "flattening List document");
            for item in items {
                push_traffic_target(item, &mut targets)?;
            }
        } else {
            push_traffic_target(value, &mut targets)?;
        }
    }

    Ok(targets)
}

fn kind_of(value: &Value) -> Option<&str> {
    value.get("kind").and_then(Value::as_str)
}

/// Deserialize `value` into `targets` if it is a TrafficTarget, skip it otherwise.
fn push_traffic_target(value: Value, targets: &mut Vec<TrafficTarget>) -> Result<(), SmiError> {
    let kind = kind_of(&value);
    if kind != Some(TRAFFIC_TARGET_KIND) {
        debug!(kind = kind.unwrap_or("<none>"), "skipping non-TrafficTarget document");
        return Ok(());
    }

    let target: TrafficTarget = serde_yaml::from_value(value)?;
    if !is_access_api_version(&target.api_version) {
        return Err(SmiError::UnsupportedApiVersion {
            name: target.metadata.name,
            api_version: target.api_version,
        });
    }
    targets.push(target);
    Ok(())
}

/// Read and parse a manifest file.
pub fn load_traffic_targets(path: &Path) -> Result<Vec<TrafficTarget>, SmiError> {
    let content = std::fs::read_to_string(path).map_err(|source| SmiError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    parse_traffic_targets(&content)
}

/// `access.smi-spec.io/<version>`
fn is_access_api_version(api_version: &str) -> bool {
    match api_version.split_once('/') {
        Some((group, version)) => group == ACCESS_API_GROUP && !version.is_empty(),
        None => false,
    }
}
