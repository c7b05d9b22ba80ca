// runnable.rs — The contract every check implements.

use crate::error::CheckError;
use crate::mesh::MeshTrafficMode;
use crate::outcome::{CheckReport, Outcome};

/// A diagnostic check a runner can describe, execute and explain.
///
/// Implementations hold no mutable state: `run` may be called any number
/// of times, from any thread, and each call yields exactly one Outcome.
pub trait Runnable: Send + Sync {
    /// Stable identifier used in logs and errors (e.g., "traffic_target").
    fn name(&self) -> &'static str;

    /// What is being checked.
    fn description(&self) -> String;

    /// Execute the check against the given mesh traffic mode.
    fn run(&self, mode: MeshTrafficMode) -> Outcome;

    /// A next step for a human when the outcome is not successful.
    fn suggestion(&self) -> String;

    /// Automated remediation. Checks are read-only, so this is not supported.
    fn fix_it(&self) -> Result<(), CheckError> {
        Err(CheckError::NotSupported {
            check: self.name(),
            operation: "fix_it",
        })
    }

    /// Run the check and bundle the result with its description and suggestion.
    fn report(&self, mode: MeshTrafficMode) -> CheckReport {
        CheckReport {
            description: self.description(),
            outcome: self.run(mode),
            suggestion: self.suggestion(),
        }
    }
}
