// outcome.rs — The result shape shared by every check.
//
// A check run ends in exactly one Outcome:
//
// - Successful: nothing to report
// - Diagnostic: an expected, reportable mesh state (not an error)
// - Failed: a genuine fault or misconfiguration, with the error
//
// CheckReport bundles an Outcome with the check's description and
// suggestion so output collaborators can render or serialize it.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::CheckError;

/// The result of running a check.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The check passed with nothing further to say.
    Successful,
    /// The check produced a human-readable finding that is not an error.
    Diagnostic { message: String },
    /// The check failed.
    Failed {
        #[serde(serialize_with = "serialize_error")]
        error: CheckError,
    },
}

impl Outcome {
    pub fn diagnostic(message: impl Into<String>) -> Self {
        Outcome::Diagnostic {
            message: message.into(),
        }
    }

    pub fn failed(error: impl Into<CheckError>) -> Self {
        Outcome::Failed {
            error: error.into(),
        }
    }

    pub fn is_successful(&self) -> bool {
        matches!(self, Outcome::Successful)
    }

    pub fn is_diagnostic(&self) -> bool {
        matches!(self, Outcome::Diagnostic { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }

    /// The diagnostic message, if this is a Diagnostic.
    pub fn message(&self) -> Option<&str> {
        match self {
            Outcome::Diagnostic { message } => Some(message),
            _ => None,
        }
    }

    /// The error, if this is a Failed outcome.
    pub fn error(&self) -> Option<&CheckError> {
        match self {
            Outcome::Failed { error } => Some(error),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Successful => write!(f, "successful"),
            Outcome::Diagnostic { message } => write!(f, "diagnostic: {}", message),
            Outcome::Failed { error } => write!(f, "failed: {}", error),
        }
    }
}

fn serialize_error<S: Serializer>(error: &CheckError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// A check's description, outcome and suggestion from a single run.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub description: String,
    pub outcome: Outcome,
    pub suggestion: String,
}

impl CheckReport {
    /// Pretty-printed JSON for output collaborators.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
