use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while parsing or normalizing a policy document.
///
/// Neither variant is ever folded into a "not equivalent" verdict; a document
/// that cannot be read is reported as such.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum PolicyError {
    #[error("malformed policy at {path}: {reason}")]
    MalformedPolicy { path: String, reason: String },

    #[error("unsupported construct at {path}: {construct}")]
    UnsupportedConstruct { path: String, construct: String },
}

impl PolicyError {
    pub(crate) fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        PolicyError::MalformedPolicy {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported(path: impl Into<String>, construct: impl Into<String>) -> Self {
        PolicyError::UnsupportedConstruct {
            path: path.into(),
            construct: construct.into(),
        }
    }

    /// The JSON path the error points at, e.g. `$.Statement[0].Action[1]`.
    pub fn path(&self) -> &str {
        match self {
            PolicyError::MalformedPolicy { path, .. } => path,
            PolicyError::UnsupportedConstruct { path, .. } => path,
        }
    }
}

/// Errors a [`PolicySource`](crate::PolicySource) reports when fetching a policy.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum FetchError {
    #[error("no policy found for {0}")]
    NotFound(String),

    /// Worth retrying, e.g. a freshly written policy that is not yet readable.
    #[error("transient fetch failure: {0}")]
    Transient(String),

    #[error("fetch failed: {0}")]
    Other(String),
}

/// Failures reported by the harness checks.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("not found: {0}")]
    ResourceNotFound(String),

    #[error("no ID is set for {0}")]
    MissingId(String),

    #[error("attribute {attribute:?} not found for {resource:?}")]
    AttributeNotFound { resource: String, attribute: String },

    #[error("bucket not found: {0}")]
    BucketNotFound(String),

    #[error("fetching policy failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("comparing policies failed: {0}")]
    Comparison(#[from] PolicyError),

    #[error("policies differ.\npolicy1: {policy1}\npolicy2: {policy2}\n{diff}")]
    PoliciesDiffer {
        policy1: String,
        policy2: String,
        diff: String,
    },
}

impl From<serde_json::Error> for PolicyError {
    fn from(err: serde_json::Error) -> Self {
        PolicyError::malformed("$", err.to_string())
    }
}
