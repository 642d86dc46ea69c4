//! Glue for checking that a policy written through one resource reads back
//! equivalent through another.
//!
//! The provisioning machinery is external. It hands over a [`StateSnapshot`]
//! of resource ids and attributes, plus a [`PolicySource`] for live reads.
//! Only fetches are retried, never comparisons: comparing is deterministic.

use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::comparator::PolicyComparator;
use crate::error::{CheckError, FetchError};
use crate::rules::EquivalenceRules;
use crate::traits::PolicySource;

/// One resource's recorded state: its primary id and string attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceState {
    pub id: String,
    pub attributes: HashMap<String, String>,
}

impl ResourceState {
    pub fn new(id: impl Into<String>) -> Self {
        ResourceState {
            id: id.into(),
            attributes: HashMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

/// Resources keyed by address, e.g. `aws_s3_bucket_policy.bucket`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateSnapshot {
    resources: HashMap<String, ResourceState>,
}

impl StateSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(mut self, name: impl Into<String>, state: ResourceState) -> Self {
        self.insert(name, state);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, state: ResourceState) {
        self.resources.insert(name.into(), state);
    }

    pub fn resource(&self, name: &str) -> Option<&ResourceState> {
        self.resources.get(name)
    }

    /// The named resource, provided it exists and has an id.
    fn primary(&self, name: &str) -> Result<&ResourceState, CheckError> {
        let state = self
            .resource(name)
            .ok_or_else(|| CheckError::ResourceNotFound(name.to_string()))?;
        if state.id.is_empty() {
            return Err(CheckError::MissingId(name.to_string()));
        }
        Ok(state)
    }

    /// An attribute of the named resource.
    pub fn attribute(&self, name: &str, attribute: &str) -> Result<&str, CheckError> {
        self.primary(name)?
            .attributes
            .get(attribute)
            .map(String::as_str)
            .ok_or_else(|| CheckError::AttributeNotFound {
                resource: name.to_string(),
                attribute: attribute.to_string(),
            })
    }
}

/// How often and how patiently to retry a transient fetch failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 5,
            delay_ms: 2000,
        }
    }
}

impl RetryPolicy {
    /// A single attempt.
    pub fn none() -> Self {
        RetryPolicy {
            max_attempts: 1,
            delay_ms: 0,
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Fetch a policy, retrying only `FetchError::Transient` failures.
pub fn fetch_with_retry(
    source: &dyn PolicySource,
    resource_id: &str,
    retry: &RetryPolicy,
) -> Result<String, FetchError> {
    let attempts = retry.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match source.fetch_policy(resource_id) {
            Err(FetchError::Transient(reason)) if attempt < attempts => {
                warn!(
                    event = "Fetch",
                    phase = "Retry",
                    resource = resource_id,
                    attempt,
                    reason
                );
                thread::sleep(retry.delay());
                attempt += 1;
            }
            result => return result,
        }
    }
}

/// Check that the named resource exists and its live policy can be read.
/// Returns the fetched policy text.
pub fn check_policy_exists(
    state: &StateSnapshot,
    name: &str,
    source: &dyn PolicySource,
    retry: &RetryPolicy,
) -> Result<String, CheckError> {
    let resource = state.primary(name)?;
    debug!(event = "Fetch", phase = "Start", resource = name, id = resource.id);
    match fetch_with_retry(source, &resource.id, retry) {
        Ok(policy) => Ok(policy),
        Err(FetchError::NotFound(_)) => Err(CheckError::BucketNotFound(resource.id.clone())),
        Err(err) => Err(err.into()),
    }
}

/// Check that `resource1.attr1` and `resource2.attr2` hold equivalent policies
/// under [`EquivalenceRules::provider_compatible`], since one side is usually
/// the provider's rewritten copy of the other.
pub fn check_policies_match(
    state: &StateSnapshot,
    resource1: &str,
    attr1: &str,
    resource2: &str,
    attr2: &str,
) -> Result<(), CheckError> {
    check_policies_match_with(
        &PolicyComparator::with_rules(EquivalenceRules::provider_compatible()),
        state,
        resource1,
        attr1,
        resource2,
        attr2,
    )
}

/// [`check_policies_match`] with an explicit comparator.
pub fn check_policies_match_with(
    comparator: &PolicyComparator,
    state: &StateSnapshot,
    resource1: &str,
    attr1: &str,
    resource2: &str,
    attr2: &str,
) -> Result<(), CheckError> {
    let policy1 = state.attribute(resource1, attr1)?;
    let policy2 = state.attribute(resource2, attr2)?;

    let comparison = comparator.compare(policy1, policy2)?;
    if comparison.equivalent {
        return Ok(());
    }

    Err(CheckError::PoliciesDiffer {
        policy1: policy1.to_string(),
        policy2: policy2.to_string(),
        diff: comparison.to_string(),
    })
}
