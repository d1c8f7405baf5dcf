//! Resolver configuration

use serde::{Deserialize, Serialize};

/// What the resolver remembers about a name that did not resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Forget the failure; the next request queries the bus again
    #[default]
    Retry,
    /// Remember the failure for the lifetime of the resolver
    CacheFailure,
}

/// Resolver configuration.
///
/// Deserializes from a program's own configuration document; every field
/// has a default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub failure_policy: FailurePolicy,
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the failure policy
    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }
}
