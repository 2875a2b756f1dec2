//! Collision-resistant resource names.
//!
//! Every resource a run creates carries a random hex suffix so concurrent
//! runs against the same platform never touch each other's resources.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};

/// Return 16 lowercase hex characters with 64 bits of entropy.
///
/// Entropy sources: nanosecond timestamp and two independent `RandomState` hashes.
#[must_use]
pub fn random_suffix() -> String {
    let mut hasher = RandomState::new().build_hasher();
    hasher.write_u128(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0),
    );
    hasher.write_u64(RandomState::new().build_hasher().finish());
    hasher.write_u64(RandomState::new().build_hasher().finish());
    format!("{:016x}", hasher.finish())
}

/// Build `<prefix>-<resource>-<16 hex chars>`.
#[must_use]
pub fn prefixed_random_name(prefix: &str, resource: &str) -> String {
    format!("{prefix}-{resource}-{}", random_suffix())
}

/// Names of every resource a single `SimpleAppAndService` run creates.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ScenarioNames {
    pub app: String,
    pub service: String,
    pub security_group: String,
}

impl ScenarioNames {
    /// Generate a fresh set of names scoped to `category` (the service class).
    #[must_use]
    pub fn generate(category: &str) -> Self {
        Self {
            app: prefixed_random_name(category, "app"),
            service: prefixed_random_name(category, "service"),
            security_group: prefixed_random_name(category, "security-group"),
        }
    }
}

/// Names of the org, space and user a suite creates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteNames {
    pub org: String,
    pub space: String,
    pub user: String,
}

impl SuiteNames {
    #[must_use]
    pub fn generate(prefix: &str) -> Self {
        Self {
            org: prefixed_random_name(prefix, "ORG"),
            space: prefixed_random_name(prefix, "SPACE"),
            user: prefixed_random_name(prefix, "USER"),
        }
    }
}
