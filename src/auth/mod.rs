//! Principals, actions, and pluggable capability checks.
//!
//! The host execution environment authenticates callers; this module only
//! decides whether an authenticated principal may perform a given action.
//! Deployments inject an [`AuthorizationPolicy`] rather than hard-coding
//! per-action constants, so tiered and delegated authority stay swappable.

mod policy;

pub use policy::{Action, AuthorizationPolicy, ConsentMode, GoverningAuthority};

use serde::{Deserialize, Serialize};
use std::fmt;

/// An authenticated on-ledger identity.
///
/// Identities are 64-bit, matching the keyed-storage primitive of the host
/// environment. The same type names users, applications, providers, and
/// consumers; which role an id plays is positional.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct AccountId(pub u64);

impl AccountId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for AccountId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}
