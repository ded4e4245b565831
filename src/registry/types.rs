use crate::auth::AccountId;
use serde::{Deserialize, Serialize};

/// One row per application identity. Rows are never deleted; trust is
/// withdrawn by clearing the flag so history is retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppValidity {
    pub app: AccountId,
    /// Content pointer describing the application
    pub content_pointer: String,
    pub is_valid: bool,
}

/// A released application binary checksum, keyed by auto-increment id.
/// Append-only; the governing authority records one row per released
/// (version, architecture) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRecord {
    pub id: u64,
    pub version_number: u64,
    pub version_code: String,
    pub arch_id: u64,
    pub binary_hash: String,
}
