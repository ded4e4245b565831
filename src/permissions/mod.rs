//! Scoped permission grants and consumer links.
//!
//! Permission rows live in a single family keyed by `(scope, user)`, where
//! the scope is the requesting counterparty. Two counterparties never
//! observe or collide on each other's rows for the same user; the isolation
//! is structural, carried by the composite key rather than a field.

mod delegated;
mod types;

pub use delegated::DelegatedPermissionChange;
pub use types::{ConsumerLink, PermissionRecord, scoped_permission_key, scope_prefix};

/// Sentinel data pointer a consumer link is created with (46 zero bytes,
/// the width of a content pointer)
pub const LINK_DATA_POINTER_SENTINEL: &str =
    "0000000000000000000000000000000000000000000000";

/// Sentinel merkle root a consumer link is created with (64 zero bytes)
pub const LINK_MERKLE_ROOT_SENTINEL: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";
