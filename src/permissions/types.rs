use crate::auth::AccountId;
use serde::{Deserialize, Serialize};

/// A user's grant level as seen by one requesting counterparty.
///
/// Level 0 means revoked; rows are never deleted, so a present row with
/// level 0 records that consent was once given and later withdrawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRecord {
    pub user: AccountId,
    pub granted_level: u8,
}

/// Storage link to a consumer's permission data, created once via the
/// cross-store bootstrap and thereafter updated by the local application
/// without re-authorizing the consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerLink {
    pub consumer: AccountId,
    pub data_pointer: String,
    pub merkle_root: String,
}

/// Composite storage key for a permission row. The scope comes first so a
/// prefix scan yields one counterparty's whole view.
pub fn scoped_permission_key(scope: AccountId, user: AccountId) -> String {
    format!("{}:{}", scope, user)
}

/// Prefix selecting every permission row in one scope
pub fn scope_prefix(scope: AccountId) -> String {
    format!("{}:", scope)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_prefixes_never_collide() {
        // "1:" must not select scope 12's rows
        let key = scoped_permission_key(AccountId(12), AccountId(5));
        assert!(!key.starts_with(&scope_prefix(AccountId(1))));
        assert!(key.starts_with(&scope_prefix(AccountId(12))));
    }
}
