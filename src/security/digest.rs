//! Digest handling for delegated permission updates

use crate::auth::AccountId;
use crate::error::{PactError, PactResult};
use sha2::{Digest, Sha256};

/// Decode a hex-encoded 32-byte digest
pub fn parse_digest_hex(digest_hex: &str) -> PactResult<[u8; 32]> {
    let bytes = hex::decode(digest_hex)
        .map_err(|e| PactError::InvalidArgument(format!("Malformed digest hex: {}", e)))?;

    bytes
        .as_slice()
        .try_into()
        .map_err(|_| PactError::InvalidArgument("Digest must be 32 bytes".to_string()))
}

/// SHA-256 over the canonical `"{user}:{scope}:{level}"` message.
///
/// This is the digest a signer must produce when digest binding is enforced;
/// with binding off the store accepts any digest the relay supplies.
pub fn binding_digest(user: AccountId, scope: AccountId, level: u8) -> [u8; 32] {
    let message = format!("{}:{}:{}", user, scope, level);
    let mut hasher = Sha256::new();
    hasher.update(message.as_bytes());
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_digest_requires_32_bytes() {
        let digest = binding_digest(AccountId(1), AccountId(2), 1);
        let parsed = parse_digest_hex(&hex::encode(digest)).unwrap();
        assert_eq!(parsed, digest);

        assert!(parse_digest_hex("abcd").is_err());
        assert!(parse_digest_hex("zz").is_err());
    }

    #[test]
    fn binding_digest_varies_with_inputs() {
        let base = binding_digest(AccountId(1), AccountId(2), 1);
        assert_ne!(base, binding_digest(AccountId(1), AccountId(2), 0));
        assert_ne!(base, binding_digest(AccountId(2), AccountId(1), 1));
    }
}
