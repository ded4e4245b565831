//! Signature-delegated permission changes.
//!
//! A relay collects the user's consent off-band as `(digest, signature,
//! public key)` and applies it here without the user's own authenticated
//! transaction. Verification and parsing are pure; the node applies the
//! resulting upsert.

use crate::auth::AccountId;
use crate::error::{PactError, PactResult};
use crate::security::{binding_digest, parse_digest_hex, Ed25519PublicKey, KeyUtils};

/// An off-band consent artifact presented by a relay.
///
/// `level_text` carries the grant level as decimal text, matching the wire
/// form consent is gathered in; [`DelegatedPermissionChange::with_level`]
/// accepts the native numeric form directly.
#[derive(Debug, Clone)]
pub struct DelegatedPermissionChange {
    pub user: AccountId,
    pub scope: AccountId,
    level: u8,
    digest: [u8; 32],
}

impl DelegatedPermissionChange {
    /// Verify the signed artifact and parse the textual level.
    ///
    /// Fails `InvalidSignature` when the signature does not verify against
    /// `public_key`, and `InvalidArgument` when `level_text` is not a
    /// decimal u8 or the digest is not 32 hex-encoded bytes. No mutation
    /// happens here; a failed verification leaves every table untouched.
    pub fn verify(
        user: AccountId,
        scope: AccountId,
        level_text: &str,
        digest_hex: &str,
        signature_b64: &str,
        public_key_b64: &str,
    ) -> PactResult<Self> {
        let level = level_text.trim().parse::<u8>().map_err(|_| {
            PactError::InvalidArgument(format!(
                "permission level must be decimal 0-255 text (got {:?})",
                level_text
            ))
        })?;

        Self::with_level(user, scope, level, digest_hex, signature_b64, public_key_b64)
    }

    /// Native-numeric form of [`DelegatedPermissionChange::verify`]
    pub fn with_level(
        user: AccountId,
        scope: AccountId,
        level: u8,
        digest_hex: &str,
        signature_b64: &str,
        public_key_b64: &str,
    ) -> PactResult<Self> {
        let digest = parse_digest_hex(digest_hex)?;
        let public_key = Ed25519PublicKey::from_base64(public_key_b64)?;
        let signature = KeyUtils::signature_from_base64(signature_b64)?;

        if !public_key.verify(&digest, &signature) {
            return Err(PactError::InvalidSignature(
                "signature does not verify against the supplied public key".to_string(),
            ));
        }

        Ok(Self {
            user,
            scope,
            level,
            digest,
        })
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    /// Check that the signed digest is actually a hash of the change being
    /// applied.
    ///
    /// The wire protocol does not require this check: a relay holding any
    /// validly-signed digest can apply an arbitrary permission change.
    /// Deployments close the gap by enforcing binding; with it off the
    /// caller should audit-log the unchecked application.
    pub fn digest_is_bound(&self) -> bool {
        self.digest == binding_digest(self.user, self.scope, self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::Ed25519KeyPair;
    use ed25519_dalek::Signature;

    fn signed_change(digest: [u8; 32]) -> (String, String, String) {
        let keypair = Ed25519KeyPair::generate();
        let signature: Signature = keypair.sign(&digest);
        (
            hex::encode(digest),
            KeyUtils::signature_to_base64(&signature),
            keypair.public_key_base64(),
        )
    }

    #[test]
    fn verifies_and_parses_level_text() {
        let digest = binding_digest(AccountId(1), AccountId(2), 3);
        let (digest_hex, sig, key) = signed_change(digest);
        let change =
            DelegatedPermissionChange::verify(AccountId(1), AccountId(2), "3", &digest_hex, &sig, &key)
                .unwrap();
        assert_eq!(change.level(), 3);
        assert!(change.digest_is_bound());
    }

    #[test]
    fn rejects_wrong_public_key() {
        let digest = binding_digest(AccountId(1), AccountId(2), 3);
        let (digest_hex, sig, _) = signed_change(digest);
        let other_key = Ed25519KeyPair::generate().public_key_base64();
        let err = DelegatedPermissionChange::verify(
            AccountId(1),
            AccountId(2),
            "3",
            &digest_hex,
            &sig,
            &other_key,
        )
        .unwrap_err();
        assert!(matches!(err, PactError::InvalidSignature(_)));
    }

    #[test]
    fn rejects_non_numeric_level_text() {
        let digest = binding_digest(AccountId(1), AccountId(2), 3);
        let (digest_hex, sig, key) = signed_change(digest);
        let err = DelegatedPermissionChange::verify(
            AccountId(1),
            AccountId(2),
            "three",
            &digest_hex,
            &sig,
            &key,
        )
        .unwrap_err();
        assert!(matches!(err, PactError::InvalidArgument(_)));
    }

    #[test]
    fn unbound_digest_is_detected() {
        let unrelated = binding_digest(AccountId(9), AccountId(9), 9);
        let (digest_hex, sig, key) = signed_change(unrelated);
        let change =
            DelegatedPermissionChange::verify(AccountId(1), AccountId(2), "3", &digest_hex, &sig, &key)
                .unwrap();
        assert!(!change.digest_is_bound());
    }
}
