//! Ed25519 key generation, signing, and verification

use crate::error::{PactError, PactResult};
use base64::{engine::general_purpose, Engine as _};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;

/// Ed25519 key pair for relay-side use
#[derive(Debug)]
pub struct Ed25519KeyPair {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl Ed25519KeyPair {
    /// Generate a new Ed25519 key pair
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key,
            verifying_key,
        }
    }

    /// Create a key pair from a 32-byte secret key
    pub fn from_secret_key(secret_key: &[u8]) -> PactResult<Self> {
        if secret_key.len() != 32 {
            return Err(PactError::InvalidArgument(
                "Secret key must be 32 bytes".to_string(),
            ));
        }

        let mut key_bytes = [0u8; 32];
        key_bytes.copy_from_slice(secret_key);

        let signing_key = SigningKey::from_bytes(&key_bytes);
        let verifying_key = signing_key.verifying_key();

        Ok(Self {
            signing_key,
            verifying_key,
        })
    }

    /// Get the public key as bytes
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.verifying_key.to_bytes()
    }

    /// Get the public key as a base64-encoded string
    pub fn public_key_base64(&self) -> String {
        general_purpose::STANDARD.encode(self.public_key_bytes())
    }

    /// Sign a message with this key pair
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.signing_key.sign(message)
    }
}

/// Ed25519 public key for store-side verification
#[derive(Debug, Clone)]
pub struct Ed25519PublicKey {
    verifying_key: VerifyingKey,
}

impl Ed25519PublicKey {
    /// Create a public key from 32 raw bytes
    pub fn from_bytes(bytes: &[u8]) -> PactResult<Self> {
        if bytes.len() != 32 {
            return Err(PactError::InvalidSignature(
                "Public key must be 32 bytes".to_string(),
            ));
        }

        let mut key_bytes = [0u8; 32];
        key_bytes.copy_from_slice(bytes);

        let verifying_key = VerifyingKey::from_bytes(&key_bytes)
            .map_err(|e| PactError::InvalidSignature(format!("Malformed public key: {}", e)))?;

        Ok(Self { verifying_key })
    }

    /// Create a public key from a base64-encoded string
    pub fn from_base64(base64_key: &str) -> PactResult<Self> {
        let bytes = general_purpose::STANDARD
            .decode(base64_key)
            .map_err(|e| PactError::InvalidSignature(format!("Malformed public key: {}", e)))?;

        Self::from_bytes(&bytes)
    }

    /// Get the public key as a base64-encoded string
    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(self.verifying_key.to_bytes())
    }

    /// Verify a signature over `message` with this public key
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        self.verifying_key.verify(message, signature).is_ok()
    }
}

/// Encoding helpers shared by relays and the stores
pub struct KeyUtils;

impl KeyUtils {
    /// Encode a signature as base64
    pub fn signature_to_base64(signature: &Signature) -> String {
        general_purpose::STANDARD.encode(signature.to_bytes())
    }

    /// Decode a base64-encoded 64-byte signature
    pub fn signature_from_base64(base64_sig: &str) -> PactResult<Signature> {
        let bytes = general_purpose::STANDARD
            .decode(base64_sig)
            .map_err(|e| PactError::InvalidSignature(format!("Malformed signature: {}", e)))?;

        let sig_bytes: [u8; 64] = bytes.as_slice().try_into().map_err(|_| {
            PactError::InvalidSignature("Signature must be 64 bytes".to_string())
        })?;

        Ok(Signature::from_bytes(&sig_bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify_roundtrip() {
        let keypair = Ed25519KeyPair::generate();
        let message = b"pact digest";
        let signature = keypair.sign(message);

        let public = Ed25519PublicKey::from_base64(&keypair.public_key_base64()).unwrap();
        assert!(public.verify(message, &signature));
        assert!(!public.verify(b"other digest", &signature));
    }

    #[test]
    fn signature_base64_roundtrip() {
        let keypair = Ed25519KeyPair::generate();
        let signature = keypair.sign(b"msg");
        let encoded = KeyUtils::signature_to_base64(&signature);
        let decoded = KeyUtils::signature_from_base64(&encoded).unwrap();
        assert_eq!(signature.to_bytes(), decoded.to_bytes());
    }

    #[test]
    fn rejects_malformed_key_material() {
        assert!(Ed25519PublicKey::from_bytes(&[0u8; 16]).is_err());
        assert!(Ed25519PublicKey::from_base64("not base64!!").is_err());
        assert!(KeyUtils::signature_from_base64("AAAA").is_err());
    }
}
