//! Ed25519 signature plumbing for the delegated-consent path.
//!
//! Keys and signatures travel base64-encoded, digests hex-encoded. The
//! signing half exists for relays and tests; the stores themselves only
//! verify.

mod digest;
mod keys;

pub use digest::{binding_digest, parse_digest_hex};
pub use keys::{Ed25519KeyPair, Ed25519PublicKey, KeyUtils};
