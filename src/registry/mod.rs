//! Registry of validated counterparty applications.
//!
//! The registry is the trust anchor of the exchange: before acting on a
//! counterparty's catalog, callers are expected to consult
//! [`crate::node::RegistryNode::is_app_valid`]. Nothing in this crate
//! enforces that consultation; it is the caller's responsibility.

mod types;

pub use types::{AppValidity, BuildRecord};
