//! Storage-growth cost attribution.
//!
//! Every record family has a designated payer: the principal charged when a
//! row is created. Registry and build rows bill the governing authority,
//! permission rows bill the application itself, consumer links bill the
//! initiating consumer, and catalog rows bill the catalog owner. The
//! attribution is part of the protocol, not an implementation detail, so the
//! stores report it through this trait on every insert.

use crate::auth::AccountId;
use std::sync::Mutex;

/// Receives one charge per created row
pub trait ResourceMeter: Send + Sync {
    fn charge(&self, payer: AccountId, family: &str, bytes: usize);
}

/// Discards charges. The default for deployments where the host meters
/// storage natively.
#[derive(Debug, Default)]
pub struct NullMeter;

impl ResourceMeter for NullMeter {
    fn charge(&self, _payer: AccountId, _family: &str, _bytes: usize) {}
}

/// Records every charge in memory. Used by deployments that settle storage
/// costs off-ledger, and by tests asserting payer attribution.
#[derive(Debug, Default)]
pub struct RecordingMeter {
    charges: Mutex<Vec<(AccountId, String, usize)>>,
}

impl RecordingMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Charges recorded so far, in order
    pub fn charges(&self) -> Vec<(AccountId, String, usize)> {
        self.charges.lock().expect("meter lock poisoned").clone()
    }

    /// Payers charged for a given family, in order
    pub fn payers_for(&self, family: &str) -> Vec<AccountId> {
        self.charges()
            .into_iter()
            .filter(|(_, f, _)| f == family)
            .map(|(payer, _, _)| payer)
            .collect()
    }
}

impl ResourceMeter for RecordingMeter {
    fn charge(&self, payer: AccountId, family: &str, bytes: usize) {
        self.charges
            .lock()
            .expect("meter lock poisoned")
            .push((payer, family.to_string(), bytes));
    }
}
