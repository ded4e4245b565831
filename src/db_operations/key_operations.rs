use super::core::DbOperations;
use crate::catalog::AppKeyRecord;
use crate::error::PactResult;

/// The singleton row's fixed key
const APP_KEY_ROW: &str = "0";

impl DbOperations {
    /// Upsert the application's public key pointer. Only row 0 ever exists.
    pub fn store_app_key(&self, record: &AppKeyRecord) -> PactResult<usize> {
        self.store_in_tree(&self.app_keys_tree, APP_KEY_ROW, record)
    }

    pub fn get_app_key(&self) -> PactResult<Option<AppKeyRecord>> {
        self.get_from_tree(&self.app_keys_tree, APP_KEY_ROW)
    }
}
