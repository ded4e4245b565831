use super::core::{DbOperations, NEXT_BUILD_ID};
use crate::auth::AccountId;
use crate::error::PactResult;
use crate::registry::{AppValidity, BuildRecord};

impl DbOperations {
    /// Upsert a validated-app row; returns the stored size in bytes
    pub fn store_app_validity(&self, record: &AppValidity) -> PactResult<usize> {
        self.store_in_tree(&self.valid_apps_tree, &record.app.to_string(), record)
    }

    pub fn get_app_validity(&self, app: AccountId) -> PactResult<Option<AppValidity>> {
        self.get_from_tree(&self.valid_apps_tree, &app.to_string())
    }

    /// All registry rows, valid and invalidated alike
    pub fn list_app_validities(&self) -> PactResult<Vec<AppValidity>> {
        Ok(self
            .list_items_in_tree::<AppValidity>(&self.valid_apps_tree)?
            .into_iter()
            .map(|(_, record)| record)
            .collect())
    }

    /// Append a build record under the next id; returns (id, size)
    pub fn insert_build_record(
        &self,
        version_number: u64,
        version_code: String,
        arch_id: u64,
        binary_hash: String,
    ) -> PactResult<(u64, usize)> {
        let id = self.allocate_id(NEXT_BUILD_ID)?;
        let record = BuildRecord {
            id,
            version_number,
            version_code,
            arch_id,
            binary_hash,
        };
        let size = self.store_in_tree(&self.build_records_tree, &Self::catalog_key(id), &record)?;
        Ok((id, size))
    }

    pub fn get_build_record(&self, id: u64) -> PactResult<Option<BuildRecord>> {
        self.get_from_tree(&self.build_records_tree, &Self::catalog_key(id))
    }
}
