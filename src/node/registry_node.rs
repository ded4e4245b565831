use crate::auth::{AccountId, Action, AuthorizationPolicy};
use crate::db_operations::DbOperations;
use crate::error::{PactError, PactResult};
use crate::registry::{AppValidity, BuildRecord};
use crate::resources::{NullMeter, ResourceMeter};
use std::sync::Arc;

/// The global registry of validated applications.
///
/// Every mutation requires the governing authority. Rows are never deleted;
/// an application falls out of trust by having its flag cleared, so the
/// registry keeps history.
#[derive(Clone)]
pub struct RegistryNode {
    db: Arc<DbOperations>,
    policy: Arc<dyn AuthorizationPolicy>,
    meter: Arc<dyn ResourceMeter>,
}

impl RegistryNode {
    pub fn new(db: Arc<DbOperations>, policy: Arc<dyn AuthorizationPolicy>) -> Self {
        Self {
            db,
            policy,
            meter: Arc::new(NullMeter),
        }
    }

    /// Report storage growth to `meter` instead of discarding it
    pub fn with_meter(mut self, meter: Arc<dyn ResourceMeter>) -> Self {
        self.meter = meter;
        self
    }

    fn authorize(&self, caller: AccountId, action: &Action) -> PactResult<()> {
        if self.policy.can_perform(caller, action) {
            Ok(())
        } else {
            Err(PactError::Unauthorized(format!(
                "account {} may not perform {:?}",
                caller, action
            )))
        }
    }

    /// Upsert an application row. Absent: insert with the flag set.
    /// Present: overwrite the pointer and reset the flag. Either way the
    /// application ends up trusted.
    pub fn register_or_update(
        &self,
        caller: AccountId,
        app: AccountId,
        content_pointer: String,
    ) -> PactResult<()> {
        self.authorize(caller, &Action::RegisterApp)?;

        let record = AppValidity {
            app,
            content_pointer,
            is_valid: true,
        };
        let size = self.db.store_app_validity(&record)?;
        self.meter.charge(caller, "valid_apps", size);
        log::info!("registered app {} as valid", app);
        Ok(())
    }

    /// Set the validity flag on an existing row
    pub fn approve(&self, caller: AccountId, app: AccountId) -> PactResult<()> {
        self.authorize(caller, &Action::ApproveApp)?;
        self.set_validity(caller, app, true)
    }

    /// Clear the validity flag on an existing row. The row stays.
    pub fn invalidate(&self, caller: AccountId, app: AccountId) -> PactResult<()> {
        self.authorize(caller, &Action::InvalidateApp)?;
        self.set_validity(caller, app, false)
    }

    fn set_validity(&self, caller: AccountId, app: AccountId, is_valid: bool) -> PactResult<()> {
        let mut record = self
            .db
            .get_app_validity(app)?
            .ok_or_else(|| PactError::NotFound(format!("no registry row for app {}", app)))?;

        record.is_valid = is_valid;
        let size = self.db.store_app_validity(&record)?;
        self.meter.charge(caller, "valid_apps", size);
        log::info!("app {} validity set to {}", app, is_valid);
        Ok(())
    }

    /// Whether `app` is currently trusted. Consulting this before acting on
    /// a counterparty's catalog is the caller's responsibility.
    pub fn is_app_valid(&self, app: AccountId) -> PactResult<bool> {
        Ok(self
            .db
            .get_app_validity(app)?
            .map(|record| record.is_valid)
            .unwrap_or(false))
    }

    pub fn get_app(&self, app: AccountId) -> PactResult<Option<AppValidity>> {
        self.db.get_app_validity(app)
    }

    pub fn list_apps(&self) -> PactResult<Vec<AppValidity>> {
        self.db.list_app_validities()
    }

    /// Append a released binary checksum to the build catalog
    pub fn record_build(
        &self,
        caller: AccountId,
        version_number: u64,
        version_code: String,
        arch_id: u64,
        binary_hash: String,
    ) -> PactResult<u64> {
        self.authorize(caller, &Action::RecordBuild)?;

        let (id, size) =
            self.db
                .insert_build_record(version_number, version_code, arch_id, binary_hash)?;
        self.meter.charge(caller, "build_records", size);
        log::info!("recorded build {} (version {})", id, version_number);
        Ok(id)
    }

    pub fn get_build(&self, id: u64) -> PactResult<Option<BuildRecord>> {
        self.db.get_build_record(id)
    }
}
