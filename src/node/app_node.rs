use super::directory::ProviderDirectory;
use crate::auth::{AccountId, Action, AuthorizationPolicy, ConsentMode};
use crate::catalog::{
    AppKeyRecord, RequestRecord, RequestType, Schedule, SchemaRecord, SchemaVersion,
};
use crate::config::NodeConfig;
use crate::db_operations::DbOperations;
use crate::error::{PactError, PactResult};
use crate::permissions::{
    ConsumerLink, DelegatedPermissionChange, PermissionRecord, LINK_DATA_POINTER_SENTINEL,
    LINK_MERKLE_ROOT_SENTINEL,
};
use crate::resources::{NullMeter, ResourceMeter};
use std::convert::TryFrom;
use std::sync::Arc;

/// One application's ledger store: permission grants partitioned by
/// requesting counterparty, the published schema catalog, outstanding data
/// requests, and the application's key row.
///
/// Every entry point takes the authenticated caller explicitly; the host
/// environment has already verified the identity, this node only decides
/// what the identity may do.
#[derive(Clone)]
pub struct AppNode {
    app: AccountId,
    db: Arc<DbOperations>,
    policy: Arc<dyn AuthorizationPolicy>,
    meter: Arc<dyn ResourceMeter>,
    directory: Arc<dyn ProviderDirectory>,
    consent_mode: ConsentMode,
    enforce_digest_binding: bool,
}

impl AppNode {
    /// Build a node from its deployment configuration
    pub fn new(
        config: &NodeConfig,
        db: Arc<DbOperations>,
        directory: Arc<dyn ProviderDirectory>,
    ) -> PactResult<Self> {
        config.validate()?;
        Ok(Self {
            app: AccountId(config.app_account),
            db,
            policy: Arc::new(config.authorization_policy()),
            meter: Arc::new(NullMeter),
            directory,
            consent_mode: config.consent_mode,
            enforce_digest_binding: config.enforce_digest_binding,
        })
    }

    /// Assemble a node from already-built parts
    pub fn from_parts(
        app: AccountId,
        db: Arc<DbOperations>,
        policy: Arc<dyn AuthorizationPolicy>,
        directory: Arc<dyn ProviderDirectory>,
    ) -> Self {
        Self {
            app,
            db,
            policy,
            meter: Arc::new(NullMeter),
            directory,
            consent_mode: ConsentMode::default(),
            enforce_digest_binding: false,
        }
    }

    /// Report storage growth to `meter` instead of discarding it
    pub fn with_meter(mut self, meter: Arc<dyn ResourceMeter>) -> Self {
        self.meter = meter;
        self
    }

    pub fn with_consent_mode(mut self, mode: ConsentMode) -> Self {
        self.consent_mode = mode;
        self
    }

    pub fn with_digest_binding(mut self, enforce: bool) -> Self {
        self.enforce_digest_binding = enforce;
        self
    }

    /// The application account this store belongs to
    pub fn app(&self) -> AccountId {
        self.app
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

    /// Only the user themselves may consent on this path
    fn authorize_self(&self, caller: AccountId, user: AccountId) -> PactResult<()> {
        if caller == user {
            Ok(())
        } else {
            Err(PactError::Unauthorized(format!(
                "account {} cannot change account {}'s consent",
                caller, user
            )))
        }
    }

    // ========== SCOPED PERMISSIONS ==========

    /// Grant `scope` access to the caller's data (level 1). Requires the
    /// user's own authorization.
    pub fn grant(&self, caller: AccountId, user: AccountId, scope: AccountId) -> PactResult<()> {
        self.authorize_self(caller, user)?;
        self.upsert_permission(user, scope, 1)
    }

    /// Withdraw consent (level 0). The row is kept, never deleted.
    pub fn revoke(&self, caller: AccountId, user: AccountId, scope: AccountId) -> PactResult<()> {
        self.authorize_self(caller, user)?;
        self.upsert_permission(user, scope, 0)
    }

    /// Set an arbitrary grant level. Who may call this depends on the
    /// deployment's consent mode.
    pub fn set_permission(
        &self,
        caller: AccountId,
        user: AccountId,
        scope: AccountId,
        level: u8,
    ) -> PactResult<()> {
        match self.consent_mode {
            ConsentMode::SelfSovereign => self.authorize_self(caller, user)?,
            ConsentMode::OwnerManaged => {
                self.authorize(caller, &Action::ModifyPermission { user })?
            }
        }
        self.upsert_permission(user, scope, level)
    }

    fn upsert_permission(&self, user: AccountId, scope: AccountId, level: u8) -> PactResult<()> {
        let record = PermissionRecord {
            user,
            granted_level: level,
        };
        let size = self.db.store_permission(scope, &record)?;
        // Permission storage is billed to the application itself
        self.meter.charge(self.app, "permissions", size);
        log::info!(
            "permission for user {} in scope {} set to {}",
            user,
            scope,
            level
        );
        Ok(())
    }

    pub fn get_permission(
        &self,
        user: AccountId,
        scope: AccountId,
    ) -> PactResult<Option<PermissionRecord>> {
        self.db.get_permission(scope, user)
    }

    /// One counterparty's whole permission view
    pub fn list_permissions(&self, scope: AccountId) -> PactResult<Vec<PermissionRecord>> {
        self.db.list_permissions_in_scope(scope)
    }

    /// Apply a permission change signed off-band, relayed by the governing
    /// authority. The user's own transaction is never required here; the
    /// consent artifact carries the signature instead.
    pub fn modify_permission_signed(
        &self,
        caller: AccountId,
        user: AccountId,
        scope: AccountId,
        level_text: &str,
        digest_hex: &str,
        signature_b64: &str,
        public_key_b64: &str,
    ) -> PactResult<()> {
        self.authorize(caller, &Action::RelayPermission)?;
        let change = DelegatedPermissionChange::verify(
            user,
            scope,
            level_text,
            digest_hex,
            signature_b64,
            public_key_b64,
        )?;
        self.apply_delegated(change)
    }

    /// Native-numeric form of [`AppNode::modify_permission_signed`]
    pub fn modify_permission_signed_level(
        &self,
        caller: AccountId,
        user: AccountId,
        scope: AccountId,
        level: u8,
        digest_hex: &str,
        signature_b64: &str,
        public_key_b64: &str,
    ) -> PactResult<()> {
        self.authorize(caller, &Action::RelayPermission)?;
        let change = DelegatedPermissionChange::with_level(
            user,
            scope,
            level,
            digest_hex,
            signature_b64,
            public_key_b64,
        )?;
        self.apply_delegated(change)
    }

    fn apply_delegated(&self, change: DelegatedPermissionChange) -> PactResult<()> {
        if !change.digest_is_bound() {
            if self.enforce_digest_binding {
                return Err(PactError::InvalidArgument(
                    "signed digest is not a hash of the permission change being applied"
                        .to_string(),
                ));
            }
            // Binding off: any validly-signed digest is accepted. Leave a
            // trace so relays stay auditable.
            log::warn!(
                "applying delegated permission change for user {} in scope {} with unbound digest",
                change.user,
                change.scope
            );
        }
        self.upsert_permission(change.user, change.scope, change.level())
    }

    // ========== CONSUMER LINKS ==========

    /// Pre-create permission storage for `consumer`, billed to the
    /// consumer. Idempotent: an existing link is left untouched. The
    /// sentinel pointers reserve storage wide enough that the application
    /// can later update the link without the consumer's authorization.
    pub fn bootstrap_consumer(&self, caller: AccountId, consumer: AccountId) -> PactResult<()> {
        self.authorize(caller, &Action::BootstrapConsumer { consumer })?;

        if self.db.get_consumer_link(consumer)?.is_some() {
            log::debug!("consumer link for {} already bootstrapped", consumer);
            return Ok(());
        }

        let link = ConsumerLink {
            consumer,
            data_pointer: LINK_DATA_POINTER_SENTINEL.to_string(),
            merkle_root: LINK_MERKLE_ROOT_SENTINEL.to_string(),
        };
        let size = self.db.store_consumer_link(&link)?;
        self.meter.charge(consumer, "consumer_links", size);
        log::info!("bootstrapped consumer link for {}", consumer);
        Ok(())
    }

    /// Point an existing consumer link at fresh data. Application-only;
    /// the consumer is not re-authorized and is not billed again.
    pub fn update_consumer_link(
        &self,
        caller: AccountId,
        consumer: AccountId,
        data_pointer: String,
        merkle_root: String,
    ) -> PactResult<()> {
        self.authorize(caller, &Action::UpdateConsumerLink)?;

        let mut link = self.db.get_consumer_link(consumer)?.ok_or_else(|| {
            PactError::NotFound(format!("no consumer link for account {}", consumer))
        })?;

        link.data_pointer = data_pointer;
        link.merkle_root = merkle_root;
        self.db.store_consumer_link(&link)?;
        log::info!("updated consumer link for {}", consumer);
        Ok(())
    }

    pub fn get_consumer_link(&self, consumer: AccountId) -> PactResult<Option<ConsumerLink>> {
        self.db.get_consumer_link(consumer)
    }

    // ========== SCHEMA CATALOG ==========

    /// Publish a schema under the next id.
    ///
    /// Both enum arguments are validated, but the stored version is always
    /// the dev default; promotion to prod happens through `edit_schema` or
    /// `set_version`.
    pub fn add_schema(
        &self,
        caller: AccountId,
        descriptor_pointer: String,
        version: u8,
        schedule: u8,
        scheduled_price: u8,
        adhoc_price: u8,
    ) -> PactResult<u64> {
        self.authorize(caller, &Action::ModifySchema)?;
        SchemaVersion::try_from(version)?;
        let schedule = Schedule::try_from(schedule)?;

        let (id, size) = self.db.insert_schema(|id| SchemaRecord {
            id,
            descriptor_pointer,
            version: SchemaVersion::Dev,
            schedule,
            scheduled_price,
            adhoc_price,
        })?;
        self.meter.charge(self.app, "schemas", size);
        log::info!("published schema {}", id);
        Ok(id)
    }

    /// Overwrite every field of an existing schema
    pub fn edit_schema(
        &self,
        caller: AccountId,
        id: u64,
        descriptor_pointer: String,
        version: u8,
        schedule: u8,
        scheduled_price: u8,
        adhoc_price: u8,
    ) -> PactResult<()> {
        self.authorize(caller, &Action::ModifySchema)?;
        let version = SchemaVersion::try_from(version)?;
        let schedule = Schedule::try_from(schedule)?;

        let mut record = self.require_schema(id)?;
        record.descriptor_pointer = descriptor_pointer;
        record.version = version;
        record.schedule = schedule;
        record.scheduled_price = scheduled_price;
        record.adhoc_price = adhoc_price;
        self.store_schema(record)
    }

    pub fn set_version(&self, caller: AccountId, id: u64, version: u8) -> PactResult<()> {
        self.authorize(caller, &Action::ModifySchema)?;
        let version = SchemaVersion::try_from(version)?;

        let mut record = self.require_schema(id)?;
        record.version = version;
        self.store_schema(record)
    }

    pub fn set_schedule(&self, caller: AccountId, id: u64, schedule: u8) -> PactResult<()> {
        self.authorize(caller, &Action::ModifySchema)?;
        let schedule = Schedule::try_from(schedule)?;

        let mut record = self.require_schema(id)?;
        record.schedule = schedule;
        self.store_schema(record)
    }

    pub fn set_scheduled_price(&self, caller: AccountId, id: u64, price: u8) -> PactResult<()> {
        self.authorize(caller, &Action::ModifySchema)?;
        let mut record = self.require_schema(id)?;
        record.scheduled_price = price;
        self.store_schema(record)
    }

    pub fn set_adhoc_price(&self, caller: AccountId, id: u64, price: u8) -> PactResult<()> {
        self.authorize(caller, &Action::ModifySchema)?;
        let mut record = self.require_schema(id)?;
        record.adhoc_price = price;
        self.store_schema(record)
    }

    pub fn set_descriptor(
        &self,
        caller: AccountId,
        id: u64,
        descriptor_pointer: String,
    ) -> PactResult<()> {
        self.authorize(caller, &Action::ModifySchema)?;
        let mut record = self.require_schema(id)?;
        record.descriptor_pointer = descriptor_pointer;
        self.store_schema(record)
    }

    fn require_schema(&self, id: u64) -> PactResult<SchemaRecord> {
        self.db
            .get_schema(id)?
            .ok_or_else(|| PactError::NotFound(format!("no schema with id {}", id)))
    }

    fn store_schema(&self, record: SchemaRecord) -> PactResult<()> {
        let size = self.db.store_schema(&record)?;
        self.meter.charge(self.app, "schemas", size);
        log::info!("schema {} updated", record.id);
        Ok(())
    }

    pub fn get_schema(&self, id: u64) -> PactResult<Option<SchemaRecord>> {
        self.db.get_schema(id)
    }

    pub fn list_schemas(&self) -> PactResult<Vec<SchemaRecord>> {
        self.db.list_schemas()
    }

    // ========== DATA REQUESTS ==========

    /// Create a data request against a provider's schema.
    ///
    /// Within the same atomic operation the provider's permission store is
    /// asked to pre-create storage for this application. A rejected
    /// bootstrap rolls the insert back: no request row and no consumed id
    /// survive the failure.
    #[allow(clippy::too_many_arguments)]
    pub fn init_request(
        &self,
        caller: AccountId,
        provider: AccountId,
        schema_id: u64,
        request_type: u8,
        query_payload: String,
        price: u8,
        ts_created: Option<u64>,
        ts_updated: Option<u64>,
    ) -> PactResult<u64> {
        self.authorize(caller, &Action::ModifyRequest)?;
        let request_type = RequestType::try_from(request_type)?;

        let (id, size) = self.db.insert_request(|id| RequestRecord {
            id,
            provider,
            schema_id,
            request_type,
            query_payload,
            price,
            result_hash: String::new(),
            aggregation_pointer: String::new(),
            ts_created,
            ts_updated,
        })?;

        // Same atomic unit: a rejected bootstrap reverts the insert
        if let Err(err) = self.directory.bootstrap_permissions(provider, self.app) {
            self.db.rollback_request_insert(id)?;
            log::info!(
                "request {} rolled back, bootstrap on provider {} failed: {}",
                id,
                provider,
                err
            );
            return Err(err);
        }

        self.meter.charge(self.app, "requests", size);
        log::info!("created request {} against provider {}", id, provider);
        Ok(id)
    }

    /// Write back results for an outstanding request. Only the provider the
    /// request names may do this; the identity check against the stored row
    /// is explicit and runs even for callers the policy already passed.
    pub fn update_request(
        &self,
        caller: AccountId,
        id: u64,
        provider: AccountId,
        result_hash: String,
        aggregation_pointer: String,
        ts_updated: Option<u64>,
    ) -> PactResult<()> {
        self.authorize(caller, &Action::UpdateRequest { provider })?;

        let mut record = self
            .db
            .get_request(id)?
            .ok_or_else(|| PactError::NotFound(format!("no request with id {}", id)))?;

        if record.provider != provider {
            return Err(PactError::Unauthorized(format!(
                "calling account {} does not match request {}'s provider {}",
                provider, id, record.provider
            )));
        }

        record.result_hash = result_hash;
        record.aggregation_pointer = aggregation_pointer;
        record.ts_updated = ts_updated;
        let size = self.db.store_request(&record)?;
        self.meter.charge(self.app, "requests", size);
        log::info!("request {} updated by provider {}", id, provider);
        Ok(())
    }

    pub fn get_request(&self, id: u64) -> PactResult<Option<RequestRecord>> {
        self.db.get_request(id)
    }

    pub fn list_requests(&self) -> PactResult<Vec<RequestRecord>> {
        self.db.list_requests()
    }

    // ========== APPLICATION KEY ==========

    /// Upsert the application's public key pointer. Any string is accepted;
    /// the pointer is opaque to this store.
    pub fn set_app_key(&self, caller: AccountId, public_key_pointer: String) -> PactResult<()> {
        self.authorize(caller, &Action::SetKey)?;

        let record = AppKeyRecord { public_key_pointer };
        let size = self.db.store_app_key(&record)?;
        self.meter.charge(self.app, "app_keys", size);
        log::info!("application key pointer rotated");
        Ok(())
    }

    pub fn get_app_key(&self) -> PactResult<Option<AppKeyRecord>> {
        self.db.get_app_key()
    }
}
