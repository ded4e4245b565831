use super::core::DbOperations;
use crate::auth::AccountId;
use crate::error::PactResult;
use crate::permissions::{scope_prefix, scoped_permission_key, ConsumerLink, PermissionRecord};

impl DbOperations {
    /// Upsert a permission row inside one scope's partition
    pub fn store_permission(
        &self,
        scope: AccountId,
        record: &PermissionRecord,
    ) -> PactResult<usize> {
        self.store_in_tree(
            &self.permissions_tree,
            &scoped_permission_key(scope, record.user),
            record,
        )
    }

    pub fn get_permission(
        &self,
        scope: AccountId,
        user: AccountId,
    ) -> PactResult<Option<PermissionRecord>> {
        self.get_from_tree(&self.permissions_tree, &scoped_permission_key(scope, user))
    }

    /// One counterparty's whole permission view
    pub fn list_permissions_in_scope(
        &self,
        scope: AccountId,
    ) -> PactResult<Vec<PermissionRecord>> {
        Ok(self
            .list_items_with_prefix::<PermissionRecord>(
                &self.permissions_tree,
                &scope_prefix(scope),
            )?
            .into_iter()
            .map(|(_, record)| record)
            .collect())
    }

    pub fn store_consumer_link(&self, record: &ConsumerLink) -> PactResult<usize> {
        self.store_in_tree(
            &self.consumer_links_tree,
            &record.consumer.to_string(),
            record,
        )
    }

    pub fn get_consumer_link(&self, consumer: AccountId) -> PactResult<Option<ConsumerLink>> {
        self.get_from_tree(&self.consumer_links_tree, &consumer.to_string())
    }
}
