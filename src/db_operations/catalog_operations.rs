use super::core::{DbOperations, NEXT_REQUEST_ID, NEXT_SCHEMA_ID};
use crate::catalog::{RequestRecord, SchemaRecord};
use crate::error::PactResult;

impl DbOperations {
    /// Allocate the next schema id and store the record under it;
    /// returns (id, size)
    pub fn insert_schema(
        &self,
        build: impl FnOnce(u64) -> SchemaRecord,
    ) -> PactResult<(u64, usize)> {
        let id = self.allocate_id(NEXT_SCHEMA_ID)?;
        let record = build(id);
        let size = self.store_in_tree(&self.schemas_tree, &Self::catalog_key(id), &record)?;
        Ok((id, size))
    }

    /// Overwrite an existing schema row
    pub fn store_schema(&self, record: &SchemaRecord) -> PactResult<usize> {
        self.store_in_tree(&self.schemas_tree, &Self::catalog_key(record.id), record)
    }

    pub fn get_schema(&self, id: u64) -> PactResult<Option<SchemaRecord>> {
        self.get_from_tree(&self.schemas_tree, &Self::catalog_key(id))
    }

    /// All published schemas in id order
    pub fn list_schemas(&self) -> PactResult<Vec<SchemaRecord>> {
        Ok(self
            .list_items_in_tree::<SchemaRecord>(&self.schemas_tree)?
            .into_iter()
            .map(|(_, record)| record)
            .collect())
    }

    /// Allocate the next request id and store the record under it;
    /// returns (id, size)
    pub fn insert_request(
        &self,
        build: impl FnOnce(u64) -> RequestRecord,
    ) -> PactResult<(u64, usize)> {
        let id = self.allocate_id(NEXT_REQUEST_ID)?;
        let record = build(id);
        let size = self.store_in_tree(&self.requests_tree, &Self::catalog_key(id), &record)?;
        Ok((id, size))
    }

    /// Overwrite an existing request row
    pub fn store_request(&self, record: &RequestRecord) -> PactResult<usize> {
        self.store_in_tree(&self.requests_tree, &Self::catalog_key(record.id), record)
    }

    pub fn get_request(&self, id: u64) -> PactResult<Option<RequestRecord>> {
        self.get_from_tree(&self.requests_tree, &Self::catalog_key(id))
    }

    /// All outstanding requests in id order
    pub fn list_requests(&self) -> PactResult<Vec<RequestRecord>> {
        Ok(self
            .list_items_in_tree::<RequestRecord>(&self.requests_tree)?
            .into_iter()
            .map(|(_, record)| record)
            .collect())
    }

    /// Compensating rollback for a failed request creation: remove the row
    /// and hand the id back so no partial state survives the operation
    pub fn rollback_request_insert(&self, id: u64) -> PactResult<()> {
        self.delete_from_tree(&self.requests_tree, &Self::catalog_key(id))?;
        self.release_id(NEXT_REQUEST_ID, id)
    }

    /// Next request id without allocating it
    pub fn peek_next_request_id(&self) -> PactResult<u64> {
        self.peek_next_id(NEXT_REQUEST_ID)
    }
}
