use crate::error::PactResult;
use serde::{de::DeserializeOwned, Serialize};

/// Unified access to the persisted record families.
///
/// Each family gets its own sled tree so iteration and growth accounting
/// stay per-family. Auto-increment counters live in the metadata tree, one
/// key per catalog family.
#[derive(Clone)]
pub struct DbOperations {
    /// The underlying sled database instance
    db: sled::Db,
    /// Cached trees, one per record family
    pub(crate) valid_apps_tree: sled::Tree,
    pub(crate) build_records_tree: sled::Tree,
    pub(crate) permissions_tree: sled::Tree,
    pub(crate) consumer_links_tree: sled::Tree,
    pub(crate) schemas_tree: sled::Tree,
    pub(crate) requests_tree: sled::Tree,
    pub(crate) app_keys_tree: sled::Tree,
    pub(crate) metadata_tree: sled::Tree,
}

/// Metadata keys for the auto-increment counters
pub(crate) const NEXT_SCHEMA_ID: &str = "next_schema_id";
pub(crate) const NEXT_REQUEST_ID: &str = "next_request_id";
pub(crate) const NEXT_BUILD_ID: &str = "next_build_id";

impl DbOperations {
    /// Creates a new DbOperations instance with all required trees
    pub fn new(db: sled::Db) -> Result<Self, sled::Error> {
        let valid_apps_tree = db.open_tree("valid_apps")?;
        let build_records_tree = db.open_tree("build_records")?;
        let permissions_tree = db.open_tree("permissions")?;
        let consumer_links_tree = db.open_tree("consumer_links")?;
        let schemas_tree = db.open_tree("schemas")?;
        let requests_tree = db.open_tree("requests")?;
        let app_keys_tree = db.open_tree("app_keys")?;
        let metadata_tree = db.open_tree("metadata")?;

        Ok(Self {
            db,
            valid_apps_tree,
            build_records_tree,
            permissions_tree,
            consumer_links_tree,
            schemas_tree,
            requests_tree,
            app_keys_tree,
            metadata_tree,
        })
    }

    /// Open a database at `path` and build the operations handle
    pub fn open(path: impl AsRef<std::path::Path>) -> PactResult<Self> {
        let db = sled::open(path)?;
        Ok(Self::new(db)?)
    }

    /// Gets a reference to the underlying database
    pub fn db(&self) -> &sled::Db {
        &self.db
    }

    // ========== GENERIC TREE OPERATIONS ==========

    /// Store a serializable item in a specific tree, returning the encoded
    /// size in bytes
    pub fn store_in_tree<T: Serialize>(
        &self,
        tree: &sled::Tree,
        key: &str,
        item: &T,
    ) -> PactResult<usize> {
        let bytes = serde_json::to_vec(item)?;
        let len = bytes.len();

        tree.insert(key.as_bytes(), bytes)?;

        // Durably written before the operation reports success
        tree.flush()?;

        Ok(len)
    }

    /// Retrieve a deserializable item from a specific tree
    pub fn get_from_tree<T: DeserializeOwned>(
        &self,
        tree: &sled::Tree,
        key: &str,
    ) -> PactResult<Option<T>> {
        match tree.get(key.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Delete an item from a specific tree; true when the key existed
    pub fn delete_from_tree(&self, tree: &sled::Tree, key: &str) -> PactResult<bool> {
        let existed = tree.remove(key.as_bytes())?.is_some();
        tree.flush()?;
        Ok(existed)
    }

    /// Check if a key exists in a specific tree
    pub fn exists_in_tree(&self, tree: &sled::Tree, key: &str) -> PactResult<bool> {
        Ok(tree.contains_key(key.as_bytes())?)
    }

    /// List all key-value pairs in a tree
    pub fn list_items_in_tree<T: DeserializeOwned>(
        &self,
        tree: &sled::Tree,
    ) -> PactResult<Vec<(String, T)>> {
        let mut items = Vec::new();
        for result in tree.iter() {
            let (key, value) = result?;
            let key_str = String::from_utf8_lossy(&key).to_string();
            items.push((key_str, serde_json::from_slice(&value)?));
        }
        Ok(items)
    }

    /// List all items in a tree whose keys start with `prefix`
    pub fn list_items_with_prefix<T: DeserializeOwned>(
        &self,
        tree: &sled::Tree,
        prefix: &str,
    ) -> PactResult<Vec<(String, T)>> {
        let mut items = Vec::new();
        for result in tree.scan_prefix(prefix.as_bytes()) {
            let (key, value) = result?;
            let key_str = String::from_utf8_lossy(&key).to_string();
            items.push((key_str, serde_json::from_slice(&value)?));
        }
        Ok(items)
    }

    // ========== AUTO-INCREMENT COUNTERS ==========

    /// Allocate the next id for a catalog family and advance the counter
    pub(crate) fn allocate_id(&self, counter: &str) -> PactResult<u64> {
        let next: u64 = self
            .get_from_tree(&self.metadata_tree, counter)?
            .unwrap_or(0);
        self.store_in_tree(&self.metadata_tree, counter, &(next + 1))?;
        Ok(next)
    }

    /// Next id a family would allocate, without advancing the counter
    pub(crate) fn peek_next_id(&self, counter: &str) -> PactResult<u64> {
        Ok(self
            .get_from_tree(&self.metadata_tree, counter)?
            .unwrap_or(0))
    }

    /// Compensating path: hand an allocated id back after a failed insert
    pub(crate) fn release_id(&self, counter: &str, id: u64) -> PactResult<()> {
        self.store_in_tree(&self.metadata_tree, counter, &id)?;
        Ok(())
    }

    /// Zero-padded decimal key so sled's byte order matches id order
    pub(crate) fn catalog_key(id: u64) -> String {
        format!("{:020}", id)
    }
}
