use super::app_node::AppNode;
use crate::auth::AccountId;
use crate::error::{PactError, PactResult};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Delivery of the cross-store bootstrap call.
///
/// Request creation must reach into the provider's permission store within
/// the same atomic operation; the directory is the host-environment
/// collaborator that routes the call. An `Err` from
/// [`ProviderDirectory::bootstrap_permissions`] aborts the whole request
/// creation; there is no retry and no queue.
pub trait ProviderDirectory: Send + Sync {
    /// Ask `provider`'s permission store to pre-create whatever storage it
    /// needs for `consumer`
    fn bootstrap_permissions(&self, provider: AccountId, consumer: AccountId) -> PactResult<()>;
}

/// Directory over in-process application nodes.
///
/// Suits single-process deployments and tests; a distributed deployment
/// supplies its own [`ProviderDirectory`] speaking the host's transaction
/// bundle.
#[derive(Default)]
pub struct InMemoryDirectory {
    nodes: RwLock<HashMap<AccountId, Arc<AppNode>>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `node` reachable under its application account
    pub fn register(&self, node: Arc<AppNode>) {
        self.nodes
            .write()
            .expect("directory lock poisoned")
            .insert(node.app(), node);
    }

    fn get(&self, provider: AccountId) -> Option<Arc<AppNode>> {
        self.nodes
            .read()
            .expect("directory lock poisoned")
            .get(&provider)
            .cloned()
    }
}

impl ProviderDirectory for InMemoryDirectory {
    fn bootstrap_permissions(&self, provider: AccountId, consumer: AccountId) -> PactResult<()> {
        let node = self.get(provider).ok_or_else(|| {
            PactError::NotFound(format!("no ledger store registered for provider {}", provider))
        })?;

        // The consumer application is the authenticated actor on the remote
        // call, matching the self-identity bootstrap authorization.
        node.bootstrap_consumer(consumer, consumer)
    }
}
