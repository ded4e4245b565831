use crate::auth::AccountId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Every mutating entry point of the registry and ledger stores.
///
/// Actions that turn on the caller's own identity carry the identity they
/// are about; the policy grants those to the matching principal regardless
/// of any delegation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    RegisterApp,
    ApproveApp,
    InvalidateApp,
    RecordBuild,
    /// Change a user's grant level in some scope
    ModifyPermission { user: AccountId },
    /// Apply an off-band signed permission change on a user's behalf
    RelayPermission,
    /// Pre-create permission storage for a consumer
    BootstrapConsumer { consumer: AccountId },
    UpdateConsumerLink,
    ModifySchema,
    ModifyRequest,
    /// Write back results for an outstanding request
    UpdateRequest { provider: AccountId },
    SetKey,
}

/// Capability predicate injected per deployment.
///
/// Implementations answer one question: may `caller` perform `action`? The
/// stores call this before every mutation and fail the whole operation with
/// `Unauthorized` when the answer is no.
pub trait AuthorizationPolicy: Send + Sync {
    fn can_perform(&self, caller: AccountId, action: &Action) -> bool;
}

/// Who may change a user's grant level through the general `set_permission`
/// entry point. Grant/revoke always require the user's own authorization;
/// this only governs the arbitrary-level form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConsentMode {
    /// Only the user themselves may change their grant level
    #[default]
    SelfSovereign,
    /// The catalog owner (or a delegate) manages grant levels
    OwnerManaged,
}

/// The privileged principal controlling registry and catalog mutation,
/// with named sub-capabilities it can delegate to other principals.
///
/// Mirrors the tiered custom-permission setup of the wire protocol: the
/// authority holds everything, and narrower schema/request/key/relay
/// capabilities can be handed to operational accounts without handing over
/// the whole authority.
#[derive(Debug, Clone, Default)]
pub struct GoverningAuthority {
    authority: AccountId,
    schema_delegates: HashSet<AccountId>,
    request_delegates: HashSet<AccountId>,
    key_delegates: HashSet<AccountId>,
    relay_delegates: HashSet<AccountId>,
}

impl GoverningAuthority {
    pub fn new(authority: AccountId) -> Self {
        Self {
            authority,
            ..Default::default()
        }
    }

    pub fn authority(&self) -> AccountId {
        self.authority
    }

    /// Allow `delegate` to mutate the schema catalog
    pub fn delegate_schema(mut self, delegate: AccountId) -> Self {
        self.schema_delegates.insert(delegate);
        self
    }

    /// Allow `delegate` to create requests and bootstrap storage for them
    pub fn delegate_request(mut self, delegate: AccountId) -> Self {
        self.request_delegates.insert(delegate);
        self
    }

    /// Allow `delegate` to rotate the published application key
    pub fn delegate_key(mut self, delegate: AccountId) -> Self {
        self.key_delegates.insert(delegate);
        self
    }

    /// Allow `delegate` to relay signed permission changes
    pub fn delegate_relay(mut self, delegate: AccountId) -> Self {
        self.relay_delegates.insert(delegate);
        self
    }

    fn holds(&self, caller: AccountId, delegates: &HashSet<AccountId>) -> bool {
        caller == self.authority || delegates.contains(&caller)
    }
}

impl AuthorizationPolicy for GoverningAuthority {
    fn can_perform(&self, caller: AccountId, action: &Action) -> bool {
        match action {
            // Registry mutation is never delegated
            Action::RegisterApp
            | Action::ApproveApp
            | Action::InvalidateApp
            | Action::RecordBuild => caller == self.authority,

            // Self-identity actions: the matching principal always qualifies
            Action::ModifyPermission { user } => {
                caller == *user || caller == self.authority
            }
            Action::BootstrapConsumer { consumer } => caller == *consumer,
            Action::UpdateRequest { provider } => caller == *provider,

            Action::RelayPermission => self.holds(caller, &self.relay_delegates),
            Action::ModifySchema => self.holds(caller, &self.schema_delegates),
            Action::ModifyRequest => self.holds(caller, &self.request_delegates),
            Action::UpdateConsumerLink => caller == self.authority,
            Action::SetKey => self.holds(caller, &self.key_delegates),
        }
    }
}
