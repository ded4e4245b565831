//! datapact: access-control and data-catalog bookkeeping for a
//! decentralized data exchange.
//!
//! Two cooperating stores: a global [`node::RegistryNode`] tracking which
//! counterparty applications are validated, and a per-application
//! [`node::AppNode`] tracking permission grants, published schema catalogs,
//! and outstanding data requests. The host execution environment supplies
//! atomicity, caller authentication, and serialization of operations; this
//! crate supplies the record families, the authorization model, and the
//! cross-store bootstrap tying request creation to the counterparty's
//! permission storage.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod db_operations;
pub mod error;
pub mod node;
pub mod permissions;
pub mod registry;
pub mod resources;
pub mod security;

pub use auth::{AccountId, Action, AuthorizationPolicy, ConsentMode, GoverningAuthority};
pub use catalog::{AppKeyRecord, RequestRecord, RequestType, Schedule, SchemaRecord, SchemaVersion};
pub use config::NodeConfig;
pub use db_operations::DbOperations;
pub use error::{PactError, PactResult};
pub use node::{AppNode, InMemoryDirectory, ProviderDirectory, RegistryNode};
pub use permissions::{ConsumerLink, DelegatedPermissionChange, PermissionRecord};
pub use registry::{AppValidity, BuildRecord};
pub use resources::{NullMeter, RecordingMeter, ResourceMeter};
