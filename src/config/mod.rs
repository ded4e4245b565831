//! Deployment configuration for a pact node.
//!
//! Loaded from TOML. Deployment variants that the protocol leaves open are
//! decided here: who may use the general permission-modification entry
//! point, whether delegated digests must be bound to the change they apply,
//! and which accounts hold delegated sub-capabilities.

use crate::auth::{AccountId, ConsentMode, GoverningAuthority};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading or validating a node configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

/// Configuration of one application's ledger store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Where the sled database lives
    pub db_path: PathBuf,
    /// The application account this store belongs to
    pub app_account: u64,
    /// The privileged principal controlling registry and catalog mutation
    pub governing_authority: u64,
    /// Who may use the arbitrary-level permission entry point
    #[serde(default)]
    pub consent_mode: ConsentMode,
    /// Require delegated digests to hash the change they apply
    #[serde(default)]
    pub enforce_digest_binding: bool,
    /// Accounts delegated the schema-catalog capability
    #[serde(default)]
    pub schema_delegates: Vec<u64>,
    /// Accounts delegated the request capability
    #[serde(default)]
    pub request_delegates: Vec<u64>,
    /// Accounts delegated the key-rotation capability
    #[serde(default)]
    pub key_delegates: Vec<u64>,
    /// Accounts delegated the signed-consent relay capability
    #[serde(default)]
    pub relay_delegates: Vec<u64>,
}

impl NodeConfig {
    /// Load and validate a configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: NodeConfig = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue("db_path must be set".to_string()));
        }
        Ok(())
    }

    /// Build the authorization policy this configuration describes
    pub fn authorization_policy(&self) -> GoverningAuthority {
        let mut policy = GoverningAuthority::new(AccountId(self.governing_authority));
        for delegate in &self.schema_delegates {
            policy = policy.delegate_schema(AccountId(*delegate));
        }
        for delegate in &self.request_delegates {
            policy = policy.delegate_request(AccountId(*delegate));
        }
        for delegate in &self.key_delegates {
            policy = policy.delegate_key(AccountId(*delegate));
        }
        for delegate in &self.relay_delegates {
            policy = policy.delegate_relay(AccountId(*delegate));
        }
        policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config() {
        let config: NodeConfig = toml::from_str(
            r#"
            db_path = "/tmp/pact"
            app_account = 100
            governing_authority = 1
            "#,
        )
        .unwrap();
        assert_eq!(config.consent_mode, ConsentMode::SelfSovereign);
        assert!(!config.enforce_digest_binding);
        config.validate().unwrap();
    }

    #[test]
    fn parses_owner_managed_variant_with_delegates() {
        let config: NodeConfig = toml::from_str(
            r#"
            db_path = "/tmp/pact"
            app_account = 100
            governing_authority = 1
            consent_mode = "owner_managed"
            enforce_digest_binding = true
            schema_delegates = [5, 6]
            "#,
        )
        .unwrap();
        assert_eq!(config.consent_mode, ConsentMode::OwnerManaged);
        let policy = config.authorization_policy();
        use crate::auth::{Action, AuthorizationPolicy};
        assert!(policy.can_perform(AccountId(5), &Action::ModifySchema));
        assert!(!policy.can_perform(AccountId(5), &Action::SetKey));
    }

    #[test]
    fn unknown_consent_mode_fails_to_parse() {
        let result: Result<NodeConfig, _> = toml::from_str(
            r#"
            db_path = "/tmp/pact"
            app_account = 100
            governing_authority = 1
            consent_mode = "anarchic"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn empty_db_path_fails_validation() {
        let config: NodeConfig = toml::from_str(
            r#"
            db_path = ""
            app_account = 100
            governing_authority = 1
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }
}
