//! Store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `STOREFRONT_STORE_DIR` - directory for the file-backed store; unset keeps
//!   everything in memory
//! - `STOREFRONT_CHANNEL_CAPACITY` - store actor mailbox size (default: 32)
//! - `STOREFRONT_CONFLICT_POLICY` - `last-write-wins` (default, alias `lww`) or
//!   `reject-stale` (alias `optimistic`), case-insensitive

use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;

use crate::collection::ConflictPolicy;

pub const STORE_DIR_VAR: &str = "STOREFRONT_STORE_DIR";
pub const CHANNEL_CAPACITY_VAR: &str = "STOREFRONT_CHANNEL_CAPACITY";
pub const CONFLICT_POLICY_VAR: &str = "STOREFRONT_CONFLICT_POLICY";

const DEFAULT_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// `None` selects the in-memory backend.
    pub store_dir: Option<PathBuf>,
    pub channel_capacity: usize,
    pub conflict_policy: ConflictPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_dir: None,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            conflict_policy: ConflictPolicy::default(),
        }
    }
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Builds the config from explicit `(name, value)` pairs. Blank values
    /// count as unset.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .collect();
        let mut config = Self::default();

        if let Some(dir) = vars.get(STORE_DIR_VAR) {
            config.store_dir = Some(PathBuf::from(dir.trim()));
        }

        if let Some(raw) = vars.get(CHANNEL_CAPACITY_VAR) {
            config.channel_capacity = match raw.trim().parse::<usize>() {
                Ok(capacity) if capacity > 0 => capacity,
                _ => {
                    return Err(ConfigError::InvalidEnvVar(
                        CHANNEL_CAPACITY_VAR.to_string(),
                        format!("expected a positive integer, got '{}'", raw),
                    ))
                }
            };
        }

        if let Some(raw) = vars.get(CONFLICT_POLICY_VAR) {
            config.conflict_policy = raw
                .parse()
                .map_err(|e| ConfigError::InvalidEnvVar(CONFLICT_POLICY_VAR.to_string(), e))?;
        }

        Ok(config)
    }
}
