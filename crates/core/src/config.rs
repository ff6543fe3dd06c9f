// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store gateway configuration
//!
//! An explicit value passed at construction time; nothing in the core
//! reads the process environment.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Configuration for the store gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Logical table holding the shared keyspace
    pub table: String,
    /// Secondary index resolving user email to user id
    pub email_index: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            table: "tally".to_string(),
            email_index: "userEmail-index".to_string(),
        }
    }
}

impl StoreConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
