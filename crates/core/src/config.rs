// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Service configuration management.
//!
//! A [`ServiceConfig`] names the remote endpoint a client connects to and
//! the worker-thread count of the runtime that will own it. It is loaded
//! once from a TOML file (or built directly) and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Remote endpoint and runtime sizing for one client service.
///
/// Immutable once constructed; the connection core only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Remote host name or address.
    pub host: String,
    /// Remote TCP port.
    pub port: u16,
    /// Worker thread count of the runtime owning the client.
    /// Carried for the embedding service; not consumed by the core itself.
    #[serde(default = "default_thread_pool_size")]
    pub thread_pool_size: u32,
}

fn default_thread_pool_size() -> u32 {
    1
}

impl ServiceConfig {
    /// Creates a config for the given endpoint with the default pool size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the host is empty or the port is zero.
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self> {
        let config = ServiceConfig {
            host: host.into(),
            port,
            thread_pool_size: default_thread_pool_size(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: ServiceConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Returns the `host:port` dial string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(Error::Config("host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(Error::Config("port must not be zero".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
