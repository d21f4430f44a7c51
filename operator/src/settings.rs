use anyhow::{Context, Result};
use std::net::SocketAddr;

use crate::storage::StorageConfig;

/// Process-level settings of the operator, read from the environment.
#[derive(Debug, Clone)]
pub struct OperatorSettings {
    /// Application name; published as the record's `service`.
    pub app_name: String,
    /// Model (namespace) the application is deployed in, if known.
    pub model_name: Option<String>,
    pub bind_address: SocketAddr,
    pub storage: StorageConfig,
}

impl OperatorSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_name = lookup("APP_NAME")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "minio".to_string());
        let model_name = lookup("MODEL_NAME").filter(|v| !v.is_empty());
        let bind_address = lookup("BIND_ADDRESS")
            .unwrap_or_else(|| "0.0.0.0:3000".to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDRESS must be a socket address")?;
        let storage = StorageConfig::from_lookup(&lookup)?;

        Ok(Self {
            app_name,
            model_name,
            bind_address,
            storage,
        })
    }
}
