use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::error::StorageError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StorageConfig {
    Local { path: PathBuf },
    Memory,
}

impl StorageConfig {
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self::Local { path: path.into() }
    }

    pub fn memory() -> Self {
        Self::Memory
    }

    /// Build from `STORAGE_BACKEND` / `STORAGE_PATH` style lookups.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = lookup("STORAGE_BACKEND").unwrap_or_else(|| "local".to_string());

        match backend.as_str() {
            "local" => {
                let path = lookup("STORAGE_PATH").unwrap_or_else(|| "./data".to_string());
                Ok(Self::local(path))
            }
            "memory" => Ok(Self::memory()),
            _ => Err(StorageError::UnknownBackend(backend).into()),
        }
    }
}
