use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::StreamExt;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared_types::StatusRecord;
use std::sync::Arc;

use super::config::StorageConfig;
use super::error::StorageError;
use super::state::{RelationRecord, StoredState};
use super::traits::ModelStore;
use crate::workload::WorkloadPlan;

const STATE_PATH: &str = "state/stored.json";
const STATUS_PATH: &str = "unit/status.json";
const PLAN_PATH: &str = "workload/plan.json";
const RELATIONS_PREFIX: &str = "relations";

pub struct ObjectStoreBackend {
    store: Arc<dyn ObjectStore>,
}

impl ObjectStoreBackend {
    pub fn from_config(config: StorageConfig) -> Result<Self> {
        let store: Arc<dyn ObjectStore> = match config {
            StorageConfig::Local { path } => Arc::new(LocalFileSystem::new_with_prefix(path)?),
            StorageConfig::Memory => Arc::new(InMemory::new()),
        };
        Ok(Self { store })
    }

    fn relation_path(id: u32) -> Path {
        Path::from(format!("{RELATIONS_PREFIX}/{id}.json"))
    }

    async fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        match self.store.get(path).await {
            Ok(result) => {
                let bytes = result.bytes().await?;
                let value = serde_json::from_slice(&bytes).map_err(|e| StorageError::Corrupt {
                    path: path.to_string(),
                    reason: e.to_string(),
                })?;
                Ok(Some(value))
            }
            Err(object_store::Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {path}")),
        }
    }

    async fn write_json<T: Serialize + Sync>(&self, path: &Path, value: &T) -> Result<()> {
        let json = serde_json::to_vec_pretty(value)?;
        self.store
            .put(path, PutPayload::from(json))
            .await
            .with_context(|| format!("Failed to write {path}"))?;
        Ok(())
    }
}

#[async_trait]
impl ModelStore for ObjectStoreBackend {
    async fn load_state(&self) -> Result<Option<StoredState>> {
        self.read_json(&Path::from(STATE_PATH)).await
    }

    async fn save_state(&self, state: &StoredState) -> Result<()> {
        self.write_json(&Path::from(STATE_PATH), state).await
    }

    async fn get_relation(&self, id: u32) -> Result<Option<RelationRecord>> {
        self.read_json(&Self::relation_path(id)).await
    }

    async fn put_relation(&self, relation: &RelationRecord) -> Result<()> {
        self.write_json(&Self::relation_path(relation.id), relation)
            .await
    }

    async fn remove_relation(&self, id: u32) -> Result<bool> {
        let path = Self::relation_path(id);
        // The in-memory backend deletes missing keys without complaint.
        match self.store.head(&path).await {
            Ok(_) => {}
            Err(object_store::Error::NotFound { .. }) => return Ok(false),
            Err(e) => return Err(e).with_context(|| format!("Failed to stat relation {id}")),
        }

        match self.store.delete(&path).await {
            Ok(()) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Failed to remove relation {id}")),
        }
    }

    async fn list_relations(&self) -> Result<Vec<RelationRecord>> {
        let prefix = Path::from(RELATIONS_PREFIX);
        let mut stream = self.store.list(Some(&prefix));

        let mut paths = Vec::new();
        while let Some(meta) = stream.next().await.transpose()? {
            if meta.location.extension() == Some("json") {
                paths.push(meta.location);
            }
        }

        let mut relations = Vec::with_capacity(paths.len());
        for path in paths {
            // A concurrent removal between list and read is not an error.
            if let Some(relation) = self.read_json::<RelationRecord>(&path).await? {
                relations.push(relation);
            }
        }
        relations.sort_by_key(|r| r.id);

        Ok(relations)
    }

    async fn get_status(&self) -> Result<Option<StatusRecord>> {
        self.read_json(&Path::from(STATUS_PATH)).await
    }

    async fn put_status(&self, status: &StatusRecord) -> Result<()> {
        self.write_json(&Path::from(STATUS_PATH), status).await
    }

    async fn get_plan(&self) -> Result<Option<WorkloadPlan>> {
        self.read_json(&Path::from(PLAN_PATH)).await
    }

    async fn put_plan(&self, plan: &WorkloadPlan) -> Result<()> {
        self.write_json(&Path::from(PLAN_PATH), plan).await
    }
}
