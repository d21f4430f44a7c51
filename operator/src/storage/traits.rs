use anyhow::Result;
use async_trait::async_trait;
use shared_types::StatusRecord;

use super::state::{RelationRecord, StoredState};
use crate::workload::WorkloadPlan;

/// The framework-owned model as seen by the operator: persisted charm state,
/// relations with both databags, the unit status and the pushed workload plan.
#[async_trait]
pub trait ModelStore: Send + Sync {
    async fn load_state(&self) -> Result<Option<StoredState>>;
    async fn save_state(&self, state: &StoredState) -> Result<()>;

    async fn get_relation(&self, id: u32) -> Result<Option<RelationRecord>>;

    /// Persist a relation in a single write. Readers observe either the
    /// previous record or this one, never a mix.
    async fn put_relation(&self, relation: &RelationRecord) -> Result<()>;

    /// Returns `false` if the relation was not known.
    async fn remove_relation(&self, id: u32) -> Result<bool>;

    /// All known relations ordered by id.
    async fn list_relations(&self) -> Result<Vec<RelationRecord>>;

    async fn get_status(&self) -> Result<Option<StatusRecord>>;
    async fn put_status(&self, status: &StatusRecord) -> Result<()>;

    async fn get_plan(&self) -> Result<Option<WorkloadPlan>>;
    async fn put_plan(&self, plan: &WorkloadPlan) -> Result<()>;
}
