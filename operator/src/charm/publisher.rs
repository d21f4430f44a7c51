use chrono::Utc;
use shared_types::{negotiate, ObjectStorageData, VersionCheck, SUPPORTED_VERSIONS_KEY};
use tracing::{debug, info, warn};

use super::error::CharmError;
use crate::storage::{ModelStore, RelationRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Published,
    Unchanged,
}

/// Write the full record into a relation's databag.
///
/// The databag is encoded (and schema-checked) in full before anything is
/// written, and the relation is persisted with one put, so consumers see the
/// old databag or the new one. Identical data is not rewritten.
pub async fn publish_to_relation(
    store: &dyn ModelStore,
    relation: &mut RelationRecord,
    data: &ObjectStorageData,
) -> Result<PublishOutcome, CharmError> {
    if relation.remote_app.is_empty() {
        return Err(CharmError::RelationNotReady(format!(
            "relation {} has no remote application yet",
            relation.id
        )));
    }

    let databag = data.to_databag().map_err(|e| {
        CharmError::Configuration(format!("Cannot publish object-storage record: {e}"))
    })?;

    if relation.local_data == databag {
        debug!(relation_id = relation.id, "Relation data unchanged, skipping write");
        return Ok(PublishOutcome::Unchanged);
    }

    let mut updated = relation.clone();
    updated.local_data = databag;
    updated.updated_at = Utc::now();
    store.put_relation(&updated).await?;
    *relation = updated;

    info!(
        relation_id = relation.id,
        remote_app = %relation.remote_app,
        "Published object-storage data"
    );
    Ok(PublishOutcome::Published)
}

/// Clear what this operator published on a relation. Returns whether
/// anything was cleared.
pub async fn retract(
    store: &dyn ModelStore,
    relation: &mut RelationRecord,
) -> Result<bool, CharmError> {
    if !relation.is_published() {
        return Ok(false);
    }

    let mut updated = relation.clone();
    updated.local_data.clear();
    updated.updated_at = Utc::now();
    store.put_relation(&updated).await?;
    *relation = updated;

    info!(relation_id = relation.id, "Retracted object-storage data");
    Ok(true)
}

/// Result of publishing to every known relation.
#[derive(Debug, Default)]
pub struct Fanout {
    pub published: Vec<u32>,
    pub incompatible: Vec<String>,
}

/// Publish `data` to every relation whose consumer can read it.
pub async fn publish_all(
    store: &dyn ModelStore,
    data: &ObjectStorageData,
) -> Result<Fanout, CharmError> {
    let mut fanout = Fanout::default();

    for mut relation in store.list_relations().await? {
        let advertised = relation.remote_data.get(SUPPORTED_VERSIONS_KEY);
        match negotiate(advertised.map(String::as_str)) {
            Ok(VersionCheck::Compatible(_) | VersionCheck::Unlisted) => {}
            Ok(VersionCheck::Incompatible(versions)) => {
                warn!(
                    relation_id = relation.id,
                    remote_app = %relation.remote_app,
                    ?versions,
                    "Consumer does not support object-storage v1"
                );
                fanout.incompatible.push(relation.remote_app.clone());
                continue;
            }
            Err(e) => {
                warn!(
                    relation_id = relation.id,
                    remote_app = %relation.remote_app,
                    error = %e,
                    "Consumer advertised unreadable versions"
                );
                fanout.incompatible.push(relation.remote_app.clone());
                continue;
            }
        }

        match publish_to_relation(store, &mut relation, data).await {
            Ok(PublishOutcome::Published) => fanout.published.push(relation.id),
            Ok(PublishOutcome::Unchanged) => {}
            Err(CharmError::RelationNotReady(reason)) => {
                debug!(relation_id = relation.id, %reason, "Skipping relation");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(fanout)
}
