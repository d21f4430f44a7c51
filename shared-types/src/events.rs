use serde::{Deserialize, Serialize};
use std::fmt;

use crate::interface::Databag;
use crate::status::UnitStatus;

/// A consumer attached over the `object-storage` relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationRef {
    pub id: u32,
    pub remote_app: String,
    /// The consumer's application databag.
    #[serde(default)]
    pub remote_data: Databag,
}

/// Lifecycle events the orchestration framework delivers, one at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum LifecycleEvent {
    Install,
    ConfigChanged,
    UpgradeCharm,
    LeaderElected,
    RelationJoined { relation: RelationRef },
    RelationChanged { relation: RelationRef },
    RelationBroken { relation_id: u32 },
    Remove,
}

impl LifecycleEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::ConfigChanged => "config-changed",
            Self::UpgradeCharm => "upgrade-charm",
            Self::LeaderElected => "leader-elected",
            Self::RelationJoined { .. } => "object-storage-relation-joined",
            Self::RelationChanged { .. } => "object-storage-relation-changed",
            Self::RelationBroken { .. } => "object-storage-relation-broken",
            Self::Remove => "remove",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Snapshot of everything the framework knows at the time of an event.
///
/// `config` is the raw charm configuration; the operator parses it afresh
/// for every event rather than caching it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventContext {
    #[serde(default = "empty_config")]
    pub config: serde_json::Value,
    pub is_leader: bool,
    pub container_ready: bool,
}

fn empty_config() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl EventContext {
    /// Context of a leader unit whose container is reachable.
    pub fn leader(config: serde_json::Value) -> Self {
        Self {
            config,
            is_leader: true,
            container_ready: true,
        }
    }
}

/// Body of an event delivery: the event and its context side by side.
///
/// ```json
/// {"event": "config-changed", "config": {"mode": "server"},
///  "is_leader": true, "container_ready": true}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRequest {
    #[serde(flatten)]
    pub event: LifecycleEvent,
    #[serde(flatten)]
    pub context: EventContext,
}

/// What handling one event did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReport {
    pub event_id: String,
    pub event: String,
    pub status: UnitStatus,
    /// Relations whose databag was (re)written by this event.
    #[serde(default)]
    pub published: Vec<u32>,
    /// Relations whose databag was cleared by this event.
    #[serde(default)]
    pub retracted: Vec<u32>,
}
