use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{Databag, InterfaceError, ObjectStorageData, RelationRef};

/// Application state that survives between events.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredState {
    /// Generated once, used whenever `secret-key` is not configured.
    pub secret_key: String,
    /// Last `secret-key` config value seen by the audit log.
    #[serde(default)]
    pub last_secret_key_config: String,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for StoredState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredState")
            .field("secret_key", &"<redacted>")
            .field("last_secret_key_config", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl StoredState {
    pub fn with_secret(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            last_secret_key_config: String::new(),
            created_at: Utc::now(),
        }
    }
}

/// One `object-storage` relation and both of its application databags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationRecord {
    pub id: u32,
    pub remote_app: String,
    pub remote_data: Databag,
    /// What this operator has published. Empty until a full record exists.
    pub local_data: Databag,
    pub updated_at: DateTime<Utc>,
}

impl RelationRecord {
    pub fn from_ref(relation: &RelationRef) -> Self {
        Self {
            id: relation.id,
            remote_app: relation.remote_app.clone(),
            remote_data: relation.remote_data.clone(),
            local_data: Databag::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn is_published(&self) -> bool {
        !self.local_data.is_empty()
    }

    pub fn published(&self) -> Result<Option<ObjectStorageData>, InterfaceError> {
        ObjectStorageData::from_databag(&self.local_data)
    }
}
