use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::RelationRecord;

/// One relation as listed by `GET /relations`. Databags are not included.
#[derive(Debug, Serialize, Deserialize)]
pub struct RelationSummary {
    pub id: u32,
    pub remote_app: String,
    pub published: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<&RelationRecord> for RelationSummary {
    fn from(relation: &RelationRecord) -> Self {
        Self {
            id: relation.id,
            remote_app: relation.remote_app.clone(),
            published: relation.is_published(),
            updated_at: relation.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListRelationsResponse {
    pub relations: Vec<RelationSummary>,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}
