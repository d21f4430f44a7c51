//! HTTP client for the MinIO operator.
//!
//! Used by whatever delivers lifecycle events to the operator, and by
//! requirers that want to read back the `object-storage` record published
//! on their relation.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

use anyhow::{Context, Result};
use reqwest::{Client as ReqwestClient, StatusCode};
use serde::Deserialize;
use shared_types::{DispatchReport, EventRequest, ObjectStorageData, StatusRecord};
use std::time::Duration;
use tracing::debug;

/// One relation as the operator lists it.
#[derive(Debug, Clone, Deserialize)]
pub struct RelationSummary {
    pub id: u32,
    pub remote_app: String,
    pub published: bool,
}

#[derive(Deserialize)]
struct ListRelationsResponse {
    relations: Vec<RelationSummary>,
}

/// Client for interacting with the MinIO operator
pub struct OperatorClient {
    client: ReqwestClient,
    base_url: String,
}

impl OperatorClient {
    /// Create a new client instance
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Deliver a lifecycle event and wait for it to be handled
    pub async fn send_event(&self, request: &EventRequest) -> Result<DispatchReport> {
        let url = format!("{}/events", self.base_url);
        debug!(event = %request.event, "Sending event");

        let response = self.client.post(&url).json(request).send().await?;

        response.error_for_status_ref()?;

        Ok(response.json().await?)
    }

    /// Current unit status, or `None` if no event has been handled yet
    pub async fn status(&self) -> Result<Option<StatusRecord>> {
        let url = format!("{}/status", self.base_url);

        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        response.error_for_status_ref()?;

        Ok(Some(response.json().await?))
    }

    /// List the relations the operator knows about
    pub async fn list_relations(&self) -> Result<Vec<RelationSummary>> {
        let url = format!("{}/relations", self.base_url);

        let response = self.client.get(&url).send().await?;

        response.error_for_status_ref()?;

        let data: ListRelationsResponse = response.json().await?;
        Ok(data.relations)
    }

    /// The record published on a relation, checked against the interface
    /// schema. `None` while nothing is published.
    pub async fn relation_data(&self, relation_id: u32) -> Result<Option<ObjectStorageData>> {
        let url = format!("{}/relations/{}/data", self.base_url, relation_id);

        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        response.error_for_status_ref()?;

        let value: serde_json::Value = response.json().await?;
        let data = ObjectStorageData::from_value(value)
            .with_context(|| format!("Relation {relation_id} carries an invalid record"))?;

        Ok(Some(data))
    }

    /// Alert rules the operator hands to the metrics stack
    pub async fn alert_rules(&self) -> Result<serde_json::Value> {
        let url = format!("{}/metrics/alert-rules", self.base_url);

        let response = self.client.get(&url).send().await?;

        response.error_for_status_ref()?;

        Ok(response.json().await?)
    }

    /// Check if the service is healthy
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);

        let response = self.client.get(&url).send().await?;

        Ok(response.status() == StatusCode::OK)
    }
}
