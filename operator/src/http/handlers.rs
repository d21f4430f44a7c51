use axum::{
    Json,
    extract::{Path, State},
};
use shared_types::{DispatchReport, EventRequest, ObjectStorageData, StatusRecord};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    dto::{ListRelationsResponse, RelationSummary},
    error::{ApiError, ApiResult},
    state::AppState,
};
use crate::config::DEFAULT_PORT;
use crate::metrics::{self, ScrapeJob};
use crate::workload::WorkloadPlan;

/// POST /events
/// Deliver one lifecycle event
#[instrument(skip(state, request), fields(event = %request.event))]
pub async fn dispatch_event(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EventRequest>,
) -> ApiResult<Json<DispatchReport>> {
    let report = state
        .charm
        .dispatch(&request.event, &request.context)
        .await?;

    info!(
        event_id = %report.event_id,
        status = %report.status,
        published = report.published.len(),
        "Event handled"
    );

    Ok(Json(report))
}

/// GET /status
/// Current unit status
#[instrument(skip(state))]
pub async fn get_status(State(state): State<Arc<AppState>>) -> ApiResult<Json<StatusRecord>> {
    let status = state
        .charm
        .store()
        .get_status()
        .await?
        .ok_or_else(|| ApiError::NotFound("No event handled yet".to_string()))?;

    Ok(Json(status))
}

/// GET /relations
/// List known object-storage relations
#[instrument(skip(state))]
pub async fn list_relations(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ListRelationsResponse>> {
    let relations = state.charm.store().list_relations().await?;

    Ok(Json(ListRelationsResponse {
        relations: relations.iter().map(RelationSummary::from).collect(),
    }))
}

/// GET /relations/:id/data
/// The record published on one relation
#[instrument(skip(state))]
pub async fn get_relation_data(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> ApiResult<Json<ObjectStorageData>> {
    let relation = state
        .charm
        .store()
        .get_relation(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Relation {id} not found")))?;

    let data = relation
        .published()
        .map_err(|e| ApiError::InternalError(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound(format!("Nothing published on relation {id}")))?;

    Ok(Json(data))
}

/// GET /workload/plan
/// The last plan pushed to the workload, with the root password masked
#[instrument(skip(state))]
pub async fn get_workload_plan(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<WorkloadPlan>> {
    let plan = state
        .charm
        .store()
        .get_plan()
        .await?
        .ok_or_else(|| ApiError::NotFound("Workload not configured yet".to_string()))?;

    Ok(Json(plan.redacted()))
}

/// GET /metrics/alert-rules
#[instrument]
pub async fn get_alert_rules() -> ApiResult<Json<serde_json::Value>> {
    let rules = metrics::alert_rules().map_err(|e| ApiError::InternalError(e.to_string()))?;
    Ok(Json(rules))
}

/// GET /metrics/dashboard
#[instrument]
pub async fn get_dashboard() -> ApiResult<Json<serde_json::Value>> {
    let dashboard = metrics::dashboard().map_err(|e| ApiError::InternalError(e.to_string()))?;
    Ok(Json(dashboard))
}

/// GET /metrics/scrape-jobs
/// Scrape jobs for the port in the current plan, or the default port
#[instrument(skip(state))]
pub async fn get_scrape_jobs(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<ScrapeJob>>> {
    let port = state
        .charm
        .store()
        .get_plan()
        .await?
        .and_then(|plan| plan.api_port())
        .unwrap_or(DEFAULT_PORT);

    Ok(Json(metrics::scrape_jobs(port)))
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}
