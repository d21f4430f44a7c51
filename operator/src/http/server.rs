use anyhow::Result;
use axum::{
    Router,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::{handlers, state::AppState};
use crate::charm::MinioCharm;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Event delivery
        .route("/events", post(handlers::dispatch_event))
        // Inspection
        .route("/status", get(handlers::get_status))
        .route("/relations", get(handlers::list_relations))
        .route("/relations/:id/data", get(handlers::get_relation_data))
        .route("/workload/plan", get(handlers::get_workload_plan))
        // Metrics stack payloads
        .route("/metrics/alert-rules", get(handlers::get_alert_rules))
        .route("/metrics/dashboard", get(handlers::get_dashboard))
        .route("/metrics/scrape-jobs", get(handlers::get_scrape_jobs))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn start_server(charm: Arc<MinioCharm>, bind_address: SocketAddr) -> Result<()> {
    let app = build_router(Arc::new(AppState { charm }));

    info!("Server listening on {}", bind_address);

    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
