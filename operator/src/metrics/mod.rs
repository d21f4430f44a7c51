//! Alert rules, dashboard and scrape jobs handed to the metrics stack.
//! The payloads are static; only the scrape target depends on config.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const ALERT_RULES: &str = include_str!("alert_rules.json");
const DASHBOARD: &str = include_str!("dashboard.json");

pub const METRICS_PATH: &str = "/minio/v2/metrics/cluster";

pub fn alert_rules() -> Result<serde_json::Value> {
    serde_json::from_str(ALERT_RULES).context("bundled alert rules are not valid JSON")
}

pub fn dashboard() -> Result<serde_json::Value> {
    serde_json::from_str(DASHBOARD).context("bundled dashboard is not valid JSON")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticConfig {
    pub targets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeJob {
    pub job_name: String,
    pub metrics_path: String,
    pub static_configs: Vec<StaticConfig>,
}

pub fn scrape_jobs(port: u16) -> Vec<ScrapeJob> {
    vec![ScrapeJob {
        job_name: "minio".to_string(),
        metrics_path: METRICS_PATH.to_string(),
        static_configs: vec![StaticConfig {
            targets: vec![format!("*:{port}")],
        }],
    }]
}
