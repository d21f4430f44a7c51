//! The plan pushed to the MinIO container: a service layer with health
//! checks, plus the Kubernetes service ports exposing it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::charm::Credentials;
use crate::config::{CharmConfig, MinioMode};

pub const SERVICE_NAME: &str = "minio";
pub const DATA_DIR: &str = "/data";
pub const ROOT_PASSWORD_ENV: &str = "MINIO_ROOT_PASSWORD";
const CHECK_PERIOD: &str = "30s";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerService {
    pub r#override: String,
    pub summary: String,
    pub command: String,
    pub startup: String,
    pub environment: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpCheck {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerCheck {
    pub r#override: String,
    pub period: String,
    pub level: String,
    pub http: HttpCheck,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    pub services: BTreeMap<String, LayerService>,
    pub checks: BTreeMap<String, LayerCheck>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePort {
    pub name: String,
    pub port: u16,
    pub target_port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSpec {
    pub name: String,
    pub r#type: String,
    pub selector: BTreeMap<String, String>,
    pub ports: Vec<ServicePort>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadPlan {
    pub args: Vec<String>,
    pub layer: Layer,
    pub service: ServiceSpec,
}

impl WorkloadPlan {
    /// Copy of the plan safe to hand out: the root password is masked.
    pub fn redacted(&self) -> Self {
        let mut plan = self.clone();
        for service in plan.layer.services.values_mut() {
            if let Some(password) = service.environment.get_mut(ROOT_PASSWORD_ENV) {
                *password = "<redacted>".to_string();
            }
        }
        plan
    }

    /// Port the S3 API is exposed on.
    pub fn api_port(&self) -> Option<u16> {
        self.service
            .ports
            .iter()
            .find(|p| p.name == SERVICE_NAME)
            .map(|p| p.port)
    }
}

/// Command-line arguments for the `minio` binary.
pub fn minio_args(mode: &MinioMode, console_port: u16) -> Vec<String> {
    let mut args = match mode {
        MinioMode::Server => vec!["server".to_string(), DATA_DIR.to_string()],
        MinioMode::Gateway { storage, endpoint } => {
            let mut args = vec!["gateway".to_string(), storage.to_string()];
            args.extend(endpoint.iter().cloned());
            args
        }
    };
    args.push("--console-address".to_string());
    args.push(format!(":{console_port}"));
    args
}

pub fn render_plan(
    app_name: &str,
    mode: &MinioMode,
    config: &CharmConfig,
    credentials: &Credentials,
) -> WorkloadPlan {
    let args = minio_args(mode, config.console_port);

    let environment = BTreeMap::from([
        // Metrics are scraped without authentication.
        ("MINIO_PROMETHEUS_AUTH_TYPE".to_string(), "public".to_string()),
        ("MINIO_ROOT_USER".to_string(), credentials.access_key.clone()),
        (ROOT_PASSWORD_ENV.to_string(), credentials.secret_key.clone()),
    ]);

    let service = LayerService {
        r#override: "replace".to_string(),
        summary: "minio service".to_string(),
        command: format!("minio {}", args.join(" ")),
        startup: "enabled".to_string(),
        environment,
    };

    let check = |level: &str, endpoint: &str| LayerCheck {
        r#override: "replace".to_string(),
        period: CHECK_PERIOD.to_string(),
        level: level.to_string(),
        http: HttpCheck {
            url: format!("http://localhost:{}/minio/health/{endpoint}", config.port),
        },
    };

    let layer = Layer {
        services: BTreeMap::from([(SERVICE_NAME.to_string(), service)]),
        checks: BTreeMap::from([
            ("minio-ready".to_string(), check("ready", "ready")),
            ("minio-alive".to_string(), check("alive", "live")),
        ]),
    };

    let service = ServiceSpec {
        name: app_name.to_string(),
        r#type: "ClusterIP".to_string(),
        selector: BTreeMap::from([(
            "app.kubernetes.io/name".to_string(),
            app_name.to_string(),
        )]),
        ports: vec![
            ServicePort {
                name: "minio".to_string(),
                port: config.port,
                target_port: config.port,
            },
            ServicePort {
                name: "console".to_string(),
                port: config.console_port,
                target_port: config.console_port,
            },
        ],
    };

    WorkloadPlan {
        args,
        layer,
        service,
    }
}
