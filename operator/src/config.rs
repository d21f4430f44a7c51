//! Charm configuration snapshot and its validation.
//!
//! The snapshot is parsed afresh at the start of every event; nothing here is
//! cached between invocations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::charm::CharmError;

pub const DEFAULT_ACCESS_KEY: &str = "minio";
pub const DEFAULT_PORT: u16 = 9000;
pub const DEFAULT_CONSOLE_PORT: u16 = 9001;

/// Raw charm options as delivered by the framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CharmConfig {
    pub mode: String,
    #[serde(alias = "gateway_storage_service")]
    pub gateway_storage_service: String,
    #[serde(alias = "storage-endpoint-service", alias = "storage_service_endpoint")]
    pub storage_service_endpoint: String,
    /// Unset means the server-mode default; gateway mode needs it explicit.
    pub access_key: Option<String>,
    pub secret_key: String,
    pub port: u16,
    pub console_port: u16,
}

impl Default for CharmConfig {
    fn default() -> Self {
        Self {
            mode: "server".to_string(),
            gateway_storage_service: String::new(),
            storage_service_endpoint: String::new(),
            access_key: None,
            secret_key: String::new(),
            port: DEFAULT_PORT,
            console_port: DEFAULT_CONSOLE_PORT,
        }
    }
}

/// Backing service MinIO translates to in gateway mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayStorage {
    S3,
    Azure,
}

impl GatewayStorage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::S3 => "s3",
            Self::Azure => "azure",
        }
    }
}

impl fmt::Display for GatewayStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GatewayStorage {
    type Err = CharmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "s3" => Ok(Self::S3),
            "azure" => Ok(Self::Azure),
            "" => Err(CharmError::Configuration(
                "Minio in gateway mode requires gateway-storage-service configuration. \
                 Possible values: s3, azure"
                    .to_string(),
            )),
            other => Err(CharmError::Configuration(format!(
                "Unsupported gateway-storage-service '{other}'. Possible values: s3, azure"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MinioMode {
    Server,
    Gateway {
        storage: GatewayStorage,
        endpoint: Option<String>,
    },
}

impl CharmConfig {
    /// Parse the raw snapshot carried by an event.
    pub fn from_snapshot(snapshot: &serde_json::Value) -> Result<Self, CharmError> {
        serde_json::from_value(snapshot.clone())
            .map_err(|e| CharmError::Configuration(format!("Invalid charm configuration: {e}")))
    }

    /// The configured access key, or the default when unset.
    pub fn access_key(&self) -> &str {
        self.access_key.as_deref().unwrap_or(DEFAULT_ACCESS_KEY)
    }

    /// Validate the options and resolve the mode MinIO runs in.
    pub fn validate(&self) -> Result<MinioMode, CharmError> {
        if self.port == 0 || self.console_port == 0 {
            return Err(CharmError::Configuration(
                "port and console-port must be non-zero".to_string(),
            ));
        }
        if self.port == self.console_port {
            return Err(CharmError::Configuration(format!(
                "console-port must differ from port ({})",
                self.port
            )));
        }

        match self.mode.as_str() {
            "server" => Ok(MinioMode::Server),
            "gateway" => {
                let storage: GatewayStorage = self.gateway_storage_service.parse()?;
                let explicit_access_key = matches!(self.access_key.as_deref(), Some(k) if !k.is_empty());
                if !explicit_access_key || self.secret_key.is_empty() {
                    return Err(CharmError::Configuration(format!(
                        "Minio in gateway mode requires access-key and secret-key \
                         configuration for {storage}"
                    )));
                }
                let endpoint = Some(self.storage_service_endpoint.clone())
                    .filter(|e| !e.is_empty());
                Ok(MinioMode::Gateway { storage, endpoint })
            }
            other => Err(CharmError::Configuration(format!(
                "Model mode {other} is not supported. Possible values server, gateway"
            ))),
        }
    }
}
