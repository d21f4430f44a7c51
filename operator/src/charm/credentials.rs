use rand::Rng;
use std::fmt;

use super::error::CharmError;
use crate::config::{CharmConfig, MinioMode};
use crate::storage::StoredState;

const SECRET_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const SECRET_LEN: usize = 30;

/// The root access-key/secret-key pair of the MinIO instance.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Random 30-character secret of upper-case letters and digits.
pub fn generate_secret_key() -> String {
    let mut rng = rand::rng();
    (0..SECRET_LEN)
        .map(|_| char::from(SECRET_CHARSET[rng.random_range(0..SECRET_CHARSET.len())]))
        .collect()
}

/// Decide the credentials for a validated configuration.
///
/// Gateway mode passes the backing service's keys through untouched. Server
/// mode uses the configured access key and the configured secret, falling
/// back to the secret generated once and kept in `stored`.
pub fn resolve_credentials(
    config: &CharmConfig,
    mode: &MinioMode,
    stored: &StoredState,
) -> Result<Credentials, CharmError> {
    if config.access_key().is_empty() {
        return Err(CharmError::Configuration(
            "access-key must not be empty".to_string(),
        ));
    }

    let secret_key = match mode {
        MinioMode::Gateway { storage, .. } => {
            if config.access_key.is_none() || config.secret_key.is_empty() {
                return Err(CharmError::Configuration(format!(
                    "Minio in gateway mode requires access-key and secret-key configuration for {storage}"
                )));
            }
            config.secret_key.clone()
        }
        MinioMode::Server if !config.secret_key.is_empty() => config.secret_key.clone(),
        MinioMode::Server => {
            if stored.secret_key.is_empty() {
                return Err(CharmError::Store(anyhow::anyhow!(
                    "stored state has no generated secret-key"
                )));
            }
            stored.secret_key.clone()
        }
    };

    Ok(Credentials {
        access_key: config.access_key().to_string(),
        secret_key,
    })
}
