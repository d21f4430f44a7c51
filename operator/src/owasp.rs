//! OWASP-formatted security events.

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::config::CharmConfig;
use crate::storage::StoredState;

pub const APP_ID: &str = "minio.owasp-logger";

#[derive(Debug, Serialize)]
pub struct OwaspEvent {
    pub datetime: String,
    pub appid: String,
    pub event: String,
    pub level: String,
    pub description: String,
    pub r#type: String,
}

impl OwaspEvent {
    pub fn authn_password_change(userid: &str, description: String) -> Self {
        Self {
            datetime: Utc::now().to_rfc3339(),
            appid: APP_ID.to_string(),
            event: format!("authn_password_change:{userid}"),
            level: "INFO".to_string(),
            description,
            r#type: "security".to_string(),
        }
    }

    fn emit(&self) {
        match serde_json::to_string(self) {
            Ok(line) => info!(target: "owasp", "{line}"),
            Err(e) => info!(target: "owasp", event = %self.event, error = %e, "unserializable security event"),
        }
    }
}

/// Compare the configured `secret-key` with the last one seen and log a
/// password-change event when it moved. Updates `state`; the caller persists
/// it. Returns the emitted event, if any.
pub fn audit_secret_key_change(config: &CharmConfig, state: &mut StoredState) -> Option<OwaspEvent> {
    if config.secret_key == state.last_secret_key_config {
        return None;
    }

    let description = format!(
        "The secret-key for access-key '{}' was changed.",
        config.access_key()
    );
    let event = OwaspEvent::authn_password_change(config.access_key(), description);
    event.emit();

    state.last_secret_key_config.clone_from(&config.secret_key);
    Some(event)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_emits_once() {
        let mut state = StoredState::with_secret("GENERATED");
        let config = CharmConfig {
            secret_key: "new-secret".to_string(),
            ..CharmConfig::default()
        };

        let event = audit_secret_key_change(&config, &mut state).unwrap();
        assert_eq!(event.event, "authn_password_change:minio");
        assert_eq!(event.appid, APP_ID);
        assert!(!event.description.contains("new-secret"));

        assert!(audit_secret_key_change(&config, &mut state).is_none());
    }

    #[test]
    fn test_unset_secret_is_not_a_change() {
        let mut state = StoredState::with_secret("GENERATED");
        assert!(audit_secret_key_change(&CharmConfig::default(), &mut state).is_none());
    }

    #[test]
    fn test_serialized_type_field() {
        let event = OwaspEvent::authn_password_change("minio", "changed".to_string());
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "security");
    }
}
