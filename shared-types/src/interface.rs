use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::InterfaceError;
use crate::versions::{encode_supported_versions, SCHEMA_VERSION};

/// Name of the relation endpoint the operator provides.
pub const INTERFACE_NAME: &str = "object-storage";

pub const SUPPORTED_VERSIONS_KEY: &str = "_supported_versions";
pub const DATA_KEY: &str = "data";

/// Key/value map owned by one side of a relation.
pub type Databag = BTreeMap<String, String>;

static SCHEMA_V1: Lazy<serde_json::Value> = Lazy::new(|| {
    serde_json::json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "title": "object-storage v1",
        "type": "object",
        "properties": {
            "access-key": { "type": "string", "minLength": 1 },
            "secret-key": { "type": "string", "minLength": 1 },
            "port": { "type": "number" },
            "secure": { "type": "boolean" },
            "service": { "type": "string", "minLength": 1 },
            "namespace": { "type": ["string", "null"] }
        },
        "required": ["access-key", "port", "secret-key", "secure", "service"],
        "additionalProperties": false
    })
});

static VALIDATOR_V1: Lazy<Result<jsonschema::Validator, String>> =
    Lazy::new(|| jsonschema::validator_for(schema_v1()).map_err(|e| e.to_string()));

/// JSON schema of the `object-storage` v1 record.
pub fn schema_v1() -> &'static serde_json::Value {
    &SCHEMA_V1
}

/// Validate a raw record against the v1 schema, collecting every violation.
pub fn validate_record(record: &serde_json::Value) -> Result<(), InterfaceError> {
    let validator = VALIDATOR_V1
        .as_ref()
        .map_err(|e| InterfaceError::SchemaViolation(vec![e.clone()]))?;

    let errors: Vec<String> = validator.iter_errors(record).map(|e| e.to_string()).collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(InterfaceError::SchemaViolation(errors))
    }
}

/// Connection record published to every `object-storage` consumer.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ObjectStorageData {
    pub access_key: String,
    pub secret_key: String,
    pub port: u16,
    pub secure: bool,
    pub service: String,
    #[serde(default)]
    pub namespace: Option<String>,
}

impl fmt::Debug for ObjectStorageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStorageData")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("service", &self.service)
            .field("namespace", &self.namespace)
            .finish()
    }
}

impl ObjectStorageData {
    /// Serialize to JSON, failing if the result would not satisfy the schema.
    pub fn to_value(&self) -> Result<serde_json::Value, InterfaceError> {
        let value = serde_json::to_value(self)?;
        validate_record(&value)?;
        Ok(value)
    }

    /// Parse a record received over a relation, schema first.
    pub fn from_value(value: serde_json::Value) -> Result<Self, InterfaceError> {
        validate_record(&value)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Encode the complete provider databag. Either every field ends up in
    /// the returned map or an error is returned; there is no partial form.
    pub fn to_databag(&self) -> Result<Databag, InterfaceError> {
        let value = self.to_value()?;
        let mut databag = Databag::new();
        databag.insert(
            SUPPORTED_VERSIONS_KEY.to_string(),
            encode_supported_versions(&[SCHEMA_VERSION])?,
        );
        databag.insert(DATA_KEY.to_string(), serde_json::to_string(&value)?);
        Ok(databag)
    }

    /// Decode a provider databag. An empty databag means nothing has been
    /// published yet.
    pub fn from_databag(databag: &Databag) -> Result<Option<Self>, InterfaceError> {
        if databag.is_empty() {
            return Ok(None);
        }
        let raw = databag.get(DATA_KEY).ok_or(InterfaceError::MissingData)?;
        let value: serde_json::Value = serde_json::from_str(raw)?;
        Self::from_value(value).map(Some)
    }
}
