use thiserror::Error;

#[derive(Error, Debug)]
pub enum InterfaceError {
    #[error("Record does not match object-storage schema: {}", .0.join("; "))]
    SchemaViolation(Vec<String>),

    #[error("Malformed _supported_versions: {0}")]
    MalformedVersions(String),

    #[error("Relation databag has no data field")]
    MissingData,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
