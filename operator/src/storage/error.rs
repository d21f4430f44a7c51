use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Unknown storage backend: {0}. Must be 'local' or 'memory'")]
    UnknownBackend(String),

    #[error("Stored document {path} is corrupt: {reason}")]
    Corrupt { path: String, reason: String },
}
