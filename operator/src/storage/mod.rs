mod backend;
mod config;
mod error;
mod state;
mod traits;

#[cfg(test)]
mod tests;

pub use backend::ObjectStoreBackend;
pub use config::StorageConfig;
pub use error::StorageError;
pub use state::{RelationRecord, StoredState};
pub use traits::ModelStore;
