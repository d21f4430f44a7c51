//! Types shared between the MinIO operator and its consumers.
//!
//! The `object-storage` relation contract lives here so both the provider
//! (the operator) and requirers (the client, or any consuming charm) encode
//! and validate records the same way.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod events;
mod interface;
mod status;
mod versions;

pub use error::InterfaceError;
pub use events::{DispatchReport, EventContext, EventRequest, LifecycleEvent, RelationRef};
pub use interface::{
    schema_v1, validate_record, Databag, ObjectStorageData, DATA_KEY, INTERFACE_NAME,
    SUPPORTED_VERSIONS_KEY,
};
pub use status::{StatusRecord, UnitStatus};
pub use versions::{
    encode_supported_versions, negotiate, parse_supported_versions, VersionCheck, SCHEMA_VERSION,
};
