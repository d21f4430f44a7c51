//! Operator for a MinIO object-storage workload.
//!
//! The operator turns lifecycle events into three effects: a workload plan
//! for the MinIO container, an `object-storage` record on every related
//! application, and a unit status.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod charm;
pub mod config;
pub mod http;
pub mod metrics;
pub mod owasp;
pub mod settings;
pub mod storage;
pub mod workload;
