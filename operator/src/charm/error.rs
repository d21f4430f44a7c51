use shared_types::UnitStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CharmError {
    /// Invalid or incomplete options; the operator has to fix the config.
    #[error("{0}")]
    Configuration(String),

    /// The consumer is not attached yet; publishing to it is skipped.
    #[error("Relation data not ready: {0}")]
    RelationNotReady(String),

    /// The workload container cannot be reached yet.
    #[error("{0}")]
    UpstreamUnavailable(String),

    #[error("No compatible object-storage versions found for apps: {}", .apps.join(", "))]
    IncompatibleVersions { apps: Vec<String> },

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl CharmError {
    /// Status the unit settles in for this error. `None` means the error is
    /// not a status concern and has to reach the caller.
    pub fn status(&self) -> Option<UnitStatus> {
        match self {
            Self::Configuration(_) | Self::IncompatibleVersions { .. } => {
                Some(UnitStatus::Blocked(self.to_string()))
            }
            Self::UpstreamUnavailable(_) | Self::RelationNotReady(_) => {
                Some(UnitStatus::Waiting(self.to_string()))
            }
            Self::Store(_) => None,
        }
    }
}
