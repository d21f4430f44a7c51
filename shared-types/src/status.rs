use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Workload status reported by the unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", content = "message", rename_all = "lowercase")]
pub enum UnitStatus {
    Waiting(String),
    Blocked(String),
    Active(String),
    Maintenance(String),
}

impl UnitStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Waiting(_) => "waiting",
            Self::Blocked(_) => "blocked",
            Self::Active(_) => "active",
            Self::Maintenance(_) => "maintenance",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Waiting(m) | Self::Blocked(m) | Self::Active(m) | Self::Maintenance(m) => m,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message().is_empty() {
            f.write_str(self.name())
        } else {
            write!(f, "{}: {}", self.name(), self.message())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub status: UnitStatus,
    pub since: DateTime<Utc>,
}

impl StatusRecord {
    pub fn now(status: UnitStatus) -> Self {
        Self {
            status,
            since: Utc::now(),
        }
    }
}
