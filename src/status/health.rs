//! Health summary derived from conditions and phase

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse health value shown on dashboards
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
pub enum HealthStatus {
    #[default]
    Healthy,
    Unhealthy,
    Unknown,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => super::HEALTHY,
            HealthStatus::Unhealthy => super::UNHEALTHY,
            HealthStatus::Unknown => super::UNKNOWN,
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Health object as stored in the status subresource: `{"status": "Healthy"}`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct Health {
    pub status: HealthStatus,
}

impl Health {
    pub fn healthy() -> Self {
        Self {
            status: HealthStatus::Healthy,
        }
    }

    pub fn unhealthy() -> Self {
        Self {
            status: HealthStatus::Unhealthy,
        }
    }

    pub fn unknown() -> Self {
        Self {
            status: HealthStatus::Unknown,
        }
    }
}
