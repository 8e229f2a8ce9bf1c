//! Append-only resource status with derived phase and health
//!
//! A [`Status`] is never mutated in place. Each transition returns a new
//! value whose phase and health are recomputed from the conditions, so a
//! status written to the API server is always internally consistent.

mod condition;
mod health;

pub use condition::{Condition, ConditionStatus};
pub use health::{Health, HealthStatus};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const AVAILABLE: &str = "Available";
pub const ERROR: &str = "Error";
pub const EXCEPTION: &str = "Exception";
pub const FALSE: &str = "False";
pub const HEALTHY: &str = "Healthy";
pub const OK: &str = "OK";
pub const PENDING: &str = "Pending";
pub const PROGRESSING: &str = "Progressing";
pub const READY: &str = "Ready";
pub const TRUE: &str = "True";
pub const UNHEALTHY: &str = "Unhealthy";
pub const UNKNOWN: &str = "Unknown";

/// Number of conditions kept in the history
pub const MAX_CONDITIONS: usize = 5;

/// Status subresource of a custom resource
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    #[serde(default)]
    conditions: Vec<Condition>,
    #[serde(default)]
    health: Health,
    #[serde(default = "default_phase")]
    phase: String,
}

fn default_phase() -> String {
    READY.to_string()
}

impl Default for Status {
    /// No conditions, phase `Ready`, health `Healthy`.
    fn default() -> Self {
        Self {
            conditions: Vec::new(),
            health: Health::healthy(),
            phase: default_phase(),
        }
    }
}

impl Status {
    /// Conditions, oldest first
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn last_condition(&self) -> Option<&Condition> {
        self.conditions.last()
    }

    pub fn phase(&self) -> &str {
        &self.phase
    }

    pub fn health(&self) -> Health {
        self.health
    }

    pub fn is_healthy(&self) -> bool {
        self.health.status == HealthStatus::Healthy
    }

    /// Append `condition`, dropping the oldest entries beyond [`MAX_CONDITIONS`].
    ///
    /// The phase becomes `Ready` when the condition is ready and `Pending`
    /// otherwise. Health is taken from the new condition.
    pub fn with_condition(&self, condition: Condition) -> Status {
        let keep = MAX_CONDITIONS - 1;
        let skip = self.conditions.len().saturating_sub(keep);
        let phase = if condition.is_ready() { READY } else { PENDING };
        let health = condition.health();

        let mut conditions = Vec::with_capacity(MAX_CONDITIONS);
        conditions.extend(self.conditions.iter().skip(skip).cloned());
        conditions.push(condition);

        Status {
            conditions,
            health,
            phase: phase.to_string(),
        }
    }

    pub fn with_error(&self, message: impl Into<String>) -> Status {
        self.with_condition(Condition::error(message))
    }

    pub fn with_exception<E: std::error::Error + ?Sized>(&self, err: &E) -> Status {
        self.with_condition(Condition::exception(err))
    }

    /// Set the phase without adding a condition.
    ///
    /// Health stays that of the last condition. Without conditions it is
    /// `Healthy` for phase `Ready` and `Unknown` for anything else.
    pub fn with_phase(&self, phase: impl Into<String>) -> Status {
        let phase = phase.into();
        let health = derive_health(&self.conditions, &phase);

        Status {
            conditions: self.conditions.clone(),
            health,
            phase,
        }
    }
}

fn derive_health(conditions: &[Condition], phase: &str) -> Health {
    match conditions.last() {
        Some(last) => last.health(),
        None if phase == READY => Health::healthy(),
        None => Health::unknown(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(i: usize) -> Condition {
        Condition::default().with_message(format!("C{}", i))
    }

    #[test]
    fn default_status_is_ready_and_healthy() {
        let status = Status::default();
        assert!(status.conditions().is_empty());
        assert_eq!(status.phase(), READY);
        assert!(status.is_healthy());
    }

    #[test]
    fn history_keeps_five_most_recent() {
        let status = (1..=6).fold(Status::default(), |s, i| s.with_condition(numbered(i)));

        let messages: Vec<&str> = status.conditions().iter().map(|c| c.message()).collect();
        assert_eq!(messages, vec!["C2", "C3", "C4", "C5", "C6"]);
    }

    #[test]
    fn transition_leaves_original_untouched() {
        let original = Status::default();
        let next = original.with_error("failed");
        assert!(original.conditions().is_empty());
        assert_eq!(next.conditions().len(), 1);
    }

    #[test]
    fn with_phase_without_conditions_tracks_phase() {
        assert_eq!(
            Status::default().with_phase(PENDING).health().status,
            HealthStatus::Unknown
        );
        assert_eq!(
            Status::default().with_phase(PENDING).with_phase(READY).health().status,
            HealthStatus::Healthy
        );
    }

    #[test]
    fn with_phase_keeps_health_of_last_condition() {
        let status = Status::default().with_error("broken").with_phase(READY);
        assert_eq!(status.phase(), READY);
        assert_eq!(status.health().status, HealthStatus::Unhealthy);
        assert_eq!(status.conditions().len(), 1);
    }
}
