//! Timestamped statements about a resource's state

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::health::Health;
use super::{ERROR, EXCEPTION, FALSE, OK, READY, TRUE};

/// Truth value of a condition.
///
/// Only `True` and `False` are accepted; a stored condition with any other
/// status (such as `Unknown`) fails to deserialize, and so does the resource
/// carrying it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
pub enum ConditionStatus {
    #[default]
    True,
    False,
}

impl ConditionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionStatus::True => TRUE,
            ConditionStatus::False => FALSE,
        }
    }
}

impl From<bool> for ConditionStatus {
    fn from(value: bool) -> Self {
        if value {
            ConditionStatus::True
        } else {
            ConditionStatus::False
        }
    }
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single status condition.
///
/// Conditions are values: every `with_*` method consumes the condition and
/// returns a new one stamped with the current time.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    last_transition_time: DateTime<Utc>,
    message: String,
    reason: String,
    status: ConditionStatus,
    #[serde(rename = "type")]
    type_: String,
}

impl Default for Condition {
    /// A `Ready=True` condition with reason and message `OK`.
    fn default() -> Self {
        Self::new(READY, ConditionStatus::True, OK, OK)
    }
}

impl Condition {
    /// Create a condition stamped with the current time
    pub fn new(
        type_: impl Into<String>,
        status: ConditionStatus,
        reason: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            last_transition_time: Utc::now(),
            message: message.into(),
            reason: reason.into(),
            status,
            type_: type_.into(),
        }
    }

    /// `Ready=False` with reason `Error`
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(READY, ConditionStatus::False, ERROR, message)
    }

    /// `Ready=False` with reason `Exception`. Only the error's message is kept.
    pub fn exception<E: std::error::Error + ?Sized>(err: &E) -> Self {
        Self::new(READY, ConditionStatus::False, EXCEPTION, err.to_string())
    }

    pub fn last_transition_time(&self) -> DateTime<Utc> {
        self.last_transition_time
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn status(&self) -> ConditionStatus {
        self.status
    }

    pub fn type_(&self) -> &str {
        &self.type_
    }

    pub fn is_ready(&self) -> bool {
        self.type_ == READY && self.status == ConditionStatus::True
    }

    pub fn is_error(&self) -> bool {
        self.reason == ERROR || self.reason == EXCEPTION
    }

    /// Healthy when ready, Unhealthy when the reason is an error, Unknown otherwise
    pub fn health(&self) -> Health {
        if self.is_ready() {
            Health::healthy()
        } else if self.is_error() {
            Health::unhealthy()
        } else {
            Health::unknown()
        }
    }

    pub fn with_error(self, message: impl Into<String>) -> Self {
        Self::error(message)
    }

    pub fn with_exception<E: std::error::Error + ?Sized>(self, err: &E) -> Self {
        Self::exception(err)
    }

    pub fn with_message(self, message: impl Into<String>) -> Self {
        Self::new(self.type_, self.status, self.reason, message)
    }

    pub fn with_reason(self, reason: impl Into<String>) -> Self {
        Self::new(self.type_, self.status, reason, self.message)
    }

    pub fn with_status(self, status: ConditionStatus) -> Self {
        Self::new(self.type_, status, self.reason, self.message)
    }

    pub fn with_type(self, type_: impl Into<String>) -> Self {
        Self::new(type_, self.status, self.reason, self.message)
    }
}
