//! Prometheus metrics for kube-status-util
//!
//! This module exposes metrics for monitoring reconciliation and resource health.

pub mod prometheus;

pub use self::prometheus::*;
