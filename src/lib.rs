//! Kubernetes operator helpers
//!
//! Two independent facilities: resolving the set of namespaces a controller
//! watches from configuration, and an immutable, append-only status object
//! (conditions, phase, health) for custom resources. A small `Probe`
//! operator built on both lives in [`crd`], [`controllers`] and
//! [`reconcilers`].

pub mod client;
pub mod config;
pub mod controllers;
pub mod crd;
pub mod error;
pub mod metrics;
pub mod namespaces;
pub mod reconcilers;
pub mod status;

pub use error::{Error, Result};
pub use namespaces::NamespaceSet;
pub use status::{Condition, Health, Status};
