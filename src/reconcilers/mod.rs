//! Reconciliation logic for custom resources

pub mod probe;
