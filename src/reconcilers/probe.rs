//! Reconciliation logic for Probe resources

use k8s_openapi::api::core::v1::ConfigMap;
use kube::{Api, Client};
use tracing::{debug, warn};

use crate::client::{apply_status_update, exists, reply_update_if_exists, StatusUpdate};
use crate::crd::Probe;
use crate::status::{Condition, Status};
use crate::Result;

/// Look up the probe's ConfigMap and derive the next status.
///
/// Lookup failures do not fail the reconciliation; they are recorded in the
/// status as an `Exception` condition.
pub async fn observe(probe: &Probe, client: &Client, namespace: &str) -> Status {
    let config_maps: Api<ConfigMap> = Api::namespaced(client.clone(), namespace);
    let lookup = exists(&config_maps, &probe.spec.config_map_name).await;
    next_status(&probe.current_status(), &probe.spec.config_map_name, lookup)
}

/// Status transition for the outcome of a ConfigMap lookup
pub fn next_status(current: &Status, config_map_name: &str, lookup: Result<bool>) -> Status {
    match lookup {
        Ok(true) => current.with_condition(
            Condition::default().with_message(format!("ConfigMap {} found", config_map_name)),
        ),
        Ok(false) => current.with_error(format!("ConfigMap {} not found", config_map_name)),
        Err(e) => {
            warn!("Failed to look up ConfigMap {}: {}", config_map_name, e);
            current.with_exception(&e)
        }
    }
}

/// Whether `next` reports something different from `current`.
///
/// Requeued reconciliations observe the same outcome over and over; only a
/// change in the latest condition or the phase is worth a patch.
pub fn outcome_changed(current: &Status, next: &Status) -> bool {
    if current.phase() != next.phase() {
        return true;
    }

    match (current.last_condition(), next.last_condition()) {
        (Some(a), Some(b)) => {
            a.type_() != b.type_()
                || a.status() != b.status()
                || a.reason() != b.reason()
                || a.message() != b.message()
        }
        (None, None) => false,
        _ => true,
    }
}

/// Decide whether `status` should be written to the named probe
pub async fn reply_update(
    client: &Client,
    namespace: &str,
    name: &str,
    status: Status,
) -> Result<StatusUpdate> {
    let probes: Api<Probe> = Api::namespaced(client.clone(), namespace);
    reply_update_if_exists(&probes, name, status).await
}

/// Persist a status update on the named probe
pub async fn update_status(
    client: &Client,
    namespace: &str,
    name: &str,
    update: StatusUpdate,
) -> Result<bool> {
    let probes: Api<Probe> = Api::namespaced(client.clone(), namespace);
    let patched = apply_status_update(&probes, name, update).await?;
    if !patched {
        debug!("No status update for {}/{}", namespace, name);
    }
    Ok(patched)
}
