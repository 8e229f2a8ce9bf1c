//! Controller for Probe resources

use futures::StreamExt;
use kube::{
    runtime::controller::{Action, Controller},
    Api, ResourceExt,
};
use kube_runtime::watcher::Config as WatcherConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

use crate::client::StatusUpdate;
use crate::controllers::Context;
use crate::crd::Probe;
use crate::metrics::prometheus::{
    record_health, RECONCILE_DURATION, RECONCILIATIONS, RECONCILIATION_ERRORS,
    SKIPPED_RECONCILIATIONS, STATUS_UPDATES,
};
use crate::reconcilers::probe;
use crate::Error;

const KIND: &str = "Probe";

/// Run the probe controller
pub async fn run(ctx: Arc<Context>) {
    let probes: Api<Probe> = ctx.namespaces.api(ctx.client.clone());

    if ctx.namespaces.is_all() {
        info!("Starting Probe controller for all namespaces");
    } else {
        info!("Starting Probe controller for namespaces {}", ctx.namespaces);
    }

    Controller::new(probes, WatcherConfig::default().any_semantic())
        .shutdown_on_signal()
        .run(reconcile, error_policy, ctx)
        .for_each(|res| async move {
            match res {
                Ok(o) => debug!("Reconciled {:?}", o),
                Err(e) => error!("Reconcile failed: {:?}", e),
            }
        })
        .await;

    info!("Probe controller stopped");
}

/// Reconcile a Probe resource
#[instrument(skip(probe, ctx), fields(name = %probe.name_any(), namespace = probe.namespace().unwrap_or_default()))]
async fn reconcile(probe: Arc<Probe>, ctx: Arc<Context>) -> Result<Action, Error> {
    let ns = probe.namespace().unwrap_or_default();
    let name = probe.name_any();

    if !ctx.namespaces.should_reconcile_resource(probe.as_ref()) {
        SKIPPED_RECONCILIATIONS.with_label_values(&[KIND]).inc();
        debug!("Skipping {}/{}: namespace is not watched", ns, name);
        return Ok(Action::await_change());
    }

    let start = std::time::Instant::now();
    RECONCILIATIONS.with_label_values(&[KIND]).inc();

    let result = apply(&probe, &ctx, &ns).await;

    let duration = start.elapsed().as_secs_f64();
    RECONCILE_DURATION
        .with_label_values(&[KIND])
        .observe(duration);

    match &result {
        Ok(_) => info!("Successfully reconciled {}/{} in {:.2}s", ns, name, duration),
        Err(e) => {
            RECONCILIATION_ERRORS.with_label_values(&[KIND]).inc();
            error!("Failed to reconcile {}/{}: {:?}", ns, name, e);
        }
    }

    result
}

/// Observe the probe target and persist the resulting status
async fn apply(probe: &Probe, ctx: &Context, ns: &str) -> Result<Action, Error> {
    let name = probe.name_any();
    let current = probe.current_status();
    let next = probe::observe(probe, &ctx.client, ns).await;

    record_health(KIND, ns, &name, &next);

    let update = if probe::outcome_changed(&current, &next) {
        probe::reply_update(&ctx.client, ns, &name, next).await?
    } else {
        debug!("Status of {}/{} unchanged", ns, name);
        StatusUpdate::NoUpdate
    };

    let outcome = if update.is_patch() { "patched" } else { "no_update" };
    probe::update_status(&ctx.client, ns, &name, update).await?;
    STATUS_UPDATES.with_label_values(&[KIND, outcome]).inc();

    Ok(Action::requeue(Duration::from_secs(60)))
}

/// Error policy for the controller
fn error_policy(probe: Arc<Probe>, err: &Error, _ctx: Arc<Context>) -> Action {
    let ns = probe.namespace().unwrap_or_default();
    let name = probe.name_any();

    error!("Reconciliation error for {}/{}: {:?}", ns, name, err);

    Action::requeue(requeue_after(err))
}

/// Delay before retrying after a failed reconciliation
fn requeue_after(err: &Error) -> Duration {
    match err {
        Error::KubeError(_) => Duration::from_secs(30),
        _ => Duration::from_secs(300),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_retry_sooner_than_other_errors() {
        let api_error = Error::KubeError(kube::Error::Api(kube::error::ErrorResponse {
            status: "Failure".to_string(),
            message: "etcdserver: request timed out".to_string(),
            reason: "InternalError".to_string(),
            code: 500,
        }));
        assert_eq!(requeue_after(&api_error), Duration::from_secs(30));

        let config_error = Error::ConfigError("bad port".to_string());
        assert_eq!(requeue_after(&config_error), Duration::from_secs(300));

        let serialization_error =
            Error::SerializationError(serde_json::from_str::<u8>("x").unwrap_err());
        assert_eq!(requeue_after(&serialization_error), Duration::from_secs(300));
    }
}
