//! Prometheus metrics definitions and HTTP server

use std::net::SocketAddr;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use prometheus::{
    register_counter_vec, register_gauge_vec, register_histogram_vec, CounterVec, Encoder,
    GaugeVec, HistogramVec, TextEncoder,
};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::status::{HealthStatus, Status};

lazy_static::lazy_static! {
    /// Total number of reconciliations
    pub static ref RECONCILIATIONS: CounterVec = register_counter_vec!(
        "kube_status_util_reconciliations_total",
        "Total number of reconciliations",
        &["kind"]
    ).unwrap();

    /// Total number of reconciliation errors
    pub static ref RECONCILIATION_ERRORS: CounterVec = register_counter_vec!(
        "kube_status_util_reconciliation_errors_total",
        "Total number of reconciliation errors",
        &["kind"]
    ).unwrap();

    /// Events dropped because the resource is outside the watched namespaces
    pub static ref SKIPPED_RECONCILIATIONS: CounterVec = register_counter_vec!(
        "kube_status_util_skipped_reconciliations_total",
        "Total number of events for resources outside the watched namespaces",
        &["kind"]
    ).unwrap();

    /// Status updates by outcome (patched, no_update)
    pub static ref STATUS_UPDATES: CounterVec = register_counter_vec!(
        "kube_status_util_status_updates_total",
        "Total number of status updates by outcome",
        &["kind", "outcome"]
    ).unwrap();

    /// Reconciliation duration histogram
    pub static ref RECONCILE_DURATION: HistogramVec = register_histogram_vec!(
        "kube_status_util_reconcile_duration_seconds",
        "Duration of reconciliations in seconds",
        &["kind"],
        vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    ).unwrap();

    /// Health per resource (1 = healthy, 0 = unhealthy, -1 = unknown)
    pub static ref RESOURCE_HEALTH: GaugeVec = register_gauge_vec!(
        "kube_status_util_resource_health",
        "Health of each reconciled resource (1 = healthy, 0 = unhealthy, -1 = unknown)",
        &["kind", "namespace", "name"]
    ).unwrap();

    /// Operator health (1 = healthy, 0 = unhealthy)
    pub static ref OPERATOR_HEALTH: prometheus::Gauge = prometheus::register_gauge!(
        "kube_status_util_operator_health",
        "Operator health status (1 = healthy, 0 = unhealthy)"
    ).unwrap();
}

/// Record the health carried by a freshly computed status
pub fn record_health(kind: &str, namespace: &str, name: &str, status: &Status) {
    let value = match status.health().status {
        HealthStatus::Healthy => 1.0,
        HealthStatus::Unhealthy => 0.0,
        HealthStatus::Unknown => -1.0,
    };
    RESOURCE_HEALTH
        .with_label_values(&[kind, namespace, name])
        .set(value);
}

/// Start the metrics HTTP server
pub async fn serve(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("Metrics server listening on {}", addr);

    OPERATOR_HEALTH.set(1.0);

    loop {
        let (stream, _) = listener.accept().await?;
        let io = TokioIo::new(stream);

        tokio::spawn(async move {
            if let Err(e) = http1::Builder::new()
                .serve_connection(io, service_fn(handle_request))
                .await
            {
                error!("Error serving connection: {}", e);
            }
        });
    }
}

async fn handle_request(
    req: Request<hyper::body::Incoming>,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let response = match req.uri().path() {
        "/metrics" => metrics_response(),
        "/healthz" | "/health" | "/readyz" | "/ready" => plain_response(StatusCode::OK, "ok"),
        _ => plain_response(StatusCode::NOT_FOUND, "Not Found"),
    };

    Ok(response)
}

fn metrics_response() -> Response<Full<Bytes>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!("Failed to encode metrics: {}", e);
        return plain_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to encode metrics");
    }

    let mut response = Response::new(Full::new(Bytes::from(buffer)));
    if let Ok(content_type) = encoder.format_type().parse() {
        response
            .headers_mut()
            .insert(hyper::header::CONTENT_TYPE, content_type);
    }
    response
}

fn plain_response(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from_static(body.as_bytes())));
    *response.status_mut() = status;
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_gauge_follows_status() {
        let status = Status::default().with_error("missing");
        record_health("Probe", "ns", "unhealthy-probe", &status);
        assert_eq!(
            RESOURCE_HEALTH
                .with_label_values(&["Probe", "ns", "unhealthy-probe"])
                .get(),
            0.0
        );

        record_health("Probe", "ns", "fresh-probe", &Status::default());
        assert_eq!(
            RESOURCE_HEALTH
                .with_label_values(&["Probe", "ns", "fresh-probe"])
                .get(),
            1.0
        );
    }

    #[test]
    fn unknown_paths_are_not_found() {
        assert_eq!(
            plain_response(StatusCode::NOT_FOUND, "Not Found").status(),
            StatusCode::NOT_FOUND
        );
    }
}
