//! Mock Kubernetes API for integration tests

#![allow(dead_code)]

use http::{Request, Response};
use kube::client::Body;
use kube::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

pub const NAMESPACE: &str = "default";

/// Cluster-wide Probe collection
pub const PROBES_PATH: &str = "/apis/status.kube-util.io/v1alpha1/probes";

/// A mock HTTP service that answers requests from a table of canned responses
/// and remembers every request it saw.
#[derive(Clone, Default)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    requests: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    pub fn on_patch(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PATCH", path, status, body)
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses.lock().unwrap().insert(
            (method.to_string(), path.to_string()),
            (status, body.to_string()),
        );
        self
    }

    /// Requests received so far as (method, path)
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn received(&self, method: &str, path: &str) -> bool {
        self.requests()
            .iter()
            .any(|(m, p)| m == method && p == path)
    }

    /// Build a kube Client backed by this mock
    pub fn client(&self) -> Client {
        Client::new(self.clone(), NAMESPACE)
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        self.requests
            .lock()
            .unwrap()
            .push((method.clone(), path.clone()));

        let (status, body) = self
            .responses
            .lock()
            .unwrap()
            .get(&(method, path.clone()))
            .cloned()
            .unwrap_or_else(|| (404, not_found_json(&path)));

        Box::pin(async move {
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

pub fn probe_path(name: &str) -> String {
    format!(
        "/apis/status.kube-util.io/v1alpha1/namespaces/{}/probes/{}",
        NAMESPACE, name
    )
}

pub fn config_map_path(name: &str) -> String {
    format!("/api/v1/namespaces/{}/configmaps/{}", NAMESPACE, name)
}

pub fn probe_json(name: &str, config_map_name: &str) -> String {
    serde_json::json!({
        "apiVersion": "status.kube-util.io/v1alpha1",
        "kind": "Probe",
        "metadata": {
            "name": name,
            "namespace": NAMESPACE,
            "uid": "probe-uid"
        },
        "spec": {
            "configMapName": config_map_name
        }
    })
    .to_string()
}

pub fn config_map_json(name: &str) -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "ConfigMap",
        "metadata": {
            "name": name,
            "namespace": NAMESPACE
        },
        "data": {}
    })
    .to_string()
}

pub fn not_found_json(what: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "metadata": {},
        "status": "Failure",
        "message": format!("{} not found", what),
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}

pub fn server_error_json() -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "metadata": {},
        "status": "Failure",
        "message": "etcdserver: request timed out",
        "reason": "InternalError",
        "code": 500
    })
    .to_string()
}
