//! Probe Custom Resource Definition

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::status::Status;

/// Probe resource specification
///
/// A probe reports, through its status, whether the ConfigMap it names
/// exists in the probe's namespace.
#[derive(CustomResource, Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "status.kube-util.io",
    version = "v1alpha1",
    kind = "Probe",
    plural = "probes",
    singular = "probe",
    shortname = "prb",
    namespaced,
    status = "Status",
    printcolumn = r#"{"name": "Phase", "type": "string", "jsonPath": ".status.phase"}"#,
    printcolumn = r#"{"name": "Health", "type": "string", "jsonPath": ".status.health.status"}"#,
    printcolumn = r#"{"name": "ConfigMap", "type": "string", "jsonPath": ".spec.configMapName"}"#,
    printcolumn = r#"{"name": "Age", "type": "date", "jsonPath": ".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ProbeSpec {
    /// Name of the ConfigMap to look for
    pub config_map_name: String,
}

impl Probe {
    /// Current status, or the initial one when none was written yet
    pub fn current_status(&self) -> Status {
        self.status.clone().unwrap_or_default()
    }
}
