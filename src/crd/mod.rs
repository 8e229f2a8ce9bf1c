//! Custom Resource Definitions for the demonstration operator

mod probe;

pub use probe::*;

use kube::CustomResourceExt;

/// Generate CRD YAML manifests for all custom resources
pub fn generate_crds() -> Result<Vec<String>, serde_yaml::Error> {
    Ok(vec![serde_yaml::to_string(&Probe::crd())?])
}
