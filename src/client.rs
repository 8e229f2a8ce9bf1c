//! Thin Kubernetes client calls used around status updates

use kube::api::{ListParams, Patch, PatchParams};
use kube::{Api, Client, Resource};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use tracing::{debug, info};

use crate::status::Status;
use crate::Result;

/// Outcome of a reconciliation with respect to the status subresource
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusUpdate {
    /// Write this status to the resource
    Patch(Status),
    /// Leave the resource alone
    NoUpdate,
}

impl StatusUpdate {
    pub fn is_patch(&self) -> bool {
        matches!(self, StatusUpdate::Patch(_))
    }
}

/// All resources of a kind, in any namespace
pub async fn all_resources<K>(client: Client) -> Result<Vec<K>>
where
    K: Resource + Clone + DeserializeOwned + Debug,
    <K as Resource>::DynamicType: Default,
{
    let api: Api<K> = Api::all(client);
    let list = api.list(&ListParams::default()).await?;
    Ok(list.items)
}

/// Whether the named resource is still present
pub async fn exists<K>(api: &Api<K>, name: &str) -> Result<bool>
where
    K: Clone + DeserializeOwned + Debug,
{
    Ok(api.get_opt(name).await?.is_some())
}

/// Patch the status only if the resource was not deleted in the meantime
pub async fn reply_update_if_exists<K>(api: &Api<K>, name: &str, status: Status) -> Result<StatusUpdate>
where
    K: Clone + DeserializeOwned + Debug,
{
    if exists(api, name).await? {
        Ok(StatusUpdate::Patch(status))
    } else {
        debug!("Resource {} is gone, skipping status update", name);
        Ok(StatusUpdate::NoUpdate)
    }
}

/// Send a status update to the API server. Returns whether a patch was sent.
pub async fn apply_status_update<K>(api: &Api<K>, name: &str, update: StatusUpdate) -> Result<bool>
where
    K: Clone + DeserializeOwned + Debug,
{
    let status = match update {
        StatusUpdate::Patch(status) => status,
        StatusUpdate::NoUpdate => return Ok(false),
    };

    let patch = serde_json::json!({
        "status": serde_json::to_value(&status)?
    });

    api.patch_status(name, &PatchParams::default(), &Patch::Merge(&patch))
        .await?;

    info!(
        "Updated status for {}: phase={}, health={}",
        name,
        status.phase(),
        status.health().status
    );

    Ok(true)
}
