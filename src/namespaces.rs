//! Namespace watch-set resolution
//!
//! The set of watched namespaces is parsed once from configuration and then
//! used in two places: to pick the API scope a controller watches, and to
//! filter events for resources outside the set.

use k8s_openapi::NamespaceResourceScope;
use kube::{Api, Client, Resource, ResourceExt};
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

use crate::config::Config;

/// Token meaning "every namespace"
pub const WILDCARD: &str = "*";

/// Namespaces a controller watches
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum NamespaceSet {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl NamespaceSet {
    /// Parse a comma-delimited namespace list.
    ///
    /// `None`, the empty string and `"*"` mean all namespaces. Otherwise each
    /// segment is trimmed and empty segments are dropped.
    pub fn resolve(raw: Option<&str>) -> Self {
        let set = match raw {
            None => NamespaceSet::All,
            Some(raw) if raw.is_empty() || raw == WILDCARD => NamespaceSet::All,
            Some(raw) => NamespaceSet::Only(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
        };

        debug!("Resolved watched namespaces: {}", set);
        set
    }

    pub fn is_all(&self) -> bool {
        matches!(self, NamespaceSet::All)
    }

    /// Whether a resource living in `namespace` should be reconciled.
    /// Cluster-scoped resources only pass when every namespace is watched.
    pub fn should_reconcile(&self, namespace: Option<&str>) -> bool {
        match self {
            NamespaceSet::All => true,
            NamespaceSet::Only(names) => namespace.is_some_and(|ns| names.contains(ns)),
        }
    }

    pub fn should_reconcile_resource<K: ResourceExt>(&self, resource: &K) -> bool {
        self.should_reconcile(resource.namespace().as_deref())
    }

    /// The namespace to scope a watch to, if the set names exactly one
    pub fn single(&self) -> Option<&str> {
        match self {
            NamespaceSet::Only(names) if names.len() == 1 => names.iter().next().map(String::as_str),
            _ => None,
        }
    }

    /// Api handle covering this set.
    ///
    /// A single namespace gets a namespaced handle. Anything wider watches the
    /// whole cluster and relies on [`NamespaceSet::should_reconcile`] to drop
    /// events from other namespaces.
    pub fn api<K>(&self, client: Client) -> Api<K>
    where
        K: Resource<Scope = NamespaceResourceScope>,
        <K as Resource>::DynamicType: Default,
    {
        match self.single() {
            Some(ns) => Api::namespaced(client, ns),
            None => Api::all(client),
        }
    }
}

impl fmt::Display for NamespaceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamespaceSet::All => f.write_str(WILDCARD),
            NamespaceSet::Only(names) => {
                let names: Vec<&str> = names.iter().map(String::as_str).collect();
                write!(f, "{}", names.join(","))
            }
        }
    }
}

/// A controller registration that can be told which namespaces to watch
pub trait WatchRegistration {
    fn set_watched_namespaces(&mut self, namespaces: NamespaceSet);
}

/// Register `namespaces` with a controller
pub fn apply_to<C: WatchRegistration + ?Sized>(controller: &mut C, namespaces: &NamespaceSet) {
    debug!("Changing watched namespaces to {}", namespaces);
    controller.set_watched_namespaces(namespaces.clone());
}

/// Register the namespaces from `WATCH_NAMESPACES` with a controller
pub fn apply_from_config<C: WatchRegistration + ?Sized>(controller: &mut C, config: &Config) {
    apply_to(controller, &config.watch_namespaces);
}
