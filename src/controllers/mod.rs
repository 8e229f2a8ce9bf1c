//! Controller implementations for watching and reconciling resources

pub mod probe_controller;

use kube::Client;

use crate::namespaces::{NamespaceSet, WatchRegistration};

/// Shared context for controllers
pub struct Context {
    /// Kubernetes client
    pub client: Client,
    /// Namespaces whose resources are reconciled
    pub namespaces: NamespaceSet,
}

impl Context {
    /// Create a context watching every namespace
    pub fn new(client: Client) -> Self {
        Self {
            client,
            namespaces: NamespaceSet::All,
        }
    }
}

impl WatchRegistration for Context {
    fn set_watched_namespaces(&mut self, namespaces: NamespaceSet) {
        self.namespaces = namespaces;
    }
}
