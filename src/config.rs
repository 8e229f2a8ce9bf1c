//! Operator configuration loaded from environment variables

use std::env;

use crate::namespaces::NamespaceSet;
use crate::{Error, Result};

/// Comma-delimited list of namespaces to watch, `*` or unset for all
pub const WATCH_NAMESPACES_ENV: &str = "WATCH_NAMESPACES";

/// Port of the metrics and health endpoint
pub const METRICS_PORT_ENV: &str = "METRICS_PORT";

/// Default metrics port
pub const DEFAULT_METRICS_PORT: u16 = 8080;

/// Operator configuration, built once at startup and passed by reference
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Namespaces the controllers watch
    pub watch_namespaces: NamespaceSet,
    pub metrics_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            watch_namespaces: NamespaceSet::All,
            metrics_port: DEFAULT_METRICS_PORT,
        }
    }
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let watch_namespaces = NamespaceSet::resolve(lookup(WATCH_NAMESPACES_ENV).as_deref());

        let metrics_port = match lookup(METRICS_PORT_ENV) {
            Some(port) => port.trim().parse::<u16>().map_err(|e| {
                Error::ConfigError(format!("Invalid {} '{}': {}", METRICS_PORT_ENV, port, e))
            })?,
            None => DEFAULT_METRICS_PORT,
        };

        Ok(Config {
            watch_namespaces,
            metrics_port,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn empty_environment_watches_all_namespaces() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn watch_namespaces_are_resolved() {
        let config = Config::from_lookup(lookup(&[
            (WATCH_NAMESPACES_ENV, "team-a, team-b"),
            (METRICS_PORT_ENV, "9100"),
        ]))
        .unwrap();

        assert!(config.watch_namespaces.should_reconcile(Some("team-b")));
        assert!(!config.watch_namespaces.should_reconcile(Some("kube-system")));
        assert_eq!(config.metrics_port, 9100);
    }

    #[test]
    fn invalid_metrics_port_is_rejected() {
        let err = Config::from_lookup(lookup(&[(METRICS_PORT_ENV, "http")])).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
        assert!(err.to_string().contains(METRICS_PORT_ENV));
    }
}
