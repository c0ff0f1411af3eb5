//! Configuration types and loading logic.

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use relay_tracing::TracingConfig;
use serde::Deserialize;

/// Top-level relay configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub relay: RelayBehavior,
    #[serde(default)]
    pub tracing: TracingConfig,
}

/// Server listen configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
}

/// Outbound fetch configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamConfig {
    /// Whole-request timeout for the outbound fetch. Unset means a slow
    /// target can hold the inbound request open indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// How fetched results are turned into relay responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelayBehavior {
    /// Answer with the target's status instead of always 200.
    #[serde(default)]
    pub propagate_upstream_status: bool,
}

fn default_listen_address() -> String {
    "0.0.0.0:8000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
        }
    }
}

impl RelayConfig {
    /// Load configuration from TOML file and environment variables.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (FETCH_RELAY_ prefix, __ for nesting)
    /// 2. TOML config file (optional)
    /// 3. Defaults
    pub fn load(config_path: &str) -> anyhow::Result<Self> {
        Self::from_figment(
            Figment::new()
                .merge(Toml::file(config_path))
                .merge(Env::prefixed("FETCH_RELAY_").split("__")),
        )
    }

    fn from_figment(figment: Figment) -> anyhow::Result<Self> {
        let config: RelayConfig = figment.extract()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = RelayConfig::from_figment(Figment::from(Toml::string(""))).unwrap();

        assert_eq!(config.server.listen_address, "0.0.0.0:8000");
        assert_eq!(config.upstream.timeout_secs, None);
        assert!(!config.relay.propagate_upstream_status);
        assert_eq!(config.tracing.service_name, "fetch-relay");
    }

    #[test]
    fn test_toml_sections_override_defaults() {
        let toml = r#"
            [server]
            listen_address = "127.0.0.1:9090"

            [upstream]
            timeout_secs = 15

            [relay]
            propagate_upstream_status = true

            [tracing]
            log_level = "fetch_relay=debug,info"
        "#;
        let config = RelayConfig::from_figment(Figment::from(Toml::string(toml))).unwrap();

        assert_eq!(config.server.listen_address, "127.0.0.1:9090");
        assert_eq!(config.upstream.timeout_secs, Some(15));
        assert!(config.relay.propagate_upstream_status);
        assert_eq!(config.tracing.log_level, "fetch_relay=debug,info");
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let config = RelayConfig::from_figment(
            Figment::new().merge(Toml::file("/nonexistent/fetch-relay.toml")),
        )
        .unwrap();

        assert_eq!(config.server.listen_address, "0.0.0.0:8000");
    }

    #[test]
    fn test_wrong_type_rejected() {
        let toml = r#"
            [upstream]
            timeout_secs = "soon"
        "#;
        let result = RelayConfig::from_figment(Figment::from(Toml::string(toml)));
        assert!(result.is_err());
    }
}
