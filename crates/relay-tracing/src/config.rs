//! The `[tracing]` section of the relay config.
//!
//! Every field is optional: an absent section means stderr logging at
//! `info` with no span export.

use serde::Deserialize;

/// Log filtering and span export settings for one relay process.
#[derive(Debug, Clone, Deserialize)]
pub struct TracingConfig {
    /// `service.name` on exported spans. Defaults to `fetch-relay`; set it
    /// per deployment when several relays share a collector.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Collector address. Unset keeps every `relay_request` and
    /// `outbound_fetch` span local to the stderr log.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,

    #[serde(default)]
    pub protocol: OtlpProtocol,

    /// `EnvFilter` directives. At `info` the relay logs each target URL and
    /// a preview of the fetched text; `fetch_relay=debug` adds full bodies.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// How spans reach the collector: gRPC (port 4317) or HTTP/protobuf (4318).
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OtlpProtocol {
    #[default]
    Grpc,
    Http,
}

fn default_service_name() -> String {
    "fetch-relay".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            otlp_endpoint: None,
            protocol: OtlpProtocol::default(),
            log_level: default_log_level(),
        }
    }
}
