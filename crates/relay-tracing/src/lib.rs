//! Reusable logging and OTLP tracing bootstrap for fetch-relay.

pub mod config;
pub mod otlp;
pub mod spans;

pub use config::{OtlpProtocol, TracingConfig};
pub use otlp::{build_env_filter, init_tracing, TracingGuard};
