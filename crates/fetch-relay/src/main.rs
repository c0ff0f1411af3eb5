use fetch_relay::server;
use fetch_relay::{AppState, RelayConfig};

/// Value following `flag`, if the flag is present. A flag given without a
/// value is an error rather than silently ignored.
fn flag_value(args: &[String], flag: &str) -> anyhow::Result<Option<String>> {
    let Some(i) = args.iter().position(|a| a == flag) else {
        return Ok(None);
    };
    match args.get(i + 1) {
        Some(value) if !value.starts_with('-') => Ok(Some(value.clone())),
        _ => anyhow::bail!("{flag} requires a value"),
    }
}

fn main() -> anyhow::Result<()> {
    // Parse CLI args
    let args: Vec<String> = std::env::args().collect();
    let config_path = flag_value(&args, "--config")?
        .or_else(|| args.get(1).filter(|a| !a.starts_with('-')).cloned())
        .or_else(|| std::env::var("FETCH_RELAY_CONFIG").ok())
        .unwrap_or_else(|| "fetch-relay.toml".to_string());

    let listen_override = flag_value(&args, "--listen")?;

    let mut config = RelayConfig::load(&config_path)?;

    // CLI overrides take precedence over TOML and env vars
    if let Some(addr) = listen_override {
        config.server.listen_address = addr;
    }

    // Build the tokio runtime first: the tonic gRPC exporter needs a reactor context
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let tracing_guard = relay_tracing::init_tracing(&config.tracing);

        tracing::info!(
            config_path = %config_path,
            listen_address = %config.server.listen_address,
            upstream_timeout_secs = ?config.upstream.timeout_secs,
            propagate_upstream_status = config.relay.propagate_upstream_status,
            otlp_export = tracing_guard.is_exporting(),
            "Starting fetch-relay"
        );

        let state = AppState::new(config)?;
        server::run(state).await
    })
}
