//! Axum HTTP server: router, relay handler, listener, graceful shutdown.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

use crate::config::RelayConfig;
use crate::error::RelayResult;
use crate::relay::correlation::{self, REQUEST_ID_HEADER, UPSTREAM_STATUS_HEADER};
use crate::relay::fetch::{self, FetchedText};

/// Shared application state. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: RelayConfig,
    pub client: reqwest::Client,
}

impl AppState {
    /// Build the shared outbound client from configuration.
    pub fn new(config: RelayConfig) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.upstream.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self { config, client })
    }
}

/// Query string of an inbound relay request.
#[derive(Debug, Default)]
pub struct RelayParams {
    pub url: Option<String>,
}

impl RelayParams {
    /// Pick the first `url` pair; later repeats are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let url = pairs
            .into_iter()
            .find_map(|(key, value)| (key == "url").then_some(value));
        Self { url }
    }
}

/// Register the handlers on a router. No listener is involved, so tests can
/// drive the result directly.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_relay))
        .route("/health", get(handle_health))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Build and run the HTTP server.
pub async fn run(state: AppState) -> anyhow::Result<()> {
    let listen_addr = state.config.server.listen_address.clone();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    tracing::info!(address = %listen_addr, "fetch-relay listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("fetch-relay shut down gracefully");
    Ok(())
}

/// Handler for GET /?url=<target>.
///
/// 1. Extract the target URL
/// 2. GET it and read the whole body as text
/// 3. Answer 200 `text/plain` with that text, whatever the target's status
///
/// Every failure is answered with the status its `RelayError` maps to.
async fn handle_relay(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let params = RelayParams::from_pairs(pairs);
    let request_id = correlation::generate_id();
    let target = params.url.as_deref().unwrap_or_default();
    let span = relay_tracing::relay_request_span!(&request_id, target);
    let start = Instant::now();

    async {
        tracing::info!(target_url = ?params.url, "Relay request received");

        let mut response = match relay(&state.client, params.url.as_deref()).await {
            Ok(fetched) => {
                relay_response(fetched, state.config.relay.propagate_upstream_status)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Relay failed");
                e.into_response()
            }
        };

        let current = tracing::Span::current();
        current.record("status", response.status().as_u16());
        current.record("total_duration_ms", start.elapsed().as_millis() as u64);

        response.headers_mut().insert(
            REQUEST_ID_HEADER,
            HeaderValue::from_str(&request_id)
                .unwrap_or_else(|_| HeaderValue::from_static("unknown")),
        );
        response
    }
    .instrument(span)
    .await
}

async fn relay(client: &reqwest::Client, raw_target: Option<&str>) -> RelayResult<FetchedText> {
    let target = fetch::parse_target(raw_target)?;
    fetch::fetch_text(client, target).await
}

/// Build the caller-facing response from a fetched body.
fn relay_response(fetched: FetchedText, propagate_status: bool) -> Response {
    let status = if propagate_status {
        fetched.status
    } else {
        StatusCode::OK
    };

    let mut response = (status, fetched.text).into_response();
    response
        .headers_mut()
        .insert(UPSTREAM_STATUS_HEADER, HeaderValue::from(fetched.status.as_u16()));
    response
}

/// Health check endpoint.
async fn handle_health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Wait for SIGINT (Ctrl+C) for graceful shutdown.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install CTRL+C signal handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
