//! Span builder helpers for relay instrumentation.

/// Create a tracing span for one inbound relay request.
///
/// Usage: `relay_request_span!(request_id, target).in_scope(...)`
///
/// Fields recorded once the request resolves:
/// - `status`: status code sent back to the caller
/// - `total_duration_ms`: milliseconds from extraction to response
#[macro_export]
macro_rules! relay_request_span {
    ($request_id:expr, $target:expr) => {
        tracing::info_span!(
            "relay_request",
            request_id = %$request_id,
            target_url = %$target,
            status = tracing::field::Empty,
            total_duration_ms = tracing::field::Empty,
        )
    };
}

/// Create a tracing span for the outbound GET to the target URL.
#[macro_export]
macro_rules! outbound_fetch_span {
    ($target:expr) => {
        tracing::info_span!(
            "outbound_fetch",
            target_url = %$target,
            upstream_status = tracing::field::Empty,
            body_len = tracing::field::Empty,
            latency_ms = tracing::field::Empty,
        )
    };
}
