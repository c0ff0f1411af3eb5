//! Request ID generation for tying a relay response to its log lines.

use http::HeaderName;
use uuid::Uuid;

/// Response header carrying the request ID.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-relay-request-id");

/// Response header carrying the target's own status code.
pub const UPSTREAM_STATUS_HEADER: HeaderName = HeaderName::from_static("x-relay-upstream-status");

/// Generate a new request ID (UUID v4).
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
