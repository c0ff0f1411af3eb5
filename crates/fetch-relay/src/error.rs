//! Relay failure kinds and their HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Every way a single relay can fail. Each kind maps to one concrete
/// response; nothing escapes the handler unanswered.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("missing 'url' query parameter")]
    MissingTarget,

    #[error("invalid target url '{url}': {reason}")]
    InvalidTarget { url: String, reason: String },

    #[error("timed out fetching target")]
    Timeout(#[source] reqwest::Error),

    #[error("failed to reach target: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("failed to read target body: {0}")]
    Body(#[source] reqwest::Error),
}

pub type RelayResult<T> = Result<T, RelayError>;

impl RelayError {
    /// Classify a reqwest error raised while sending the outbound request.
    pub fn from_send(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RelayError::Timeout(err)
        } else {
            RelayError::Transport(err)
        }
    }

    /// Classify a reqwest error raised while materializing the body.
    pub fn from_body(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RelayError::Timeout(err)
        } else {
            RelayError::Body(err)
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::MissingTarget | RelayError::InvalidTarget { .. } => StatusCode::BAD_REQUEST,
            RelayError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            RelayError::Transport(_) | RelayError::Body(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_are_bad_request() {
        assert_eq!(RelayError::MissingTarget.status_code(), StatusCode::BAD_REQUEST);

        let invalid = RelayError::InvalidTarget {
            url: "not a url".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            invalid.to_string(),
            "invalid target url 'not a url': relative URL without a base"
        );
    }

    #[tokio::test]
    async fn test_error_body_is_json() {
        let response = RelayError::MissingTarget.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["error"], "missing 'url' query parameter");
    }
}
