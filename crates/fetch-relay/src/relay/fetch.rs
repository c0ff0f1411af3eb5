//! Outbound GET to the caller-supplied target, materialized as text.
//!
//! The whole body is read into memory and decoded before anything is sent
//! back. Decoding follows the target's declared `charset` (UTF-8 when absent);
//! undecodable bytes become replacement characters rather than errors.
//! The target's status code is recorded but never treated as a failure.

use std::time::Instant;

use axum::http::StatusCode;
use reqwest::Url;
use tracing::Instrument;

use crate::error::{RelayError, RelayResult};

/// Characters of fetched text included in `info` logs. The full text is
/// logged at `debug`.
const BODY_PREVIEW_CHARS: usize = 512;

/// A fully materialized outbound response.
#[derive(Debug, Clone)]
pub struct FetchedText {
    pub status: StatusCode,
    pub text: String,
}

/// Turn the raw `url` query value into a fetchable URL.
pub fn parse_target(raw: Option<&str>) -> RelayResult<Url> {
    let raw = raw.ok_or(RelayError::MissingTarget)?;

    let url = Url::parse(raw).map_err(|e| RelayError::InvalidTarget {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(RelayError::InvalidTarget {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

/// GET `target` and read its entire body as text.
///
/// Only transport failures are errors: a 404 or 500 from the target still
/// yields `Ok` with whatever body it sent.
pub async fn fetch_text(client: &reqwest::Client, target: Url) -> RelayResult<FetchedText> {
    let span = relay_tracing::outbound_fetch_span!(target);
    let start = Instant::now();

    async {
        let response = client
            .get(target)
            .send()
            .await
            .map_err(RelayError::from_send)?;

        let status = response.status();
        tracing::Span::current().record("upstream_status", status.as_u16());
        if !status.is_success() {
            tracing::debug!(
                upstream_status = status.as_u16(),
                "Target returned non-success status, relaying body anyway"
            );
        }

        let text = response.text().await.map_err(RelayError::from_body)?;

        let latency = start.elapsed().as_millis() as u64;
        tracing::Span::current().record("latency_ms", latency);
        tracing::Span::current().record("body_len", text.len() as u64);

        tracing::info!(
            upstream_status = status.as_u16(),
            body_len = text.len(),
            latency_ms = latency,
            "Fetch complete"
        );
        tracing::info!(body = %body_preview(&text, BODY_PREVIEW_CHARS), "Fetched text");
        tracing::debug!(body = %text, "Fetched text (full)");

        Ok(FetchedText { status, text })
    }
    .instrument(span)
    .await
}

/// First `max_chars` characters of `text`, marked when cut short.
fn body_preview(text: &str, max_chars: usize) -> std::borrow::Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}... ({} bytes total)", &text[..cut], text.len()).into(),
        None => text.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_target_is_missing() {
        assert!(matches!(parse_target(None), Err(RelayError::MissingTarget)));
    }

    #[test]
    fn test_empty_target_is_invalid() {
        assert!(matches!(
            parse_target(Some("")),
            Err(RelayError::InvalidTarget { .. })
        ));
    }

    #[test]
    fn test_relative_target_is_invalid() {
        let err = parse_target(Some("/just/a/path")).unwrap_err();
        match err {
            RelayError::InvalidTarget { url, .. } => assert_eq!(url, "/just/a/path"),
            other => panic!("expected InvalidTarget, got {other:?}"),
        }
    }

    #[test]
    fn test_non_http_scheme_is_invalid() {
        let err = parse_target(Some("file:///etc/hosts")).unwrap_err();
        match err {
            RelayError::InvalidTarget { reason, .. } => {
                assert_eq!(reason, "unsupported scheme 'file'")
            }
            other => panic!("expected InvalidTarget, got {other:?}"),
        }
    }

    #[test]
    fn test_absolute_target_kept_verbatim() {
        let url = parse_target(Some("https://example.com/page?id=7&lang=vi")).unwrap();
        assert_eq!(url.as_str(), "https://example.com/page?id=7&lang=vi");
    }

    #[test]
    fn test_short_body_preview_unchanged() {
        assert_eq!(body_preview("hello", 512), "hello");
        assert_eq!(body_preview("", 512), "");
    }

    #[test]
    fn test_long_body_preview_cut_on_char_boundary() {
        let preview = body_preview("漫画漫画", 3);
        assert_eq!(preview, "漫画漫... (12 bytes total)");
    }
}
