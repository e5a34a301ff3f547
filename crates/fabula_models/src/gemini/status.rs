//! Mapping of unsuccessful Gemini responses into generation errors.
//!
//! Gemini reports its preferred retry delay in two places: the standard
//! `Retry-After` header and a `google.rpc.RetryInfo` entry inside
//! `error.details`, encoded as a protobuf duration string such as `"17s"`.

use fabula_error::{GenerationError, GenerationErrorKind};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde_json::Value;
use std::time::Duration;

/// Maximum length of a raw body echoed into an error message.
const MAX_BODY_EXCERPT: usize = 500;

/// Build the error for a non-success response.
pub(crate) fn http_error(status_code: u16, headers: &HeaderMap, body: &str) -> GenerationError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    let message = parsed
        .as_ref()
        .and_then(|v| v.pointer("/error/message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| excerpt(body));

    let retry_after = retry_after_header(headers)
        .or_else(|| parsed.as_ref().and_then(retry_info_delay));

    GenerationError::new(GenerationErrorKind::Http {
        status_code,
        message,
        retry_after,
    })
}

/// `Retry-After` header in delta-seconds form. HTTP-date values are ignored.
pub(crate) fn retry_after_header(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(RETRY_AFTER)?.to_str().ok()?;
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

/// `retryDelay` from the first `RetryInfo` detail in an error body.
pub(crate) fn retry_info_delay(body: &Value) -> Option<Duration> {
    body.pointer("/error/details")?
        .as_array()?
        .iter()
        .filter_map(|detail| detail.get("retryDelay")?.as_str())
        .find_map(parse_protobuf_duration)
}

/// Parse a protobuf JSON duration (`"17s"`, `"1.5s"`, `"0.250s"`).
pub(crate) fn parse_protobuf_duration(value: &str) -> Option<Duration> {
    let seconds: f64 = value.trim().strip_suffix('s')?.parse().ok()?;
    Duration::try_from_secs_f64(seconds).ok()
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    match trimmed.char_indices().nth(MAX_BODY_EXCERPT) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}
