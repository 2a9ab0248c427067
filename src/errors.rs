//! Error kinds surfaced by the gateway core.
//!
//! Every upstream failure, whether it happened while issuing a token or while calling a data
//! method, is normalized into an [`UpstreamFailure`]: an HTTP-like status (500 when the upstream
//! never answered), a human message combining the caller's context with whatever the upstream
//! said, and the raw upstream payload when one was returned.

use http::StatusCode;
use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_FAILURE_STATUS: u16 = 500;

#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct UpstreamFailure {
    pub status: u16,
    pub message: String,
    pub detail: Option<Value>,
}

impl UpstreamFailure {
    /// Failure built from a non-2xx upstream answer.
    pub fn from_response(context: &str, status: StatusCode, body: &str) -> Self {
        let detail = parse_detail(body);
        let detail_text = detail
            .as_ref()
            .and_then(detail_text)
            .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));
        Self {
            status: status.as_u16(),
            message: format!("{}{}: {}", context, status_suffix(status), detail_text),
            detail,
        }
    }

    /// Failure built from an error raised before any usable answer arrived
    /// (connect error, timeout, undecodable body).
    pub fn from_transport(context: &str, err: &reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self {
                status: status.as_u16(),
                message: format!("{}{}: {}", context, status_suffix(status), err),
                detail: None,
            },
            None => Self::without_status(context, err.to_string()),
        }
    }

    /// A 2xx answer whose body did not have the expected shape.
    pub fn malformed(context: &str, status: StatusCode, reason: impl std::fmt::Display, body: &str) -> Self {
        Self {
            status: DEFAULT_FAILURE_STATUS,
            message: format!("{}{}: {}", context, status_suffix(status), reason),
            detail: parse_detail(body),
        }
    }

    pub fn without_status(context: &str, reason: impl std::fmt::Display) -> Self {
        Self {
            status: DEFAULT_FAILURE_STATUS,
            message: format!("{}: {}", context, reason),
            detail: None,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum GatewayError {
    /// Token issuance or refresh failed.
    #[error("{0}")]
    Auth(UpstreamFailure),
    /// A data operation failed, possibly after its single retry.
    #[error("{0}")]
    Provider(UpstreamFailure),
}

impl GatewayError {
    pub fn failure(&self) -> &UpstreamFailure {
        match self {
            GatewayError::Auth(f) | GatewayError::Provider(f) => f,
        }
    }

    pub fn status(&self) -> u16 {
        self.failure().status
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, GatewayError::Auth(_))
    }
}

/// Raised when the gateway is constructed without usable client credentials.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("client id is required (FATSECRET_CLIENT_ID)")]
    MissingClientId,
    #[error("client secret is required (FATSECRET_CLIENT_SECRET)")]
    MissingClientSecret,
}

fn status_suffix(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!(" (HTTP {} {})", status.as_u16(), reason),
        None => format!(" (HTTP {})", status.as_u16()),
    }
}

fn parse_detail(body: &str) -> Option<Value> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(trimmed.to_owned())))
}

/// Pick the most descriptive text out of an upstream error payload.
fn detail_text(detail: &Value) -> Option<String> {
    let object = detail.as_object()?;
    ["error_description", "message", "error"]
        .iter()
        .filter_map(|key| object.get(*key))
        .find_map(|value| match value {
            Value::String(s) if !s.is_empty() => Some(s.to_owned()),
            Value::Object(nested) => nested
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn response_failure_prefers_error_description() {
        let body = json!({"error": "invalid_client", "error_description": "bad secret"}).to_string();
        let failure = UpstreamFailure::from_response("Failed to obtain access token", StatusCode::BAD_REQUEST, &body);

        assert_eq!(failure.status, 400);
        assert_eq!(failure.message, "Failed to obtain access token (HTTP 400 Bad Request): bad secret");
        assert_eq!(failure.detail.unwrap()["error"], "invalid_client");
    }

    #[test]
    fn nested_provider_error_message_is_used() {
        let body = json!({"error": {"code": 13, "message": "Invalid token"}}).to_string();
        let failure = UpstreamFailure::from_response("request failed", StatusCode::UNAUTHORIZED, &body);
        assert!(failure.message.ends_with(": Invalid token"));
    }

    #[test]
    fn plain_text_body_falls_back_to_status_text() {
        let failure = UpstreamFailure::from_response("ctx", StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(failure.message, "ctx (HTTP 502 Bad Gateway): Request failed with status code 502");
        assert_eq!(failure.detail, Some(Value::String("upstream down".into())));
    }

    #[test]
    fn statusless_failure_defaults_to_500() {
        let failure = UpstreamFailure::without_status("ctx", "connection refused");
        assert_eq!(failure.status, DEFAULT_FAILURE_STATUS);
        assert!(failure.detail.is_none());
    }
}
