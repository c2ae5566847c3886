//! HTTP utilities for Distribution REST API calls

use reqwest::{Client, Method, StatusCode};
use serde_json::Value;

use crate::error::{ApiError, DistError};

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips non-printable characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        format!(
            "{}... [truncated, {} bytes total]",
            &body[..MAX_LOG_BODY_LENGTH],
            body.len()
        )
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// HTTP client wrapper for Distribution API calls
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self, DistError> {
        let client = Client::builder()
            .user_agent(format!("distctl/{}", crate::VERSION))
            .build()?;

        Ok(Self { client })
    }

    /// Execute a request and return the parsed JSON body.
    ///
    /// A 404 surfaces as [`DistError::NotFound`] so callers can apply their
    /// per-operation not-found policy. Any other non-2xx status is decoded
    /// into the API's structured error body and surfaced verbatim. An empty
    /// 2xx body yields `Value::Null`.
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        token: &str,
        body: Option<&Value>,
        headers: &[(&str, &str)],
    ) -> Result<Value, DistError> {
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method, url).bearer_auth(token);

        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;

        let status = response.status();
        let response_body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            tracing::debug!("API returned 404 for {}", url);
            return Err(DistError::NotFound);
        }

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&response_body));
            return Err(DistError::Api(parse_api_error(status, &response_body)));
        }

        if response_body.is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&response_body)?)
    }
}

/// Decode the structured `{status_code, message, detail}` error body, falling
/// back to the raw (sanitized) body when it does not parse.
fn parse_api_error(status: StatusCode, body: &str) -> ApiError {
    match serde_json::from_str::<ApiError>(body) {
        Ok(mut api_error) => {
            if api_error.status_code == 0 {
                api_error.status_code = status.as_u16();
            }
            api_error
        }
        Err(_) => ApiError {
            status_code: status.as_u16(),
            message: status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
            detail: sanitize_for_log(body),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_structured_error_body() {
        let body = r#"{"status_code": 400, "message": "Bad request", "detail": "name is invalid"}"#;
        let err = parse_api_error(StatusCode::BAD_REQUEST, body);
        assert_eq!(err.status_code, 400);
        assert_eq!(err.message, "Bad request");
        assert_eq!(err.to_string(), "400 - Bad request: name is invalid");
    }

    #[test]
    fn falls_back_on_unstructured_body() {
        let err = parse_api_error(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(err.status_code, 500);
        assert!(err.detail.contains("oops"));
    }

    #[test]
    fn sanitize_truncates_long_bodies() {
        let long = "x".repeat(500);
        let sanitized = sanitize_for_log(&long);
        assert!(sanitized.contains("truncated"));
        assert!(sanitized.len() < 300);
    }
}
