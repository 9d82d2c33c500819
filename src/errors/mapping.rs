use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use super::ProviderError;

#[derive(Debug, Deserialize, Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub code: Option<String>,
    pub param: Option<String>,
}

pub struct ErrorMapper;

impl ErrorMapper {
    /// Maps an HTTP status code and parsed error body to a [`ProviderError`]
    pub fn map_status_code(
        status_code: u16,
        error_response: Option<ApiErrorResponse>,
    ) -> ProviderError {
        let detail = error_response.map(|r| r.error);
        let message = detail
            .as_ref()
            .map(|d| d.message.clone())
            .unwrap_or_else(|| {
                let reason = http::StatusCode::from_u16(status_code)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("Unknown status");
                format!("HTTP error: {} {}", status_code, reason)
            });

        match status_code {
            400 => ProviderError::Validation {
                message,
                param: detail.and_then(|d| d.param),
            },
            401 | 403 => ProviderError::Authentication { message },
            408 => ProviderError::Timeout { message },
            429 => ProviderError::RateLimit {
                message,
                retry_after: None,
            },
            500..=599 => ProviderError::Server {
                message,
                status_code,
                request_id: None,
            },
            _ => ProviderError::Request {
                status_code,
                message,
            },
        }
    }

    /// Creates an error from response components
    pub fn from_response(
        status: u16,
        headers: &HashMap<String, String>,
        body: &[u8],
    ) -> ProviderError {
        // Non-JSON bodies still carry the only useful message
        let parsed = Self::parse_error_response(body).or_else(|| {
            let text = String::from_utf8_lossy(body).trim().to_string();
            (!text.is_empty()).then(|| ApiErrorResponse {
                error: ApiErrorDetail {
                    message: text,
                    error_type: None,
                    code: None,
                    param: None,
                },
            })
        });

        let error = Self::map_status_code(status, parsed);

        match error {
            ProviderError::RateLimit { message, .. } => ProviderError::RateLimit {
                message,
                retry_after: Self::extract_retry_after(headers),
            },
            ProviderError::Server {
                message,
                status_code,
                ..
            } => ProviderError::Server {
                message,
                status_code,
                request_id: header(headers, "x-request-id").map(str::to_string),
            },
            other => other,
        }
    }

    /// Extracts the retry-after header value, in whole seconds
    pub fn extract_retry_after(headers: &HashMap<String, String>) -> Option<Duration> {
        header(headers, "retry-after")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
    }

    /// Parses error response from JSON body
    pub fn parse_error_response(body: &[u8]) -> Option<ApiErrorResponse> {
        serde_json::from_slice(body).ok()
    }
}

fn header<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
