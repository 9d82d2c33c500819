//! `reqwest`-backed transport.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::collections::HashMap;
use std::time::Duration;
use tracing::instrument;
use url::Url;

use super::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, MultipartPart, MultipartRequest,
    TransportError,
};

/// HTTP transport implementation using reqwest.
///
/// One instance holds a pooled client and is shared by every in-flight
/// pipeline through an `Arc`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
    default_timeout: Duration,
}

impl ReqwestTransport {
    /// Creates a new transport rooted at `base_url`.
    pub fn new(
        base_url: &Url,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, TransportError> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .user_agent(user_agent)
            .pool_max_idle_per_host(10)
            .tcp_keepalive(Duration::from_secs(60))
            .build()
            .map_err(|e| TransportError::Connection {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            default_timeout: timeout,
        })
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn map_send_error(&self, err: reqwest::Error, timeout: Option<Duration>) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout {
                timeout: timeout.unwrap_or(self.default_timeout),
            }
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else {
            TransportError::InvalidResponse {
                message: err.to_string(),
            }
        }
    }

    async fn read_response(
        &self,
        response: reqwest::Response,
        timeout: Option<Duration>,
    ) -> Result<HttpResponse, TransportError> {
        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_ascii_lowercase(),
                    v.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_send_error(e, timeout))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = ?request.method, path = %request.path))]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = self.build_url(&request.path);

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| self.map_send_error(e, request.timeout))?;

        self.read_response(response, request.timeout).await
    }

    #[instrument(skip(self, request), fields(path = %request.path, parts = request.parts.len()))]
    async fn send_multipart(
        &self,
        request: MultipartRequest,
    ) -> Result<HttpResponse, TransportError> {
        let url = self.build_url(&request.path);

        let mut form = reqwest::multipart::Form::new();
        for part in request.parts {
            form = match part {
                MultipartPart::Text { name, value } => form.text(name, value),
                MultipartPart::File {
                    name,
                    filename,
                    content_type,
                    data,
                } => {
                    let file_part = reqwest::multipart::Part::bytes(data.to_vec())
                        .file_name(filename)
                        .mime_str(&content_type)
                        .map_err(|e| TransportError::InvalidResponse {
                            message: format!("invalid content type {}: {}", content_type, e),
                        })?;
                    form.part(name, file_part)
                }
            };
        }

        let mut builder = self.client.post(&url).multipart(form);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| self.map_send_error(e, request.timeout))?;

        self.read_response(response, request.timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_joins_paths() {
        let base = Url::parse("https://api.openai.com/v1/").unwrap();
        let transport = ReqwestTransport::new(&base, Duration::from_secs(5), "test").unwrap();

        assert_eq!(
            transport.build_url("/audio/speech"),
            "https://api.openai.com/v1/audio/speech"
        );
        assert_eq!(
            transport.build_url("chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
    }
}
