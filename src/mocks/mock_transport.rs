use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use super::lock;
use crate::transport::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, MultipartPart, MultipartRequest,
    TransportError,
};

/// Mock HTTP transport replaying queued responses in order.
pub struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

enum Reply {
    Response(MockResponse),
    Timeout(Duration),
}

/// A recorded request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Request path.
    pub path: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Raw body for JSON requests.
    pub body: Option<Bytes>,
    /// Text fields of a multipart upload, in order.
    pub fields: Vec<(String, String)>,
    /// File part of a multipart upload.
    pub file: Option<RecordedFile>,
    /// Deadline the caller attached.
    pub timeout: Option<Duration>,
}

/// File part captured from a multipart upload.
#[derive(Debug, Clone)]
pub struct RecordedFile {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

impl RecordedRequest {
    /// Parses the body as JSON.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body
            .as_ref()
            .and_then(|b| serde_json::from_slice(b).ok())
    }

    /// Returns a multipart text field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}

/// A mock response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Bytes,
}

impl MockResponse {
    /// Creates a successful JSON response.
    pub fn json<T: serde::Serialize>(value: &T) -> Self {
        let body = serde_json::to_vec(value).unwrap_or_default();
        Self::bytes(body, "application/json")
    }

    /// Creates a successful response with a raw body.
    pub fn bytes(body: impl Into<Bytes>, content_type: &str) -> Self {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), content_type.to_string());
        Self {
            status: 200,
            headers,
            body: body.into(),
        }
    }

    /// Creates an API error response.
    pub fn error(status: u16, message: &str) -> Self {
        let error = serde_json::json!({
            "error": {
                "message": message,
                "type": "error"
            }
        });
        Self::json(&error).with_status(status)
    }

    /// Creates a response with custom status.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Adds a header.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }
}

impl MockTransport {
    /// Creates a new mock transport.
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queues a response.
    pub fn queue(&self, response: MockResponse) {
        lock(&self.replies).push_back(Reply::Response(response));
    }

    /// Queues a JSON response.
    pub fn queue_json<T: serde::Serialize>(&self, value: &T) {
        self.queue(MockResponse::json(value));
    }

    /// Queues an error response.
    pub fn queue_error(&self, status: u16, message: &str) {
        self.queue(MockResponse::error(status, message));
    }

    /// Queues a transport-level timeout.
    pub fn queue_timeout(&self) {
        lock(&self.replies).push_back(Reply::Timeout(Duration::from_secs(60)));
    }

    /// Gets all recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Gets the last recorded request.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Returns the number of requests made.
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Returns the number of queued replies not yet consumed.
    pub fn pending(&self) -> usize {
        lock(&self.replies).len()
    }

    fn reply(&self) -> Result<HttpResponse, TransportError> {
        let reply = lock(&self.replies)
            .pop_front()
            .unwrap_or_else(|| Reply::Response(MockResponse::error(500, "No mock response configured")));

        match reply {
            Reply::Response(response) => Ok(HttpResponse {
                status: response.status,
                headers: response.headers,
                body: response.body,
            }),
            Reply::Timeout(timeout) => Err(TransportError::Timeout { timeout }),
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        lock(&self.requests).push(RecordedRequest {
            method: request.method,
            path: request.path,
            headers: request.headers,
            body: request.body,
            fields: Vec::new(),
            file: None,
            timeout: request.timeout,
        });
        self.reply()
    }

    async fn send_multipart(
        &self,
        request: MultipartRequest,
    ) -> Result<HttpResponse, TransportError> {
        let mut fields = Vec::new();
        let mut file = None;
        for part in request.parts {
            match part {
                MultipartPart::Text { name, value } => fields.push((name, value)),
                MultipartPart::File {
                    filename,
                    content_type,
                    data,
                    ..
                } => {
                    file = Some(RecordedFile {
                        filename,
                        content_type,
                        data,
                    })
                }
            }
        }

        lock(&self.requests).push(RecordedRequest {
            method: HttpMethod::Post,
            path: request.path,
            headers: request.headers,
            body: None,
            fields,
            file,
            timeout: request.timeout,
        });
        self.reply()
    }
}
