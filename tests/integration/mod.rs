//! Integration tests using WireMock
//!
//! The full client runs against a mock HTTP server: multipart uploads, JSON
//! bodies, authentication headers and error mapping all go over the wire.
//! Transcoding is replaced by a byte copy so no `ffmpeg` is needed.

pub mod synthesis;
pub mod transcription;
pub mod translation;

use async_trait::async_trait;
use dubbing_studio::artifacts::AudioTranscoder;
use dubbing_studio::{DubbingClient, DubbingConfig, DubbingError, DubbingResult, RefinementStrategy};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "sk-test-integration";

/// Transcoder that copies the upload unchanged.
pub struct CopyTranscoder;

#[async_trait]
impl AudioTranscoder for CopyTranscoder {
    async fn transcode(&self, input: &Path, output: &Path) -> DubbingResult<()> {
        tokio::fs::copy(input, output)
            .await
            .map(|_| ())
            .map_err(|e| DubbingError::audio_processing(e.to_string()))
    }
}

/// A client wired to `server`, with scratch files under `scratch`.
pub fn client_for(server: &MockServer, scratch: &TempDir, strategy: RefinementStrategy) -> DubbingClient {
    let config = DubbingConfig::builder()
        .api_key(API_KEY)
        .base_url(server.uri())
        .temp_dir(scratch.path())
        .refinement(strategy)
        .build()
        .expect("valid config");

    DubbingClient::builder()
        .with_config(config)
        .with_transcoder(Arc::new(CopyTranscoder))
        .build()
        .expect("client builds")
}

/// POST matcher that also checks the bearer token.
pub fn authed_post(endpoint: &str) -> wiremock::MockBuilder {
    Mock::given(method("POST"))
        .and(path(endpoint))
        .and(header("authorization", format!("Bearer {}", API_KEY).as_str()))
}

pub fn error_response(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(serde_json::json!({
        "error": {
            "message": message,
            "type": "invalid_request_error",
            "code": null
        }
    }))
}

pub fn chat_response(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "id": "chatcmpl-int",
        "object": "chat.completion",
        "created": 1700000000,
        "model": "gpt-5.1",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    }))
}

pub fn files_in(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}
