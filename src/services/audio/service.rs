use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use super::types::{
    supports_transcription_prompt, SpeechRequest, TranscriptionPayload, TranscriptionRequest,
};
use crate::auth::AuthProvider;
use crate::errors::ProviderResult;
use crate::resilience::RetryPolicy;
use crate::services::{send_json, send_multipart};
use crate::transport::{HttpRequest, HttpTransport, MultipartPart, MultipartRequest};

#[async_trait]
pub trait AudioService: Send + Sync {
    async fn transcribe(&self, request: TranscriptionRequest) -> ProviderResult<TranscriptionPayload>;

    async fn speech(&self, request: SpeechRequest) -> ProviderResult<Bytes>;
}

pub struct AudioServiceImpl {
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthProvider>,
    retry: RetryPolicy,
    timeout: Duration,
}

impl AudioServiceImpl {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        auth: Arc<dyn AuthProvider>,
        retry: RetryPolicy,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            auth,
            retry,
            timeout,
        }
    }

    fn headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        self.auth.apply_auth(&mut headers);
        headers
    }

    fn build_transcription_request(&self, request: TranscriptionRequest) -> MultipartRequest {
        let mut parts = vec![
            MultipartPart::File {
                name: "file".to_string(),
                filename: request.filename,
                content_type: request.content_type,
                data: request.file,
            },
            MultipartPart::text("model", request.model.clone()),
        ];

        if let Some(language) = request.language.filter(|l| !l.is_empty()) {
            parts.push(MultipartPart::text("language", language));
        }

        // Only some models accept a prompt; others reject the field outright
        match request.prompt.filter(|p| !p.is_empty()) {
            Some(prompt) if supports_transcription_prompt(&request.model) => {
                parts.push(MultipartPart::text("prompt", prompt));
            }
            Some(_) => {
                tracing::debug!(model = %request.model, "Dropping prompt unsupported by model");
            }
            None => {}
        }

        if let Some(format) = request.response_format {
            parts.push(MultipartPart::text("response_format", format.as_str()));
        }

        MultipartRequest {
            path: "audio/transcriptions".to_string(),
            headers: self.headers(),
            parts,
            timeout: Some(self.timeout),
        }
    }
}

#[async_trait]
impl AudioService for AudioServiceImpl {
    #[instrument(skip(self, request), fields(model = %request.model, language = ?request.language))]
    async fn transcribe(&self, request: TranscriptionRequest) -> ProviderResult<TranscriptionPayload> {
        let multipart = self.build_transcription_request(request);
        let response = send_multipart(&self.transport, &self.retry, multipart).await?;
        TranscriptionPayload::from_body(&response.body)
    }

    #[instrument(skip(self, request), fields(model = %request.model, voice = %request.voice))]
    async fn speech(&self, request: SpeechRequest) -> ProviderResult<Bytes> {
        let http_request = HttpRequest::post("audio/speech")
            .json(&request)?
            .with_headers(self.headers())
            .with_timeout(self.timeout);

        let response = send_json(&self.transport, &self.retry, http_request).await?;
        Ok(response.body)
    }
}
