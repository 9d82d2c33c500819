use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::auth::AuthProvider;
use crate::client::{DubbingClientBuilder, DubbingConfig};
use crate::errors::{DubbingResult, ProviderResult};
use crate::pipeline::DubbingPipeline;
use crate::reasoning::ReasoningClient;
use crate::sessions::SessionManager;
use crate::types::{
    AudioUpload, SpeechSynthesisRequest, SynthesizedSpeech, TranscriptionOutcome,
    TranslateRequest, TranslationResult,
};

/// Entry point to the dubbing pipeline and the auxiliary reasoning client.
///
/// Cheap to share: one client (and its connection pool) can serve any
/// number of concurrent requests.
///
/// ```rust,no_run
/// use dubbing_studio::{AudioUpload, DubbingClient, TranslateRequest};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let client = DubbingClient::from_env()?;
///
/// let upload = AudioUpload::new("interview.m4a", std::fs::read("interview.m4a")?);
/// let transcript = client.transcribe(upload, None).await?;
///
/// let translated = client
///     .translate(TranslateRequest::new(transcript.text, transcript.language, "Spanish"))
///     .await?;
/// println!("{}", translated.translated_text);
/// # Ok(())
/// # }
/// ```
pub struct DubbingClient {
    config: DubbingConfig,
    auth: Arc<dyn AuthProvider>,
    pipeline: DubbingPipeline,
    reasoning: ReasoningClient,
    sessions: Arc<SessionManager>,
}

impl DubbingClient {
    pub(crate) fn new(
        config: DubbingConfig,
        auth: Arc<dyn AuthProvider>,
        pipeline: DubbingPipeline,
        reasoning: ReasoningClient,
        sessions: Arc<SessionManager>,
    ) -> Self {
        Self {
            config,
            auth,
            pipeline,
            reasoning,
            sessions,
        }
    }

    pub fn builder() -> DubbingClientBuilder {
        DubbingClientBuilder::new()
    }

    /// Builds a client from `OPENAI_API_KEY` and the `DUBBING_*` variables.
    pub fn from_env() -> ProviderResult<Self> {
        DubbingClientBuilder::new()
            .with_config(DubbingConfig::from_env()?)
            .build()
    }

    pub fn config(&self) -> &DubbingConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &DubbingPipeline {
        &self.pipeline
    }

    pub fn reasoning(&self) -> &ReasoningClient {
        &self.reasoning
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    /// See [`DubbingPipeline::transcribe`].
    pub async fn transcribe(
        &self,
        upload: AudioUpload,
        language: Option<&str>,
    ) -> DubbingResult<TranscriptionOutcome> {
        self.pipeline.transcribe(upload, language).await
    }

    /// See [`DubbingPipeline::translate`].
    pub async fn translate(&self, request: TranslateRequest) -> DubbingResult<TranslationResult> {
        self.pipeline.translate(request).await
    }

    /// See [`DubbingPipeline::synthesize`].
    pub async fn synthesize(
        &self,
        request: SpeechSynthesisRequest,
    ) -> DubbingResult<SynthesizedSpeech> {
        self.pipeline.synthesize(request).await
    }

    /// Liveness report. Makes no network call.
    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "healthy".to_string(),
            openai_api_configured: self.auth.is_configured(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
        }
    }
}

impl std::fmt::Debug for DubbingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DubbingClient")
            .field("config", &self.config)
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

/// Body of a health probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub openai_api_configured: bool,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}
