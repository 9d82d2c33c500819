use std::sync::Arc;

use crate::artifacts::{AudioTranscoder, FfmpegTranscoder, TempArtifactStore};
use crate::auth::{ApiKeyAuth, AuthProvider};
use crate::client::{DubbingClient, DubbingConfig};
use crate::errors::{ProviderError, ProviderResult};
use crate::pipeline::{DubbingPipeline, RemoteCallAdapter};
use crate::reasoning::ReasoningClient;
use crate::resilience::{RetryConfig, RetryPolicy};
use crate::services::audio::AudioServiceImpl;
use crate::services::chat::ChatCompletionServiceImpl;
use crate::services::responses::ResponsesServiceImpl;
use crate::sessions::SessionManager;
use crate::transport::{HttpTransport, ReqwestTransport};

/// Assembles a [`DubbingClient`], defaulting every seam that is not set.
pub struct DubbingClientBuilder {
    config: Option<DubbingConfig>,
    transport: Option<Arc<dyn HttpTransport>>,
    auth: Option<Arc<dyn AuthProvider>>,
    transcoder: Option<Arc<dyn AudioTranscoder>>,
    sessions: Option<Arc<SessionManager>>,
}

impl DubbingClientBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            transport: None,
            auth: None,
            transcoder: None,
            sessions: None,
        }
    }

    pub fn with_config(mut self, config: DubbingConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> ProviderResult<Self> {
        self.config = Some(DubbingConfig::new(api_key)?);
        Ok(self)
    }

    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_auth(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn with_transcoder(mut self, transcoder: Arc<dyn AudioTranscoder>) -> Self {
        self.transcoder = Some(transcoder);
        self
    }

    pub fn with_sessions(mut self, sessions: Arc<SessionManager>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    pub fn build(self) -> ProviderResult<DubbingClient> {
        let config = self
            .config
            .ok_or_else(|| ProviderError::configuration("API key must be provided"))?;
        config.validate()?;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(
                &config.base_url,
                config.timeout,
                &config.user_agent,
            )?),
        };

        let auth: Arc<dyn AuthProvider> = match self.auth {
            Some(auth) => auth,
            None => Arc::new(
                ApiKeyAuth::new(config.api_key().clone())
                    .with_organization(config.organization_id.clone()),
            ),
        };
        auth.validate()?;

        let transcoder = self
            .transcoder
            .unwrap_or_else(|| Arc::new(FfmpegTranscoder::new()));
        let sessions = self.sessions.unwrap_or_default();

        // Dubbing calls fail fast; only reasoning queries retry.
        let audio = Arc::new(AudioServiceImpl::new(
            Arc::clone(&transport),
            Arc::clone(&auth),
            RetryPolicy::new(RetryConfig::no_retries()),
            config.timeout,
        ));
        let chat = Arc::new(ChatCompletionServiceImpl::new(
            Arc::clone(&transport),
            Arc::clone(&auth),
            RetryPolicy::new(RetryConfig::no_retries()),
            config.timeout,
        ));
        let responses = Arc::new(ResponsesServiceImpl::new(
            Arc::clone(&transport),
            Arc::clone(&auth),
            RetryPolicy::new(RetryConfig::long_running()),
        ));

        let adapter = RemoteCallAdapter::new(
            audio,
            chat,
            config.models.clone(),
            config.translation_temperature,
        );
        let pipeline = DubbingPipeline::new(
            adapter,
            TempArtifactStore::new(config.temp_dir.clone()),
            transcoder,
        )
        .with_max_upload_size(config.max_upload_size)
        .with_refinement(config.refinement)
        .with_default_voice(config.default_voice.clone());

        let reasoning = ReasoningClient::new(responses, Arc::clone(&sessions));

        tracing::debug!(
            base_url = %config.base_url,
            refinement = ?config.refinement,
            "Dubbing client ready"
        );

        Ok(DubbingClient::new(config, auth, pipeline, reasoning, sessions))
    }
}

impl Default for DubbingClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::chat_completion_response;
    use crate::mocks::{MockAuth, MockTranscoder, MockTransport};
    use crate::types::TranslateRequest;

    #[test]
    fn test_builder_requires_config() {
        assert!(DubbingClientBuilder::new().build().is_err());
    }

    #[test]
    fn test_builder_with_api_key() {
        let client = DubbingClientBuilder::new()
            .with_api_key("sk-test-key")
            .unwrap()
            .with_transcoder(Arc::new(MockTranscoder::copying()))
            .build()
            .unwrap();

        let health = client.health();
        assert_eq!(health.status, "healthy");
        assert!(health.openai_api_configured);
        assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_unconfigured_auth_is_rejected() {
        let result = DubbingClientBuilder::new()
            .with_api_key("sk-test-key")
            .unwrap()
            .with_auth(Arc::new(MockAuth::unconfigured()))
            .build();

        assert!(matches!(result, Err(ProviderError::Authentication { .. })));
    }

    #[tokio::test]
    async fn test_injected_transport_is_used() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_json(&chat_completion_response("Bonjour"));

        let client = DubbingClientBuilder::new()
            .with_api_key("sk-test-key")
            .unwrap()
            .with_transport(transport.clone())
            .with_auth(Arc::new(MockAuth::new()))
            .build()
            .unwrap();

        let result = client
            .translate(TranslateRequest::new("Hello", "English", "French"))
            .await
            .unwrap();

        assert_eq!(result.translated_text, "Bonjour");
        let recorded = transport.last_request().unwrap();
        assert_eq!(
            recorded.headers.get("Authorization").map(String::as_str),
            Some("Bearer test-api-key")
        );
        assert_eq!(recorded.timeout, Some(crate::client::DEFAULT_TIMEOUT));
    }
}
