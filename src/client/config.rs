use secrecy::{ExposeSecret, SecretString};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::errors::{ProviderError, ProviderResult};

/// Default base URL for the OpenAI API.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default deadline for a single remote call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Largest accepted upload (25 MiB), matching the transcription endpoint's cap.
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 25 * 1024 * 1024;

/// Default translation temperature.
pub const DEFAULT_TRANSLATION_TEMPERATURE: f32 = 0.3;

/// Default synthesis voice.
pub const DEFAULT_VOICE: &str = "onyx";

/// Name of the scratch directory created under the system temp dir.
pub const TEMP_DIR_NAME: &str = "ai-dubbing-studio";

/// How the secondary pass of transcribe-and-refine works.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefinementStrategy {
    /// Generate a contextual prompt, then transcribe again with it.
    #[default]
    PromptOptimization,
    /// Ask a text model to clean the raw transcript and use it directly.
    TranscriptCleanup,
}

impl FromStr for RefinementStrategy {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prompt" | "prompt_optimization" => Ok(RefinementStrategy::PromptOptimization),
            "cleanup" | "transcript_cleanup" => Ok(RefinementStrategy::TranscriptCleanup),
            other => Err(ProviderError::configuration(format!(
                "unknown refinement strategy '{}' (expected 'prompt' or 'cleanup')",
                other
            ))),
        }
    }
}

/// Model identifiers used by each stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    /// Broad-coverage model used to auto-detect the language.
    pub detection_transcription: String,
    /// Fast model used when the caller names the language.
    pub fast_transcription: String,
    /// High-accuracy model for the final pass.
    pub refined_transcription: String,
    /// Text model producing contextual prompts or cleaned transcripts.
    pub prompt_optimization: String,
    /// Text model used for translation.
    pub translation: String,
    /// Default speech synthesis model.
    pub speech: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            detection_transcription: "whisper-1".to_string(),
            fast_transcription: "gpt-4o-mini-transcribe".to_string(),
            refined_transcription: "gpt-4o-transcribe".to_string(),
            prompt_optimization: "gpt-5-mini".to_string(),
            translation: "gpt-5.1".to_string(),
            speech: "gpt-4o-mini-tts".to_string(),
        }
    }
}

/// Configuration for a [`DubbingClient`](crate::DubbingClient).
#[derive(Clone)]
pub struct DubbingConfig {
    pub(crate) api_key: SecretString,
    /// Base URL for API requests.
    pub base_url: Url,
    /// Optional organization scope.
    pub organization_id: Option<String>,
    /// Deadline applied to every remote call.
    pub timeout: Duration,
    /// Directory for short-lived audio artifacts.
    pub temp_dir: PathBuf,
    /// Largest accepted upload in bytes.
    pub max_upload_size: usize,
    /// Model identifiers per stage.
    pub models: ModelConfig,
    /// Sampling temperature for translation.
    pub translation_temperature: f32,
    /// Voice used when the caller does not pick one.
    pub default_voice: String,
    /// Secondary-pass strategy.
    pub refinement: RefinementStrategy,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl DubbingConfig {
    /// Creates a configuration with defaults and the given API key.
    pub fn new(api_key: impl Into<String>) -> ProviderResult<Self> {
        DubbingConfigBuilder::new().api_key(api_key).build()
    }

    /// Creates a new configuration builder.
    pub fn builder() -> DubbingConfigBuilder {
        DubbingConfigBuilder::new()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENAI_API_KEY` (required)
    /// - `OPENAI_BASE_URL`, `OPENAI_ORGANIZATION_ID`
    /// - `DUBBING_TIMEOUT_SECS`, `DUBBING_TEMP_DIR`, `DUBBING_MAX_UPLOAD_SIZE`
    /// - `DUBBING_TRANSCRIPTION_MODEL`, `DUBBING_TRANSLATION_MODEL`,
    ///   `DUBBING_TRANSLATION_TEMPERATURE`, `DUBBING_TTS_MODEL`, `DUBBING_TTS_VOICE`
    /// - `DUBBING_REFINEMENT` (`prompt` or `cleanup`)
    pub fn from_env() -> ProviderResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> ProviderResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY").ok_or_else(|| {
            ProviderError::configuration("OPENAI_API_KEY environment variable not set")
        })?;

        let mut builder = DubbingConfigBuilder::new().api_key(api_key);

        if let Some(base_url) = lookup("OPENAI_BASE_URL") {
            builder = builder.base_url(base_url);
        }
        if let Some(org) = lookup("OPENAI_ORGANIZATION_ID") {
            builder = builder.organization_id(org);
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "DUBBING_TIMEOUT_SECS")? {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(dir) = lookup("DUBBING_TEMP_DIR") {
            builder = builder.temp_dir(dir);
        }
        if let Some(size) = parse_var::<usize>(&lookup, "DUBBING_MAX_UPLOAD_SIZE")? {
            builder = builder.max_upload_size(size);
        }
        if let Some(model) = lookup("DUBBING_TRANSCRIPTION_MODEL") {
            builder = builder.refined_transcription_model(model);
        }
        if let Some(model) = lookup("DUBBING_TRANSLATION_MODEL") {
            builder = builder.translation_model(model);
        }
        if let Some(temp) = parse_var::<f32>(&lookup, "DUBBING_TRANSLATION_TEMPERATURE")? {
            builder = builder.translation_temperature(temp);
        }
        if let Some(model) = lookup("DUBBING_TTS_MODEL") {
            builder = builder.speech_model(model);
        }
        if let Some(voice) = lookup("DUBBING_TTS_VOICE") {
            builder = builder.default_voice(voice);
        }
        if let Some(strategy) = parse_var::<RefinementStrategy>(&lookup, "DUBBING_REFINEMENT")? {
            builder = builder.refinement(strategy);
        }

        builder.build()
    }

    /// Returns the API key.
    pub(crate) fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    /// Returns true when a non-empty API key is configured.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.expose_secret().trim().is_empty()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ProviderResult<()> {
        if !self.has_api_key() {
            return Err(ProviderError::configuration("API key cannot be empty"));
        }
        if self.timeout.is_zero() {
            return Err(ProviderError::configuration("timeout must be greater than zero"));
        }
        if !(0.0..=2.0).contains(&self.translation_temperature) {
            return Err(ProviderError::configuration(format!(
                "translation temperature {} outside 0.0..=2.0",
                self.translation_temperature
            )));
        }
        if self.max_upload_size == 0 {
            return Err(ProviderError::configuration(
                "max upload size must be greater than zero",
            ));
        }
        if !matches!(self.base_url.scheme(), "http" | "https") {
            return Err(ProviderError::configuration(format!(
                "unsupported base URL scheme '{}'",
                self.base_url.scheme()
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for DubbingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DubbingConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url.as_str())
            .field("organization_id", &self.organization_id)
            .field("timeout", &self.timeout)
            .field("temp_dir", &self.temp_dir)
            .field("max_upload_size", &self.max_upload_size)
            .field("models", &self.models)
            .field("translation_temperature", &self.translation_temperature)
            .field("default_voice", &self.default_voice)
            .field("refinement", &self.refinement)
            .finish()
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> ProviderResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| {
            ProviderError::configuration(format!("invalid value for {}: {}", key, e))
        }),
    }
}

/// Builder for [`DubbingConfig`].
#[derive(Default)]
pub struct DubbingConfigBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    organization_id: Option<String>,
    timeout: Option<Duration>,
    temp_dir: Option<PathBuf>,
    max_upload_size: Option<usize>,
    models: ModelConfig,
    translation_temperature: Option<f32>,
    default_voice: Option<String>,
    refinement: RefinementStrategy,
    user_agent: Option<String>,
}

impl DubbingConfigBuilder {
    /// Creates a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the organization.
    pub fn organization_id(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = Some(organization_id.into());
        self
    }

    /// Sets the per-call timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the scratch directory.
    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Sets the upload cap in bytes.
    pub fn max_upload_size(mut self, bytes: usize) -> Self {
        self.max_upload_size = Some(bytes);
        self
    }

    /// Replaces all model identifiers.
    pub fn models(mut self, models: ModelConfig) -> Self {
        self.models = models;
        self
    }

    /// Sets the final-pass transcription model.
    pub fn refined_transcription_model(mut self, model: impl Into<String>) -> Self {
        self.models.refined_transcription = model.into();
        self
    }

    /// Sets the translation model.
    pub fn translation_model(mut self, model: impl Into<String>) -> Self {
        self.models.translation = model.into();
        self
    }

    /// Sets the default synthesis model.
    pub fn speech_model(mut self, model: impl Into<String>) -> Self {
        self.models.speech = model.into();
        self
    }

    /// Sets the translation temperature.
    pub fn translation_temperature(mut self, temperature: f32) -> Self {
        self.translation_temperature = Some(temperature);
        self
    }

    /// Sets the default voice.
    pub fn default_voice(mut self, voice: impl Into<String>) -> Self {
        self.default_voice = Some(voice.into());
        self
    }

    /// Sets the refinement strategy.
    pub fn refinement(mut self, strategy: RefinementStrategy) -> Self {
        self.refinement = strategy;
        self
    }

    /// Sets the user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> ProviderResult<DubbingConfig> {
        let api_key = self
            .api_key
            .ok_or_else(|| ProviderError::configuration("API key is required"))?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(base_url.trim_end_matches('/'))?;

        let config = DubbingConfig {
            api_key: SecretString::new(api_key),
            base_url,
            organization_id: self.organization_id,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            temp_dir: self
                .temp_dir
                .unwrap_or_else(|| std::env::temp_dir().join(TEMP_DIR_NAME)),
            max_upload_size: self.max_upload_size.unwrap_or(DEFAULT_MAX_UPLOAD_SIZE),
            models: self.models,
            translation_temperature: self
                .translation_temperature
                .unwrap_or(DEFAULT_TRANSLATION_TEMPERATURE),
            default_voice: self
                .default_voice
                .unwrap_or_else(|| DEFAULT_VOICE.to_string()),
            refinement: self.refinement,
            user_agent: self.user_agent.unwrap_or_else(default_user_agent),
        };

        config.validate()?;
        Ok(config)
    }
}

fn default_user_agent() -> String {
    format!("dubbing-studio/{}", env!("CARGO_PKG_VERSION"))
}
