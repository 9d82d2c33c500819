use bytes::Bytes;
use std::sync::Arc;
use tracing::instrument;

use super::prompts;
use crate::client::ModelConfig;
use crate::errors::{DubbingError, DubbingResult, ErrorKind};
use crate::observability::preview;
use crate::services::audio::{
    supports_style_instructions, AudioService, SpeechFormat, SpeechRequest, TranscriptionFormat,
    TranscriptionRequest,
};
use crate::services::chat::{
    ChatCompletionRequest, ChatCompletionService, ChatMessage, ReasoningEffort, Verbosity,
};
use crate::types::{AudioFormat, StyleDirective, Transcript, TranslateRequest};

const PROMPT_OPTIMIZATION_MAX_TOKENS: u32 = 4096;

/// Issues one upstream operation at a time and normalises its answer.
///
/// Holds no state besides the shared service handles.
#[derive(Clone)]
pub struct RemoteCallAdapter {
    audio: Arc<dyn AudioService>,
    chat: Arc<dyn ChatCompletionService>,
    models: ModelConfig,
    translation_temperature: f32,
}

impl RemoteCallAdapter {
    pub fn new(
        audio: Arc<dyn AudioService>,
        chat: Arc<dyn ChatCompletionService>,
        models: ModelConfig,
        translation_temperature: f32,
    ) -> Self {
        Self {
            audio,
            chat,
            models,
            translation_temperature,
        }
    }

    pub fn models(&self) -> &ModelConfig {
        &self.models
    }

    /// Transcribes canonical-format audio.
    ///
    /// Every response shape collapses into a [`Transcript`]; failures become
    /// [`ErrorKind::Transcription`] with the model and language attached.
    #[instrument(skip(self, audio, prompt), fields(bytes = audio.len(), model = %model))]
    pub async fn transcribe(
        &self,
        audio: Bytes,
        model: &str,
        language: Option<String>,
        prompt: Option<String>,
        format: TranscriptionFormat,
    ) -> DubbingResult<Transcript> {
        let canonical = AudioFormat::CANONICAL;
        let request = TranscriptionRequest::new(
            audio,
            format!("audio.{}", canonical.extension()),
            model,
        )
        .with_content_type(canonical.mime_type())
        .with_language(language.clone())
        .with_prompt(prompt)
        .with_response_format(format);

        let payload = self.audio.transcribe(request).await.map_err(|e| {
            DubbingError::upstream(ErrorKind::Transcription, &e)
                .with_detail("model", model)
                .with_detail("language", language.clone())
        })?;

        let (text, detected) = payload.into_parts();
        tracing::debug!(
            model,
            detected = ?detected,
            text = %preview(&text, 100),
            "Transcription received"
        );
        Ok(Transcript::new(text.trim(), detected))
    }

    /// Asks the prompt optimizer for a contextual prompt.
    ///
    /// Errors are meant to be absorbed by the caller.
    #[instrument(skip(self, transcript), fields(language = %language_name))]
    pub async fn optimize_prompt(
        &self,
        language_name: &str,
        transcript: &Transcript,
    ) -> DubbingResult<String> {
        let model = &self.models.prompt_optimization;
        let request = ChatCompletionRequest::new(
            model.clone(),
            vec![
                ChatMessage::system(prompts::prompt_optimization_system(language_name)),
                ChatMessage::user(prompts::prompt_optimization_user(
                    language_name,
                    &transcript.text,
                )),
            ],
        )
        .with_reasoning_effort(ReasoningEffort::Medium)
        .with_verbosity(Verbosity::Low)
        .with_max_completion_tokens(PROMPT_OPTIMIZATION_MAX_TOKENS);

        let raw = self.complete(request, ErrorKind::Transcription).await?;
        let prompt = prompts::parse_optimized_prompt(&raw).map_err(|reason| {
            DubbingError::new(ErrorKind::Transcription, reason).with_detail("model", model.as_str())
        })?;

        tracing::debug!(prompt = %preview(&prompt, 100), "Prompt optimized");
        Ok(prompt)
    }

    /// Asks the refiner for a cleaned-up transcript. Empty output is an error.
    #[instrument(skip(self, transcript), fields(language = %language_name))]
    pub async fn refine_transcript(
        &self,
        language_name: &str,
        transcript: &Transcript,
    ) -> DubbingResult<Transcript> {
        let model = &self.models.prompt_optimization;
        let request = ChatCompletionRequest::new(
            model.clone(),
            vec![
                ChatMessage::system(prompts::transcript_cleanup_system(language_name)),
                ChatMessage::user(transcript.text.clone()),
            ],
        )
        .with_reasoning_effort(ReasoningEffort::Low)
        .with_verbosity(Verbosity::Low);

        let cleaned = self.complete(request, ErrorKind::Transcription).await?;
        Ok(transcript.with_text(cleaned))
    }

    /// Translates text between two named languages. Empty output is an error.
    #[instrument(
        skip(self, request),
        fields(source = %request.source_language, target = %request.target_language)
    )]
    pub async fn translate(&self, request: &TranslateRequest) -> DubbingResult<String> {
        let model = &self.models.translation;
        let chat_request = ChatCompletionRequest::new(
            model.clone(),
            vec![
                ChatMessage::system(prompts::translation_system(
                    &request.source_language,
                    &request.target_language,
                )),
                ChatMessage::user(request.text.clone()),
            ],
        )
        .with_reasoning_effort(ReasoningEffort::None)
        .with_temperature(self.translation_temperature);

        self.complete(chat_request, ErrorKind::Translation)
            .await
            .map_err(|e| {
                e.with_detail("source_language", request.source_language.as_str())
                    .with_detail("target_language", request.target_language.as_str())
            })
    }

    /// Synthesizes speech as MP3.
    ///
    /// The directive is forwarded only to models that accept one; such models
    /// get [`prompts::DEFAULT_STYLE_DIRECTIVE`] when none is given.
    #[instrument(skip(self, text, directive), fields(chars = text.len(), voice = %voice, model = %model))]
    pub async fn synthesize(
        &self,
        text: &str,
        voice: &str,
        model: &str,
        directive: Option<StyleDirective>,
    ) -> DubbingResult<Bytes> {
        let instructions = if supports_style_instructions(model) {
            Some(
                directive
                    .map(StyleDirective::into_inner)
                    .unwrap_or_else(|| prompts::DEFAULT_STYLE_DIRECTIVE.to_string()),
            )
        } else {
            if directive.is_some() {
                tracing::debug!(model, "Dropping style directive unsupported by model");
            }
            None
        };

        let request = SpeechRequest::new(model, text, voice)
            .with_instructions(instructions)
            .with_format(SpeechFormat::Mp3);

        let audio = self.audio.speech(request).await.map_err(|e| {
            DubbingError::upstream(ErrorKind::Synthesis, &e)
                .with_detail("model", model)
                .with_detail("voice", voice)
        })?;

        if audio.is_empty() {
            return Err(DubbingError::new(
                ErrorKind::Synthesis,
                "TTS generation failed: empty audio returned",
            )
            .with_detail("model", model)
            .with_detail("voice", voice));
        }

        Ok(audio)
    }

    async fn complete(&self, request: ChatCompletionRequest, kind: ErrorKind) -> DubbingResult<String> {
        let model = request.model.clone();
        let response = self
            .chat
            .create(request)
            .await
            .map_err(|e| DubbingError::upstream(kind, &e).with_detail("model", model.as_str()))?;

        response
            .first_text()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                DubbingError::new(kind, format!("{} returned empty output", model))
                    .with_detail("model", model.as_str())
            })
    }
}

impl std::fmt::Debug for RemoteCallAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteCallAdapter")
            .field("models", &self.models)
            .field("translation_temperature", &self.translation_temperature)
            .finish_non_exhaustive()
    }
}
