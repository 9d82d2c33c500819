use bytes::Bytes;
use std::sync::Arc;
use tracing::instrument;

use super::adapter::RemoteCallAdapter;
use super::prompts::fallback_prompt;
use super::selector::{select_flow, TranscriptionFlow};
use crate::artifacts::{AudioTranscoder, TempArtifactStore};
use crate::client::RefinementStrategy;
use crate::errors::{DubbingError, DubbingResult, ErrorKind};
use crate::resilience::FallbackExt;
use crate::services::audio::TranscriptionFormat;
use crate::types::{
    resolve_language, AudioFormat, AudioUpload, ResolvedLanguage, SpeechSynthesisRequest,
    StyleDirective, Transcript, TranscriptionOutcome, TranslateRequest, TranslationResult,
    SynthesizedSpeech,
};

/// Sequences the remote calls behind each caller operation.
///
/// One pipeline may serve many concurrent requests; per-request state lives
/// on the stack of each call.
#[derive(Clone)]
pub struct DubbingPipeline {
    adapter: RemoteCallAdapter,
    store: TempArtifactStore,
    transcoder: Arc<dyn AudioTranscoder>,
    max_upload_size: usize,
    refinement: RefinementStrategy,
    default_voice: String,
}

impl DubbingPipeline {
    pub fn new(
        adapter: RemoteCallAdapter,
        store: TempArtifactStore,
        transcoder: Arc<dyn AudioTranscoder>,
    ) -> Self {
        Self {
            adapter,
            store,
            transcoder,
            max_upload_size: crate::client::DEFAULT_MAX_UPLOAD_SIZE,
            refinement: RefinementStrategy::default(),
            default_voice: crate::client::DEFAULT_VOICE.to_string(),
        }
    }

    pub fn with_max_upload_size(mut self, bytes: usize) -> Self {
        self.max_upload_size = bytes;
        self
    }

    pub fn with_refinement(mut self, strategy: RefinementStrategy) -> Self {
        self.refinement = strategy;
        self
    }

    pub fn with_default_voice(mut self, voice: impl Into<String>) -> Self {
        self.default_voice = voice.into();
        self
    }

    pub fn refinement(&self) -> RefinementStrategy {
        self.refinement
    }

    /// Transcribe-and-refine.
    ///
    /// 1. validate the upload and pick a flow from `language`
    /// 2. transcode to the canonical format (temp files are gone afterwards)
    /// 3. initial transcription
    /// 4. prompt optimization or transcript cleanup, falling back on failure
    /// 5. final transcription with the optimized prompt, if applicable
    #[instrument(skip(self, upload), fields(filename = ?upload.filename, bytes = upload.data.len()))]
    pub async fn transcribe(
        &self,
        upload: AudioUpload,
        language: Option<&str>,
    ) -> DubbingResult<TranscriptionOutcome> {
        let format = upload.validate(self.max_upload_size)?;
        let flow = select_flow(language);
        tracing::info!(flow = flow.name(), format = ?format, "Starting transcription");

        let audio = self.prepare_audio(&upload, format).await?;
        drop(upload);

        let models = self.adapter.models();
        let initial = self
            .adapter
            .transcribe(
                audio.clone(),
                flow.initial_model(models),
                flow.initial_language(),
                None,
                flow.initial_format(),
            )
            .await?;

        let resolved = resolve_flow_language(&flow, &initial);
        tracing::info!(
            language = %resolved.name,
            code = ?resolved.code,
            "Initial transcription complete"
        );

        let transcript = match self.refinement {
            RefinementStrategy::PromptOptimization => {
                let prompt = self
                    .adapter
                    .optimize_prompt(&resolved.name, &initial)
                    .await
                    .or_fallback("prompt_optimization", || fallback_prompt(&resolved.name));

                self.adapter
                    .transcribe(
                        audio,
                        &models.refined_transcription,
                        resolved.code.clone(),
                        Some(prompt),
                        TranscriptionFormat::Json,
                    )
                    .await?
            }
            RefinementStrategy::TranscriptCleanup => self
                .adapter
                .refine_transcript(&resolved.name, &initial)
                .await
                .or_fallback("transcript_cleanup", || initial.clone()),
        };

        if transcript.is_empty() {
            return Err(DubbingError::new(
                ErrorKind::Transcription,
                "Transcription failed: no speech recognised",
            )
            .with_detail("language", resolved.name.as_str()));
        }

        Ok(TranscriptionOutcome::new(transcript, resolved))
    }

    /// Translates text in a single call.
    #[instrument(skip(self, request), fields(source = %request.source_language, target = %request.target_language))]
    pub async fn translate(&self, request: TranslateRequest) -> DubbingResult<TranslationResult> {
        request.validate()?;

        let translated_text = self.adapter.translate(&request).await?;
        tracing::info!(chars = translated_text.len(), "Translation complete");

        Ok(TranslationResult {
            translated_text,
            source_language: request.source_language,
            target_language: request.target_language,
        })
    }

    /// Synthesizes speech in a single call, filling in the default model
    /// and voice.
    #[instrument(skip(self, request), fields(chars = request.text.len()))]
    pub async fn synthesize(&self, request: SpeechSynthesisRequest) -> DubbingResult<SynthesizedSpeech> {
        request.validate()?;

        let model = request
            .model
            .unwrap_or_else(|| self.adapter.models().speech.clone());
        let voice = request.voice.unwrap_or_else(|| self.default_voice.clone());
        let directive = request.instructions.and_then(StyleDirective::new);

        let audio = self
            .adapter
            .synthesize(&request.text, &voice, &model, directive)
            .await?;
        tracing::info!(bytes = audio.len(), model = %model, voice = %voice, "Speech generated");

        Ok(SynthesizedSpeech {
            audio,
            content_type: AudioFormat::CANONICAL.mime_type(),
            model,
            voice,
        })
    }

    /// Writes the upload, transcodes it and returns the canonical bytes.
    /// Both files are removed before this returns, on every path.
    async fn prepare_audio(&self, upload: &AudioUpload, format: AudioFormat) -> DubbingResult<Bytes> {
        let source = self.store.persist(&upload.data, format.extension()).await?;
        let target = self
            .store
            .reserve(self.transcoder.target_format().extension());

        self.transcoder.transcode(source.path(), target.path()).await?;
        let audio = target.read().await?;

        source.release().await;
        target.release().await;
        Ok(audio)
    }
}

impl std::fmt::Debug for DubbingPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DubbingPipeline")
            .field("adapter", &self.adapter)
            .field("store", &self.store)
            .field("max_upload_size", &self.max_upload_size)
            .field("refinement", &self.refinement)
            .field("default_voice", &self.default_voice)
            .finish_non_exhaustive()
    }
}

/// Language carried downstream: the caller's hint for a known-language
/// flow, else whatever detection reported, else the default.
fn resolve_flow_language(flow: &TranscriptionFlow, initial: &Transcript) -> ResolvedLanguage {
    match flow {
        TranscriptionFlow::KnownLanguage { resolved, .. } => resolved.clone(),
        TranscriptionFlow::AutoDetect => match initial.language.as_deref() {
            Some(detected) if !detected.trim().is_empty() => resolve_language(detected),
            _ => {
                tracing::warn!("No language detected, using default");
                ResolvedLanguage::default_language()
            }
        },
    }
}
