use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::errors::{ProviderError, ProviderResult};

/// Transcription models that accept a contextual `prompt`.
pub const PROMPT_CAPABLE_MODELS: &[&str] = &["gpt-4o-transcribe", "gpt-4o-mini-transcribe"];

/// Speech models that accept style `instructions`.
pub const STYLE_CAPABLE_MODELS: &[&str] = &["gpt-4o-mini-tts"];

/// Returns true if `model` accepts a transcription prompt.
pub fn supports_transcription_prompt(model: &str) -> bool {
    PROMPT_CAPABLE_MODELS.contains(&model)
}

/// Returns true if `model` accepts a style directive.
pub fn supports_style_instructions(model: &str) -> bool {
    STYLE_CAPABLE_MODELS.contains(&model)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptionFormat {
    Json,
    Text,
    VerboseJson,
}

impl TranscriptionFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranscriptionFormat::Json => "json",
            TranscriptionFormat::Text => "text",
            TranscriptionFormat::VerboseJson => "verbose_json",
        }
    }
}

/// Output encoding requested from the speech endpoint. The pipeline only
/// ever returns MP3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechFormat {
    #[default]
    Mp3,
}

#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    pub file: Bytes,
    pub filename: String,
    pub content_type: String,
    pub model: String,
    pub language: Option<String>,
    pub prompt: Option<String>,
    pub response_format: Option<TranscriptionFormat>,
}

impl TranscriptionRequest {
    pub fn new(file: Bytes, filename: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            file,
            filename: filename.into(),
            content_type: "audio/mpeg".to_string(),
            model: model.into(),
            language: None,
            prompt: None,
            response_format: None,
        }
    }

    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    pub fn with_prompt(mut self, prompt: Option<String>) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn with_response_format(mut self, format: TranscriptionFormat) -> Self {
        self.response_format = Some(format);
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SpeechRequest {
    pub model: String,
    pub input: String,
    pub voice: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<SpeechFormat>,
}

impl SpeechRequest {
    pub fn new(
        model: impl Into<String>,
        input: impl Into<String>,
        voice: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            input: input.into(),
            voice: voice.into(),
            instructions: None,
            response_format: None,
        }
    }

    pub fn with_instructions(mut self, instructions: Option<String>) -> Self {
        self.instructions = instructions;
        self
    }

    pub fn with_format(mut self, format: SpeechFormat) -> Self {
        self.response_format = Some(format);
        self
    }
}

/// Typed body of a `json` / `verbose_json` transcription.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranscriptionObject {
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f32>,
}

/// The shapes a transcription endpoint may answer with.
///
/// Normalised through [`TranscriptionPayload::into_parts`] so no caller
/// sees which shape arrived.
#[derive(Debug, Clone)]
pub enum TranscriptionPayload {
    /// JSON object with a `text` field.
    Object(TranscriptionObject),
    /// Bare JSON string.
    JsonString(String),
    /// `text` response format.
    PlainText(String),
}

impl TranscriptionPayload {
    /// Classifies a response body.
    pub fn from_body(body: &[u8]) -> ProviderResult<Self> {
        match serde_json::from_slice::<serde_json::Value>(body) {
            Ok(serde_json::Value::String(text)) => Ok(TranscriptionPayload::JsonString(text)),
            Ok(value @ serde_json::Value::Object(_)) => serde_json::from_value(value)
                .map(TranscriptionPayload::Object)
                .map_err(|e| {
                    ProviderError::serialization(format!("unexpected transcription body: {}", e))
                }),
            // `text` format bodies may happen to parse as a JSON scalar
            _ => std::str::from_utf8(body)
                .map(|text| TranscriptionPayload::PlainText(text.to_string()))
                .map_err(|e| ProviderError::serialization(e.to_string())),
        }
    }

    /// Returns `(text, detected_language)`.
    pub fn into_parts(self) -> (String, Option<String>) {
        match self {
            TranscriptionPayload::Object(obj) => (
                obj.text,
                obj.language.filter(|l| !l.trim().is_empty()),
            ),
            TranscriptionPayload::JsonString(text) | TranscriptionPayload::PlainText(text) => {
                (text, None)
            }
        }
    }
}
