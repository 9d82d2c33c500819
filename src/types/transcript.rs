//! Immutable results produced by each stage.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::language::ResolvedLanguage;

/// Text recognised from audio plus the language it was reported in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    /// Recognised text.
    pub text: String,
    /// Raw language value reported by the service, if any.
    pub language: Option<String>,
}

impl Transcript {
    /// Creates a transcript.
    pub fn new(text: impl Into<String>, language: Option<String>) -> Self {
        Self {
            text: text.into(),
            language,
        }
    }

    /// Returns a new transcript with different text and the same language.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: self.language.clone(),
        }
    }

    /// Returns true when the text is blank.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Result of transcribe-and-refine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptionOutcome {
    /// Final transcript text.
    pub text: String,
    /// Human-readable language name, never empty.
    pub language: String,
    /// Code forwarded downstream, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
}

impl TranscriptionOutcome {
    pub(crate) fn new(transcript: Transcript, language: ResolvedLanguage) -> Self {
        Self {
            text: transcript.text,
            language: language.name,
            language_code: language.code,
        }
    }
}

/// A translated text with its language tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    /// Translated text.
    pub translated_text: String,
    /// Source language name.
    pub source_language: String,
    /// Target language name.
    pub target_language: String,
}

/// Audio bytes returned by synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedSpeech {
    /// Encoded audio.
    pub audio: Bytes,
    /// MIME type of `audio`.
    pub content_type: &'static str,
    /// Model that produced it.
    pub model: String,
    /// Voice used.
    pub voice: String,
}

impl SynthesizedSpeech {
    /// Length of the audio in bytes.
    pub fn len(&self) -> usize {
        self.audio.len()
    }

    /// Returns true when no audio was produced.
    pub fn is_empty(&self) -> bool {
        self.audio.is_empty()
    }
}

/// Free-text instruction shaping the tone of synthesized speech.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleDirective(String);

impl StyleDirective {
    /// Wraps a directive, returning `None` when blank.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Self(text))
        }
    }

    /// The directive text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the directive.
    pub fn into_inner(self) -> String {
        self.0
    }
}
