//! Caller requests for the text-only operations.

use serde::{Deserialize, Serialize};

use crate::errors::{DubbingError, DubbingResult};

/// Longest text accepted for translation, in characters.
pub const MAX_TRANSLATION_CHARS: usize = 50_000;

/// Longest language name accepted.
pub const MAX_LANGUAGE_NAME_CHARS: usize = 50;

/// Longest text accepted for synthesis, in characters.
pub const MAX_SPEECH_CHARS: usize = 4_096;

/// Longest style directive accepted, in characters.
pub const MAX_INSTRUCTION_CHARS: usize = 1_000;

/// Voices the speech endpoint offers.
pub const SUPPORTED_VOICES: &[&str] = &[
    "alloy", "ash", "ballad", "coral", "echo", "fable", "nova", "onyx", "sage", "shimmer",
];

/// Translate `text` between two named languages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateRequest {
    /// Text to translate.
    pub text: String,
    /// Source language name, e.g. `"Hebrew"`.
    pub source_language: String,
    /// Target language name, e.g. `"Russian"`.
    pub target_language: String,
}

impl TranslateRequest {
    pub fn new(
        text: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }

    pub fn validate(&self) -> DubbingResult<()> {
        check_text("text", &self.text, MAX_TRANSLATION_CHARS)?;
        check_text("source_language", &self.source_language, MAX_LANGUAGE_NAME_CHARS)?;
        check_text("target_language", &self.target_language, MAX_LANGUAGE_NAME_CHARS)?;
        Ok(())
    }
}

/// Synthesize `text` as speech.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpeechSynthesisRequest {
    /// Text to speak.
    pub text: String,
    /// Voice; the configured default when unset.
    #[serde(default)]
    pub voice: Option<String>,
    /// Model; the configured default when unset.
    #[serde(default)]
    pub model: Option<String>,
    /// Optional style directive.
    #[serde(default)]
    pub instructions: Option<String>,
}

impl SpeechSynthesisRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = Some(voice.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn validate(&self) -> DubbingResult<()> {
        check_text("text", &self.text, MAX_SPEECH_CHARS)?;

        if let Some(instructions) = &self.instructions {
            let len = instructions.chars().count();
            if len > MAX_INSTRUCTION_CHARS {
                return Err(DubbingError::validation(format!(
                    "instructions must be at most {} characters",
                    MAX_INSTRUCTION_CHARS
                ))
                .with_detail("field", "instructions")
                .with_detail("length", len));
            }
        }

        if let Some(voice) = &self.voice {
            if !SUPPORTED_VOICES.contains(&voice.as_str()) {
                return Err(DubbingError::validation(format!("Unsupported voice '{}'", voice))
                    .with_detail("field", "voice")
                    .with_detail("allowed", SUPPORTED_VOICES.to_vec()));
            }
        }

        if matches!(&self.model, Some(model) if model.trim().is_empty()) {
            return Err(DubbingError::validation("model cannot be empty").with_detail("field", "model"));
        }

        Ok(())
    }
}

fn check_text(field: &'static str, value: &str, max: usize) -> DubbingResult<()> {
    if value.trim().is_empty() {
        return Err(
            DubbingError::validation(format!("{} cannot be empty", field)).with_detail("field", field),
        );
    }
    let len = value.chars().count();
    if len > max {
        return Err(DubbingError::validation(format!(
            "{} must be at most {} characters",
            field, max
        ))
        .with_detail("field", field)
        .with_detail("length", len));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn test_translate_request_validation() {
        assert!(TranslateRequest::new("Hello", "English", "Spanish").validate().is_ok());

        let err = TranslateRequest::new("   ", "English", "Spanish")
            .validate()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.details().get("field").and_then(|v| v.as_str()), Some("text"));

        let long_name = "x".repeat(MAX_LANGUAGE_NAME_CHARS + 1);
        assert!(TranslateRequest::new("Hello", long_name, "Spanish").validate().is_err());
    }

    #[test]
    fn test_translate_counts_characters_not_bytes() {
        let text = "ש".repeat(MAX_TRANSLATION_CHARS);
        assert!(TranslateRequest::new(text, "Hebrew", "English").validate().is_ok());
    }

    #[test]
    fn test_speech_request_validation() {
        assert!(SpeechSynthesisRequest::new("Test").voice("nova").validate().is_ok());
        assert!(SpeechSynthesisRequest::new("").validate().is_err());
        assert!(SpeechSynthesisRequest::new("x".repeat(MAX_SPEECH_CHARS + 1))
            .validate()
            .is_err());
        assert!(SpeechSynthesisRequest::new("Test").voice("robot").validate().is_err());
        assert!(SpeechSynthesisRequest::new("Test").model(" ").validate().is_err());
        assert!(SpeechSynthesisRequest::new("Test")
            .instructions("y".repeat(MAX_INSTRUCTION_CHARS + 1))
            .validate()
            .is_err());
    }
}
