//! Caller-facing error classification.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::ProviderError;

/// Result type alias for pipeline operations.
pub type DubbingResult<T> = Result<T, DubbingError>;

/// Structured diagnostic detail attached to every [`DubbingError`].
pub type ErrorDetails = Map<String, Value>;

/// The five failure classes a caller can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or disallowed input.
    Validation,
    /// Local transcoding or file handling failed.
    AudioProcessing,
    /// A primary transcription call failed.
    Transcription,
    /// The translation call failed.
    Translation,
    /// The speech synthesis call failed.
    Synthesis,
}

impl ErrorKind {
    /// Classification tag reported to callers.
    pub fn tag(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "FILE_VALIDATION_ERROR",
            ErrorKind::AudioProcessing => "AUDIO_PROCESSING_ERROR",
            ErrorKind::Transcription => "TRANSCRIPTION_ERROR",
            ErrorKind::Translation => "TRANSLATION_ERROR",
            ErrorKind::Synthesis => "TTS_ERROR",
        }
    }

    /// HTTP status an outer boundary should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            _ => 500,
        }
    }
}

/// Error surfaced by the dubbing pipeline.
///
/// Every variant carries a human-readable message and a details map. For
/// upstream failures the details hold the provider's message under `error`
/// together with the request parameters that were sent (model, language,
/// voice). Credentials are never recorded.
#[derive(Debug, Clone, Error)]
pub enum DubbingError {
    /// Input rejected before any I/O.
    #[error("{message}")]
    Validation {
        /// Error message.
        message: String,
        /// Structured detail.
        details: ErrorDetails,
    },

    /// Local processing failed.
    #[error("{message}")]
    AudioProcessing {
        /// Error message.
        message: String,
        /// Structured detail.
        details: ErrorDetails,
    },

    /// Transcription failed.
    #[error("{message}")]
    Transcription {
        /// Error message.
        message: String,
        /// Structured detail.
        details: ErrorDetails,
    },

    /// Translation failed.
    #[error("{message}")]
    Translation {
        /// Error message.
        message: String,
        /// Structured detail.
        details: ErrorDetails,
    },

    /// Speech synthesis failed.
    #[error("{message}")]
    Synthesis {
        /// Error message.
        message: String,
        /// Structured detail.
        details: ErrorDetails,
    },
}

impl DubbingError {
    /// Creates an error of the given kind with no details.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let details = ErrorDetails::new();
        match kind {
            ErrorKind::Validation => DubbingError::Validation { message, details },
            ErrorKind::AudioProcessing => DubbingError::AudioProcessing { message, details },
            ErrorKind::Transcription => DubbingError::Transcription { message, details },
            ErrorKind::Translation => DubbingError::Translation { message, details },
            ErrorKind::Synthesis => DubbingError::Synthesis { message, details },
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Creates a local-processing error.
    pub fn audio_processing(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AudioProcessing, message)
    }

    /// Wraps an upstream failure, keeping its message under `error`.
    pub fn upstream(kind: ErrorKind, err: &ProviderError) -> Self {
        let prefix = match kind {
            ErrorKind::Validation => "Invalid request",
            ErrorKind::AudioProcessing => "Audio conversion failed",
            ErrorKind::Transcription => "Transcription failed",
            ErrorKind::Translation => "Translation failed",
            ErrorKind::Synthesis => "TTS generation failed",
        };
        let mut error = Self::new(kind, format!("{}: {}", prefix, err));
        error.details_mut().insert("error".to_string(), Value::String(err.to_string()));
        if let Some(status) = err.status_code() {
            error
                .details_mut()
                .insert("upstream_status".to_string(), Value::from(status));
        }
        error
    }

    /// Attaches one structured detail entry.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details_mut().insert(key.into(), value.into());
        self
    }

    /// Returns the error classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DubbingError::Validation { .. } => ErrorKind::Validation,
            DubbingError::AudioProcessing { .. } => ErrorKind::AudioProcessing,
            DubbingError::Transcription { .. } => ErrorKind::Transcription,
            DubbingError::Translation { .. } => ErrorKind::Translation,
            DubbingError::Synthesis { .. } => ErrorKind::Synthesis,
        }
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        match self {
            DubbingError::Validation { message, .. }
            | DubbingError::AudioProcessing { message, .. }
            | DubbingError::Transcription { message, .. }
            | DubbingError::Translation { message, .. }
            | DubbingError::Synthesis { message, .. } => message,
        }
    }

    /// Returns the structured details.
    pub fn details(&self) -> &ErrorDetails {
        match self {
            DubbingError::Validation { details, .. }
            | DubbingError::AudioProcessing { details, .. }
            | DubbingError::Transcription { details, .. }
            | DubbingError::Translation { details, .. }
            | DubbingError::Synthesis { details, .. } => details,
        }
    }

    fn details_mut(&mut self) -> &mut ErrorDetails {
        match self {
            DubbingError::Validation { details, .. }
            | DubbingError::AudioProcessing { details, .. }
            | DubbingError::Transcription { details, .. }
            | DubbingError::Translation { details, .. }
            | DubbingError::Synthesis { details, .. } => details,
        }
    }

    /// Converts into the structured response body an outer boundary returns.
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            detail: self.message().to_string(),
            error_code: self.kind().tag().to_string(),
            errors: if self.details().is_empty() {
                None
            } else {
                Some(self.details().clone())
            },
        }
    }
}

/// Serialisable error body: message plus classification tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub detail: String,
    /// Classification tag, e.g. `TRANSCRIPTION_ERROR`.
    pub error_code: String,
    /// Structured details, when any were recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ErrorDetails>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(ErrorKind::Validation, "FILE_VALIDATION_ERROR", 400)]
    #[test_case(ErrorKind::AudioProcessing, "AUDIO_PROCESSING_ERROR", 500)]
    #[test_case(ErrorKind::Transcription, "TRANSCRIPTION_ERROR", 500)]
    #[test_case(ErrorKind::Translation, "TRANSLATION_ERROR", 500)]
    #[test_case(ErrorKind::Synthesis, "TTS_ERROR", 500)]
    fn test_kind_tags(kind: ErrorKind, tag: &str, status: u16) {
        assert_eq!(kind.tag(), tag);
        assert_eq!(kind.status_code(), status);
        assert_eq!(DubbingError::new(kind, "boom").kind(), kind);
    }

    #[test]
    fn test_upstream_error_keeps_provider_message() {
        let provider = ProviderError::Authentication {
            message: "Incorrect API key provided".to_string(),
        };

        let err = DubbingError::upstream(ErrorKind::Transcription, &provider)
            .with_detail("model", "whisper-1");

        assert_eq!(err.kind(), ErrorKind::Transcription);
        assert!(err.message().starts_with("Transcription failed:"));
        assert_eq!(
            err.details().get("error").and_then(Value::as_str),
            Some("Authentication failed: Incorrect API key provided")
        );
        assert_eq!(err.details().get("model").and_then(Value::as_str), Some("whisper-1"));
        assert_eq!(err.details().get("upstream_status").and_then(Value::as_u64), Some(401));
    }

    #[test]
    fn test_response_body_shape() {
        let err = DubbingError::validation("No filename provided");
        let body = serde_json::to_value(err.to_response()).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "detail": "No filename provided",
                "error_code": "FILE_VALIDATION_ERROR"
            })
        );
    }
}
