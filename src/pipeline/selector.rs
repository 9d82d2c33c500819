use crate::client::ModelConfig;
use crate::services::audio::TranscriptionFormat;
use crate::types::{resolve_language, ResolvedLanguage};

/// Which initial transcription strategy to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptionFlow {
    /// No language given: detect it with a broad-coverage model.
    AutoDetect,
    /// Language given: skip detection and use the fast model.
    KnownLanguage {
        /// Value the caller supplied.
        requested: String,
        /// Table lookup of `requested`.
        resolved: ResolvedLanguage,
    },
}

impl TranscriptionFlow {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            TranscriptionFlow::AutoDetect => "auto_detect",
            TranscriptionFlow::KnownLanguage { .. } => "known_language",
        }
    }

    /// Model for the first transcription call.
    pub fn initial_model<'a>(&self, models: &'a ModelConfig) -> &'a str {
        match self {
            TranscriptionFlow::AutoDetect => &models.detection_transcription,
            TranscriptionFlow::KnownLanguage { .. } => &models.fast_transcription,
        }
    }

    /// `language` parameter for the first call. Always `None` when detecting;
    /// a known-language hint is always forwarded, lowercased when the table
    /// has no code for it.
    pub fn initial_language(&self) -> Option<String> {
        match self {
            TranscriptionFlow::AutoDetect => None,
            TranscriptionFlow::KnownLanguage {
                requested,
                resolved,
            } => Some(
                resolved
                    .code
                    .clone()
                    .unwrap_or_else(|| requested.trim().to_lowercase()),
            ),
        }
    }

    /// Response format for the first call. Detection needs `verbose_json`,
    /// the only format that reports a language.
    pub fn initial_format(&self) -> TranscriptionFormat {
        match self {
            TranscriptionFlow::AutoDetect => TranscriptionFormat::VerboseJson,
            TranscriptionFlow::KnownLanguage { .. } => TranscriptionFormat::Json,
        }
    }
}

/// Picks the flow from the caller's optional language hint. Blank hints
/// count as absent.
pub fn select_flow(language: Option<&str>) -> TranscriptionFlow {
    match language.map(str::trim).filter(|l| !l.is_empty()) {
        None => TranscriptionFlow::AutoDetect,
        Some(requested) => TranscriptionFlow::KnownLanguage {
            requested: requested.to_string(),
            resolved: resolve_language(requested),
        },
    }
}
