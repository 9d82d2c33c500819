//! Value types flowing through the pipeline.

pub mod audio;
pub mod language;
pub mod requests;
pub mod transcript;

pub use audio::{AudioFormat, AudioUpload, ALLOWED_CONTENT_TYPES};
pub use language::{resolve_language, ResolvedLanguage, DEFAULT_LANGUAGE_CODE, SUPPORTED_LANGUAGES};
pub use requests::{SpeechSynthesisRequest, TranslateRequest, SUPPORTED_VOICES};
pub use transcript::{
    StyleDirective, SynthesizedSpeech, Transcript, TranscriptionOutcome, TranslationResult,
};
