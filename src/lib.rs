//! Audio dubbing over the OpenAI speech and text endpoints.
//!
//! Three caller operations:
//!
//! - **transcribe**: validate and transcode an upload, transcribe it,
//!   sharpen the result with a contextual prompt (or a cleanup pass), and
//!   return the text with a human-readable language name
//! - **translate**: one text-generation call between two named languages
//! - **synthesize**: one speech call, with optional style directive
//!
//! A [`ReasoningClient`] with in-memory [`SessionManager`] sessions rides
//! along for long-running reasoning queries.

pub mod artifacts;
pub mod auth;
pub mod client;
pub mod errors;
pub mod observability;
pub mod pipeline;
pub mod reasoning;
pub mod resilience;
pub mod services;
pub mod sessions;
pub mod transport;
pub mod types;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
#[cfg(test)]
mod fixtures;

pub use client::{DubbingClient, DubbingClientBuilder, DubbingConfig, HealthStatus};
pub use errors::{DubbingError, DubbingResult, ErrorKind, ErrorResponse, ProviderError, ProviderResult};
pub use pipeline::{DubbingPipeline, RefinementStrategy, VoicePreset};
pub use reasoning::{QueryOptions, ReasoningClient, ReasoningOutput};
pub use sessions::SessionManager;
pub use types::{
    AudioFormat, AudioUpload, SpeechSynthesisRequest, SynthesizedSpeech, TranscriptionOutcome,
    TranslateRequest, TranslationResult,
};

pub mod prelude {
    pub use crate::client::{DubbingClient, DubbingClientBuilder, DubbingConfig};
    pub use crate::errors::{DubbingError, DubbingResult, ErrorKind};
    pub use crate::pipeline::VoicePreset;
    pub use crate::types::{AudioUpload, SpeechSynthesisRequest, TranslateRequest};
}
