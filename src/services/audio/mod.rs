mod service;
mod types;


pub use service::{AudioService, AudioServiceImpl};
pub use types::{
    supports_style_instructions, supports_transcription_prompt, SpeechFormat, SpeechRequest,
    TranscriptionFormat, TranscriptionObject, TranscriptionPayload, TranscriptionRequest,
    PROMPT_CAPABLE_MODELS, STYLE_CAPABLE_MODELS,
};
