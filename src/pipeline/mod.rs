//! The dubbing pipeline.
//!
//! [`select_flow`] picks the transcription strategy, [`RemoteCallAdapter`]
//! performs and normalises each upstream call, and [`DubbingPipeline`]
//! threads one stage's output into the next. Primary calls fail the whole
//! operation; prompt optimization and transcript cleanup fall back to a
//! default value instead.

mod adapter;
mod orchestrator;
pub mod prompts;
mod selector;


pub use adapter::RemoteCallAdapter;
pub use orchestrator::DubbingPipeline;
pub use prompts::VoicePreset;
pub use selector::{select_flow, TranscriptionFlow};

pub use crate::client::RefinementStrategy;
