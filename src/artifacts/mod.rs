//! Short-lived audio files on local disk.
//!
//! [`TempArtifact`] removes its file when dropped, so every early return
//! through `?` cleans up without extra code at the call site.

mod temp;
mod transcoder;

pub use temp::{TempArtifact, TempArtifactStore};
pub use transcoder::{AudioTranscoder, FfmpegTranscoder};
