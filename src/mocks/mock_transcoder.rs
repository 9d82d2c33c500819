use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::lock;
use crate::artifacts::AudioTranscoder;
use crate::errors::{DubbingError, DubbingResult};

/// Transcoder that copies the input verbatim, or fails on demand.
#[derive(Debug, Default)]
pub struct MockTranscoder {
    failure: Option<String>,
    writes_partial: bool,
    calls: AtomicUsize,
    inputs: Mutex<Vec<std::path::PathBuf>>,
}

impl MockTranscoder {
    /// Copies input to output.
    pub fn copying() -> Self {
        Self::default()
    }

    /// Always fails with `message` after touching nothing.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Default::default()
        }
    }

    /// Writes a truncated output file, then fails with `message`.
    pub fn failing_after_partial_write(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            writes_partial: true,
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Paths passed as input, in call order.
    pub fn inputs(&self) -> Vec<std::path::PathBuf> {
        lock(&self.inputs).clone()
    }
}

#[async_trait]
impl AudioTranscoder for MockTranscoder {
    async fn transcode(&self, input: &Path, output: &Path) -> DubbingResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.inputs).push(input.to_path_buf());

        if let Some(message) = &self.failure {
            if self.writes_partial {
                let _ = tokio::fs::write(output, b"ID3partial").await;
            }
            return Err(DubbingError::audio_processing(format!(
                "Audio conversion failed: {}",
                message
            ))
            .with_detail("error", message.clone()));
        }

        tokio::fs::copy(input, output).await.map_err(|e| {
            DubbingError::audio_processing(format!("Audio conversion failed: {}", e))
        })?;
        Ok(())
    }
}
