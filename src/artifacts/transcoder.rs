use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::instrument;

use crate::errors::{DubbingError, DubbingResult};
use crate::types::AudioFormat;

/// Converts an audio file to the canonical encoding.
#[async_trait]
pub trait AudioTranscoder: Send + Sync {
    /// Reads `input` and writes the canonical encoding to `output`.
    async fn transcode(&self, input: &Path, output: &Path) -> DubbingResult<()>;

    /// Encoding produced by [`transcode`](Self::transcode).
    fn target_format(&self) -> AudioFormat {
        AudioFormat::CANONICAL
    }
}

/// Runs the `ffmpeg` binary on the blocking thread pool.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    binary: PathBuf,
}

impl FfmpegTranscoder {
    pub fn new() -> Self {
        Self::with_binary("ffmpeg")
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn command(&self, input: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(["-hide_banner", "-loglevel", "error", "-nostdin", "-y", "-i"])
            .arg(input)
            .args(["-vn", "-codec:a", "libmp3lame", "-q:a", "2", "-f", "mp3"])
            .arg(output);
        cmd
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioTranscoder for FfmpegTranscoder {
    #[instrument(skip(self), fields(input = %input.display()))]
    async fn transcode(&self, input: &Path, output: &Path) -> DubbingResult<()> {
        let mut cmd = self.command(input, output);
        let binary = self.binary.display().to_string();

        let result = tokio::task::spawn_blocking(move || cmd.output())
            .await
            .map_err(|e| {
                DubbingError::audio_processing(format!("Audio conversion failed: {}", e))
                    .with_detail("error", e.to_string())
            })?
            .map_err(|e| {
                DubbingError::audio_processing(format!(
                    "Audio conversion failed: could not run {}: {}",
                    binary, e
                ))
                .with_detail("error", e.to_string())
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            tracing::error!(status = ?result.status.code(), stderr = %stderr, "ffmpeg failed");
            return Err(
                DubbingError::audio_processing(format!("Audio conversion failed: {}", stderr))
                    .with_detail("error", stderr)
                    .with_detail("exit_code", result.status.code()),
            );
        }

        tracing::info!(output = %output.display(), "Converted audio to MP3");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn test_command_arguments() {
        let transcoder = FfmpegTranscoder::new();
        let cmd = transcoder.command(Path::new("/tmp/in.wav"), Path::new("/tmp/out.mp3"));
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(cmd.get_program(), "ffmpeg");
        assert!(args.windows(2).any(|w| w[0] == "-i" && w[1] == "/tmp/in.wav"));
        assert_eq!(args.last().map(String::as_str), Some("/tmp/out.mp3"));
        assert!(args.contains(&"libmp3lame".to_string()));
    }

    #[tokio::test]
    async fn test_missing_binary_is_audio_processing_error() {
        let transcoder = FfmpegTranscoder::with_binary("/nonexistent/ffmpeg-binary");
        let err = transcoder
            .transcode(Path::new("/tmp/in.wav"), Path::new("/tmp/out.mp3"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::AudioProcessing);
    }
}
