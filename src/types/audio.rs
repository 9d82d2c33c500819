//! Uploaded audio and its format tag.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::{DubbingError, DubbingResult};

/// Content types expected for accepted uploads. A mismatch is logged only.
pub const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "audio/mpeg",
    "audio/ogg",
    "audio/wav",
    "audio/x-m4a",
    "audio/mp4",
];

/// Container formats accepted on upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// MPEG layer III, also the canonical transcription encoding.
    Mp3,
    /// Ogg container.
    Ogg,
    /// RIFF WAVE.
    Wav,
    /// MPEG-4 audio.
    M4a,
}

impl AudioFormat {
    /// All accepted formats.
    pub const ALL: [AudioFormat; 4] = [
        AudioFormat::Mp3,
        AudioFormat::Ogg,
        AudioFormat::Wav,
        AudioFormat::M4a,
    ];

    /// The encoding every upload is transcoded to.
    pub const CANONICAL: AudioFormat = AudioFormat::Mp3;

    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Ogg => "ogg",
            AudioFormat::Wav => "wav",
            AudioFormat::M4a => "m4a",
        }
    }

    /// MIME type sent with uploads of this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::Ogg => "audio/ogg",
            AudioFormat::Wav => "audio/wav",
            AudioFormat::M4a => "audio/mp4",
        }
    }

    /// Detects the format from a file name's extension, case-insensitively.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = Path::new(filename).extension()?.to_str()?.to_ascii_lowercase();
        Self::ALL.into_iter().find(|f| f.extension() == ext)
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// An uploaded audio blob as received from the caller.
#[derive(Debug, Clone)]
pub struct AudioUpload {
    /// Original file name, if the caller sent one.
    pub filename: Option<String>,
    /// Declared content type, if any.
    pub content_type: Option<String>,
    /// Raw bytes.
    pub data: Bytes,
}

impl AudioUpload {
    /// Creates an upload from a file name and bytes.
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            filename: Some(filename.into()),
            content_type: None,
            data: data.into(),
        }
    }

    /// Sets the declared content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Checks name, extension and size, returning the detected format.
    ///
    /// Performs no I/O. A declared content type outside
    /// [`ALLOWED_CONTENT_TYPES`] is only logged when the extension is valid.
    pub fn validate(&self, max_size: usize) -> DubbingResult<AudioFormat> {
        let filename = self
            .filename
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| DubbingError::validation("No filename provided"))?;

        let format = AudioFormat::from_filename(filename).ok_or_else(|| {
            let provided = Path::new(filename)
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| format!(".{}", e.to_ascii_lowercase()))
                .unwrap_or_default();
            DubbingError::validation(format!(
                "Invalid file type. Allowed types: {}",
                allowed_extensions().join(", ")
            ))
            .with_detail("allowed_extensions", allowed_extensions())
            .with_detail("provided", provided)
        })?;

        if self.data.is_empty() {
            return Err(DubbingError::validation("Uploaded file is empty"));
        }

        if self.data.len() > max_size {
            return Err(DubbingError::validation(format!(
                "File too large. Maximum size: {}MB",
                max_size / (1024 * 1024)
            ))
            .with_detail("max_size", max_size)
            .with_detail("actual_size", self.data.len()));
        }

        if let Some(content_type) = &self.content_type {
            if !is_allowed_content_type(content_type) {
                tracing::warn!(
                    content_type = %content_type,
                    format = %format,
                    "Unexpected content type for accepted extension"
                );
            }
        }

        Ok(format)
    }
}

/// Compares the essence only, so `audio/ogg; codecs=opus` is accepted.
fn is_allowed_content_type(content_type: &str) -> bool {
    content_type
        .parse::<mime::Mime>()
        .map(|m| ALLOWED_CONTENT_TYPES.contains(&m.essence_str()))
        .unwrap_or(false)
}

fn allowed_extensions() -> Vec<String> {
    AudioFormat::ALL
        .iter()
        .map(|f| format!(".{}", f.extension()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use test_case::test_case;

    #[test_case("clip.mp3", Some(AudioFormat::Mp3))]
    #[test_case("CLIP.WAV", Some(AudioFormat::Wav))]
    #[test_case("voice.note.m4a", Some(AudioFormat::M4a))]
    #[test_case("podcast.ogg", Some(AudioFormat::Ogg))]
    #[test_case("notes.txt", None)]
    #[test_case("no_extension", None)]
    fn test_format_from_filename(name: &str, expected: Option<AudioFormat>) {
        assert_eq!(AudioFormat::from_filename(name), expected);
    }

    #[test]
    fn test_validate_accepts_mp3() {
        let upload = AudioUpload::new("clip.mp3", vec![1u8; 32]).with_content_type("audio/mpeg");
        assert_eq!(upload.validate(1024).unwrap(), AudioFormat::Mp3);
    }

    #[test]
    fn test_validate_missing_filename() {
        let upload = AudioUpload {
            filename: None,
            content_type: None,
            data: Bytes::from_static(b"abc"),
        };
        let err = upload.validate(1024).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.message(), "No filename provided");
    }

    #[test]
    fn test_validate_wrong_extension_lists_allowed() {
        let err = AudioUpload::new("malware.exe", vec![1u8; 8])
            .validate(1024)
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(
            err.details().get("provided").and_then(|v| v.as_str()),
            Some(".exe")
        );
        assert!(err.message().contains(".mp3, .ogg, .wav, .m4a"));
    }

    #[test]
    fn test_validate_rejects_oversized_and_empty() {
        let too_big = AudioUpload::new("clip.wav", vec![0u8; 2048]);
        let err = too_big.validate(1024).unwrap_err();
        assert_eq!(err.details().get("actual_size").and_then(|v| v.as_u64()), Some(2048));

        let empty = AudioUpload::new("clip.wav", Vec::<u8>::new());
        assert_eq!(empty.validate(1024).unwrap_err().kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_validate_tolerates_odd_content_type() {
        let upload =
            AudioUpload::new("clip.ogg", vec![1u8; 8]).with_content_type("application/octet-stream");
        assert_eq!(upload.validate(1024).unwrap(), AudioFormat::Ogg);
    }

    #[test_case("audio/mpeg", true)]
    #[test_case("audio/ogg; codecs=opus", true)]
    #[test_case("AUDIO/WAV", true)]
    #[test_case("video/mp4", false)]
    #[test_case("not a mime", false)]
    fn test_content_type_essence(content_type: &str, allowed: bool) {
        assert_eq!(is_allowed_content_type(content_type), allowed);
    }
}
