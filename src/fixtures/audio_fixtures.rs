//! Audio fixtures

use serde_json::json;

/// `json` transcription body without a language.
pub fn transcription_response(text: &str) -> serde_json::Value {
    json!({ "text": text })
}

/// `verbose_json` transcription body; whisper reports the language by name.
pub fn transcription_response_verbose(text: &str, language: &str) -> serde_json::Value {
    json!({
        "task": "transcribe",
        "language": language,
        "duration": 2.04,
        "text": text,
        "segments": [{
            "id": 0,
            "seek": 0,
            "start": 0.0,
            "end": 2.04,
            "text": text,
            "tokens": [50364, 2425, 11, 341],
            "temperature": 0.0,
            "avg_logprob": -0.21,
            "compression_ratio": 0.9,
            "no_speech_prob": 0.01
        }]
    })
}

/// A few bytes starting with an MP3 frame header.
pub fn speech_audio_bytes() -> Vec<u8> {
    vec![0xFF, 0xF3, 0x44, 0xC4, 0x00, 0x00, 0x00, 0x00]
}

/// Bytes standing in for an uploaded clip.
pub fn sample_upload_bytes() -> Vec<u8> {
    let mut data = b"ID3\x04\x00\x00\x00\x00\x00\x00".to_vec();
    data.extend(speech_audio_bytes());
    data
}
