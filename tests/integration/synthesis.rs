//! Speech synthesis over the wire

use super::*;
use dubbing_studio::{ErrorKind, SpeechSynthesisRequest, VoicePreset};
use wiremock::matchers::body_partial_json;

const AUDIO: &[u8] = &[0xFF, 0xF3, 0x44, 0xC4, 0x00, 0x00];

#[tokio::test]
async fn test_directive_dropped_for_plain_model() {
    let server = MockServer::start().await;
    let scratch = TempDir::new().unwrap();

    authed_post("/audio/speech")
        .and(body_partial_json(serde_json::json!({
            "model": "tts-1",
            "input": "Test",
            "voice": "onyx"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(AUDIO)
                .insert_header("content-type", "audio/mpeg"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, &scratch, RefinementStrategy::PromptOptimization);
    let speech = client
        .synthesize(
            SpeechSynthesisRequest::new("Test")
                .model("tts-1")
                .instructions("Speak cheerfully"),
        )
        .await
        .unwrap();

    assert_eq!(speech.audio.as_ref(), AUDIO);

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body.get("instructions").is_none());
}

#[tokio::test]
async fn test_preset_forwarded_to_capable_model() {
    let server = MockServer::start().await;
    let scratch = TempDir::new().unwrap();

    authed_post("/audio/speech")
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-4o-mini-tts",
            "instructions": VoicePreset::Professional.directive()
        })))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(AUDIO))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, &scratch, RefinementStrategy::PromptOptimization);
    let speech = client
        .synthesize(
            SpeechSynthesisRequest::new("Quarterly results are in.")
                .instructions(VoicePreset::Professional.directive()),
        )
        .await
        .unwrap();

    assert_eq!(speech.content_type, "audio/mpeg");
}

#[tokio::test]
async fn test_unknown_voice_rejected_locally() {
    let server = MockServer::start().await;
    let scratch = TempDir::new().unwrap();

    let client = client_for(&server, &scratch, RefinementStrategy::PromptOptimization);
    let err = client
        .synthesize(SpeechSynthesisRequest::new("Test").voice("robot"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_server_error_is_tts_error() {
    let server = MockServer::start().await;
    let scratch = TempDir::new().unwrap();

    authed_post("/audio/speech")
        .respond_with(error_response(503, "Service unavailable"))
        .mount(&server)
        .await;

    let client = client_for(&server, &scratch, RefinementStrategy::PromptOptimization);
    let err = client
        .synthesize(SpeechSynthesisRequest::new("Test"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Synthesis);
    assert_eq!(err.kind().tag(), "TTS_ERROR");
}
