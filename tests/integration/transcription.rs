//! Transcribe-and-refine over the wire

use super::*;
use dubbing_studio::{AudioUpload, ErrorKind};
use serde_json::json;
use wiremock::matchers::body_string_contains;

fn upload() -> AudioUpload {
    AudioUpload::new("greeting.mp3", b"ID3 fake audio frames".to_vec())
}

#[tokio::test]
async fn test_auto_detect_then_refine() {
    let server = MockServer::start().await;
    let scratch = TempDir::new().unwrap();

    authed_post("/audio/transcriptions")
        .and(body_string_contains("whisper-1"))
        .and(body_string_contains("verbose_json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "task": "transcribe",
            "language": "english",
            "duration": 2.0,
            "text": "hello there"
        })))
        .expect(1)
        .mount(&server)
        .await;

    authed_post("/chat/completions")
        .and(body_string_contains("gpt-5-mini"))
        .respond_with(chat_response(r#"{"prompt": "Context: a friendly greeting."}"#))
        .expect(1)
        .mount(&server)
        .await;

    authed_post("/audio/transcriptions")
        .and(body_string_contains("gpt-4o-transcribe"))
        .and(body_string_contains("Context: a friendly greeting."))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "Hello there."})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, &scratch, RefinementStrategy::PromptOptimization);
    let outcome = client.transcribe(upload(), None).await.unwrap();

    assert_eq!(outcome.text, "Hello there.");
    assert_eq!(outcome.language, "English");
    assert_eq!(files_in(scratch.path()), 0);
}

#[tokio::test]
async fn test_known_language_skips_detection() {
    let server = MockServer::start().await;
    let scratch = TempDir::new().unwrap();

    authed_post("/audio/transcriptions")
        .and(body_string_contains("whisper-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "unused"})))
        .expect(0)
        .mount(&server)
        .await;

    authed_post("/audio/transcriptions")
        .and(body_string_contains("gpt-4o-mini-transcribe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "hola"})))
        .expect(1)
        .mount(&server)
        .await;

    authed_post("/chat/completions")
        .respond_with(chat_response(r#"{"prompt": "Contexto: saludo."}"#))
        .mount(&server)
        .await;

    authed_post("/audio/transcriptions")
        .and(body_string_contains("gpt-4o-transcribe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "Hola."})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, &scratch, RefinementStrategy::PromptOptimization);
    let outcome = client.transcribe(upload(), Some("es")).await.unwrap();

    assert_eq!(outcome.language, "Spanish");
    assert_eq!(outcome.text, "Hola.");
}

#[tokio::test]
async fn test_cleanup_failure_keeps_original() {
    let server = MockServer::start().await;
    let scratch = TempDir::new().unwrap();

    authed_post("/audio/transcriptions")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "language": "english",
            "text": "the original words"
        })))
        .expect(1)
        .mount(&server)
        .await;

    authed_post("/chat/completions")
        .respond_with(error_response(500, "The server had an error"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, &scratch, RefinementStrategy::TranscriptCleanup);
    let outcome = client.transcribe(upload(), None).await.unwrap();

    assert_eq!(outcome.text, "the original words");
}

#[tokio::test]
async fn test_upstream_rejection_is_transcription_error() {
    let server = MockServer::start().await;
    let scratch = TempDir::new().unwrap();

    authed_post("/audio/transcriptions")
        .respond_with(error_response(400, "Invalid file format."))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, &scratch, RefinementStrategy::PromptOptimization);
    let err = client.transcribe(upload(), None).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transcription);
    let response = err.to_response();
    assert_eq!(response.error_code, "TRANSCRIPTION_ERROR");
    assert!(response.detail.contains("Invalid file format."));
    assert!(!serde_json::to_string(&response).unwrap().contains(API_KEY));
    assert_eq!(files_in(scratch.path()), 0);
}

#[tokio::test]
async fn test_wrong_extension_never_reaches_server() {
    let server = MockServer::start().await;
    let scratch = TempDir::new().unwrap();

    let client = client_for(&server, &scratch, RefinementStrategy::PromptOptimization);
    let err = client
        .transcribe(AudioUpload::new("clip.flac", b"fLaC".to_vec()), None)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.kind().status_code(), 400);
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}
