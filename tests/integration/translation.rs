//! Translation over the wire

use super::*;
use dubbing_studio::{ErrorKind, TranslateRequest};
use wiremock::matchers::body_partial_json;

#[tokio::test]
async fn test_translate_hello() {
    let server = MockServer::start().await;
    let scratch = TempDir::new().unwrap();

    authed_post("/chat/completions")
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-5.1",
            "reasoning_effort": "none"
        })))
        .respond_with(chat_response("Hola"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, &scratch, RefinementStrategy::PromptOptimization);
    let result = client
        .translate(TranslateRequest::new("Hello", "English", "Spanish"))
        .await
        .unwrap();

    assert_eq!(result.translated_text, "Hola");

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let temperature = body["temperature"].as_f64().unwrap();
    assert!((temperature - 0.3).abs() < 1e-6);
    assert_eq!(body["messages"][1]["content"], "Hello");
}

#[tokio::test]
async fn test_rate_limit_is_translation_error() {
    let server = MockServer::start().await;
    let scratch = TempDir::new().unwrap();

    authed_post("/chat/completions")
        .respond_with(error_response(429, "Rate limit reached").insert_header("retry-after", "3"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, &scratch, RefinementStrategy::PromptOptimization);
    let err = client
        .translate(TranslateRequest::new("Hello", "English", "Spanish"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Translation);
    assert_eq!(err.details()["upstream_status"], 429);
}
