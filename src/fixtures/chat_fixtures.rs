//! Chat completion fixtures

use serde_json::json;

/// Successful chat completion answering `content`.
pub fn chat_completion_response(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "created": 1677652288,
        "model": "gpt-5.1",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": content
            },
            "finish_reason": "stop"
        }],
        "usage": {
            "prompt_tokens": 9,
            "completion_tokens": 12,
            "total_tokens": 21
        }
    })
}

/// Chat completion whose message content is null.
pub fn chat_completion_empty() -> serde_json::Value {
    json!({
        "id": "chatcmpl-124",
        "object": "chat.completion",
        "created": 1677652288,
        "model": "gpt-5-mini",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": null
            },
            "finish_reason": "length"
        }]
    })
}

/// Prompt optimizer answer in its JSON envelope.
pub fn optimized_prompt_response(prompt: &str) -> serde_json::Value {
    chat_completion_response(&json!({ "prompt": prompt }).to_string())
}

/// Responses API body with nested output blocks.
pub fn responses_api_response(text: &str) -> serde_json::Value {
    json!({
        "id": "resp_abc",
        "object": "response",
        "model": "gpt-5.1-codex",
        "output": [
            {"type": "reasoning", "summary": []},
            {"type": "message", "role": "assistant", "content": [
                {"type": "output_text", "text": text}
            ]}
        ],
        "usage": {
            "input_tokens": 120,
            "output_tokens": 480,
            "output_tokens_details": {"reasoning_tokens": 400}
        }
    })
}
