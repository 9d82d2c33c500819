use serde::{Deserialize, Serialize};

use crate::services::chat::ReasoningEffort;

#[derive(Debug, Clone, Serialize)]
pub struct ResponsesRequest {
    pub model: String,
    pub input: Vec<InputMessage>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<ReasoningConfig>,
}

impl ResponsesRequest {
    pub fn new(model: impl Into<String>, input: Vec<InputMessage>) -> Self {
        Self {
            model: model.into(),
            input,
            reasoning: None,
        }
    }

    pub fn with_effort(mut self, effort: ReasoningEffort) -> Self {
        self.reasoning = Some(ReasoningConfig { effort });
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InputMessage {
    pub role: String,
    pub content: String,
}

impl InputMessage {
    pub fn developer(content: impl Into<String>) -> Self {
        Self {
            role: "developer".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReasoningConfig {
    pub effort: ReasoningEffort,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponsesResponse {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub model: String,

    #[serde(default)]
    pub output_text: Option<String>,

    #[serde(default)]
    pub output: Vec<OutputItem>,

    #[serde(default)]
    pub usage: Option<ResponsesUsage>,
}

impl ResponsesResponse {
    /// Aggregated output text: `output_text` when present, otherwise the
    /// concatenation of every text block in `output`.
    pub fn text(&self) -> String {
        if let Some(text) = self.output_text.as_ref().filter(|t| !t.is_empty()) {
            return text.clone();
        }

        let mut collected = String::new();
        for item in &self.output {
            if let Some(content) = &item.content {
                for block in content {
                    if let Some(text) = &block.text {
                        collected.push_str(text);
                    }
                }
            } else if let Some(text) = &item.text {
                collected.push_str(text);
            }
        }
        collected
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputItem {
    #[serde(rename = "type", default)]
    pub item_type: String,

    #[serde(default)]
    pub content: Option<Vec<OutputContent>>,

    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputContent {
    #[serde(rename = "type", default)]
    pub content_type: String,

    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ResponsesUsage {
    #[serde(default)]
    pub input_tokens: u32,

    #[serde(default)]
    pub output_tokens: u32,

    #[serde(default)]
    pub output_tokens_details: Option<OutputTokensDetails>,
}

impl ResponsesUsage {
    pub fn reasoning_tokens(&self) -> u32 {
        self.output_tokens_details
            .map(|d| d.reasoning_tokens)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct OutputTokensDetails {
    #[serde(default)]
    pub reasoning_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_prefers_output_text() {
        let response: ResponsesResponse = serde_json::from_value(json!({
            "id": "resp_1",
            "output_text": "direct",
            "output": [{"type": "message", "content": [{"type": "output_text", "text": "nested"}]}]
        }))
        .unwrap();

        assert_eq!(response.text(), "direct");
    }

    #[test]
    fn test_text_collects_output_items() {
        let response: ResponsesResponse = serde_json::from_value(json!({
            "id": "resp_2",
            "output": [
                {"type": "reasoning"},
                {"type": "message", "content": [
                    {"type": "output_text", "text": "first "},
                    {"type": "output_text", "text": "second"}
                ]},
                {"type": "output_text", "text": " tail"}
            ],
            "usage": {"input_tokens": 10, "output_tokens": 40, "output_tokens_details": {"reasoning_tokens": 32}}
        }))
        .unwrap();

        assert_eq!(response.text(), "first second tail");
        assert_eq!(response.usage.unwrap().reasoning_tokens(), 32);
    }
}
