//! Long-running reasoning queries over the Responses API.
//!
//! Auxiliary tooling next to the dubbing pipeline: one-shot queries with a
//! configurable reasoning effort, plus session-backed conversations.

use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::errors::{ProviderError, ProviderResult};
use crate::observability::preview;
use crate::services::chat::ReasoningEffort;
use crate::services::responses::{InputMessage, ResponsesRequest, ResponsesService};
use crate::sessions::{SessionManager, TurnRole};

/// Default reasoning model.
pub const DEFAULT_REASONING_MODEL: &str = "gpt-5.1-codex-max";

/// Per-call deadline for reasoning queries.
pub const DEFAULT_REASONING_TIMEOUT: Duration = Duration::from_secs(300);

/// Longest output returned, in characters.
pub const MAX_OUTPUT_CHARS: usize = 100_000;

const TRUNCATION_MARKER: &str = "\n\n[Output truncated]";

/// Text and token usage of one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasoningOutput {
    pub text: String,
    pub model: String,
    pub reasoning_tokens: u32,
    pub output_tokens: u32,
    /// Whether `text` was cut at [`MAX_OUTPUT_CHARS`].
    pub truncated: bool,
}

/// One exchange inside a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationReply {
    pub session_id: String,
    pub output: ReasoningOutput,
    /// False when the session expired or was evicted before the turns
    /// could be stored.
    pub recorded: bool,
}

/// Options for [`ReasoningClient::query`]. Unset fields use the client's
/// defaults.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub developer_prompt: Option<String>,
    pub effort: Option<ReasoningEffort>,
    pub model: Option<String>,
    pub timeout: Option<Duration>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn developer_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.developer_prompt = Some(prompt.into());
        self
    }

    pub fn effort(mut self, effort: ReasoningEffort) -> Self {
        self.effort = Some(effort);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Client for deep-reasoning queries.
///
/// Retries are handled by the service's policy; see
/// [`RetryConfig::long_running`](crate::resilience::RetryConfig::long_running).
pub struct ReasoningClient {
    service: Arc<dyn ResponsesService>,
    sessions: Arc<SessionManager>,
    model: String,
    default_effort: ReasoningEffort,
    timeout: Duration,
}

impl ReasoningClient {
    pub fn new(service: Arc<dyn ResponsesService>, sessions: Arc<SessionManager>) -> Self {
        Self {
            service,
            sessions,
            model: DEFAULT_REASONING_MODEL.to_string(),
            default_effort: ReasoningEffort::High,
            timeout: DEFAULT_REASONING_TIMEOUT,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_default_effort(mut self, effort: ReasoningEffort) -> Self {
        self.default_effort = effort;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    /// Runs one query.
    #[instrument(skip(self, prompt, options), fields(chars = prompt.len()))]
    pub async fn query(&self, prompt: &str, options: QueryOptions) -> ProviderResult<ReasoningOutput> {
        if prompt.trim().is_empty() {
            return Err(ProviderError::Validation {
                message: "prompt cannot be empty".to_string(),
                param: Some("prompt".to_string()),
            });
        }

        let model = options.model.unwrap_or_else(|| self.model.clone());
        let effort = options.effort.unwrap_or(self.default_effort);
        let timeout = options.timeout.unwrap_or(self.timeout);

        let mut input = Vec::with_capacity(2);
        if let Some(developer) = options.developer_prompt.filter(|p| !p.trim().is_empty()) {
            input.push(InputMessage::developer(developer));
        }
        input.push(InputMessage::user(prompt));

        let request = ResponsesRequest::new(model.clone(), input).with_effort(effort);
        let response = self.service.create(request, timeout).await?;

        let (text, truncated) = truncate_output(response.text());
        let usage = response.usage.unwrap_or_default();

        tracing::info!(
            model = %model,
            effort = effort.as_str(),
            reasoning_tokens = usage.reasoning_tokens(),
            output_tokens = usage.output_tokens,
            truncated,
            "Reasoning query complete"
        );

        Ok(ReasoningOutput {
            text,
            model: if response.model.is_empty() { model } else { response.model },
            reasoning_tokens: usage.reasoning_tokens(),
            output_tokens: usage.output_tokens,
            truncated,
        })
    }

    /// Sends `message` with the session's recent history and records both
    /// sides of the exchange. A failed query records nothing.
    #[instrument(skip(self, message, options))]
    pub async fn converse(
        &self,
        session_id: Option<&str>,
        message: &str,
        options: QueryOptions,
    ) -> ProviderResult<ConversationReply> {
        let session_id = self.sessions.get_or_create(session_id).await;
        let prompt = self.sessions.build_prompt(&session_id, message).await;
        tracing::debug!(session = %session_id, prompt = %preview(&prompt, 100), "Continuing conversation");

        let output = self.query(&prompt, options).await?;

        let recorded = self
            .sessions
            .record_turn(&session_id, TurnRole::User, message)
            .await
            && self
                .sessions
                .record_turn(&session_id, TurnRole::Assistant, output.text.clone())
                .await;
        if !recorded {
            tracing::warn!(session = %session_id, "Session gone before the exchange was recorded");
        }

        Ok(ConversationReply {
            session_id,
            output,
            recorded,
        })
    }
}

impl std::fmt::Debug for ReasoningClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReasoningClient")
            .field("model", &self.model)
            .field("default_effort", &self.default_effort)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

fn truncate_output(text: String) -> (String, bool) {
    match text.char_indices().nth(MAX_OUTPUT_CHARS) {
        Some((idx, _)) => {
            let mut cut = text[..idx].to_string();
            cut.push_str(TRUNCATION_MARKER);
            (cut, true)
        }
        None => (text, false),
    }
}
