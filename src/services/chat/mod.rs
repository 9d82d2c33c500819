mod service;
mod types;

pub use service::{ChatCompletionService, ChatCompletionServiceImpl};
pub use types::{
    ChatCompletionChoice, ChatCompletionRequest, ChatCompletionResponse, ChatMessage,
    ChatMessageRole, ChatUsage, ContentPart, MessageContent, ReasoningEffort, ResponseMessage,
    Verbosity,
};
