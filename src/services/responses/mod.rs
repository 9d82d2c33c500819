//! The Responses API, used by the long-running reasoning client.

mod service;
mod types;

pub use service::{ResponsesService, ResponsesServiceImpl};
pub use types::{
    InputMessage, OutputContent, OutputItem, OutputTokensDetails, ReasoningConfig,
    ResponsesRequest, ResponsesResponse, ResponsesUsage,
};
