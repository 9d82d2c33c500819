use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::auth::AuthProvider;
use crate::errors::ProviderResult;
use crate::resilience::RetryPolicy;
use crate::services::chat::{ChatCompletionRequest, ChatCompletionResponse};
use crate::services::send_json;
use crate::transport::{HttpRequest, HttpTransport};

#[async_trait]
pub trait ChatCompletionService: Send + Sync {
    async fn create(&self, request: ChatCompletionRequest) -> ProviderResult<ChatCompletionResponse>;
}

pub struct ChatCompletionServiceImpl {
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthProvider>,
    retry: RetryPolicy,
    timeout: Duration,
}

impl ChatCompletionServiceImpl {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        auth: Arc<dyn AuthProvider>,
        retry: RetryPolicy,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            auth,
            retry,
            timeout,
        }
    }
}

#[async_trait]
impl ChatCompletionService for ChatCompletionServiceImpl {
    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn create(&self, request: ChatCompletionRequest) -> ProviderResult<ChatCompletionResponse> {
        let mut headers = HashMap::new();
        self.auth.apply_auth(&mut headers);

        let http_request = HttpRequest::post("chat/completions")
            .json(&request)?
            .with_headers(headers)
            .with_timeout(self.timeout);

        let response = send_json(&self.transport, &self.retry, http_request).await?;
        Ok(response.json()?)
    }
}
