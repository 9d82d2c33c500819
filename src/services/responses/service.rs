use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use super::types::{ResponsesRequest, ResponsesResponse};
use crate::auth::AuthProvider;
use crate::errors::ProviderResult;
use crate::services::send_json;
use crate::resilience::RetryPolicy;
use crate::transport::{HttpRequest, HttpTransport};

#[async_trait]
pub trait ResponsesService: Send + Sync {
    async fn create(&self, request: ResponsesRequest, timeout: Duration) -> ProviderResult<ResponsesResponse>;
}

pub struct ResponsesServiceImpl {
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthProvider>,
    retry: RetryPolicy,
}

impl ResponsesServiceImpl {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        auth: Arc<dyn AuthProvider>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            auth,
            retry,
        }
    }
}

#[async_trait]
impl ResponsesService for ResponsesServiceImpl {
    #[instrument(skip(self, request), fields(model = %request.model, timeout_s = timeout.as_secs()))]
    async fn create(&self, request: ResponsesRequest, timeout: Duration) -> ProviderResult<ResponsesResponse> {
        let mut headers = HashMap::new();
        self.auth.apply_auth(&mut headers);

        let http_request = HttpRequest::post("responses")
            .json(&request)?
            .with_headers(headers)
            .with_timeout(timeout);

        let response = send_json(&self.transport, &self.retry, http_request).await?;
        Ok(response.json()?)
    }
}
