//! Thin clients for the upstream endpoints the pipeline calls.

pub mod audio;
pub mod chat;
pub mod responses;

use std::sync::Arc;

use crate::errors::{ErrorMapper, ProviderResult};
use crate::resilience::RetryPolicy;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, MultipartRequest};

/// Sends a JSON request under `retry` and maps non-2xx responses.
pub(crate) async fn send_json(
    transport: &Arc<dyn HttpTransport>,
    retry: &RetryPolicy,
    request: HttpRequest,
) -> ProviderResult<HttpResponse> {
    retry
        .execute(|| {
            let transport = Arc::clone(transport);
            let req = request.clone();
            async move { check_status(transport.send(req).await?) }
        })
        .await
}

/// Sends a multipart upload under `retry` and maps non-2xx responses.
pub(crate) async fn send_multipart(
    transport: &Arc<dyn HttpTransport>,
    retry: &RetryPolicy,
    request: MultipartRequest,
) -> ProviderResult<HttpResponse> {
    retry
        .execute(|| {
            let transport = Arc::clone(transport);
            let req = request.clone();
            async move { check_status(transport.send_multipart(req).await?) }
        })
        .await
}

fn check_status(response: HttpResponse) -> ProviderResult<HttpResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ErrorMapper::from_response(
            response.status,
            &response.headers,
            &response.body,
        ))
    }
}
