//! JSON-over-HTTP transport shared by the adapters.
//!
//! An adapter builds its request (URL, auth, body); [`send_json`] sends it,
//! maps a non-success status to [`ProviderError::Api`] using the backend's
//! own message, and decodes the success body.

use serde::de::DeserializeOwned;
use tracing::error;

use crate::error::ProviderError;

/// Where a backend puts its error message, and what to say when it doesn't.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ErrorShape {
    /// JSON pointer to the message string, e.g. `/error/message`.
    pub pointer: &'static str,
    pub fallback: &'static str,
}

pub(crate) async fn send_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    provider: &str,
    shape: ErrorShape,
) -> Result<T, ProviderError> {
    let response = request.send().await.map_err(|e| {
        error!(provider, error = %e, "HTTP request failed");
        ProviderError::from(e)
    })?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        error!(provider, status = %status, body = %text, "API error");
        return Err(ProviderError::from_error_body(
            status.as_u16(),
            &text,
            shape.pointer,
            shape.fallback,
        ));
    }

    response
        .json()
        .await
        .map_err(|e| ProviderError::InvalidResponse {
            provider: provider.to_string(),
            reason: e.to_string(),
        })
}
