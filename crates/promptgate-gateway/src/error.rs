//! Gateway error taxonomy and its HTTP rendering.
//!
//! Every failure leaves the gateway as the uniform
//! `{success: false, error, provider?}` envelope.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use promptgate_core::GenerationResult;
use promptgate_providers::RegistryError;

/// Body of every 429 response.
pub const RATE_LIMITED_MESSAGE: &str = "Too many AI requests. Please try again later.";

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Malformed or out-of-bounds input.
    #[error("{0}")]
    Validation(String),

    #[error("Too many AI requests. Please try again later.")]
    RateLimited,

    /// The configured identifier has no adapter. The id is for logs only.
    #[error("LLM provider is not configured")]
    ProviderNotConfigured { id: String },

    #[error("LLM API key not configured")]
    CredentialMissing { id: String },

    /// The adapter call failed. `message` is already classified.
    #[error("{message}")]
    Backend { provider: String, message: String },

    /// The adapter call exceeded the per-call deadline.
    #[error("Request to {provider} timed out")]
    Timeout { provider: String },

    #[error("Endpoint not found")]
    RouteNotFound,

    #[error("Internal server error")]
    Unhandled,
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            GatewayError::RouteNotFound => StatusCode::NOT_FOUND,
            GatewayError::ProviderNotConfigured { .. }
            | GatewayError::CredentialMissing { .. }
            | GatewayError::Backend { .. }
            | GatewayError::Timeout { .. }
            | GatewayError::Unhandled => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Display name of the adapter involved, if one was ever identified.
    pub fn provider(&self) -> Option<&str> {
        match self {
            GatewayError::Backend { provider, .. } | GatewayError::Timeout { provider } => {
                Some(provider)
            }
            _ => None,
        }
    }

    /// The failure envelope for this error.
    pub fn to_envelope(&self) -> GenerationResult {
        GenerationResult::failure(self.to_string(), self.provider().map(String::from))
    }
}

impl From<RegistryError> for GatewayError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::NotConfigured(id) => GatewayError::ProviderNotConfigured { id },
            RegistryError::CredentialMissing(id) => GatewayError::CredentialMissing { id },
        }
    }
}

impl From<JsonRejection> for GatewayError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                GatewayError::Validation("Request body must be JSON".to_string())
            }
            other => GatewayError::Validation(format!("Invalid JSON body: {}", other.body_text())),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_envelope())).into_response()
    }
}
