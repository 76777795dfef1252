//! Provider and registry errors.

use thiserror::Error;

/// A failed adapter call.
///
/// `Display` yields the provider-supplied message where there is one, so
/// downstream classification sees the backend's own wording.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("{0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The backend answered successfully but without any text.
    #[error("{provider} returned an empty response")]
    EmptyResponse { provider: String },

    /// The success body could not be decoded.
    #[error("Failed to parse {provider} response: {reason}")]
    InvalidResponse { provider: String, reason: String },

    /// The shared HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        ProviderError::Transport(e.to_string())
    }
}

impl ProviderError {
    /// Build an `Api` error from a non-success response body.
    ///
    /// `pointer` is a JSON pointer to the backend's message string
    /// (e.g. `/error/message`). When the body is not JSON or the pointer
    /// does not land on a string, `fallback` is used.
    pub fn from_error_body(status: u16, body: &str, pointer: &str, fallback: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.pointer(pointer).and_then(|m| m.as_str()).map(String::from))
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());
        ProviderError::Api { status, message }
    }

    /// HTTP status of an `Api` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Why the registry could not hand out an adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No adapter is registered under this identifier.
    #[error("Unsupported LLM provider: {0}")]
    NotConfigured(String),

    /// The adapter exists but its credential is absent.
    #[error("Missing API key for provider: {0}")]
    CredentialMissing(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_displays_provider_message() {
        let err = ProviderError::Api {
            status: 429,
            message: "You exceeded your current quota".into(),
        };
        assert_eq!(err.to_string(), "You exceeded your current quota");
    }

    #[test]
    fn test_empty_response_message() {
        let err = ProviderError::EmptyResponse {
            provider: "OpenAI".into(),
        };
        assert_eq!(err.to_string(), "OpenAI returned an empty response");
    }

    #[test]
    fn test_from_error_body_uses_pointer() {
        let body = r#"{"error":{"message":"Incorrect API key provided","code":"invalid_api_key"}}"#;
        let err = ProviderError::from_error_body(401, body, "/error/message", "OpenAI API error");
        assert_eq!(err.to_string(), "Incorrect API key provided");
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn test_from_error_body_falls_back() {
        let err = ProviderError::from_error_body(502, "<html>bad gateway</html>", "/error", "Hugging Face API error");
        assert_eq!(err.to_string(), "Hugging Face API error");

        // Pointer lands on an object, not a string.
        let err = ProviderError::from_error_body(400, r#"{"error":{"code":1}}"#, "/error", "Hugging Face API error");
        assert_eq!(err.to_string(), "Hugging Face API error");
    }

    #[test]
    fn test_registry_error_messages() {
        assert_eq!(
            RegistryError::NotConfigured("claude".into()).to_string(),
            "Unsupported LLM provider: claude"
        );
        assert_eq!(
            RegistryError::CredentialMissing("openai".into()).to_string(),
            "Missing API key for provider: openai"
        );
    }
}
