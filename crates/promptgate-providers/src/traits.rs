//! Provider adapter trait: the single-prompt generation capability.
//!
//! Every LLM backend (Gemini, OpenAI, Hugging Face, …) implements this trait.
//! Adapters hold no per-request state, so one instance serves concurrent
//! requests.

use async_trait::async_trait;

use crate::error::ProviderError;

/// Fixed generation parameters an adapter sends with every call.
///
/// These are constants of the adapter, not per-request options.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerationParams {
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
    /// Nucleus sampling cutoff, for backends that accept it.
    pub top_p: Option<f64>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 250,
            temperature: 0.7,
            top_p: None,
        }
    }
}

/// Trait that all provider adapters implement.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Generate text for a single prompt.
    ///
    /// No retries. Fails with the provider's own error message when it
    /// supplies one; an empty extraction is an error, never `Ok("")`.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Human-readable provider name (e.g. `"Google Gemini"`).
    fn display_name(&self) -> &str;
}
