//! LLM provider layer for promptgate.
//!
//! Talks directly to each backend's HTTP API through `reqwest`.
//!
//! # Architecture
//!
//! - [`traits::ProviderAdapter`]: single-prompt generation capability
//! - [`registry`]: static specs for the 3 supported providers + id → adapter map
//! - [`gemini`], [`openai`], [`huggingface`]: one adapter per wire protocol
//! - [`error`]: adapter and resolution failures
//! - `http`: the JSON transport the adapters share

pub mod error;
pub mod gemini;
mod http;
pub mod huggingface;
pub mod openai;
pub mod registry;
pub mod traits;

// Re-export main types for convenience
pub use error::{ProviderError, RegistryError};
pub use gemini::GeminiAdapter;
pub use huggingface::HuggingFaceAdapter;
pub use openai::OpenAiAdapter;
pub use registry::{
    find_by_name, ProviderRegistry, ProviderSpec, ResolvedProvider, PROVIDERS,
};
pub use traits::{GenerationParams, ProviderAdapter};
