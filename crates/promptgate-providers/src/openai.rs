//! OpenAI chat-completions adapter.
//!
//! Sends the prompt as a single user message to `{api_base}/chat/completions`
//! with Bearer authentication and returns `choices[0].message.content`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ProviderError;
use crate::http::{send_json, ErrorShape};
use crate::registry::{ProviderConfig, ProviderSpec};
use crate::traits::ProviderAdapter;

// ─────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

// ─────────────────────────────────────────────
// OpenAiAdapter
// ─────────────────────────────────────────────

const OPENAI_ERRORS: ErrorShape = ErrorShape {
    pointer: "/error/message",
    fallback: "OpenAI API error",
};

pub struct OpenAiAdapter {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    /// API base URL (e.g. `"https://api.openai.com/v1"`).
    api_base: String,
    /// API key for Bearer authentication.
    api_key: String,
    model: String,
    spec: &'static ProviderSpec,
}

impl std::fmt::Debug for OpenAiAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiAdapter")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiAdapter {
    pub fn new(client: reqwest::Client, config: &ProviderConfig, spec: &'static ProviderSpec) -> Self {
        Self {
            client,
            api_base: spec.api_base(config),
            api_key: config.api_key.clone(),
            model: spec.model(config),
            spec,
        }
    }

    /// Build the full chat completions URL.
    fn completions_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{}/chat/completions", base)
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.spec.params.max_tokens,
            temperature: self.spec.params.temperature,
        };

        debug!(provider = self.spec.display_name, model = %self.model, "Calling LLM");

        let request = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body);
        let parsed: ChatResponse = send_json(request, self.spec.display_name, OPENAI_ERRORS).await?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| ProviderError::EmptyResponse {
                provider: self.spec.display_name.to_string(),
            })
    }

    fn display_name(&self) -> &str {
        self.spec.display_name
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
