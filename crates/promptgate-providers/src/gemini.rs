//! Google Gemini adapter (`generateContent`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ProviderError;
use crate::http::{send_json, ErrorShape};
use crate::registry::{ProviderConfig, ProviderSpec};
use crate::traits::ProviderAdapter;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenate the text parts of the first candidate.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

// ─────────────────────────────────────────────
// GeminiAdapter
// ─────────────────────────────────────────────

const GEMINI_ERRORS: ErrorShape = ErrorShape {
    pointer: "/error/message",
    fallback: "Gemini API error",
};

pub struct GeminiAdapter {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    spec: &'static ProviderSpec,
}

impl std::fmt::Debug for GeminiAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiAdapter")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl GeminiAdapter {
    pub fn new(client: reqwest::Client, config: &ProviderConfig, spec: &'static ProviderSpec) -> Self {
        Self {
            client,
            api_base: spec.api_base(config),
            api_key: config.api_key.clone(),
            model: spec.model(config),
            spec,
        }
    }

    /// `{api_base}/models/{model}:generateContent`
    fn generate_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{}/models/{}:generateContent", base, self.model)
    }
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let body = GenerateContentRequest {
            contents: [Content {
                role: "user",
                parts: [Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.spec.params.temperature,
                max_output_tokens: self.spec.params.max_tokens,
            },
        };

        debug!(provider = self.spec.display_name, model = %self.model, "Calling LLM");

        let request = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body);
        let parsed: GenerateContentResponse =
            send_json(request, self.spec.display_name, GEMINI_ERRORS).await?;

        parsed.into_text().ok_or_else(|| ProviderError::EmptyResponse {
            provider: self.spec.display_name.to_string(),
        })
    }

    fn display_name(&self) -> &str {
        self.spec.display_name
    }
}
