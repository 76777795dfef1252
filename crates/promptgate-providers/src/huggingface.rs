//! Hugging Face Inference API adapter.
//!
//! Text-generation models answer with `[{"generated_text": "..."}]` and
//! report failures as `{"error": "..."}`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ProviderError;
use crate::http::{send_json, ErrorShape};
use crate::registry::{ProviderConfig, ProviderSpec};
use crate::traits::ProviderAdapter;

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Serialize)]
struct InferenceParameters {
    max_new_tokens: u32,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    /// Only the continuation, not the echoed prompt.
    return_full_text: bool,
}

#[derive(Deserialize)]
struct GeneratedText {
    #[serde(default)]
    generated_text: Option<String>,
}

const HF_ERRORS: ErrorShape = ErrorShape {
    pointer: "/error",
    fallback: "Hugging Face API error",
};

pub struct HuggingFaceAdapter {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    spec: &'static ProviderSpec,
}

impl std::fmt::Debug for HuggingFaceAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HuggingFaceAdapter")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl HuggingFaceAdapter {
    pub fn new(client: reqwest::Client, config: &ProviderConfig, spec: &'static ProviderSpec) -> Self {
        Self {
            client,
            api_base: spec.api_base(config),
            api_key: config.api_key.clone(),
            model: spec.model(config),
            spec,
        }
    }

    fn model_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{}/models/{}", base, self.model)
    }
}

#[async_trait]
impl ProviderAdapter for HuggingFaceAdapter {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let params = &self.spec.params;
        let body = InferenceRequest {
            inputs: prompt,
            parameters: InferenceParameters {
                max_new_tokens: params.max_tokens,
                temperature: params.temperature,
                top_p: params.top_p,
                return_full_text: false,
            },
        };

        debug!(provider = self.spec.display_name, model = %self.model, "Calling LLM");

        let request = self
            .client
            .post(self.model_url())
            .bearer_auth(&self.api_key)
            .json(&body);
        let parsed: Vec<GeneratedText> =
            send_json(request, self.spec.display_name, HF_ERRORS).await?;

        parsed
            .into_iter()
            .next()
            .and_then(|g| g.generated_text)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| ProviderError::EmptyResponse {
                provider: self.spec.display_name.to_string(),
            })
    }

    fn display_name(&self) -> &str {
        self.spec.display_name
    }
}
