//! HTTP client for a running gateway.
//!
//! Wraps the two LLM endpoints and the health check, turning failure
//! envelopes and connection problems into readable errors.

use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use serde::Serialize;

use promptgate_core::breakdown::parse_steps;
use promptgate_core::{BreakdownRequest, GenerationRequest, GenerationResult, HealthStatus};

/// Where the gateway listens by default.
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:3002";

const CANNOT_CONNECT: &str = "Cannot connect to server. Is the gateway running?";

pub struct GatewayClient {
    base_url: String,
    http: reqwest::Client,
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| anyhow!("failed to build HTTP client: {}", e))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /api/ai/generate`. Returns the full success envelope.
    pub async fn generate(&self, prompt: &str) -> Result<GenerationResult> {
        if prompt.is_empty() {
            bail!("Prompt must be a non-empty string");
        }
        let request = GenerationRequest::new(prompt);
        self.post_envelope("/api/ai/generate", &request, "AI generation failed")
            .await
    }

    /// `POST /api/ai/breakdown`, parsed into steps.
    pub async fn breakdown_task(&self, task: &str) -> Result<Vec<String>> {
        if task.is_empty() {
            bail!("Task must be a non-empty string");
        }
        let request = BreakdownRequest::new(task);
        let envelope = self
            .post_envelope("/api/ai/breakdown", &request, "Task breakdown failed")
            .await?;
        Ok(parse_steps(envelope.text.as_deref().unwrap_or_default()))
    }

    /// `GET /`.
    pub async fn health(&self) -> Result<HealthStatus> {
        let response = self
            .http
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .map_err(connect_error)?;

        if !response.status().is_success() {
            bail!("Server error");
        }
        Ok(response.json::<HealthStatus>().await?)
    }

    /// Whether the gateway answers its health check with `status: "OK"`.
    /// Never fails.
    pub async fn test_connection(&self) -> bool {
        matches!(self.health().await, Ok(health) if health.status == "OK")
    }

    async fn post_envelope(
        &self,
        path: &str,
        body: &impl Serialize,
        failure_fallback: &str,
    ) -> Result<GenerationResult> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .map_err(connect_error)?;

        let status = response.status();
        let envelope = response.json::<GenerationResult>().await.ok();

        if !status.is_success() {
            let message = envelope
                .and_then(|e| e.error)
                .unwrap_or_else(|| "Server error".to_string());
            bail!(message);
        }

        match envelope {
            Some(envelope) if envelope.success => Ok(envelope),
            Some(envelope) => bail!(envelope
                .error
                .unwrap_or_else(|| failure_fallback.to_string())),
            None => bail!(failure_fallback.to_string()),
        }
    }
}

fn connect_error(e: reqwest::Error) -> anyhow::Error {
    if e.is_connect() {
        anyhow!(CANNOT_CONNECT)
    } else {
        anyhow!(e)
    }
}
