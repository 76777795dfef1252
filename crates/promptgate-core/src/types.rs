//! Wire types shared by the gateway and its clients.
//!
//! Every endpoint answers with the same `{success, ...}` envelope. On the
//! wire the envelope is flat JSON; fields that do not apply are omitted.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Requests
// ─────────────────────────────────────────────

/// Body of `POST /api/ai/generate`. The gateway only builds one after
/// the prompt passed validation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

/// Body of `POST /api/ai/breakdown`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BreakdownRequest {
    pub task: String,
}

impl BreakdownRequest {
    pub fn new(task: impl Into<String>) -> Self {
        Self { task: task.into() }
    }
}

// ─────────────────────────────────────────────
// Envelope
// ─────────────────────────────────────────────

/// The uniform response envelope.
///
/// - success: `{success: true, text, provider, durationMs}` (+ `steps` for breakdown)
/// - failure: `{success: false, error, provider?}`, where `provider` is absent only
///   when no adapter was ever identified.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationResult {
    /// Successful generation.
    pub fn success(text: impl Into<String>, provider: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            success: true,
            text: Some(text.into()),
            provider: Some(provider.into()),
            duration_ms: Some(duration_ms),
            ..Default::default()
        }
    }

    /// Failure envelope. `provider` is `None` when resolution itself failed.
    pub fn failure(error: impl Into<String>, provider: Option<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            provider,
            ..Default::default()
        }
    }

    /// Attach a parsed step list (breakdown endpoint).
    pub fn with_steps(mut self, steps: Vec<String>) -> Self {
        self.steps = Some(steps);
        self
    }
}

/// Body of `GET /`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
    pub provider: String,
    pub timestamp: String,
}

impl HealthStatus {
    pub fn ok(provider: impl Into<String>) -> Self {
        Self {
            status: "OK".to_string(),
            message: "promptgate LLM gateway".to_string(),
            provider: provider.into(),
            timestamp: crate::utils::timestamp(),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
