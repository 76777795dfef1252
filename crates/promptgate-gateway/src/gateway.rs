//! Orchestration: resolve the active provider, invoke its adapter under a
//! deadline, and turn the outcome into a [`Generation`] or a classified
//! [`GatewayError`].

use std::time::{Duration, Instant};

use tracing::{error, info, warn};

use promptgate_core::breakdown;
use promptgate_core::utils::truncate_string;
use promptgate_core::GenerationResult;
use promptgate_providers::ProviderRegistry;

use crate::classify::classify;
use crate::error::GatewayError;
use crate::validator;

/// Characters of prompt included in logs.
const PROMPT_PREVIEW_CHARS: usize = 100;

/// A successful adapter call.
#[derive(Clone, Debug, PartialEq)]
pub struct Generation {
    pub text: String,
    /// Display name of the adapter that produced `text`.
    pub provider: String,
    /// Wall-clock time of the adapter call alone.
    pub duration_ms: u64,
}

impl Generation {
    pub fn into_result(self) -> GenerationResult {
        GenerationResult::success(self.text, self.provider, self.duration_ms)
    }
}

/// A successful task decomposition.
#[derive(Clone, Debug, PartialEq)]
pub struct Breakdown {
    pub generation: Generation,
    pub steps: Vec<String>,
}

impl Breakdown {
    pub fn into_result(self) -> GenerationResult {
        self.generation.into_result().with_steps(self.steps)
    }
}

/// The generation pipeline shared by every endpoint.
///
/// Holds the registry and the provider identifier selected at startup.
/// Stateless across requests.
pub struct Gateway {
    registry: ProviderRegistry,
    provider_id: String,
    call_timeout: Duration,
}

impl Gateway {
    pub fn new(
        registry: ProviderRegistry,
        provider_id: impl Into<String>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            provider_id: provider_id.into(),
            call_timeout,
        }
    }

    /// Identifier of the active provider.
    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    /// Generate text for an already-validated prompt.
    pub async fn generate(&self, prompt: &str) -> Result<Generation, GatewayError> {
        let resolved = self.registry.resolve(&self.provider_id).map_err(|e| {
            error!(provider = %self.provider_id, error = %e, "provider resolution failed");
            GatewayError::from(e)
        })?;

        info!(
            provider = %resolved.display_name,
            prompt = %truncate_string(prompt, PROMPT_PREVIEW_CHARS),
            "generating"
        );

        let started = Instant::now();
        let outcome = tokio::time::timeout(self.call_timeout, resolved.adapter.generate(prompt)).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(Ok(text)) => {
                info!(provider = %resolved.display_name, duration_ms, "generation succeeded");
                Ok(Generation {
                    text,
                    provider: resolved.display_name,
                    duration_ms,
                })
            }
            Ok(Err(e)) => {
                error!(
                    provider = %resolved.display_name,
                    duration_ms,
                    error = %e,
                    "generation failed"
                );
                Err(GatewayError::Backend {
                    message: classify(&e.to_string()),
                    provider: resolved.display_name,
                })
            }
            Err(_) => {
                warn!(
                    provider = %resolved.display_name,
                    timeout_secs = self.call_timeout.as_secs(),
                    "generation timed out"
                );
                Err(GatewayError::Timeout {
                    provider: resolved.display_name,
                })
            }
        }
    }

    /// Decompose an already-validated task into steps.
    ///
    /// Builds the decomposition prompt and runs it through [`generate`](Self::generate).
    /// The built prompt is held to the same length cap as a direct prompt.
    pub async fn breakdown(&self, task: &str) -> Result<Breakdown, GatewayError> {
        let prompt = breakdown::build_prompt(task);
        validator::check_prompt_length(&prompt)?;
        let generation = self.generate(&prompt).await?;
        let steps = breakdown::parse_steps(&generation.text);
        if steps.is_empty() {
            warn!(provider = %generation.provider, "model reply contained no usable steps");
        }
        Ok(Breakdown { generation, steps })
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use promptgate_providers::{ProviderAdapter, ProviderError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// What a [`StubAdapter`] does when called.
    #[derive(Clone)]
    pub(crate) enum StubBehavior {
        Reply(String),
        Fail(String),
        Hang,
        Panic,
    }

    /// Counting adapter for gateway and router tests.
    pub(crate) struct StubAdapter {
        pub calls: AtomicUsize,
        pub last_prompt: Mutex<Option<String>>,
        behavior: StubBehavior,
    }

    impl StubAdapter {
        pub fn new(behavior: StubBehavior) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
                behavior,
            })
        }

        pub fn replying(text: &str) -> Arc<Self> {
            Self::new(StubBehavior::Reply(text.to_string()))
        }

        pub fn failing(message: &str) -> Arc<Self> {
            Self::new(StubBehavior::Fail(message.to_string()))
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProviderAdapter for StubAdapter {
        async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            match &self.behavior {
                StubBehavior::Reply(text) => Ok(text.clone()),
                StubBehavior::Fail(message) => Err(ProviderError::Api {
                    status: 500,
                    message: message.clone(),
                }),
                StubBehavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(String::new())
                }
                StubBehavior::Panic => panic!("stub adapter exploded"),
            }
        }

        fn display_name(&self) -> &str {
            "Stub Provider"
        }
    }

    /// A gateway whose active provider `"stub"` is backed by `adapter`.
    pub(crate) fn gateway_with(adapter: Arc<StubAdapter>) -> Gateway {
        let mut registry = ProviderRegistry::new();
        registry.register("stub", "Stub Provider", adapter);
        Gateway::new(registry, "stub", Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_generate_success() {
        let adapter = StubAdapter::replying("Hello!");
        let gateway = gateway_with(adapter.clone());

        let generation = gateway.generate("Say hello").await.unwrap();
        assert_eq!(generation.text, "Hello!");
        assert_eq!(generation.provider, "Stub Provider");
        assert_eq!(adapter.call_count(), 1);
        assert_eq!(adapter.last_prompt.lock().unwrap().as_deref(), Some("Say hello"));
    }

    #[tokio::test]
    async fn test_generate_classifies_quota_error() {
        let gateway = gateway_with(StubAdapter::failing("You exceeded your current quota"));

        let err = gateway.generate("Say hello").await.unwrap_err();
        assert_eq!(err.to_string(), "API quota exceeded. Please try again later.");
        assert_eq!(err.provider(), Some("Stub Provider"));
    }

    #[tokio::test]
    async fn test_generate_passes_unrelated_error_through() {
        let gateway = gateway_with(StubAdapter::failing("Model is overloaded"));

        let err = gateway.generate("Say hello").await.unwrap_err();
        assert_eq!(err.to_string(), "Model is overloaded");
    }

    #[tokio::test]
    async fn test_unknown_provider_never_calls_adapter() {
        let adapter = StubAdapter::replying("unused");
        let mut registry = ProviderRegistry::new();
        registry.register("stub", "Stub Provider", adapter.clone());
        let gateway = Gateway::new(registry, "claude", Duration::from_secs(5));

        let err = gateway.generate("Say hello").await.unwrap_err();
        assert!(matches!(err, GatewayError::ProviderNotConfigured { .. }));
        assert!(err.provider().is_none());
        assert_eq!(adapter.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_credential() {
        let mut registry = ProviderRegistry::new();
        registry.register_without_credential("openai", "OpenAI");
        let gateway = Gateway::new(registry, "openai", Duration::from_secs(5));

        let err = gateway.generate("Say hello").await.unwrap_err();
        assert!(matches!(err, GatewayError::CredentialMissing { .. }));
        assert_eq!(err.to_string(), "LLM API key not configured");
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_times_out() {
        let adapter = StubAdapter::new(StubBehavior::Hang);
        let mut registry = ProviderRegistry::new();
        registry.register("stub", "Stub Provider", adapter);
        let gateway = Gateway::new(registry, "stub", Duration::from_secs(2));

        let err = gateway.generate("Say hello").await.unwrap_err();
        assert_eq!(err.to_string(), "Request to Stub Provider timed out");
    }

    #[tokio::test]
    async fn test_breakdown_builds_prompt_and_parses_steps() {
        let adapter = StubAdapter::replying("1. Do thing\n2) Another thing\nhi\nWrite the report");
        let gateway = gateway_with(adapter.clone());

        let breakdown = gateway.breakdown("Finish the report").await.unwrap();
        assert_eq!(
            breakdown.steps,
            vec!["Do thing", "Another thing", "Write the report"]
        );

        let sent = adapter.last_prompt.lock().unwrap().clone().unwrap();
        assert!(sent.contains("\"Finish the report\""));

        let result = breakdown.into_result();
        assert!(result.success);
        assert_eq!(result.steps.as_ref().map(Vec::len), Some(3));
        assert!(result.text.unwrap().starts_with("1. Do thing"));
    }

    #[tokio::test]
    async fn test_breakdown_rejects_oversized_prompt_before_resolution() {
        let adapter = StubAdapter::replying("1. unused step");
        let mut registry = ProviderRegistry::new();
        registry.register("stub", "Stub Provider", adapter.clone());
        // Unknown provider: a length failure must win over a config failure.
        let gateway = Gateway::new(registry, "claude", Duration::from_secs(5));

        let err = gateway.breakdown(&"x".repeat(5000)).await.unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
        assert_eq!(adapter.call_count(), 0);
    }
}
