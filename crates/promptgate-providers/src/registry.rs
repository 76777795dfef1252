//! Provider registry: static specs for the supported backends, plus the
//! runtime map from provider identifier to adapter.
//!
//! Each `ProviderSpec` describes how to reach one backend: credential name,
//! default endpoint and model, and the fixed generation parameters. The
//! `ProviderRegistry` is built once at startup and only read afterwards.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{ProviderError, RegistryError};
use crate::gemini::GeminiAdapter;
use crate::huggingface::HuggingFaceAdapter;
use crate::openai::OpenAiAdapter;
use crate::traits::{GenerationParams, ProviderAdapter};

pub use promptgate_core::config::{ProviderConfig, ProvidersConfig};

// ─────────────────────────────────────────────
// ProviderSpec: static metadata for one provider
// ─────────────────────────────────────────────

/// Which wire protocol an adapter speaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdapterKind {
    Gemini,
    OpenAi,
    HuggingFace,
}

/// Static specification describing one LLM provider.
#[derive(Clone, Debug)]
pub struct ProviderSpec {
    /// Identifier used in configuration (e.g. `"gemini"`).
    pub name: &'static str,
    /// Human-readable name returned to callers. E.g. `"Google Gemini"`.
    pub display_name: &'static str,
    /// Environment variable holding the credential. E.g. `"GEMINI_API_KEY"`.
    pub env_key: &'static str,
    /// Default API base URL.
    pub default_api_base: &'static str,
    /// Model used when the config does not name one.
    pub default_model: &'static str,
    /// Wire protocol.
    pub kind: AdapterKind,
    /// Fixed generation parameters sent on every call.
    pub params: GenerationParams,
}

/// Complete list of supported provider specifications.
pub static PROVIDERS: &[ProviderSpec] = &[
    ProviderSpec {
        name: "gemini",
        display_name: "Google Gemini",
        env_key: "GEMINI_API_KEY",
        default_api_base: "https://generativelanguage.googleapis.com/v1beta",
        default_model: "gemini-2.5-flash",
        kind: AdapterKind::Gemini,
        params: GenerationParams {
            max_tokens: 2048,
            temperature: 0.7,
            top_p: None,
        },
    },
    ProviderSpec {
        name: "openai",
        display_name: "OpenAI",
        env_key: "OPENAI_API_KEY",
        default_api_base: "https://api.openai.com/v1",
        default_model: "gpt-3.5-turbo",
        kind: AdapterKind::OpenAi,
        params: GenerationParams {
            max_tokens: 250,
            temperature: 0.7,
            top_p: None,
        },
    },
    ProviderSpec {
        name: "huggingface",
        display_name: "Hugging Face",
        env_key: "HUGGINGFACE_API_KEY",
        default_api_base: "https://api-inference.huggingface.co",
        default_model: "HuggingFaceH4/zephyr-7b-beta",
        kind: AdapterKind::HuggingFace,
        params: GenerationParams {
            max_tokens: 250,
            temperature: 0.7,
            top_p: Some(0.95),
        },
    },
];

/// Find a provider spec by exact name.
pub fn find_by_name(name: &str) -> Option<&'static ProviderSpec> {
    PROVIDERS.iter().find(|spec| spec.name == name)
}

impl ProviderSpec {
    /// API base from config, falling back to the spec default.
    pub fn api_base(&self, config: &ProviderConfig) -> String {
        config
            .api_base
            .clone()
            .unwrap_or_else(|| self.default_api_base.to_string())
    }

    /// Model from config, falling back to the spec default.
    pub fn model(&self, config: &ProviderConfig) -> String {
        config
            .model
            .clone()
            .unwrap_or_else(|| self.default_model.to_string())
    }
}

// ─────────────────────────────────────────────
// Construction helpers
// ─────────────────────────────────────────────

/// Build the pooled HTTP client shared by every adapter.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::Client(e.to_string()))
}

/// Instantiate the adapter described by `spec`.
pub fn build_adapter(
    spec: &'static ProviderSpec,
    config: &ProviderConfig,
    client: reqwest::Client,
) -> Arc<dyn ProviderAdapter> {
    debug!(
        provider = spec.name,
        api_base = config.api_base.as_deref().unwrap_or(spec.default_api_base),
        "creating provider adapter"
    );

    match spec.kind {
        AdapterKind::Gemini => Arc::new(GeminiAdapter::new(client, config, spec)),
        AdapterKind::OpenAi => Arc::new(OpenAiAdapter::new(client, config, spec)),
        AdapterKind::HuggingFace => Arc::new(HuggingFaceAdapter::new(client, config, spec)),
    }
}

// ─────────────────────────────────────────────
// ProviderRegistry
// ─────────────────────────────────────────────

/// One registry slot. `adapter` is `None` when the credential is missing.
struct RegisteredProvider {
    display_name: String,
    adapter: Option<Arc<dyn ProviderAdapter>>,
}

/// A successfully resolved provider.
#[derive(Clone)]
pub struct ResolvedProvider {
    pub id: String,
    pub display_name: String,
    pub adapter: Arc<dyn ProviderAdapter>,
}

impl std::fmt::Debug for ResolvedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedProvider")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .finish()
    }
}

/// Maps provider identifiers to adapters.
///
/// Owns every adapter. Resolution has no side effects: resolving the same
/// identifier twice yields the same adapter.
pub struct ProviderRegistry {
    providers: HashMap<String, RegisteredProvider>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Build a registry holding every known provider.
    ///
    /// Providers without a credential are still registered, so resolving
    /// them reports `CredentialMissing` rather than `NotConfigured`.
    pub fn from_config(
        config: &ProvidersConfig,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = build_http_client(timeout)?;
        let mut registry = Self::new();

        for spec in PROVIDERS {
            let provider_config = config.get_by_name(spec.name).cloned().unwrap_or_default();
            if provider_config.is_configured() {
                let adapter = build_adapter(spec, &provider_config, client.clone());
                registry.register(spec.name, spec.display_name, adapter);
            } else {
                registry.register_without_credential(spec.name, spec.display_name);
            }
        }

        Ok(registry)
    }

    /// Register an adapter. Overwrites any previous entry with the same id.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        display_name: impl Into<String>,
        adapter: Arc<dyn ProviderAdapter>,
    ) {
        let id = id.into();
        info!(provider = %id, "registered provider");
        self.providers.insert(
            id,
            RegisteredProvider {
                display_name: display_name.into(),
                adapter: Some(adapter),
            },
        );
    }

    /// Register a known provider whose credential is absent.
    pub fn register_without_credential(
        &mut self,
        id: impl Into<String>,
        display_name: impl Into<String>,
    ) {
        let id = id.into();
        debug!(provider = %id, "provider has no credential");
        self.providers.insert(
            id,
            RegisteredProvider {
                display_name: display_name.into(),
                adapter: None,
            },
        );
    }

    /// Resolve an identifier to its adapter.
    pub fn resolve(&self, id: &str) -> Result<ResolvedProvider, RegistryError> {
        let entry = self.providers.get(id).ok_or_else(|| {
            warn!(provider = id, "no adapter registered");
            RegistryError::NotConfigured(id.to_string())
        })?;

        let adapter = entry.adapter.clone().ok_or_else(|| {
            warn!(provider = id, "missing API key");
            RegistryError::CredentialMissing(id.to_string())
        })?;

        Ok(ResolvedProvider {
            id: id.to_string(),
            display_name: entry.display_name.clone(),
            adapter,
        })
    }

    /// Whether `id` resolves to a usable adapter.
    pub fn is_available(&self, id: &str) -> bool {
        self.providers
            .get(id)
            .is_some_and(|p| p.adapter.is_some())
    }

    #[cfg(test)]
    fn provider_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.providers.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedAdapter(&'static str);

    #[async_trait]
    impl ProviderAdapter for FixedAdapter {
        async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
            Ok(self.0.to_string())
        }
        fn display_name(&self) -> &str {
            "Fixed"
        }
    }

    fn configured(key: &str) -> ProviderConfig {
        ProviderConfig {
            api_key: key.to_string(),
            ..Default::default()
        }
    }

    // ── PROVIDERS static array ──

    #[test]
    fn test_all_providers_have_unique_names() {
        let names: Vec<&str> = PROVIDERS.iter().map(|s| s.name).collect();
        let mut unique = names.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(names.len(), unique.len(), "Duplicate provider names found");
    }

    #[test]
    fn test_provider_count() {
        assert_eq!(PROVIDERS.len(), 3);
    }

    #[test]
    fn test_find_by_name() {
        let spec = find_by_name("huggingface").unwrap();
        assert_eq!(spec.display_name, "Hugging Face");
        assert_eq!(spec.env_key, "HUGGINGFACE_API_KEY");
        assert_eq!(spec.params.top_p, Some(0.95));
        assert!(find_by_name("anthropic").is_none());
    }

    #[test]
    fn test_spec_defaults_and_overrides() {
        let spec = find_by_name("openai").unwrap();
        let config = ProviderConfig {
            api_key: "k".into(),
            api_base: Some("http://localhost:9000/v1".into()),
            model: None,
        };
        assert_eq!(spec.api_base(&config), "http://localhost:9000/v1");
        assert_eq!(spec.model(&config), "gpt-3.5-turbo");
    }

    // ── ProviderRegistry ──

    #[test]
    fn test_from_config_registers_every_provider() {
        let mut providers = ProvidersConfig::default();
        providers.openai = configured("sk-test");

        let registry = ProviderRegistry::from_config(&providers, Duration::from_secs(5)).unwrap();
        assert_eq!(registry.provider_ids(), vec!["gemini", "huggingface", "openai"]);
        assert!(registry.is_available("openai"));
        assert!(!registry.is_available("gemini"));
    }

    #[test]
    fn test_resolve_configured_provider() {
        let mut providers = ProvidersConfig::default();
        providers.gemini = configured("AIza-test");

        let registry = ProviderRegistry::from_config(&providers, Duration::from_secs(5)).unwrap();
        let resolved = registry.resolve("gemini").unwrap();
        assert_eq!(resolved.id, "gemini");
        assert_eq!(resolved.display_name, "Google Gemini");
        assert_eq!(resolved.adapter.display_name(), "Google Gemini");
    }

    #[test]
    fn test_resolve_missing_credential() {
        let registry =
            ProviderRegistry::from_config(&ProvidersConfig::default(), Duration::from_secs(5))
                .unwrap();
        let err = registry.resolve("openai").unwrap_err();
        assert_eq!(err, RegistryError::CredentialMissing("openai".into()));
        assert!(!registry.is_available("openai"));
    }

    #[test]
    fn test_resolve_unknown_provider() {
        let registry = ProviderRegistry::new();
        let err = registry.resolve("claude").unwrap_err();
        assert_eq!(err, RegistryError::NotConfigured("claude".into()));
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let mut registry = ProviderRegistry::new();
        registry.register("stub", "Stub Provider", Arc::new(FixedAdapter("same")));

        let first = registry.resolve("stub").unwrap();
        let second = registry.resolve("stub").unwrap();

        assert_eq!(first.display_name, second.display_name);
        assert!(Arc::ptr_eq(&first.adapter, &second.adapter));
        assert_eq!(
            first.adapter.generate("x").await.unwrap(),
            second.adapter.generate("x").await.unwrap()
        );
    }

    #[test]
    fn test_register_overwrites() {
        let mut registry = ProviderRegistry::new();
        registry.register_without_credential("stub", "Stub");
        assert!(!registry.is_available("stub"));

        registry.register("stub", "Stub", Arc::new(FixedAdapter("ok")));
        assert!(registry.is_available("stub"));
        assert_eq!(registry.provider_ids(), vec!["stub"]);
    }
}
