//! Capability construction — turns configured backends into the ordered
//! capability set.
//!
//! Configuration order is preserved: it is the stable enumeration order the
//! synthesizer uses for tie-breaking.

use std::sync::Arc;

use chorus_config::{AppConfig, CapabilityConfig, CapabilityKind};
use chorus_core::provider::{Capability, Provider};
use tracing::debug;

use crate::anthropic::AnthropicProvider;
use crate::openai_compat::OpenAiCompatProvider;

/// Build the capability set from configuration, in configuration order.
pub fn build_capabilities(config: &AppConfig) -> Vec<Capability> {
    config
        .capabilities
        .iter()
        .map(|cap| {
            let provider = build_provider(config, cap);
            debug!(capability = %cap.name, model = %cap.model, "Capability configured");
            Capability::new(cap.name.clone(), provider, cap.model.clone())
                .with_timeout(config.timeout_for(cap))
                .with_confidence(cap.confidence)
        })
        .collect()
}

fn build_provider(config: &AppConfig, cap: &CapabilityConfig) -> Arc<dyn Provider> {
    let api_key = cap
        .api_key
        .clone()
        .or_else(|| config.api_key.clone())
        .unwrap_or_default();

    match cap.kind {
        CapabilityKind::Anthropic => {
            let mut provider = AnthropicProvider::new(api_key);
            if let Some(url) = &cap.api_url {
                provider = provider.with_base_url(url);
            }
            Arc::new(provider)
        }
        CapabilityKind::OpenaiCompat => {
            let base_url = cap
                .api_url
                .clone()
                .unwrap_or_else(|| default_base_url(&cap.name));
            Arc::new(OpenAiCompatProvider::new(&cap.name, base_url, api_key))
        }
    }
}

/// Get the default base URL for well-known provider names.
pub fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "openai" => "https://api.openai.com/v1".into(),
        "anthropic" => "https://api.anthropic.com/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "deepseek" => "https://api.deepseek.com/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "fireworks" => "https://api.fireworks.ai/inference/v1".into(),
        "mistral" => "https://api.mistral.ai/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        "llamacpp" | "llama.cpp" => "http://localhost:8080/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}
