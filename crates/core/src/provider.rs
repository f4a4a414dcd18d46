//! Provider trait — the abstraction over text generation backends.
//!
//! A Provider takes a prompt plus prior turns and returns generated text and
//! a token count. The core treats it as an opaque capability.
//!
//! Implementations: OpenAI-compatible endpoints, Anthropic.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::error::ProviderError;
use crate::query::ContextTurn;

/// One generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The model to use (e.g., "gpt-4o-mini", "claude-3-5-haiku-latest")
    pub model: String,

    /// The prompt text, already augmented with background knowledge
    pub prompt: String,

    /// Prior turns, oldest first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<ContextTurn>,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_temperature() -> f32 {
    0.7
}

impl GenerationRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            context: Vec::new(),
            temperature: default_temperature(),
            max_tokens: None,
        }
    }
}

/// A completed generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generation {
    pub text: String,

    /// Total tokens (prompt + completion) as reported or estimated
    pub token_count: u32,

    /// Which model actually responded (may differ from requested)
    pub model: String,
}

/// Rough token estimate used when a backend does not report usage
/// (4 chars ≈ 1 token).
pub fn estimate_tokens(text: &str) -> u32 {
    (text.len() / 4) as u32
}

/// The core Provider trait.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "openai", "anthropic").
    fn name(&self) -> &str;

    /// Generate text for the request.
    async fn generate(&self, request: GenerationRequest) -> Result<Generation, ProviderError>;

    /// Health check — can we reach the provider?
    async fn health_check(&self) -> Result<bool, ProviderError> {
        Ok(true)
    }
}

/// A configured capability instance: a provider bound to a model, a
/// timeout, and the confidence assigned to its candidates.
#[derive(Clone)]
pub struct Capability {
    /// Unique tag (the configured name)
    pub tag: String,
    pub provider: Arc<dyn Provider>,
    pub model: String,
    pub timeout: Duration,
    pub confidence: f64,
}

impl Capability {
    pub fn new(tag: impl Into<String>, provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            provider,
            model: model.into(),
            timeout: Duration::from_secs(30),
            confidence: 0.8,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }
}

impl std::fmt::Debug for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capability")
            .field("tag", &self.tag)
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("confidence", &self.confidence)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults() {
        let req = GenerationRequest::new("gpt-4o", "hello");
        assert!((req.temperature - 0.7).abs() < f32::EPSILON);
        assert!(req.context.is_empty());
        assert!(req.max_tokens.is_none());
    }

    #[test]
    fn request_deserializes_with_default_temperature() {
        let req: GenerationRequest =
            serde_json::from_str(r#"{"model":"m","prompt":"p"}"#).unwrap();
        assert!((req.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn token_estimate() {
        assert_eq!(estimate_tokens("12345678901234567890"), 5);
    }
}
