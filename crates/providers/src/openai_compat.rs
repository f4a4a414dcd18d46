//! OpenAI-compatible provider implementation.
//!
//! Works with: OpenAI, OpenRouter, Ollama, vLLM, Groq, Together AI,
//! Fireworks AI, and any endpoint exposing `/v1/chat/completions`.

use async_trait::async_trait;
use chorus_core::error::ProviderError;
use chorus_core::provider::{estimate_tokens, Generation, GenerationRequest};
use chorus_core::query::Role;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::check_status;

/// An OpenAI-compatible text generation provider.
pub struct OpenAiCompatProvider {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    /// Create a new OpenAI-compatible provider.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: crate::http_client(),
        }
    }

    /// Create an OpenAI provider (convenience constructor).
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::new("openai", "https://api.openai.com/v1", api_key)
    }

    /// Create an Ollama provider (convenience constructor).
    pub fn ollama(base_url: Option<&str>) -> Self {
        Self::new(
            "ollama",
            base_url.unwrap_or("http://localhost:11434/v1"),
            "ollama", // Ollama doesn't need a real key
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Convert a generation request to chat messages: context turns first,
    /// then the (augmented) prompt as the final user message.
    fn to_api_messages(request: &GenerationRequest) -> Vec<ApiMessage> {
        let mut messages: Vec<ApiMessage> = request
            .context
            .iter()
            .map(|turn| ApiMessage {
                role: match turn.role {
                    Role::User => "user".into(),
                    Role::Assistant => "assistant".into(),
                },
                content: Some(turn.content.clone()),
            })
            .collect();
        messages.push(ApiMessage {
            role: "user".into(),
            content: Some(request.prompt.clone()),
        });
        messages
    }

    fn build_body(request: &GenerationRequest) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": request.model,
            "messages": Self::to_api_messages(request),
            "temperature": request.temperature,
            "stream": false,
        });
        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }
        body
    }

    fn parse_response(
        api_response: ApiResponse,
        request: &GenerationRequest,
    ) -> Result<Generation, ProviderError> {
        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::InvalidResponse("No choices in response".into()))?;

        let text = choice.message.content.unwrap_or_default();
        let token_count = api_response.usage.map(|u| u.total_tokens).unwrap_or_else(|| {
            estimate_tokens(&request.prompt) + estimate_tokens(&text)
        });

        Ok(Generation {
            text,
            token_count,
            model: api_response.model.unwrap_or_else(|| request.model.clone()),
        })
    }
}

#[async_trait]
impl chorus_core::Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: GenerationRequest) -> Result<Generation, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = Self::build_body(&request);

        debug!(provider = %self.name, model = %request.model, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let response = check_status(response, &self.name).await?;

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        Self::parse_response(api_response, &request)
    }

    async fn health_check(&self) -> Result<bool, ProviderError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(response.status().is_success())
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<ApiChoice>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chorus_core::query::ContextTurn;
    use chorus_core::Provider;

    fn request() -> GenerationRequest {
        let mut req = GenerationRequest::new("gpt-4o-mini", "What is Rust?");
        req.context = vec![
            ContextTurn::user("hi"),
            ContextTurn::assistant("hello"),
        ];
        req.max_tokens = Some(256);
        req
    }

    #[test]
    fn constructor_trims_trailing_slash() {
        let p = OpenAiCompatProvider::new("custom", "http://localhost:8000/v1/", "k");
        assert_eq!(p.base_url(), "http://localhost:8000/v1");
        assert_eq!(p.name(), "custom");
    }

    #[test]
    fn messages_put_prompt_last() {
        let messages = OpenAiCompatProvider::to_api_messages(&request());
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, "user");
        assert_eq!(messages[1].role, "assistant");
        assert_eq!(messages[2].content.as_deref(), Some("What is Rust?"));
    }

    #[test]
    fn body_includes_max_tokens() {
        let body = OpenAiCompatProvider::build_body(&request());
        assert_eq!(body["max_tokens"], 256);
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["stream"], false);
    }

    #[test]
    fn parse_response_uses_reported_usage() {
        let api: ApiResponse = serde_json::from_value(serde_json::json!({
            "model": "gpt-4o-mini-2024-07-18",
            "choices": [{"message": {"role": "assistant", "content": "A language."}}],
            "usage": {"prompt_tokens": 7, "completion_tokens": 3, "total_tokens": 10}
        }))
        .unwrap();
        let generation = OpenAiCompatProvider::parse_response(api, &request()).unwrap();
        assert_eq!(generation.text, "A language.");
        assert_eq!(generation.token_count, 10);
        assert_eq!(generation.model, "gpt-4o-mini-2024-07-18");
    }

    #[test]
    fn parse_response_estimates_missing_usage() {
        let api: ApiResponse = serde_json::from_value(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "12345678"}}]
        }))
        .unwrap();
        let generation = OpenAiCompatProvider::parse_response(api, &request()).unwrap();
        // "What is Rust?" = 13 chars → 3, "12345678" → 2
        assert_eq!(generation.token_count, 5);
        assert_eq!(generation.model, "gpt-4o-mini");
    }

    #[test]
    fn parse_response_without_choices_fails() {
        let api: ApiResponse =
            serde_json::from_value(serde_json::json!({"choices": []})).unwrap();
        assert!(matches!(
            OpenAiCompatProvider::parse_response(api, &request()),
            Err(ProviderError::InvalidResponse(_))
        ));
    }
}
