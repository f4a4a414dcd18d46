//! Native Anthropic provider (Messages API).

use async_trait::async_trait;
use chorus_core::error::ProviderError;
use chorus_core::provider::{Generation, GenerationRequest};
use chorus_core::query::Role;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::check_status;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Anthropic Messages API provider.
pub struct AnthropicProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl AnthropicProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.into(),
            client: crate::http_client(),
        }
    }

    /// Point at a proxy or compatible gateway.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// The Messages API requires strictly alternating roles starting with
    /// `user`; consecutive turns from the same role are merged.
    fn to_api_messages(request: &GenerationRequest) -> Vec<AnthropicMessage> {
        let mut messages: Vec<AnthropicMessage> = Vec::new();
        let turns = request
            .context
            .iter()
            .map(|t| (t.role, t.content.as_str()))
            .chain(std::iter::once((Role::User, request.prompt.as_str())));

        for (role, content) in turns {
            let role = match role {
                Role::User => "user",
                Role::Assistant => "assistant",
            };
            if messages.is_empty() && role == "assistant" {
                continue;
            }
            match messages.last_mut() {
                Some(last) if last.role == role => {
                    last.content.push_str("\n\n");
                    last.content.push_str(content);
                }
                _ => messages.push(AnthropicMessage {
                    role: role.into(),
                    content: content.to_string(),
                }),
            }
        }
        messages
    }

    fn build_body(request: &GenerationRequest) -> serde_json::Value {
        serde_json::json!({
            "model": request.model,
            "max_tokens": request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            "temperature": request.temperature,
            "messages": Self::to_api_messages(request),
        })
    }

    fn parse_response(
        response: AnthropicResponse,
        request: &GenerationRequest,
    ) -> Result<Generation, ProviderError> {
        let text: String = response
            .content
            .iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(ProviderError::InvalidResponse(
                "Anthropic response contained no text blocks".into(),
            ));
        }

        Ok(Generation {
            text,
            token_count: response.usage.input_tokens + response.usage.output_tokens,
            model: response.model.unwrap_or_else(|| request.model.clone()),
        })
    }
}

#[async_trait]
impl chorus_core::Provider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<Generation, ProviderError> {
        let url = format!("{}/messages", self.base_url);
        let body = Self::build_body(&request);

        debug!(model = %request.model, "Sending Anthropic messages request");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let response = check_status(response, "anthropic").await?;

        let api_response: AnthropicResponse = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to parse Anthropic response: {e}"))
        })?;

        Self::parse_response(api_response, &request)
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    model: Option<String>,
    content: Vec<ContentBlock>,
    usage: AnthropicUsage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}
