//! Mock providers shared by the engine's unit tests.

use async_trait::async_trait;
use chorus_core::error::ProviderError;
use chorus_core::provider::{Capability, Generation, GenerationRequest, Provider};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Capability with a short timeout around `provider`.
pub fn capability(tag: &str, provider: Arc<dyn Provider>) -> Capability {
    Capability::new(tag, provider, "mock-model").with_timeout(Duration::from_secs(2))
}

/// Returns a fixed text and token count, optionally after a delay.
pub struct ScriptedProvider {
    text: String,
    tokens: u32,
    delay: Option<Duration>,
    call_count: Mutex<usize>,
    last_request: Mutex<Option<GenerationRequest>>,
}

impl ScriptedProvider {
    pub fn new(text: &str, tokens: u32) -> Self {
        Self {
            text: text.to_string(),
            tokens,
            delay: None,
            call_count: Mutex::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn last_request(&self) -> Option<GenerationRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<Generation, ProviderError> {
        *self.call_count.lock().unwrap() += 1;
        *self.last_request.lock().unwrap() = Some(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(Generation {
            text: self.text.clone(),
            token_count: self.tokens,
            model: request.model,
        })
    }
}

/// Always fails with a network error.
pub struct FailingProvider {
    call_count: Mutex<usize>,
}

impl FailingProvider {
    pub fn new() -> Self {
        Self {
            call_count: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl Provider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn generate(&self, _request: GenerationRequest) -> Result<Generation, ProviderError> {
        *self.call_count.lock().unwrap() += 1;
        Err(ProviderError::Network("connection refused".into()))
    }
}

/// Never answers.
pub struct HangingProvider {
    call_count: Mutex<usize>,
}

impl HangingProvider {
    pub fn new() -> Self {
        Self {
            call_count: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl Provider for HangingProvider {
    fn name(&self) -> &str {
        "hanging"
    }

    async fn generate(&self, _request: GenerationRequest) -> Result<Generation, ProviderError> {
        *self.call_count.lock().unwrap() += 1;
        std::future::pending::<()>().await;
        Err(ProviderError::Timeout("unreachable".into()))
    }
}
