//! Orchestrator: concurrent fan-out to every configured capability.
//!
//! All calls are driven from the current task through a
//! `FuturesUnordered`, so concurrency is capped at the number of
//! capabilities and nothing is spawned. Each call carries its own
//! deadline; a timeout or error drops that one capability only.

use std::time::Instant;

use chorus_core::error::{CapabilityFailure, PipelineError, ProviderError};
use chorus_core::provider::{Capability, Generation, GenerationRequest};
use chorus_core::query::ContextTurn;
use chorus_core::synthesis::CandidateResponse;
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, info, warn};

/// Sampling parameters shared by every capability in one fan-out.
#[derive(Debug, Clone, Copy)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: None,
        }
    }
}

/// Outcome of one fan-out.
#[derive(Debug, Default)]
pub struct FanOut {
    /// Successful candidates, in completion order
    pub candidates: Vec<CandidateResponse>,
    pub failures: Vec<CapabilityFailure>,
}

impl FanOut {
    pub fn attempted(&self) -> usize {
        self.candidates.len() + self.failures.len()
    }
}

pub struct Orchestrator {
    capabilities: Vec<Capability>,
}

impl Orchestrator {
    pub fn new(capabilities: Vec<Capability>) -> Self {
        Self { capabilities }
    }

    /// Capabilities in enumeration order.
    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }

    pub fn ensure_configured(&self) -> Result<(), PipelineError> {
        if self.capabilities.is_empty() {
            return Err(PipelineError::Configuration(
                "no text generation capabilities configured".into(),
            ));
        }
        Ok(())
    }

    /// Invoke every capability concurrently and collect what comes back.
    ///
    /// Fails only when no capability is configured. An all-failed fan-out
    /// is returned as-is; deciding what that means is the caller's job.
    pub async fn fan_out(
        &self,
        prompt: &str,
        context: &[ContextTurn],
        params: GenerationParams,
    ) -> Result<FanOut, PipelineError> {
        self.ensure_configured()?;

        info!(capabilities = self.capabilities.len(), "Fanning out");

        let mut pending: FuturesUnordered<_> = self
            .capabilities
            .iter()
            .enumerate()
            .map(|(index, capability)| {
                let request = GenerationRequest {
                    model: capability.model.clone(),
                    prompt: prompt.to_string(),
                    context: context.to_vec(),
                    temperature: params.temperature,
                    max_tokens: params.max_tokens,
                };
                invoke(index, capability, request)
            })
            .collect();

        let mut outcome = FanOut::default();
        while let Some((index, result)) = pending.next().await {
            let capability = &self.capabilities[index];
            match result {
                Ok(candidate) => {
                    debug!(
                        capability = %capability.tag,
                        tokens = candidate.token_count,
                        latency_ms = candidate.latency_ms,
                        "Candidate received"
                    );
                    outcome.candidates.push(candidate);
                }
                Err(e) => {
                    warn!(capability = %capability.tag, error = %e, "Capability failed");
                    outcome.failures.push(CapabilityFailure::new(&capability.tag, &e));
                }
            }
        }

        info!(
            succeeded = outcome.candidates.len(),
            failed = outcome.failures.len(),
            "Fan-out complete"
        );
        Ok(outcome)
    }
}

async fn invoke(
    index: usize,
    capability: &Capability,
    request: GenerationRequest,
) -> (usize, Result<CandidateResponse, ProviderError>) {
    let started = Instant::now();
    let result = match tokio::time::timeout(capability.timeout, capability.provider.generate(request))
        .await
    {
        Ok(Ok(generation)) => Ok(candidate(index, capability, generation, started)),
        Ok(Err(e)) => Err(e),
        Err(_) => Err(ProviderError::Timeout(format!(
            "Capability '{}' timed out after {}ms",
            capability.tag,
            capability.timeout.as_millis()
        ))),
    };
    (index, result)
}

fn candidate(
    index: usize,
    capability: &Capability,
    generation: Generation,
    started: Instant,
) -> CandidateResponse {
    let model = if generation.model.is_empty() {
        capability.model.clone()
    } else {
        generation.model
    };
    CandidateResponse {
        source: capability.tag.clone(),
        capability_index: index,
        model,
        text: generation.text,
        token_count: generation.token_count,
        latency_ms: started.elapsed().as_millis() as u64,
        confidence: capability.confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn empty_set_is_a_configuration_error() {
        let orchestrator = Orchestrator::new(vec![]);
        let err = orchestrator
            .fan_out("hi", &[], GenerationParams::default())
            .await
            .unwrap_err();
        assert_eq!(err.reason_code(), "configuration_error");
    }

    #[tokio::test]
    async fn failures_are_isolated() {
        let good = Arc::new(ScriptedProvider::new("good answer", 12));
        let bad = Arc::new(FailingProvider::new());
        let orchestrator = Orchestrator::new(vec![
            capability("good", good.clone()),
            capability("bad", bad.clone()),
        ]);

        let out = orchestrator
            .fan_out("question", &[], GenerationParams::default())
            .await
            .unwrap();

        assert_eq!(out.candidates.len(), 1);
        assert_eq!(out.candidates[0].source, "good");
        assert_eq!(out.candidates[0].text, "good answer");
        assert_eq!(out.candidates[0].token_count, 12);
        assert_eq!(out.failures.len(), 1);
        assert_eq!(out.failures[0].tag, "bad");
        assert!(!out.failures[0].timed_out);
        assert_eq!(out.attempted(), 2);
        assert_eq!(good.calls(), 1);
        assert_eq!(bad.calls(), 1);
    }

    #[tokio::test]
    async fn slow_capability_times_out_without_blocking_others() {
        let fast = Arc::new(ScriptedProvider::new("fast", 5));
        let hanging = Arc::new(HangingProvider::new());
        let orchestrator = Orchestrator::new(vec![
            capability("hanging", hanging.clone()).with_timeout(Duration::from_millis(50)),
            capability("fast", fast),
        ]);

        let started = Instant::now();
        let out = orchestrator
            .fan_out("q", &[], GenerationParams::default())
            .await
            .unwrap();

        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(out.candidates.len(), 1);
        assert_eq!(out.candidates[0].source, "fast");
        assert_eq!(out.failures.len(), 1);
        assert!(out.failures[0].timed_out);
        assert_eq!(hanging.calls(), 1);
    }

    #[tokio::test]
    async fn candidates_carry_capability_index_and_confidence() {
        let slow = Arc::new(ScriptedProvider::new("slow", 1).with_delay(Duration::from_millis(40)));
        let quick = Arc::new(ScriptedProvider::new("quick", 1));
        let orchestrator = Orchestrator::new(vec![
            capability("slow", slow).with_confidence(0.6),
            capability("quick", quick),
        ]);

        let out = orchestrator
            .fan_out("q", &[], GenerationParams::default())
            .await
            .unwrap();

        // completion order: quick first
        assert_eq!(out.candidates[0].source, "quick");
        assert_eq!(out.candidates[0].capability_index, 1);
        assert_eq!(out.candidates[1].capability_index, 0);
        assert!((out.candidates[1].confidence - 0.6).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn request_carries_prompt_context_and_params() {
        let provider = Arc::new(ScriptedProvider::new("ok", 1));
        let orchestrator = Orchestrator::new(vec![capability("a", provider.clone())]);
        let params = GenerationParams {
            temperature: 0.2,
            max_tokens: Some(64),
        };

        orchestrator
            .fan_out("the prompt", &[ContextTurn::user("earlier")], params)
            .await
            .unwrap();

        let request = provider.last_request().expect("request recorded");
        assert_eq!(request.prompt, "the prompt");
        assert_eq!(request.model, "mock-model");
        assert_eq!(request.context, vec![ContextTurn::user("earlier")]);
        assert_eq!(request.max_tokens, Some(64));
        assert!((request.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn all_failing_returns_only_failures() {
        let orchestrator = Orchestrator::new(vec![
            capability("x", Arc::new(FailingProvider::new())),
            capability("y", Arc::new(FailingProvider::new())),
        ]);
        let out = orchestrator
            .fan_out("q", &[], GenerationParams::default())
            .await
            .unwrap();
        assert!(out.candidates.is_empty());
        assert_eq!(out.failures.len(), 2);
    }
}
