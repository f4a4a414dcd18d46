//! End-to-end tests for the chorus request pipeline.
//!
//! These tests exercise `Pipeline::handle` from query to synthesized
//! result, across classification, fan-out, synthesis, knowledge, memory,
//! tools and accounting.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chorus_config::AppConfig;
use chorus_core::error::{PipelineError, ProviderError};
use chorus_core::provider::{Capability, Generation, GenerationRequest, Provider};
use chorus_core::query::Query;
use chorus_core::synthesis::SynthesisStrategy;
use chorus_engine::{Pipeline, classify};
use chorus_memory::{ConversationMemory, IndexSettings, InMemoryStore, KnowledgeIndex};
use chorus_telemetry::UsageLedger;
use chorus_tools::default_registry;

// ── Mock Providers ───────────────────────────────────────────────────────

/// Answers every request with the same text.
struct FixedProvider {
    text: String,
    tokens: u32,
    delay: Duration,
    call_count: Mutex<usize>,
    prompts: Mutex<Vec<String>>,
}

impl FixedProvider {
    fn new(text: &str, tokens: u32) -> Self {
        Self {
            text: text.to_string(),
            tokens,
            delay: Duration::ZERO,
            call_count: Mutex::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn calls(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait::async_trait]
impl Provider for FixedProvider {
    fn name(&self) -> &str {
        "e2e_fixed"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<Generation, ProviderError> {
        *self.call_count.lock().unwrap() += 1;
        self.prompts.lock().unwrap().push(request.prompt);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(Generation {
            text: self.text.clone(),
            token_count: self.tokens,
            model: request.model,
        })
    }
}

/// Fails with the configured error.
struct BrokenProvider {
    call_count: Mutex<usize>,
}

impl BrokenProvider {
    fn new() -> Self {
        Self {
            call_count: Mutex::new(0),
        }
    }

    fn calls(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl Provider for BrokenProvider {
    fn name(&self) -> &str {
        "e2e_broken"
    }

    async fn generate(&self, _request: GenerationRequest) -> Result<Generation, ProviderError> {
        *self.call_count.lock().unwrap() += 1;
        Err(ProviderError::ApiError {
            status_code: 503,
            message: "overloaded".into(),
        })
    }
}

fn cap(tag: &str, provider: Arc<dyn Provider>) -> Capability {
    Capability::new(tag, provider, "openai/gpt-4o-mini").with_timeout(Duration::from_secs(2))
}

fn seeded_knowledge() -> Arc<KnowledgeIndex> {
    Arc::new(KnowledgeIndex::with_seed_corpus(IndexSettings::default()))
}

// ── E2E: Configuration ───────────────────────────────────────────────────

#[tokio::test]
async fn e2e_default_config_has_no_capabilities() {
    let pipeline = Pipeline::from_config(&AppConfig::default());
    let err = pipeline.handle(&Query::new("What is Rust?")).await.unwrap_err();
    assert!(matches!(err, PipelineError::Configuration(_)));
    assert_eq!(err.reason_code(), "configuration_error");
    assert!(!pipeline.knowledge().is_empty(), "seed corpus loaded");
    assert!(pipeline.tools().contains("calculation"));
}

// ── E2E: Causal query across two backends ────────────────────────────────

#[tokio::test]
async fn e2e_causal_query_selects_the_causal_answer() {
    let shallow = Arc::new(FixedProvider::new("Algorithms can be slow.", 20));
    let deep = Arc::new(FixedProvider::new(
        "The slowdown is due to a nested loop: each pass triggers a full scan, which leads to quadratic work.",
        45,
    ));
    let pipeline = Pipeline::new(vec![cap("shallow", shallow.clone()), cap("deep", deep.clone())])
        .with_knowledge(seeded_knowledge());

    let query = Query::new("Why does this algorithm run slowly?");
    assert_eq!(classify(&query.text, 0).strategy, SynthesisStrategy::Causal);

    let result = pipeline.handle(&query).await.unwrap();
    assert_eq!(result.strategy, SynthesisStrategy::Causal);
    assert!(result.has_stage("causal_scoring"));
    assert!(result.has_stage("best_candidate_selection"));
    assert_eq!(result.source, "deep");
    assert_eq!(result.total_tokens, 45);
    assert!((result.confidence - 0.86).abs() < 1e-9);
    assert_eq!(shallow.calls(), 1);
    assert_eq!(deep.calls(), 1);

    // the algorithmic complexity seed entry is rendered as background
    let prompt = deep.last_prompt().unwrap();
    assert!(prompt.starts_with("Background (programming):"));
    assert!(prompt.ends_with("Question: Why does this algorithm run slowly?"));
}

// ── E2E: Failure isolation ───────────────────────────────────────────────

#[tokio::test]
async fn e2e_one_failure_is_recorded_not_surfaced() {
    let broken = Arc::new(BrokenProvider::new());
    let ok = Arc::new(FixedProvider::new("Here is the answer.", 10));
    let pipeline = Pipeline::new(vec![cap("broken", broken.clone()), cap("ok", ok)]);

    let result = pipeline.handle(&Query::new("hello there")).await.unwrap();
    assert_eq!(result.text, "Here is the answer.");
    assert_eq!(result.candidates_considered, 1);
    assert_eq!(result.capability_failures.len(), 1);
    assert!(result.capability_failures[0].reason.contains("503"));
    assert_eq!(broken.calls(), 1);
}

#[tokio::test]
async fn e2e_all_failed_persists_nothing() {
    let memory = Arc::new(ConversationMemory::new(20));
    let ledger = Arc::new(UsageLedger::new());
    let slow = FixedProvider::new("too late", 5).delayed(Duration::from_secs(5));
    let pipeline = Pipeline::new(vec![
        cap("broken", Arc::new(BrokenProvider::new())),
        cap("slow", Arc::new(slow)).with_timeout(Duration::from_millis(50)),
    ])
    .with_memory(memory.clone())
    .with_ledger(ledger.clone());

    let err = pipeline
        .handle(&Query::new("hello").with_user("alice"))
        .await
        .unwrap_err();
    assert_eq!(err.reason_code(), "all_capabilities_failed");
    if let PipelineError::AllCapabilitiesFailed { failures, .. } = &err {
        assert!(failures.iter().any(|f| f.tag == "slow" && f.timed_out));
        assert!(failures.iter().any(|f| f.tag == "broken" && !f.timed_out));
    }
    assert!(memory.history("alice").await.is_empty());
    assert!(ledger.snapshot().is_empty());
}

// ── E2E: Creative merge and strategic render ─────────────────────────────

#[tokio::test]
async fn e2e_creative_request_concatenates() {
    let pipeline = Pipeline::new(vec![
        cap("a", Arc::new(FixedProvider::new("A red sun sinks.", 6))),
        cap("b", Arc::new(FixedProvider::new("Gold light on water.", 7))),
    ]);

    let result = pipeline
        .handle(&Query::new("Write a poem about the evening"))
        .await
        .unwrap();
    assert_eq!(result.strategy, SynthesisStrategy::Creative);
    assert_eq!(result.text, "A red sun sinks.\n\n---\n\nGold light on water.");
    assert_eq!(result.total_tokens, 13);
    assert_eq!(result.source, "synthesized");
}

#[tokio::test]
async fn e2e_business_plan_is_rendered_as_outline() {
    let pipeline = Pipeline::new(vec![
        cap("a", Arc::new(FixedProvider::new("Goal: double revenue\n1. Raise prices", 8))),
        cap("b", Arc::new(FixedProvider::new("1. Raise prices\n2. Expand sales\nConsider churn", 8))),
    ]);

    let result = pipeline
        .handle(&Query::new("Plan our startup revenue"))
        .await
        .unwrap();
    assert_eq!(result.strategy, SynthesisStrategy::Strategic);
    assert_eq!(
        result.text,
        "## Goals\n- double revenue\n\n## Steps\n1. Raise prices\n2. Expand sales\n\n## Considerations\n- Consider churn"
    );
    assert!(result.has_stage("structured_render"));
}

// ── E2E: Tools, memory and accounting together ───────────────────────────

#[tokio::test]
async fn e2e_calculation_tool_and_accounting() {
    let knowledge = seeded_knowledge();
    let ledger = Arc::new(UsageLedger::new());
    let pipeline = Pipeline::new(vec![cap("solo", Arc::new(FixedProvider::new("Roughly 300.", 2_000)))])
        .with_knowledge(knowledge.clone())
        .with_tools(Arc::new(default_registry(knowledge)))
        .with_ledger(ledger.clone());

    let result = pipeline
        .handle(&Query::new("calculate 12 * 25"))
        .await
        .unwrap();
    assert!(result.text.starts_with("Roughly 300."));
    assert!(result.text.contains("**calculation**: 12 * 25 = 300"));
    assert!(result.has_stage("tool:calculation"));

    // 1000 in / 1000 out at 0.15 / 0.6 per million
    assert!((result.estimated_cost_usd - 0.00075).abs() < 1e-12);
    let totals = ledger.totals();
    assert_eq!(totals.calls, 1);
    assert_eq!(totals.tokens, 2_000);
}

#[tokio::test]
async fn e2e_deeply_nested_calculation_is_skipped() {
    let knowledge = seeded_knowledge();
    let pipeline = Pipeline::new(vec![cap("solo", Arc::new(FixedProvider::new("Two.", 4)))])
        .with_knowledge(knowledge.clone())
        .with_tools(Arc::new(default_registry(knowledge)));

    let text = format!("calculate {}1+1{}", "(".repeat(2000), ")".repeat(2000));
    let result = pipeline.handle(&Query::new(text)).await.unwrap();
    assert!(result.text.starts_with("Two."));
    assert!(!result.has_stage("tool:calculation"));
}

#[tokio::test]
async fn e2e_memory_is_bounded_and_snapshotted() {
    let memory = Arc::new(ConversationMemory::new(4));
    let pipeline = Pipeline::new(vec![cap("solo", Arc::new(FixedProvider::new("ok", 1)))])
        .with_memory(memory.clone());

    for i in 0..5 {
        pipeline
            .handle(&Query::new(format!("question number {i}")).with_user("bob"))
            .await
            .unwrap();
        assert!(memory.len("bob").await <= 4);
    }
    let history = memory.history("bob").await;
    assert_eq!(history.len(), 4);
    assert_eq!(history[0].text, "question number 3");

    let store = InMemoryStore::new();
    assert_eq!(memory.snapshot(&store, "bob").await.unwrap(), 4);
    let restored = ConversationMemory::new(4);
    assert_eq!(restored.restore(&store, "bob").await.unwrap(), Some(4));
    assert_eq!(restored.history("bob").await.len(), 4);
}
