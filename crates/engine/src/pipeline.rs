//! The request pipeline: `handle(query) -> SynthesizedResult`.
//!
//! Order of work for one request:
//! 1. validate the text (InvalidInput) and the capability set (Configuration)
//! 2. classify
//! 3. retrieve background knowledge and relevant prior turns
//! 4. fan out and synthesize over candidates in capability order
//! 5. append summaries of suggested tools that are registered
//! 6. price the candidates, record usage, remember the exchange
//!
//! Steps 5 and 6 only run on success, so a failed request leaves memory
//! and the usage ledger untouched.

use std::sync::Arc;

use chorus_config::AppConfig;
use chorus_core::classification::{ClassificationRecord, TopicDomain};
use chorus_core::error::PipelineError;
use chorus_core::event::{DomainEvent, EventBus};
use chorus_core::provider::Capability;
use chorus_core::query::{ContextTurn, Query};
use chorus_core::synthesis::{CandidateResponse, SynthesizedResult};
use chorus_core::tool::ToolRegistry;
use chorus_memory::{
    ANONYMOUS_USER, ConversationMemory, IndexSettings, KnowledgeIndex, SearchRequest, SearchResults,
};
use chorus_telemetry::{ModelPricing, PricingTable, UsageLedger};
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::classifier::classify;
use crate::orchestrator::{FanOut, GenerationParams, Orchestrator};
use crate::synthesizer::synthesize;

/// Per-request tunables.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub max_query_chars: usize,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    /// Relevant prior turns prepended to the context
    pub recall_k: usize,
    /// Knowledge results rendered into the prompt
    pub knowledge_limit: usize,
    pub tools_enabled: bool,
    pub max_tool_invocations: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_query_chars: 8000,
            temperature: 0.7,
            max_tokens: Some(1024),
            recall_k: 5,
            knowledge_limit: 5,
            tools_enabled: true,
            max_tool_invocations: 2,
        }
    }
}

impl PipelineSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_query_chars: config.orchestrator.max_query_chars,
            temperature: config.orchestrator.temperature,
            max_tokens: Some(config.orchestrator.max_tokens),
            recall_k: config.memory.recall_k,
            knowledge_limit: config.knowledge.result_limit,
            tools_enabled: config.tools.enabled,
            max_tool_invocations: config.tools.max_invocations,
        }
    }
}

pub struct Pipeline {
    orchestrator: Orchestrator,
    knowledge: Arc<KnowledgeIndex>,
    memory: Arc<ConversationMemory>,
    tools: Arc<ToolRegistry>,
    pricing: Arc<PricingTable>,
    ledger: Arc<UsageLedger>,
    events: Arc<EventBus>,
    settings: PipelineSettings,
}

impl Pipeline {
    /// A pipeline over `capabilities` with empty knowledge, default memory,
    /// no tools and the built-in price table.
    pub fn new(capabilities: Vec<Capability>) -> Self {
        Self {
            orchestrator: Orchestrator::new(capabilities),
            knowledge: Arc::new(KnowledgeIndex::default()),
            memory: Arc::new(ConversationMemory::new(50)),
            tools: Arc::new(ToolRegistry::new()),
            pricing: Arc::new(PricingTable::with_defaults()),
            ledger: Arc::new(UsageLedger::new()),
            events: Arc::new(EventBus::default()),
            settings: PipelineSettings::default(),
        }
    }

    /// Wire a full pipeline from configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        let events = Arc::new(EventBus::default());

        let index_settings = IndexSettings {
            similarity_floor: config.knowledge.similarity_floor,
            vector_top_k: config.knowledge.vector_top_k,
        };
        let knowledge = if config.knowledge.seed_corpus {
            KnowledgeIndex::with_seed_corpus(index_settings)
        } else {
            KnowledgeIndex::new(index_settings)
        };
        let knowledge = Arc::new(knowledge.with_events(events.clone()));

        let memory = Arc::new(
            ConversationMemory::new(config.memory.max_turns).with_events(events.clone()),
        );

        let pricing = PricingTable::with_defaults()
            .with_default_model(config.telemetry.default_pricing_model.clone());
        for (model, price) in &config.telemetry.custom_pricing {
            pricing.set(
                model.clone(),
                ModelPricing::new(price.input_per_m, price.output_per_m),
            );
        }

        let tools = chorus_tools::default_registry(knowledge.clone());

        info!(
            capabilities = config.capabilities.len(),
            knowledge_entries = knowledge.len(),
            tools = tools.len(),
            "Pipeline configured"
        );

        Self::new(chorus_providers::build_capabilities(config))
            .with_events(events)
            .with_knowledge(knowledge)
            .with_memory(memory)
            .with_tools(Arc::new(tools))
            .with_pricing(Arc::new(pricing))
            .with_settings(PipelineSettings::from_config(config))
    }

    pub fn with_knowledge(mut self, knowledge: Arc<KnowledgeIndex>) -> Self {
        self.knowledge = knowledge;
        self
    }

    pub fn with_memory(mut self, memory: Arc<ConversationMemory>) -> Self {
        self.memory = memory;
        self
    }

    pub fn with_tools(mut self, tools: Arc<ToolRegistry>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_pricing(mut self, pricing: Arc<PricingTable>) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn with_ledger(mut self, ledger: Arc<UsageLedger>) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = events;
        self
    }

    pub fn with_settings(mut self, settings: PipelineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub fn knowledge(&self) -> &Arc<KnowledgeIndex> {
        &self.knowledge
    }

    pub fn memory(&self) -> &Arc<ConversationMemory> {
        &self.memory
    }

    pub fn tools(&self) -> &Arc<ToolRegistry> {
        &self.tools
    }

    pub fn pricing(&self) -> &Arc<PricingTable> {
        &self.pricing
    }

    pub fn ledger(&self) -> &Arc<UsageLedger> {
        &self.ledger
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Answer one query.
    pub async fn handle(&self, query: &Query) -> Result<SynthesizedResult, PipelineError> {
        let text = self.validate(query)?;
        self.orchestrator.ensure_configured()?;

        let record = classify(text, query.context.len());
        info!(
            category = %record.category,
            domain = %record.domain,
            strategy = %record.strategy,
            complexity = ?record.complexity,
            "Query classified"
        );
        self.events.publish(DomainEvent::QueryClassified {
            category: record.category,
            domain: record.domain,
            strategy: record.strategy,
            timestamp: Utc::now(),
        });

        let background = self.knowledge.search(
            &SearchRequest::new(text)
                .with_domain(record.domain)
                .with_expertise(query.expertise())
                .with_limit(self.settings.knowledge_limit),
        );
        let prompt = build_prompt(text, record.domain, &background);

        let user_id = query.user_id.as_deref().unwrap_or(ANONYMOUS_USER);
        let context = self.build_context(user_id, text, &query.context).await;

        let params = GenerationParams {
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };
        let fan_out = self.orchestrator.fan_out(&prompt, &context, params).await?;
        self.publish_fan_out(&fan_out);

        let FanOut {
            mut candidates,
            failures,
        } = fan_out;
        if candidates.is_empty() {
            warn!(attempted = failures.len(), "Every capability failed");
            return Err(PipelineError::AllCapabilitiesFailed {
                attempted: self.orchestrator.len(),
                failures,
            });
        }

        candidates.sort_by_key(|c| c.capability_index);
        let Some(mut result) = synthesize(record.strategy, &candidates) else {
            return Err(PipelineError::AllCapabilitiesFailed {
                attempted: self.orchestrator.len(),
                failures,
            });
        };

        self.apply_tools(text, &record, &mut result).await;

        result.estimated_cost_usd = self.account(&candidates);
        result.capability_failures = failures;

        self.memory
            .record_exchange(user_id, text, &result.text)
            .await;

        info!(
            strategy = %result.strategy,
            source = %result.source,
            tokens = result.total_tokens,
            cost_usd = result.estimated_cost_usd,
            "Result synthesized"
        );
        self.events.publish(DomainEvent::ResultSynthesized {
            strategy: result.strategy,
            source: result.source.clone(),
            total_tokens: result.total_tokens,
            timestamp: Utc::now(),
        });

        Ok(result)
    }

    fn validate<'q>(&self, query: &'q Query) -> Result<&'q str, PipelineError> {
        let text = query.text.trim();
        if text.is_empty() {
            return Err(PipelineError::InvalidInput("query text is empty".into()));
        }
        let chars = text.chars().count();
        if chars > self.settings.max_query_chars {
            return Err(PipelineError::InvalidInput(format!(
                "query is {chars} characters, limit is {}",
                self.settings.max_query_chars
            )));
        }
        Ok(text)
    }

    /// Recalled turns, oldest first, followed by the caller's own context.
    async fn build_context(&self, user_id: &str, text: &str, own: &[ContextTurn]) -> Vec<ContextTurn> {
        let mut recalled = self
            .memory
            .relevant(user_id, text, self.settings.recall_k)
            .await;
        recalled.sort_by_key(|s| s.turn.timestamp);

        debug!(user_id, recalled = recalled.len(), "Context assembled");
        recalled
            .iter()
            .map(|s| s.turn.to_context())
            .chain(own.iter().cloned())
            .collect()
    }

    fn publish_fan_out(&self, fan_out: &FanOut) {
        for candidate in &fan_out.candidates {
            self.events.publish(DomainEvent::CandidateReceived {
                capability: candidate.source.clone(),
                token_count: candidate.token_count,
                latency_ms: candidate.latency_ms,
                timestamp: Utc::now(),
            });
        }
        for failure in &fan_out.failures {
            self.events.publish(DomainEvent::CapabilityFailed {
                capability: failure.tag.clone(),
                reason: failure.reason.clone(),
                timestamp: Utc::now(),
            });
        }
    }

    async fn apply_tools(&self, text: &str, record: &ClassificationRecord, result: &mut SynthesizedResult) {
        if !self.settings.tools_enabled {
            return;
        }
        let selected = record
            .suggested_tools
            .iter()
            .map(|s| s.tool.as_str())
            .filter(|name| self.tools.contains(name))
            .take(self.settings.max_tool_invocations);

        for name in selected {
            match self
                .tools
                .invoke(name, serde_json::json!({ "query": text }))
                .await
            {
                Ok(output) => {
                    debug!(tool = name, "Tool summary appended");
                    result
                        .text
                        .push_str(&format!("\n\n---\n**{name}**: {}", output.summary));
                    result.stages.push(format!("tool:{name}"));
                }
                Err(e) => warn!(tool = name, error = %e, "Tool invocation failed, skipping"),
            }
        }
    }

    /// Price every candidate with its own model and record it in the ledger.
    fn account(&self, candidates: &[CandidateResponse]) -> f64 {
        candidates
            .iter()
            .map(|c| {
                let estimate = self.pricing.estimate(&c.model, c.token_count);
                self.ledger
                    .record(&c.source, &c.model, c.token_count, estimate.cost_usd);
                estimate.cost_usd
            })
            .sum()
    }
}

/// The query text, preceded by a background block when knowledge matched.
pub fn build_prompt(text: &str, domain: TopicDomain, background: &SearchResults) -> String {
    if background.results.is_empty() {
        return text.to_string();
    }
    let mut prompt = format!("Background ({domain}):\n");
    for scored in &background.results {
        prompt.push_str(&format!("- {}: {}\n", scored.entry.title, scored.entry.body));
    }
    prompt.push_str(&format!("\nQuestion: {text}"));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use chorus_core::classification::ToolName;
    use chorus_core::query::Role;
    use chorus_memory::NewKnowledge;
    use std::time::Duration;

    #[tokio::test]
    async fn no_capabilities_fails_before_any_call() {
        let pipeline = Pipeline::new(vec![]);
        let err = pipeline.handle(&Query::new("hello")).await.unwrap_err();
        assert_eq!(err.reason_code(), "configuration_error");
    }

    #[tokio::test]
    async fn invalid_input_is_rejected_before_fan_out() {
        let provider = Arc::new(ScriptedProvider::new("x", 1));
        let pipeline = Pipeline::new(vec![capability("a", provider.clone())]).with_settings(
            PipelineSettings {
                max_query_chars: 10,
                ..Default::default()
            },
        );

        let err = pipeline.handle(&Query::new("   ")).await.unwrap_err();
        assert_eq!(err.reason_code(), "invalid_input");
        let err = pipeline
            .handle(&Query::new("this is far too long"))
            .await
            .unwrap_err();
        assert_eq!(err.reason_code(), "invalid_input");
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn single_capability_passes_text_through() {
        let raw = "Raw answer\n  with spacing.";
        let provider = Arc::new(ScriptedProvider::new(raw, 30));
        let pipeline = Pipeline::new(vec![capability("solo", provider.clone())]);

        let result = pipeline.handle(&Query::new("hello there")).await.unwrap();
        assert_eq!(result.text, raw);
        assert_eq!(result.source, "solo");
        assert_eq!(result.total_tokens, 30);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn causal_query_uses_causal_scoring() {
        let pipeline = Pipeline::new(vec![
            capability("a", Arc::new(ScriptedProvider::new("It is slow.", 5))),
            capability(
                "b",
                Arc::new(ScriptedProvider::new(
                    "Nested loops cause quadratic work, which leads to slowness.",
                    8,
                )),
            ),
        ]);

        let result = pipeline
            .handle(&Query::new("Why does this algorithm run slowly?"))
            .await
            .unwrap();
        assert!(result.has_stage("causal_scoring"));
        assert_eq!(result.source, "b");
        assert_eq!(result.candidates_considered, 2);
    }

    #[tokio::test]
    async fn selection_ignores_completion_order() {
        // identical text: the tie goes to the first configured capability,
        // even though it answers last
        let late = ScriptedProvider::new("same answer", 3).with_delay(Duration::from_millis(60));
        let pipeline = Pipeline::new(vec![
            capability("first", Arc::new(late)),
            capability("second", Arc::new(ScriptedProvider::new("same answer", 3))),
        ]);

        let result = pipeline.handle(&Query::new("hello there")).await.unwrap();
        assert_eq!(result.source, "first");
    }

    #[tokio::test]
    async fn all_failed_iff_every_capability_fails() {
        let memory = Arc::new(ConversationMemory::new(10));
        let ledger = Arc::new(UsageLedger::new());
        let pipeline = Pipeline::new(vec![
            capability("x", Arc::new(FailingProvider::new())),
            capability("y", Arc::new(HangingProvider::new())).with_timeout(Duration::from_millis(30)),
        ])
        .with_memory(memory.clone())
        .with_ledger(ledger.clone());

        let err = pipeline
            .handle(&Query::new("hello").with_user("u1"))
            .await
            .unwrap_err();
        match err {
            PipelineError::AllCapabilitiesFailed { attempted, failures } => {
                assert_eq!(attempted, 2);
                assert_eq!(failures.len(), 2);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(memory.len("u1").await, 0);
        assert!(ledger.snapshot().is_empty());

        let partial = Pipeline::new(vec![
            capability("x", Arc::new(FailingProvider::new())),
            capability("ok", Arc::new(ScriptedProvider::new("fine", 2))),
        ]);
        let result = partial.handle(&Query::new("hello")).await.unwrap();
        assert_eq!(result.text, "fine");
        assert_eq!(result.capability_failures.len(), 1);
        assert_eq!(result.capability_failures[0].tag, "x");
    }

    #[tokio::test]
    async fn exchange_is_remembered_and_recalled() {
        let memory = Arc::new(ConversationMemory::new(10));
        let provider = Arc::new(ScriptedProvider::new("Ownership moves values.", 4));
        let pipeline = Pipeline::new(vec![capability("a", provider.clone())])
            .with_memory(memory.clone());

        pipeline
            .handle(&Query::new("explain rust ownership").with_user("u1"))
            .await
            .unwrap();
        let history = memory.history("u1").await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[0].text, "explain rust ownership");
        assert_eq!(history[1].text, "Ownership moves values.");

        pipeline
            .handle(
                &Query::new("more on rust ownership please")
                    .with_user("u1")
                    .with_context(vec![ContextTurn::user("own turn")]),
            )
            .await
            .unwrap();
        let request = provider.last_request().unwrap();
        assert_eq!(request.context.first().map(|t| t.content.as_str()), Some("explain rust ownership"));
        assert_eq!(request.context.last(), Some(&ContextTurn::user("own turn")));
        assert_eq!(memory.len("u1").await, 4);
    }

    #[tokio::test]
    async fn anonymous_queries_share_a_log() {
        let memory = Arc::new(ConversationMemory::new(10));
        let pipeline = Pipeline::new(vec![capability("a", Arc::new(ScriptedProvider::new("ok", 1)))])
            .with_memory(memory.clone());
        pipeline.handle(&Query::new("hello")).await.unwrap();
        assert_eq!(memory.len(ANONYMOUS_USER).await, 2);
    }

    #[tokio::test]
    async fn knowledge_is_rendered_into_the_prompt() {
        let knowledge = Arc::new(KnowledgeIndex::default());
        knowledge
            .add(NewKnowledge::new("Borrow checker", "Rust enforces aliasing rules at compile time"))
            .unwrap();
        let provider = Arc::new(ScriptedProvider::new("ok", 1));
        let pipeline = Pipeline::new(vec![capability("a", provider.clone())]).with_knowledge(knowledge);

        pipeline
            .handle(&Query::new("how does the borrow checker work"))
            .await
            .unwrap();
        let prompt = provider.last_request().unwrap().prompt;
        assert!(prompt.starts_with("Background ("));
        assert!(prompt.contains("- Borrow checker: Rust enforces aliasing rules"));
        assert!(prompt.ends_with("Question: how does the borrow checker work"));
    }

    #[tokio::test]
    async fn registered_tools_append_summaries() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(chorus_tools::CalculationTool));
        let pipeline = Pipeline::new(vec![capability("a", Arc::new(ScriptedProvider::new("About 60.", 3)))])
            .with_tools(Arc::new(registry));

        let result = pipeline
            .handle(&Query::new("calculate 15 * 4"))
            .await
            .unwrap();
        assert!(result.text.starts_with("About 60."));
        assert!(result.text.ends_with("**calculation**: 15 * 4 = 60"));
        assert!(result.has_stage(&format!("tool:{}", ToolName::Calculation)));
    }

    #[tokio::test]
    async fn usage_is_priced_and_recorded() {
        let ledger = Arc::new(UsageLedger::new());
        let pipeline = Pipeline::new(vec![
            Capability::new("cheap", Arc::new(ScriptedProvider::new("a", 1_000_000)), "openai/gpt-4o-mini"),
            Capability::new("dear", Arc::new(ScriptedProvider::new("b", 1_000_000)), "openai/gpt-4o"),
        ])
        .with_ledger(ledger.clone());

        let result = pipeline.handle(&Query::new("hello")).await.unwrap();
        // 500k in / 500k out each: 0.075 + 0.3, then 1.25 + 5.0
        assert!((result.estimated_cost_usd - 6.625).abs() < 1e-9);

        let rows = ledger.snapshot();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].backend, "cheap");
        assert_eq!(rows[0].tokens, 1_000_000);
        assert_eq!(ledger.totals().calls, 2);
    }

    #[tokio::test]
    async fn events_follow_the_request() {
        let pipeline = Pipeline::new(vec![
            capability("a", Arc::new(ScriptedProvider::new("ok", 1))),
            capability("b", Arc::new(FailingProvider::new())),
        ]);
        let mut rx = pipeline.events().subscribe();

        pipeline.handle(&Query::new("hello")).await.unwrap();

        let mut kinds = Vec::new();
        while let Ok(event) = rx.try_recv() {
            kinds.push(match event.as_ref() {
                DomainEvent::QueryClassified { .. } => "classified",
                DomainEvent::CandidateReceived { .. } => "candidate",
                DomainEvent::CapabilityFailed { .. } => "failed",
                DomainEvent::ResultSynthesized { .. } => "synthesized",
                _ => "other",
            });
        }
        assert_eq!(kinds, vec!["classified", "candidate", "failed", "synthesized"]);
    }

    #[test]
    fn prompt_without_background_is_the_text() {
        let empty = SearchResults {
            results: vec![],
            total_candidates: 0,
        };
        assert_eq!(build_prompt("plain", TopicDomain::General, &empty), "plain");
    }
}
