//! Candidate responses, synthesis strategies, and the final result.

use serde::{Deserialize, Serialize};

use crate::classification::{ReasoningCategory, TopicDomain};
use crate::error::CapabilityFailure;

/// Source attribution for results that combine several candidates.
pub const SYNTHESIZED_SOURCE: &str = "synthesized";

/// One successful capability invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateResponse {
    /// Capability tag (configured name)
    pub source: String,
    /// Position of the capability in configuration order
    pub capability_index: usize,
    /// Model that produced the text
    pub model: String,
    pub text: String,
    pub token_count: u32,
    pub latency_ms: u64,
    /// Capability-assigned confidence
    pub confidence: f64,
}

/// How multiple candidates are reconciled.
///
/// Closed set: adding a strategy forces every `match` below to handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthesisStrategy {
    Analytical,
    Logical,
    Causal,
    Probabilistic,
    Scientific,
    Philosophical,
    Creative,
    Collaborative,
    Strategic,
    Empathetic,
}

impl SynthesisStrategy {
    /// Pick the strategy for a classified request.
    pub fn select(category: ReasoningCategory, domain: TopicDomain) -> Self {
        match category {
            ReasoningCategory::Deductive => Self::Logical,
            ReasoningCategory::Inductive => Self::Analytical,
            ReasoningCategory::Abductive => Self::Collaborative,
            ReasoningCategory::Analogical => Self::Creative,
            ReasoningCategory::Causal => Self::Causal,
            ReasoningCategory::Probabilistic => Self::Probabilistic,
            ReasoningCategory::Scientific => Self::Scientific,
            ReasoningCategory::Philosophical => Self::Philosophical,
            ReasoningCategory::General => match domain {
                TopicDomain::Business => Self::Strategic,
                TopicDomain::Psychology | TopicDomain::Medicine => Self::Empathetic,
                TopicDomain::Creative => Self::Creative,
                TopicDomain::Education => Self::Collaborative,
                TopicDomain::Programming
                | TopicDomain::Science
                | TopicDomain::Technical
                | TopicDomain::Philosophy
                | TopicDomain::Law
                | TopicDomain::General => Self::Analytical,
            },
        }
    }

    /// Fixed confidence attached to results of this strategy.
    pub fn confidence(&self) -> f64 {
        match self {
            Self::Analytical => 0.85,
            Self::Logical => 0.90,
            Self::Causal => 0.86,
            Self::Probabilistic => 0.82,
            Self::Scientific => 0.88,
            Self::Philosophical => 0.80,
            Self::Creative => 0.75,
            Self::Collaborative => 0.80,
            Self::Strategic => 0.83,
            Self::Empathetic => 0.78,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Analytical => "analytical",
            Self::Logical => "logical",
            Self::Causal => "causal",
            Self::Probabilistic => "probabilistic",
            Self::Scientific => "scientific",
            Self::Philosophical => "philosophical",
            Self::Creative => "creative",
            Self::Collaborative => "collaborative",
            Self::Strategic => "strategic",
            Self::Empathetic => "empathetic",
        }
    }

    /// Human-readable description of how the answer was produced.
    pub fn method(&self) -> &'static str {
        match self {
            Self::Analytical => "highest analytical score (structure, analysis vocabulary, depth)",
            Self::Logical => "highest logical score (connectives and premises)",
            Self::Causal => "highest causal score (cause-effect and mechanism vocabulary)",
            Self::Probabilistic => "highest probabilistic score (likelihood and uncertainty vocabulary)",
            Self::Scientific => "highest scientific score (evidence, method, reproducibility)",
            Self::Philosophical => "highest philosophical score (ethics, metaphysics, epistemology)",
            Self::Creative => "concatenation of all candidates",
            Self::Collaborative => "structured summary of key lines from each candidate",
            Self::Strategic => "union of goals, steps, and considerations",
            Self::Empathetic => "highest empathy vocabulary score",
        }
    }
}

impl std::fmt::Display for SynthesisStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The pipeline's final answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesizedResult {
    pub text: String,
    pub strategy: SynthesisStrategy,
    pub confidence: f64,
    pub total_tokens: u32,
    /// Processing-stage labels, in the order they ran
    pub stages: Vec<String>,
    /// Capability tag, or `"synthesized"` when candidates were combined
    pub source: String,
    /// Explanation of the selection method
    pub method: String,
    /// Number of successful candidates that fed synthesis
    pub candidates_considered: usize,
    /// Estimated spend across all successful candidates
    #[serde(default)]
    pub estimated_cost_usd: f64,
    /// Capabilities that failed during fan-out
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capability_failures: Vec<CapabilityFailure>,
}

impl SynthesizedResult {
    /// Whether a stage label was recorded.
    pub fn has_stage(&self, stage: &str) -> bool {
        self.stages.iter().any(|s| s == stage)
    }
}
