//! The classifier's output record and its enumerations.
//!
//! Enumeration order matters: ties during keyword scoring are broken by the
//! order of the `ALL` constants below.

use serde::{Deserialize, Serialize};

use crate::synthesis::SynthesisStrategy;

/// Reasoning category of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningCategory {
    Deductive,
    Inductive,
    Abductive,
    Analogical,
    Causal,
    Probabilistic,
    Scientific,
    Philosophical,
    /// Selected when no category keyword matches.
    General,
}

impl ReasoningCategory {
    /// The eight scored categories, in tie-break order.
    pub const SCORED: [ReasoningCategory; 8] = [
        ReasoningCategory::Deductive,
        ReasoningCategory::Inductive,
        ReasoningCategory::Abductive,
        ReasoningCategory::Analogical,
        ReasoningCategory::Causal,
        ReasoningCategory::Probabilistic,
        ReasoningCategory::Scientific,
        ReasoningCategory::Philosophical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deductive => "deductive",
            Self::Inductive => "inductive",
            Self::Abductive => "abductive",
            Self::Analogical => "analogical",
            Self::Causal => "causal",
            Self::Probabilistic => "probabilistic",
            Self::Scientific => "scientific",
            Self::Philosophical => "philosophical",
            Self::General => "general",
        }
    }
}

impl std::fmt::Display for ReasoningCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Topic domain of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicDomain {
    Programming,
    Science,
    Business,
    Creative,
    Technical,
    Philosophy,
    Psychology,
    Medicine,
    Law,
    Education,
    #[default]
    General,
}

impl TopicDomain {
    /// The ten scored domains, in tie-break order.
    pub const SCORED: [TopicDomain; 10] = [
        TopicDomain::Programming,
        TopicDomain::Science,
        TopicDomain::Business,
        TopicDomain::Creative,
        TopicDomain::Technical,
        TopicDomain::Philosophy,
        TopicDomain::Psychology,
        TopicDomain::Medicine,
        TopicDomain::Law,
        TopicDomain::Education,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Programming => "programming",
            Self::Science => "science",
            Self::Business => "business",
            Self::Creative => "creative",
            Self::Technical => "technical",
            Self::Philosophy => "philosophy",
            Self::Psychology => "psychology",
            Self::Medicine => "medicine",
            Self::Law => "law",
            Self::Education => "education",
            Self::General => "general",
        }
    }

    /// Parse a domain tag; unknown tags map to `General`.
    pub fn parse(tag: &str) -> Self {
        let tag = tag.trim().to_lowercase();
        Self::SCORED
            .into_iter()
            .find(|d| d.as_str() == tag)
            .unwrap_or(Self::General)
    }
}

impl std::fmt::Display for TopicDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complexity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityTier {
    Low,
    Medium,
    High,
}

impl ComplexityTier {
    /// Map a raw complexity score to a tier.
    pub fn from_score(score: i32) -> Self {
        if score >= 4 {
            Self::High
        } else if score >= 2 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// External tools the classifier can suggest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolName {
    WebSearch,
    CodeExecution,
    FileProcessing,
    ImageGeneration,
    Calculation,
    DataAnalysis,
    Translation,
    KnowledgeLookup,
}

impl ToolName {
    pub const ALL: [ToolName; 8] = [
        ToolName::WebSearch,
        ToolName::CodeExecution,
        ToolName::FileProcessing,
        ToolName::ImageGeneration,
        ToolName::Calculation,
        ToolName::DataAnalysis,
        ToolName::Translation,
        ToolName::KnowledgeLookup,
    ];

    /// The registry name a tool implementation is registered under.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WebSearch => "webSearch",
            Self::CodeExecution => "codeExecution",
            Self::FileProcessing => "fileProcessing",
            Self::ImageGeneration => "imageGeneration",
            Self::Calculation => "calculation",
            Self::DataAnalysis => "dataAnalysis",
            Self::Translation => "translation",
            Self::KnowledgeLookup => "knowledgeLookup",
        }
    }
}

impl std::fmt::Display for ToolName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ranked tool suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSuggestion {
    pub tool: ToolName,
    /// matched keywords / total keywords for the tool
    pub confidence: f64,
    /// static domain-weighted priority in [0, 1]
    pub priority: f64,
}

impl ToolSuggestion {
    /// Sort key: priority + confidence.
    pub fn rank(&self) -> f64 {
        self.priority + self.confidence
    }
}

/// Read-only classification of one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    pub category: ReasoningCategory,
    pub domain: TopicDomain,
    pub complexity: ComplexityTier,
    /// Synthesis strategy chosen from category and domain
    pub strategy: SynthesisStrategy,
    /// Ranked by priority + confidence, descending
    pub suggested_tools: Vec<ToolSuggestion>,
    pub information_gaps: Vec<String>,
    /// In [0.1, 1.0]
    pub confidence: f64,
}
