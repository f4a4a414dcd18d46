//! Fixed keyword tables for the request classifier.
//!
//! Matching is case-insensitive substring counting, so stems such as
//! `"ethic"` or `"reproducib"` cover their inflections.

use chorus_core::classification::{ReasoningCategory, ToolName, TopicDomain};

pub fn category_keywords(category: ReasoningCategory) -> &'static [&'static str] {
    match category {
        ReasoningCategory::Deductive => &[
            "therefore", "must be", "logically", "prove", "if and only if", "premise",
            "conclude", "necessarily", "follows that", "syllogism",
        ],
        ReasoningCategory::Inductive => &[
            "pattern", "trend", "generally", "usually", "based on examples", "observed",
            "typically", "generalize", "most cases",
        ],
        ReasoningCategory::Abductive => &[
            "best explanation", "most likely", "hypothesis", "diagnose", "what could explain",
            "possible reason", "infer", "clue",
        ],
        ReasoningCategory::Analogical => &[
            "similar to", "like a", "analogy", "compared to", "resembles", "metaphor",
            "just as", "parallel",
        ],
        ReasoningCategory::Causal => &[
            "why", "cause", "because", "effect", "leads to", "result in", "due to", "impact",
            "consequence",
        ],
        ReasoningCategory::Probabilistic => &[
            "probability", "chance", "odds", "risk", "likelihood", "percent", "uncertain",
            "estimate", "statistic",
        ],
        ReasoningCategory::Scientific => &[
            "experiment", "evidence", "research", "scientific", "data", "measure", "study",
            "peer review", "reproducib",
        ],
        ReasoningCategory::Philosophical => &[
            "meaning", "ethic", "moral", "exist", "consciousness", "truth", "free will",
            "purpose", "metaphysic",
        ],
        ReasoningCategory::General => &[],
    }
}

pub fn domain_keywords(domain: TopicDomain) -> &'static [&'static str] {
    match domain {
        TopicDomain::Programming => &[
            "code", "program", "function", "algorithm", "bug", "debug", "compile", "python",
            "rust", "javascript", "software", "variable", "refactor", "library",
        ],
        TopicDomain::Science => &[
            "physics", "chemistry", "biology", "experiment", "molecule", "energy", "scientific",
            "quantum", "atom", "cells", "evolution", "climate",
        ],
        TopicDomain::Business => &[
            "market", "revenue", "strategy", "customer", "business", "profit", "startup",
            "sales", "investment", "pricing", "competitor",
        ],
        TopicDomain::Creative => &[
            "story", "poem", "create", "image", "design", "artwork", "draw", "paint",
            "imagine", "creative", "music", "novel",
        ],
        TopicDomain::Technical => &[
            "server", "network", "database", "hardware", "install", "configure", "deploy",
            "linux", "cloud", "docker", "kubernetes", "infrastructure",
        ],
        TopicDomain::Philosophy => &[
            "philosoph", "ethic", "moral", "existential", "consciousness", "free will",
            "meaning of life", "metaphysic", "epistemolog", "virtue",
        ],
        TopicDomain::Psychology => &[
            "feel", "emotion", "anxiety", "stress", "behavior", "mental", "motivation",
            "relationship", "therapy",
        ],
        TopicDomain::Medicine => &[
            "symptom", "disease", "treatment", "doctor", "medication", "diagnosis", "health",
            "illness",
        ],
        TopicDomain::Law => &[
            "law", "legal", "contract", "court", "rights", "regulation", "liability", "lawsuit",
        ],
        TopicDomain::Education => &[
            "learn", "teach", "student", "course", "exam", "lesson", "school", "curriculum",
            "homework",
        ],
        TopicDomain::General => &[],
    }
}

/// +2 each when present.
pub const HIGH_COMPLEXITY: &[&str] = &[
    "analyze", "compare", "evaluate", "optimize", "architecture", "comprehensive",
    "in-depth", "trade-off", "implications", "synthesize",
];

/// +1 each when present.
pub const MEDIUM_COMPLEXITY: &[&str] = &[
    "explain", "describe", "how does", "difference", "summarize", "implement", "design",
];

/// −1 each when present.
pub const LOW_COMPLEXITY: &[&str] = &["what is", "define", "list", "simple", "quick", "hello"];

pub fn tool_keywords(tool: ToolName) -> &'static [&'static str] {
    match tool {
        ToolName::WebSearch => &[
            "search", "latest", "news", "current", "today", "look up", "find online", "recent",
        ],
        ToolName::CodeExecution => &[
            "run", "execute", "code", "script", "output of", "compile", "test this",
        ],
        ToolName::FileProcessing => &[
            "file", "pdf", "csv", "document", "upload", "spreadsheet", "parse",
        ],
        ToolName::ImageGeneration => &[
            "image", "picture", "draw", "illustration", "photo", "logo", "visual", "sketch",
        ],
        ToolName::Calculation => &[
            "calculate", "compute", "how much", "how many", "total", "percent", "equation",
            "math", "multiply", "divide",
        ],
        ToolName::DataAnalysis => &[
            "data", "analyze", "statistics", "chart", "trend", "dataset", "correlation", "graph",
        ],
        ToolName::Translation => &[
            "translate", "translation", "in spanish", "in french", "in german", "in japanese",
            "meaning of the word",
        ],
        ToolName::KnowledgeLookup => &[
            "what is", "define", "explain", "who is", "history of", "tell me about", "overview",
        ],
    }
}

/// Static priority of a tool for a domain, in [0, 1].
pub fn tool_priority(domain: TopicDomain, tool: ToolName) -> f64 {
    // columns follow ToolName::ALL
    let row: [f64; 8] = match domain {
        TopicDomain::Programming => [0.6, 0.9, 0.6, 0.2, 0.5, 0.5, 0.3, 0.7],
        TopicDomain::Science => [0.7, 0.5, 0.5, 0.3, 0.8, 0.8, 0.3, 0.8],
        TopicDomain::Business => [0.8, 0.3, 0.6, 0.4, 0.8, 0.9, 0.4, 0.6],
        TopicDomain::Creative => [0.5, 0.2, 0.3, 0.9, 0.2, 0.2, 0.5, 0.4],
        TopicDomain::Technical => [0.7, 0.8, 0.7, 0.2, 0.5, 0.6, 0.3, 0.7],
        TopicDomain::Philosophy => [0.5, 0.1, 0.3, 0.2, 0.1, 0.2, 0.4, 0.9],
        TopicDomain::Psychology => [0.6, 0.1, 0.3, 0.3, 0.2, 0.5, 0.3, 0.8],
        TopicDomain::Medicine => [0.8, 0.1, 0.5, 0.3, 0.4, 0.6, 0.3, 0.9],
        TopicDomain::Law => [0.8, 0.1, 0.7, 0.1, 0.3, 0.3, 0.5, 0.9],
        TopicDomain::Education => [0.6, 0.5, 0.4, 0.5, 0.6, 0.4, 0.6, 0.8],
        TopicDomain::General => [0.6, 0.4, 0.4, 0.5, 0.5, 0.5, 0.5, 0.6],
    };
    let column = ToolName::ALL
        .iter()
        .position(|t| *t == tool)
        .unwrap_or_default();
    row[column]
}

pub const VAGUE_PRONOUNS: &[&str] = &["it", "this", "that", "they", "them"];

pub const VAGUE_MARKERS: &[&str] = &[
    "maybe", "perhaps", "might", "possibly", "somehow", "not sure", "kind of", "sort of",
];

pub const PROGRAMMING_LANGUAGES: &[&str] = &[
    "python", "rust", "javascript", "typescript", "java", "c++", "c#", "golang", "ruby", "php",
    "swift", "kotlin", "sql", "haskell",
];

pub const PROGRAMMING_PROBLEMS: &[&str] = &[
    "error", "bug", "performance", "slow", "design", "implement", "optimize", "test", "debug",
    "crash", "fail", "refactor",
];

pub const PLATFORMS: &[&str] = &[
    "linux", "windows", "macos", "mac", "ubuntu", "debian", "aws", "azure", "gcp", "docker",
    "kubernetes", "android", "ios",
];

pub const BRIEF_OPENERS: &[&str] = &["how to", "what is", "explain"];
