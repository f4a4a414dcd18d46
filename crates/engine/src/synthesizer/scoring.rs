//! Per-strategy text scorers for the selection strategies.
//!
//! Each scorer is a sum of vocabulary hit counts (case-insensitive,
//! overlapping) plus, for analytical, structure and depth terms.

use chorus_core::synthesis::SynthesisStrategy;
use chorus_core::text::{keyword_hits, word_count};

const ANALYSIS_VOCABULARY: &[&str] = &[
    "analysis", "because", "therefore", "however", "factor", "consider", "compare",
    "evidence", "result", "impact", "trade-off", "overall",
];

const LOGICAL_CONNECTIVES: &[&str] = &[
    "therefore", "thus", "hence", "consequently", "because", "since", "if ", "then",
    "implies", "it follows",
];
const LOGICAL_PREMISES: &[&str] = &[
    "premise", "assume", "given that", "conclusion", "valid", "necessarily",
];

const CAUSE_VOCABULARY: &[&str] = &[
    "because", "cause", "due to", "leads to", "results in", "effect", "consequence",
];
const MECHANISM_VOCABULARY: &[&str] = &[
    "mechanism", "process", "trigger", "bottleneck", "factor", "driven by", "pathway",
    "contention",
];

const PROBABILITY_VOCABULARY: &[&str] = &[
    "probab", "likely", "chance", "odds", "percent", "%", "risk", "expected",
];
const UNCERTAINTY_VOCABULARY: &[&str] = &[
    "uncertain", "confidence", "variance", "estimate", "range", "approximately",
    "distribution",
];

const EVIDENCE_VOCABULARY: &[&str] = &["evidence", "data", "study", "studies", "observ", "measure"];
const METHOD_VOCABULARY: &[&str] = &[
    "method", "experiment", "hypothesis", "control", "sample", "variable",
];
const REPRODUCIBILITY_VOCABULARY: &[&str] = &[
    "reproduc", "replicat", "peer review", "consistent", "verified",
];

const ETHICS_VOCABULARY: &[&str] = &["ethic", "moral", "virtue", "duty", "right and wrong", "justice"];
const METAPHYSICS_VOCABULARY: &[&str] = &[
    "exist", "reality", "being", "conscious", "nature of", "metaphysic",
];
const EPISTEMOLOGY_VOCABULARY: &[&str] = &[
    "knowledge", "truth", "belief", "justif", "certainty", "epistem",
];

const EMPATHY_VOCABULARY: &[&str] = &[
    "understand", "feel", "sorry", "support", "valid", "care", "together", "it's okay",
    "it is okay", "difficult", "hear you", "not alone", "compassion",
];

/// Lines that look like list items: `-`, `*`, `•`, `1.` or `1)`.
pub fn is_list_line(line: &str) -> bool {
    let line = line.trim_start();
    if line.starts_with("- ") || line.starts_with("* ") || line.starts_with('•') {
        return true;
    }
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    digits > 0 && matches!(line[digits..].chars().next(), Some('.') | Some(')'))
}

pub fn analytical(text: &str) -> f64 {
    let lower = text.to_lowercase();
    let structure = text.lines().filter(|l| is_list_line(l)).count() as f64;
    let vocabulary = keyword_hits(&lower, ANALYSIS_VOCABULARY) as f64;
    let depth = (word_count(text) as f64 / 100.0).min(3.0);
    structure + vocabulary + depth
}

pub fn logical(text: &str) -> f64 {
    let lower = text.to_lowercase();
    (keyword_hits(&lower, LOGICAL_CONNECTIVES) + keyword_hits(&lower, LOGICAL_PREMISES)) as f64
}

pub fn causal(text: &str) -> f64 {
    let lower = text.to_lowercase();
    (keyword_hits(&lower, CAUSE_VOCABULARY) + keyword_hits(&lower, MECHANISM_VOCABULARY)) as f64
}

pub fn probabilistic(text: &str) -> f64 {
    let lower = text.to_lowercase();
    (keyword_hits(&lower, PROBABILITY_VOCABULARY) + keyword_hits(&lower, UNCERTAINTY_VOCABULARY))
        as f64
}

pub fn scientific(text: &str) -> f64 {
    let lower = text.to_lowercase();
    (keyword_hits(&lower, EVIDENCE_VOCABULARY)
        + keyword_hits(&lower, METHOD_VOCABULARY)
        + keyword_hits(&lower, REPRODUCIBILITY_VOCABULARY)) as f64
}

pub fn philosophical(text: &str) -> f64 {
    let lower = text.to_lowercase();
    (keyword_hits(&lower, ETHICS_VOCABULARY)
        + keyword_hits(&lower, METAPHYSICS_VOCABULARY)
        + keyword_hits(&lower, EPISTEMOLOGY_VOCABULARY)) as f64
}

pub fn empathetic(text: &str) -> f64 {
    keyword_hits(&text.to_lowercase(), EMPATHY_VOCABULARY) as f64
}

/// Scorer for a selection strategy; `None` for merge strategies.
pub fn scorer(strategy: SynthesisStrategy) -> Option<fn(&str) -> f64> {
    match strategy {
        SynthesisStrategy::Analytical => Some(analytical),
        SynthesisStrategy::Logical => Some(logical),
        SynthesisStrategy::Causal => Some(causal),
        SynthesisStrategy::Probabilistic => Some(probabilistic),
        SynthesisStrategy::Scientific => Some(scientific),
        SynthesisStrategy::Philosophical => Some(philosophical),
        SynthesisStrategy::Empathetic => Some(empathetic),
        SynthesisStrategy::Creative
        | SynthesisStrategy::Collaborative
        | SynthesisStrategy::Strategic => None,
    }
}
