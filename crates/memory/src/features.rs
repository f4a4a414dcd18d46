//! Fixed-vocabulary feature vectors for the knowledge index.
//!
//! Each dimension counts (overlapping, case-insensitive) occurrences of one
//! vocabulary term. Stable across runs, no model required.

use chorus_core::text::count_overlapping;

/// Vocabulary terms, one per vector dimension.
pub const FEATURE_VOCABULARY: &[&str] = &[
    // programming
    "code", "function", "memory", "type", "compile", "rust", "python", "async",
    "thread", "algorithm", "data structure", "error",
    // systems
    "server", "network", "database", "deploy", "cache", "latency", "cloud",
    // science
    "energy", "experiment", "evidence", "quantum", "cell", "theory",
    // business
    "market", "customer", "revenue", "strategy", "growth", "cost",
    // human
    "emotion", "stress", "health", "symptom", "learn", "student",
    // reasoning
    "cause", "effect", "probability", "risk", "ethic", "meaning", "design",
    "story", "law", "contract",
];

/// Feature vector for arbitrary text. Length equals [`FEATURE_VOCABULARY`].
pub fn feature_vector(text: &str) -> Vec<f32> {
    let lower = text.to_lowercase();
    FEATURE_VOCABULARY
        .iter()
        .map(|term| count_overlapping(&lower, term) as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_has_vocabulary_dimensions() {
        assert_eq!(feature_vector("anything").len(), FEATURE_VOCABULARY.len());
    }

    #[test]
    fn counts_terms_case_insensitively() {
        let v = feature_vector("Rust code, more RUST code");
        let rust = FEATURE_VOCABULARY.iter().position(|t| *t == "rust").unwrap();
        let code = FEATURE_VOCABULARY.iter().position(|t| *t == "code").unwrap();
        assert_eq!(v[rust], 2.0);
        assert_eq!(v[code], 2.0);
    }

    #[test]
    fn unrelated_text_is_zero() {
        assert!(feature_vector("zzz qqq").iter().all(|x| *x == 0.0));
    }
}
