//! Request classifier: a deterministic keyword heuristic.
//!
//! [`classify`] is a pure function of the query text and the number of
//! prior context turns. It never fails and never calls out.

pub mod keywords;

use chorus_core::classification::{
    ClassificationRecord, ComplexityTier, ReasoningCategory, ToolName, ToolSuggestion, TopicDomain,
};
use chorus_core::synthesis::SynthesisStrategy;
use chorus_core::text::{count_overlapping, keyword_hits, word_count, word_set};

use keywords::*;

/// Classify a query.
pub fn classify(text: &str, context_len: usize) -> ClassificationRecord {
    let lower = text.to_lowercase();
    let words = word_count(text);

    let category = reasoning_category(&lower);
    let domain = topic_domain(&lower);

    ClassificationRecord {
        category,
        domain,
        complexity: complexity(&lower, words),
        strategy: SynthesisStrategy::select(category, domain),
        suggested_tools: suggest_tools(&lower, domain),
        information_gaps: information_gaps(&lower, words, domain, context_len),
        confidence: confidence(&lower, words, context_len),
    }
}

/// Highest nonzero score wins; the first in enumeration order takes ties.
fn best_scoring<T: Copy>(candidates: &[T], score: impl Fn(T) -> usize) -> Option<T> {
    let mut best: Option<(T, usize)> = None;
    for &candidate in candidates {
        let s = score(candidate);
        if s > 0 && best.is_none_or(|(_, b)| s > b) {
            best = Some((candidate, s));
        }
    }
    best.map(|(c, _)| c)
}

pub fn reasoning_category(lower: &str) -> ReasoningCategory {
    best_scoring(&ReasoningCategory::SCORED, |c| {
        keyword_hits(lower, category_keywords(c))
    })
    .unwrap_or(ReasoningCategory::General)
}

pub fn topic_domain(lower: &str) -> TopicDomain {
    best_scoring(&TopicDomain::SCORED, |d| keyword_hits(lower, domain_keywords(d)))
        .unwrap_or(TopicDomain::General)
}

fn matched(lower: &str, keywords: &[&str]) -> usize {
    keywords
        .iter()
        .filter(|k| count_overlapping(lower, k) > 0)
        .count()
}

fn sentence_count(text: &str) -> usize {
    text.split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .count()
}

pub fn complexity_score(lower: &str, words: usize) -> i32 {
    let mut score = 0i32;
    if words > 50 {
        score += 2;
    } else if words > 20 {
        score += 1;
    }
    if sentence_count(lower) > 3 {
        score += 1;
    }
    score += 2 * matched(lower, HIGH_COMPLEXITY) as i32;
    score += matched(lower, MEDIUM_COMPLEXITY) as i32;
    score -= matched(lower, LOW_COMPLEXITY) as i32;
    score
}

fn complexity(lower: &str, words: usize) -> ComplexityTier {
    ComplexityTier::from_score(complexity_score(lower, words))
}

/// Tools with at least one matching keyword, best first.
pub fn suggest_tools(lower: &str, domain: TopicDomain) -> Vec<ToolSuggestion> {
    let mut suggestions: Vec<ToolSuggestion> = ToolName::ALL
        .into_iter()
        .filter_map(|tool| {
            let keywords = tool_keywords(tool);
            let hits = matched(lower, keywords);
            (hits > 0).then(|| ToolSuggestion {
                tool,
                confidence: hits as f64 / keywords.len() as f64,
                priority: tool_priority(domain, tool),
            })
        })
        .collect();

    // stable: equal ranks keep enumeration order
    suggestions.sort_by(|a, b| {
        b.rank()
            .partial_cmp(&a.rank())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    suggestions
}

pub fn information_gaps(
    lower: &str,
    words: usize,
    domain: TopicDomain,
    context_len: usize,
) -> Vec<String> {
    let mut gaps = Vec::new();
    let vocabulary = word_set(lower);

    if context_len == 0 {
        let vague: Vec<&str> = VAGUE_PRONOUNS
            .iter()
            .copied()
            .filter(|p| vocabulary.contains(*p))
            .collect();
        if !vague.is_empty() {
            gaps.push(format!(
                "Unresolved reference ({}) with no prior conversation",
                vague.join(", ")
            ));
        }
    }

    match domain {
        TopicDomain::Programming => {
            if matched(lower, PROGRAMMING_LANGUAGES) == 0 {
                gaps.push("Programming language not specified".into());
            }
            if matched(lower, PROGRAMMING_PROBLEMS) == 0 {
                gaps.push("Problem type not specified (error, performance, design...)".into());
            }
        }
        TopicDomain::Technical => {
            if !PLATFORMS.iter().any(|p| vocabulary.contains(*p)) {
                gaps.push("Platform or environment not specified".into());
            }
        }
        _ => {}
    }

    let opener = lower.trim_start();
    if words < 10 && BRIEF_OPENERS.iter().any(|o| opener.starts_with(o)) {
        gaps.push("Brief request; desired scope or depth is unclear".into());
    }

    gaps
}

pub fn confidence(lower: &str, words: usize, context_len: usize) -> f64 {
    let mut confidence = 0.5;
    confidence += (0.05 * context_len as f64).min(0.3);
    if (10..=50).contains(&words) {
        confidence += 0.2;
    }
    confidence -= 0.1 * keyword_hits(lower, VAGUE_MARKERS) as f64;
    confidence.clamp(0.1, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn why_query_is_causal() {
        let record = classify("Why does this algorithm run slowly?", 0);
        assert_eq!(record.category, ReasoningCategory::Causal);
        assert_eq!(record.domain, TopicDomain::Programming);
        assert_eq!(record.strategy, SynthesisStrategy::Causal);
    }

    #[test]
    fn image_request_ranks_image_generation_first() {
        let record = classify("create an image of a sunset", 0);
        assert_eq!(record.domain, TopicDomain::Creative);

        let tools: Vec<ToolName> = record.suggested_tools.iter().map(|s| s.tool).collect();
        let image = tools
            .iter()
            .position(|t| *t == ToolName::ImageGeneration)
            .expect("imageGeneration suggested");
        if let Some(calc) = tools.iter().position(|t| *t == ToolName::Calculation) {
            assert!(image < calc);
        }
    }

    #[test]
    fn image_outranks_calculation_when_both_match() {
        let record = classify("create an image of a sunset and calculate how many colors", 0);
        assert_eq!(record.domain, TopicDomain::Creative);
        let tools: Vec<ToolName> = record.suggested_tools.iter().map(|s| s.tool).collect();
        let image = tools.iter().position(|t| *t == ToolName::ImageGeneration).unwrap();
        let calc = tools.iter().position(|t| *t == ToolName::Calculation).unwrap();
        assert!(image < calc);
    }

    #[test]
    fn short_plain_queries_are_low_complexity() {
        for q in ["hi there", "tell me a joke", "Good morning to you all", "a. b. c. d. e."] {
            assert_eq!(classify(q, 0).complexity, ComplexityTier::Low, "{q}");
        }
    }

    #[test]
    fn complexity_scoring() {
        // compare +2, evaluate +2, explain +1, design(s) +1
        let lower = "compare and evaluate these designs, then explain";
        assert_eq!(complexity_score(lower, 7), 6);
        assert_eq!(classify(lower, 0).complexity, ComplexityTier::High);

        // "what is" −1, "define" −1
        assert_eq!(complexity_score("what is x? define y", 5), -2);

        let long = "word ".repeat(51);
        assert_eq!(complexity_score(&long, 51), 2);
        let medium = "word ".repeat(21);
        assert_eq!(complexity_score(&medium, 21), 1);
    }

    #[test]
    fn ties_break_by_enumeration_order() {
        // "prove" (deductive) and "pattern" (inductive) score 1 each
        assert_eq!(
            reasoning_category("prove the pattern"),
            ReasoningCategory::Deductive
        );
        // "code" (programming) and "market" (business)
        assert_eq!(topic_domain("code for the market"), TopicDomain::Programming);
    }

    #[test]
    fn overlapping_matches_count() {
        // "why" twice outweighs one "pattern"
        assert_eq!(
            reasoning_category("why, why is there a pattern"),
            ReasoningCategory::Causal
        );
    }

    #[test]
    fn no_keywords_fall_back_to_general() {
        let record = classify("hello there", 0);
        assert_eq!(record.category, ReasoningCategory::General);
        assert_eq!(record.domain, TopicDomain::General);
        assert_eq!(record.strategy, SynthesisStrategy::Analytical);
    }

    #[test]
    fn general_business_query_is_strategic() {
        let record = classify("Plan our startup revenue", 0);
        assert_eq!(record.category, ReasoningCategory::General);
        assert_eq!(record.domain, TopicDomain::Business);
        assert_eq!(record.strategy, SynthesisStrategy::Strategic);
    }

    #[test]
    fn information_gaps_detected() {
        let record = classify("What is it?", 0);
        assert!(record.information_gaps.iter().any(|g| g.contains("Unresolved reference")));
        assert!(record.information_gaps.iter().any(|g| g.contains("Brief request")));

        let with_context = classify("What is it?", 2);
        assert!(!with_context.information_gaps.iter().any(|g| g.contains("Unresolved")));

        let code = classify("my function has a bug", 0);
        assert!(code.information_gaps.iter().any(|g| g.contains("language not specified")));
        assert!(!code.information_gaps.iter().any(|g| g.contains("Problem type")));

        let infra = classify("how should I deploy the server", 0);
        assert!(infra.information_gaps.iter().any(|g| g.contains("Platform")));
        let linux = classify("how should I deploy the server on linux", 0);
        assert!(!linux.information_gaps.iter().any(|g| g.contains("Platform")));
    }

    #[test]
    fn confidence_formula() {
        // base only
        assert!((confidence("hi", 1, 0) - 0.5).abs() < 1e-9);
        // context capped at +0.3, word window +0.2
        assert!((confidence("x", 12, 10) - 1.0).abs() < 1e-9);
        // two vague markers
        assert!((confidence("maybe perhaps", 2, 0) - 0.3).abs() < 1e-9);
        // clamped at the floor
        assert!((confidence("maybe maybe maybe maybe maybe", 5, 0) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn classification_is_deterministic() {
        let q = "Compare the probability of failure between two database designs on linux";
        assert_eq!(classify(q, 3), classify(q, 3));
    }
}
