//! Synthesizer: reconcile candidate responses into one answer.
//!
//! Dispatch is an exhaustive `match` over [`SynthesisStrategy`]. Selection
//! strategies score every candidate and keep the first maximum; merge
//! strategies combine all of them. Confidence comes from the strategy,
//! never from the text.
//!
//! Input order matters only for tie-breaking, so callers pass candidates
//! in capability enumeration order.

pub mod merge;
pub mod scoring;

use chorus_core::synthesis::{
    CandidateResponse, SYNTHESIZED_SOURCE, SynthesisStrategy, SynthesizedResult,
};
use tracing::debug;

/// Produce the final answer, or `None` when there are no candidates.
pub fn synthesize(
    strategy: SynthesisStrategy,
    candidates: &[CandidateResponse],
) -> Option<SynthesizedResult> {
    match candidates {
        [] => None,
        [only] => Some(passthrough(strategy, only)),
        _ => Some(match strategy {
            SynthesisStrategy::Analytical
            | SynthesisStrategy::Logical
            | SynthesisStrategy::Causal
            | SynthesisStrategy::Probabilistic
            | SynthesisStrategy::Scientific
            | SynthesisStrategy::Philosophical
            | SynthesisStrategy::Empathetic => select(strategy, strategy, candidates, vec![]),
            SynthesisStrategy::Creative => combined(
                strategy,
                merge::creative(candidates),
                candidates,
                &["creative_concatenation"],
            ),
            SynthesisStrategy::Collaborative => combined(
                strategy,
                merge::collaborative(candidates),
                candidates,
                &["collaborative_line_extraction", "structured_summary"],
            ),
            SynthesisStrategy::Strategic => strategic(candidates),
        }),
    }
}

fn passthrough(strategy: SynthesisStrategy, candidate: &CandidateResponse) -> SynthesizedResult {
    SynthesizedResult {
        text: candidate.text.clone(),
        strategy,
        confidence: candidate.confidence,
        total_tokens: candidate.token_count,
        stages: vec!["single_candidate_passthrough".into()],
        source: candidate.source.clone(),
        method: "single candidate passed through unchanged".into(),
        candidates_considered: 1,
        estimated_cost_usd: 0.0,
        capability_failures: Vec::new(),
    }
}

/// Index of the first candidate with the maximum score.
pub fn best_index(candidates: &[CandidateResponse], score: fn(&str) -> f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, candidate) in candidates.iter().enumerate() {
        let s = score(&candidate.text);
        if best.is_none_or(|(_, b)| s > b) {
            best = Some((i, s));
        }
    }
    best.map(|(i, _)| i)
}

/// Selection under `scored_as`, reported as `strategy`.
fn select(
    strategy: SynthesisStrategy,
    scored_as: SynthesisStrategy,
    candidates: &[CandidateResponse],
    mut stages: Vec<String>,
) -> SynthesizedResult {
    let winner = scoring::scorer(scored_as)
        .and_then(|score| best_index(candidates, score))
        .unwrap_or(0);
    let chosen = &candidates[winner];

    debug!(
        strategy = %strategy,
        winner = %chosen.source,
        candidates = candidates.len(),
        "Candidate selected"
    );

    if strategy == scored_as {
        stages.push(format!("{}_scoring", scored_as.as_str()));
        stages.push("best_candidate_selection".into());
    } else {
        stages.push("strategic_fallback_selection".into());
    }

    SynthesizedResult {
        text: chosen.text.clone(),
        strategy,
        confidence: strategy.confidence(),
        total_tokens: chosen.token_count,
        stages,
        source: chosen.source.clone(),
        method: scored_as.method().into(),
        candidates_considered: candidates.len(),
        estimated_cost_usd: 0.0,
        capability_failures: Vec::new(),
    }
}

fn combined(
    strategy: SynthesisStrategy,
    text: String,
    candidates: &[CandidateResponse],
    stages: &[&str],
) -> SynthesizedResult {
    SynthesizedResult {
        text,
        strategy,
        confidence: strategy.confidence(),
        total_tokens: candidates.iter().map(|c| c.token_count).sum(),
        stages: stages.iter().map(|s| s.to_string()).collect(),
        source: SYNTHESIZED_SOURCE.into(),
        method: strategy.method().into(),
        candidates_considered: candidates.len(),
        estimated_cost_usd: 0.0,
        capability_failures: Vec::new(),
    }
}

fn strategic(candidates: &[CandidateResponse]) -> SynthesizedResult {
    let outline = merge::strategic_outline(candidates);
    if outline.is_empty() {
        debug!("No strategic structure found, selecting analytically");
        return select(
            SynthesisStrategy::Strategic,
            SynthesisStrategy::Analytical,
            candidates,
            vec!["strategic_extraction".into()],
        );
    }
    combined(
        SynthesisStrategy::Strategic,
        outline.render(),
        candidates,
        &["strategic_extraction", "structured_render"],
    )
}
