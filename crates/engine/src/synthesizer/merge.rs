//! Merge strategies: combine every candidate into one document.

use std::collections::HashSet;

use chorus_core::synthesis::CandidateResponse;
use regex_lite::Regex;

use super::scoring::is_list_line;

pub const CREATIVE_SEPARATOR: &str = "\n\n---\n\n";

const KEY_LINE_MARKERS: &[&str] = &["key", "important", "should", "recommend", "because", "note"];

pub fn creative(candidates: &[CandidateResponse]) -> String {
    candidates
        .iter()
        .map(|c| c.text.trim())
        .collect::<Vec<_>>()
        .join(CREATIVE_SEPARATOR)
}

/// Lines worth keeping from one candidate: marker lines and list items,
/// or the first non-empty line when nothing else qualifies.
pub fn key_lines(text: &str) -> Vec<&str> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let picked: Vec<&str> = lines
        .iter()
        .copied()
        .filter(|line| {
            let lower = line.to_lowercase();
            is_list_line(line) || KEY_LINE_MARKERS.iter().any(|m| lower.contains(m))
        })
        .collect();

    if picked.is_empty() {
        lines.into_iter().take(1).collect()
    } else {
        picked
    }
}

pub fn collaborative(candidates: &[CandidateResponse]) -> String {
    let mut out = String::from("## Combined perspectives\n");
    for candidate in candidates {
        let lines = key_lines(&candidate.text);
        if lines.is_empty() {
            continue;
        }
        out.push_str(&format!("\n### Perspective from {}\n", candidate.source));
        for line in lines {
            out.push_str(line);
            out.push('\n');
        }
    }
    out.trim_end().to_string()
}

/// Goals, steps and considerations pulled out of the candidates.
#[derive(Debug, Default, PartialEq)]
pub struct StrategicOutline {
    pub goals: Vec<String>,
    pub steps: Vec<String>,
    pub considerations: Vec<String>,
}

impl StrategicOutline {
    pub fn is_empty(&self) -> bool {
        self.goals.is_empty() && self.steps.is_empty() && self.considerations.is_empty()
    }

    pub fn render(&self) -> String {
        let mut sections = Vec::new();
        if !self.goals.is_empty() {
            let body: Vec<String> = self.goals.iter().map(|g| format!("- {g}")).collect();
            sections.push(format!("## Goals\n{}", body.join("\n")));
        }
        if !self.steps.is_empty() {
            let body: Vec<String> = self
                .steps
                .iter()
                .enumerate()
                .map(|(i, s)| format!("{}. {s}", i + 1))
                .collect();
            sections.push(format!("## Steps\n{}", body.join("\n")));
        }
        if !self.considerations.is_empty() {
            let body: Vec<String> = self.considerations.iter().map(|c| format!("- {c}")).collect();
            sections.push(format!("## Considerations\n{}", body.join("\n")));
        }
        sections.join("\n\n")
    }
}

const GOAL_PATTERN: &str = r"(?i)^\s*(?:[-*•]\s*)?(?:goal|objective|aim)s?\s*[:\-]\s*(.+)$";
const STEP_PATTERN: &str = r"(?i)^\s*(?:\d+[.)]\s+|step\s+\d+\s*[:.\-]?\s*)(.+)$";
const CONSIDER_PATTERN: &str = r"(?i)^\s*(?:[-*•]\s*)?(consider\b.+)$";

/// Extract and union the outline across candidates, dropping
/// case-insensitive duplicates while keeping first-seen order.
pub fn strategic_outline(candidates: &[CandidateResponse]) -> StrategicOutline {
    let (Ok(goal), Ok(step), Ok(consider)) = (
        Regex::new(GOAL_PATTERN),
        Regex::new(STEP_PATTERN),
        Regex::new(CONSIDER_PATTERN),
    ) else {
        return StrategicOutline::default();
    };

    let mut outline = StrategicOutline::default();
    let mut seen: [HashSet<String>; 3] = Default::default();

    for candidate in candidates {
        for line in candidate.text.lines() {
            let (slot, bucket) = if let Some(c) = goal.captures(line) {
                (c.get(1), 0)
            } else if let Some(c) = step.captures(line) {
                (c.get(1), 1)
            } else if let Some(c) = consider.captures(line) {
                (c.get(1), 2)
            } else {
                continue;
            };
            let Some(text) = slot.map(|m| m.as_str().trim()) else {
                continue;
            };
            if text.is_empty() || !seen[bucket].insert(text.to_lowercase()) {
                continue;
            }
            let target = match bucket {
                0 => &mut outline.goals,
                1 => &mut outline.steps,
                _ => &mut outline.considerations,
            };
            target.push(text.to_string());
        }
    }
    outline
}
