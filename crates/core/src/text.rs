//! Small text utilities shared by the classifier, synthesizer, and indexes.

use std::collections::HashSet;

/// Count case-insensitive occurrences of `needle` in `haystack`, allowing
/// overlapping matches. `haystack_lower` must already be lowercased.
pub fn count_overlapping(haystack_lower: &str, needle: &str) -> usize {
    let needle = needle.to_lowercase();
    if needle.is_empty() {
        return 0;
    }
    let mut count = 0;
    let mut start = 0;
    while let Some(pos) = haystack_lower[start..].find(&needle) {
        count += 1;
        let at = start + pos;
        // advance one character so overlapping matches are counted
        let step = haystack_lower[at..].chars().next().map_or(1, char::len_utf8);
        start = at + step;
    }
    count
}

/// Sum of overlapping occurrence counts for every keyword.
pub fn keyword_hits(haystack_lower: &str, keywords: &[&str]) -> usize {
    keywords
        .iter()
        .map(|k| count_overlapping(haystack_lower, k))
        .sum()
}

/// Whitespace-separated word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Lowercased alphanumeric words, in order.
pub fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Distinct lowercased words.
pub fn word_set(text: &str) -> HashSet<String> {
    words(text).into_iter().collect()
}

/// Index terms: lowercased words longer than two characters.
pub fn index_terms(text: &str) -> Vec<String> {
    words(text).into_iter().filter(|w| w.chars().count() > 2).collect()
}
