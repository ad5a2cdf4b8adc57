//! Natural ("human") sort keys.
//!
//! Digit runs compare as numbers and everything else compares
//! case-insensitively, so `item2` sorts before `item10`.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("DIGIT_RUN regex is invalid"));

/// A run of decimal digits compared by numeric value, with no upper bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digits(String);

impl Digits {
    fn new(run: &str) -> Self {
        let trimmed = run.trim_start_matches('0');
        Self(if trimmed.is_empty() { "0" } else { trimmed }.to_string())
    }
}

impl Ord for Digits {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Digits {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One field of a natural key. Numbers order before text at the same
/// position.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Segment {
    Number(Digits),
    Text(String),
}

/// Comparison key made of alternating text and number segments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalKey(Vec<Segment>);

impl NaturalKey {
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }
}

/// Split `text` on maximal digit runs. Text runs are lowercased.
pub fn natural_key(text: &str) -> NaturalKey {
    let mut segments = Vec::new();
    let mut last = 0;
    for run in DIGIT_RUN.find_iter(text) {
        if run.start() > last {
            segments.push(Segment::Text(text[last..run.start()].to_lowercase()));
        }
        segments.push(Segment::Number(Digits::new(run.as_str())));
        last = run.end();
    }
    if last < text.len() {
        segments.push(Segment::Text(text[last..].to_lowercase()));
    }
    NaturalKey(segments)
}

pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_key(a).cmp(&natural_key(b))
}

/// Stable natural sort of strings.
pub fn sort_natural<S: AsRef<str>>(items: &mut [S]) {
    items.sort_by_cached_key(|s| natural_key(s.as_ref()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_keys() {
        let mut keys = vec!["a3", "1", "5", "11", "20", "a1", "a10"];
        sort_natural(&mut keys);
        assert_eq!(keys, vec!["1", "5", "11", "20", "a1", "a3", "a10"]);
    }

    #[test]
    fn test_segments() {
        let key = natural_key("Item10b");
        assert_eq!(
            key.segments(),
            &[
                Segment::Text("item".to_string()),
                Segment::Number(Digits::new("10")),
                Segment::Text("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(natural_cmp("ABC", "abc"), Ordering::Equal);
        assert_eq!(natural_cmp("Beta", "alpha"), Ordering::Greater);
    }

    #[test]
    fn test_numbers_before_text() {
        assert_eq!(natural_cmp("10", "a"), Ordering::Less);
        assert_eq!(natural_cmp("x1", "xa"), Ordering::Less);
    }

    #[test]
    fn test_prefix_orders_first() {
        assert_eq!(natural_cmp("1", "1a"), Ordering::Less);
        assert_eq!(natural_cmp("item", "item2"), Ordering::Less);
    }

    #[test]
    fn test_large_and_padded_numbers() {
        assert_eq!(
            natural_cmp("v99999999999999999999999", "v100000000000000000000000"),
            Ordering::Less
        );
        assert_eq!(natural_cmp("007", "7"), Ordering::Equal);
        assert_eq!(natural_cmp("0", "000"), Ordering::Equal);
    }

    #[test]
    fn test_stable_across_calls() {
        let mut first = vec!["b2", "B2", "a", "b10"];
        let mut second = first.clone();
        sort_natural(&mut first);
        sort_natural(&mut second);
        assert_eq!(first, second);
        // equal keys keep their input order
        assert_eq!(first, vec!["a", "b2", "B2", "b10"]);
    }
}
