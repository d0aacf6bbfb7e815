//! Phrase-count heuristics for engagement and sentiment.
//!
//! Phrases match case-insensitively anywhere in the text, including inside
//! longer words: "greatest" counts as "great" and "know" counts as "no".

use crate::domain::models::Sentiment;
use regex::Regex;
use std::sync::LazyLock;

/// Phrases that signal an engaged conversation
pub(crate) const ENGAGEMENT_PHRASES: &[&str] = &[
    "great question",
    "excellent point",
    "i agree",
    "absolutely",
    "exactly",
    "that makes sense",
    "good idea",
    "let's do it",
    "sounds good",
];

pub(crate) const POSITIVE_TERMS: &[&str] = &[
    "great",
    "excellent",
    "good",
    "agree",
    "yes",
    "perfect",
    "wonderful",
];

pub(crate) const NEGATIVE_TERMS: &[&str] = &[
    "no",
    "problem",
    "issue",
    "concern",
    "difficult",
    "challenge",
    "wrong",
];

const ENGAGEMENT_BASELINE: u32 = 50;
const ENGAGEMENT_STEP: u32 = 5;
const ENGAGEMENT_MAX: u32 = 100;

fn compile(terms: &[&str]) -> Vec<Regex> {
    terms
        .iter()
        .filter_map(|term| Regex::new(&format!("(?i){}", regex::escape(term))).ok())
        .collect()
}

static ENGAGEMENT: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(ENGAGEMENT_PHRASES));
static POSITIVE: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(POSITIVE_TERMS));
static NEGATIVE: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(NEGATIVE_TERMS));

fn count_matches(patterns: &[Regex], text: &str) -> usize {
    patterns.iter().map(|p| p.find_iter(text).count()).sum()
}

/// Engagement score: 50 plus 5 per engagement phrase, clamped to `[0, 100]`
#[must_use]
pub fn engagement_score(text: &str) -> u32 {
    let hits = u32::try_from(count_matches(&ENGAGEMENT, text)).unwrap_or(u32::MAX);
    ENGAGEMENT_BASELINE
        .saturating_add(hits.saturating_mul(ENGAGEMENT_STEP))
        .min(ENGAGEMENT_MAX)
}

/// Majority vote between positive and negative terms; ties are neutral
#[must_use]
pub fn overall_sentiment(text: &str) -> Sentiment {
    let positive = count_matches(&POSITIVE, text);
    let negative = count_matches(&NEGATIVE, text);
    match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}
