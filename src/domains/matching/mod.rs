//! Fuzzy name matching for entity resolution.
//!
//! Tools that resolve free-text references (user names, workflow names) score
//! every candidate against the query and filter out non-matches. The scoring
//! is deterministic: the same `(candidate, query)` pair always yields the same
//! score, on every platform, so ranked listings are reproducible.
//!
//! Scoring tiers, highest priority first:
//!
//! | tier                 | score                              |
//! |----------------------|------------------------------------|
//! | no / empty query     | 100                                |
//! | exact match          | 100                                |
//! | candidate has prefix | 90                                 |
//! | contiguous substring | 75                                 |
//! | whole-token overlap  | 40 + 25 * shared / query tokens    |
//! | edit distance        | 60 * jaro-winkler similarity       |
//!
//! All comparisons are case-insensitive. A candidate is a match when its
//! score reaches [`MATCH_THRESHOLD`].

use serde::Serialize;

/// Minimum score for a candidate to count as a match.
pub const MATCH_THRESHOLD: u8 = 40;

const PREFIX_SCORE: u8 = 90;
const SUBSTRING_SCORE: u8 = 75;
const TOKEN_BASE_SCORE: f64 = 40.0;
const TOKEN_RANGE: f64 = 25.0;
const EDIT_DISTANCE_RANGE: f64 = 60.0;

/// Result of scoring one candidate against a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// Similarity score from 0 (unrelated) to 100 (exact).
    pub score: u8,

    /// Whether the score reaches the match threshold.
    pub is_match: bool,
}

impl MatchResult {
    fn from_score(score: u8) -> Self {
        Self {
            score,
            is_match: score >= MATCH_THRESHOLD,
        }
    }
}

/// Score a candidate name against an optional free-text query.
///
/// An absent or blank query matches everything with a perfect score, which is
/// what unfiltered listing operations rely on.
pub fn match_name(candidate: &str, query: Option<&str>) -> MatchResult {
    let query = match query.map(str::trim) {
        None | Some("") => return MatchResult::from_score(100),
        Some(q) => q.to_lowercase(),
    };
    let candidate = candidate.trim().to_lowercase();

    if candidate == query {
        return MatchResult::from_score(100);
    }
    if candidate.starts_with(&query) {
        return MatchResult::from_score(PREFIX_SCORE);
    }
    if candidate.contains(&query) {
        return MatchResult::from_score(SUBSTRING_SCORE);
    }

    let query_tokens: Vec<&str> = query.split_whitespace().collect();
    let shared = query_tokens
        .iter()
        .copied()
        .filter(|token| candidate.split_whitespace().any(|word| word == *token))
        .count();
    if shared > 0 {
        let ratio = shared as f64 / query_tokens.len() as f64;
        let score = (TOKEN_BASE_SCORE + TOKEN_RANGE * ratio).round() as u8;
        return MatchResult::from_score(score);
    }

    // Near-miss typos: scale Jaro-Winkler similarity below the token tier.
    let similarity = strsim::jaro_winkler(&candidate, &query);
    let score = (EDIT_DISTANCE_RANGE * similarity).round() as u8;
    MatchResult::from_score(score)
}
