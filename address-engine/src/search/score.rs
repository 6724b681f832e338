//! Relevance scoring for composed addresses.
//!
//! Cheap, explainable scoring: exact substring and position heuristics
//! over the user's query terms, plus flat boosts for the campus landmark
//! and its neighborhood. The user base is campus-centric, so these two
//! boosts approximate intent without a full text-search index.

use super::config::LandmarkContext;

/// Scoring bonus magnitudes.
///
/// The defaults match the production calibration; they carry no documented
/// derivation, so they are configuration rather than fixed semantics.
#[derive(Debug, Clone)]
pub struct ScoringWeights {
    /// Term appears anywhere in the address.
    pub base: i32,
    /// Term appears at position 0 (replaces `base` for that term).
    pub prefix: i32,
    /// Term appears surrounded by spaces.
    pub whole_word: i32,
    /// Term appears immediately followed by a comma.
    pub before_comma: i32,
    /// Flat boost when the address mentions the institution.
    pub landmark: i32,
    /// Flat boost when the address mentions the campus neighborhood.
    pub neighborhood: i32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            base: 1,
            prefix: 3,
            whole_word: 2,
            before_comma: 2,
            landmark: 3,
            neighborhood: 2,
        }
    }
}

/// Split a query into lowercase search terms on whitespace and commas.
pub fn query_terms(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Hard relevance filter: every term must appear as a substring of the
/// lowercased composed address. Matching is on the original query terms,
/// never on an expanded variant.
pub fn matches_all_terms(composed_address: &str, terms: &[String]) -> bool {
    let address = composed_address.to_lowercase();
    terms.iter().all(|term| address.contains(term.as_str()))
}

/// Score a composed address against the original query.
///
/// Per term present in the address: `base` (or `prefix` when the address
/// starts with the term), plus `whole_word` and `before_comma` when those
/// patterns occur. Bonuses are additive. Landmark and neighborhood boosts
/// apply once regardless of the query.
pub fn relevance_score(
    composed_address: &str,
    query: &str,
    context: &LandmarkContext,
    weights: &ScoringWeights,
) -> i32 {
    let address = composed_address.to_lowercase();
    let mut score = 0;

    for term in query_terms(query) {
        if !address.contains(term.as_str()) {
            continue;
        }

        score += if address.starts_with(term.as_str()) {
            weights.prefix
        } else {
            weights.base
        };

        if address.contains(&format!(" {term} ")) {
            score += weights.whole_word;
        }
        if address.contains(&format!("{term},")) {
            score += weights.before_comma;
        }
    }

    if context
        .landmark_terms
        .iter()
        .any(|t| address.contains(t.as_str()))
    {
        score += weights.landmark;
    }

    if address.contains(context.neighborhood_term.as_str()) {
        score += weights.neighborhood;
    }

    score
}
