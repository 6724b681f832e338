//! Search configuration.

use std::time::Duration;

use crate::domain::Coordinate;

use super::score::ScoringWeights;

/// UFMG main campus, the fixed reference point for distance weighting.
const CAMPUS_LAT: f64 = -19.8721;
const CAMPUS_LON: f64 = -43.9673;

/// The fixed points-of-interest context search results are biased toward.
///
/// Used both for query expansion (suffixes appended to loose queries) and
/// for the scorer's landmark/neighborhood boosts.
#[derive(Debug, Clone)]
pub struct LandmarkContext {
    /// Primary institution name appended to queries (e.g. "UFMG").
    pub primary_landmark: String,
    /// Campus neighborhood.
    pub neighborhood: String,
    pub city: String,
    /// State/region abbreviation.
    pub region: String,
    /// Terms that earn the flat landmark score boost.
    pub landmark_terms: Vec<String>,
    /// Term that earns the flat neighborhood score boost.
    pub neighborhood_term: String,
}

impl Default for LandmarkContext {
    fn default() -> Self {
        Self {
            primary_landmark: "UFMG".to_string(),
            neighborhood: "Pampulha".to_string(),
            city: "Belo Horizonte".to_string(),
            region: "MG".to_string(),
            landmark_terms: vec!["ufmg".to_string(), "universidade federal".to_string()],
            neighborhood_term: "pampulha".to_string(),
        }
    }
}

/// Configuration parameters for address search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Minimum trimmed query length before the engine searches at all.
    /// Shorter queries show recents instead.
    pub min_query_len: usize,

    /// Maximum number of ranked candidates to return.
    pub max_results: usize,

    /// How strongly distance from the reference point penalizes the
    /// combined ranking key (km × weight subtracted from the score).
    pub distance_weight: f64,

    /// Reference point for distance weighting (the campus).
    pub reference_point: Coordinate,

    /// How long after the last keystroke before a search fires.
    pub debounce: Duration,

    /// Hard cap on the device position fetch. On expiry the controller
    /// falls back to the reference point rather than blocking the UI.
    pub position_timeout: Duration,

    /// Points-of-interest context for expansion and scoring.
    pub context: LandmarkContext,

    /// Scoring bonus magnitudes.
    pub weights: ScoringWeights,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_len: 3,
            max_results: 5,
            distance_weight: 0.1,
            // Constants are in range, so the expect is unreachable.
            reference_point: Coordinate::new(CAMPUS_LAT, CAMPUS_LON)
                .expect("campus coordinate is valid"),
            debounce: Duration::from_millis(300),
            position_timeout: Duration::from_secs(5),
            context: LandmarkContext::default(),
            weights: ScoringWeights::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SearchConfig::default();

        assert_eq!(config.min_query_len, 3);
        assert_eq!(config.max_results, 5);
        assert!((config.distance_weight - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.debounce, Duration::from_millis(300));
        assert_eq!(config.position_timeout, Duration::from_secs(5));
        assert!((config.reference_point.latitude - CAMPUS_LAT).abs() < f64::EPSILON);
    }

    #[test]
    fn default_context() {
        let context = LandmarkContext::default();

        assert_eq!(context.primary_landmark, "UFMG");
        assert_eq!(context.neighborhood, "Pampulha");
        assert_eq!(context.city, "Belo Horizonte");
        assert_eq!(context.region, "MG");
        assert_eq!(context.landmark_terms.len(), 2);
    }
}
