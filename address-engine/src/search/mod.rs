//! Address resolution and ranking.
//!
//! This module turns a free-text, possibly incomplete address into a
//! ranked list of real-world candidates:
//!
//! 1. The query is expanded with contextual suffixes ([`expand`]) to route
//!    around a forward geocoder that fails on loosely specified input.
//! 2. Variants are forward-geocoded in order until one yields matches.
//! 3. Matches are reverse-geocoded concurrently and filtered against the
//!    original query terms.
//! 4. Survivors are scored ([`relevance_score`]), distance-weighted, and
//!    returned best-first, capped at [`SearchConfig::max_results`].

mod config;
mod distance;
mod engine;
mod expand;
mod score;

pub use config::{LandmarkContext, SearchConfig};
pub use distance::haversine_km;
pub use engine::{AddressResolutionEngine, ResolveError, rank};
pub use expand::expand;
pub use score::{ScoringWeights, matches_all_terms, query_terms, relevance_score};
