//! The address resolution engine.
//!
//! Orchestrates query expansion, the sequential forward-geocode loop, the
//! concurrent reverse-geocode fan-out, filtering, and ranking.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;

use crate::domain::{AddressCandidate, Coordinate, RankedCandidate};
use crate::geo::{GeoError, GeoProvider};

use super::config::SearchConfig;
use super::distance::haversine_km;
use super::expand::expand;
use super::score::{matches_all_terms, query_terms, relevance_score};

/// Error from address resolution.
///
/// "No results" is not an error: resolve returns an empty list for both
/// "no forward match" and "everything filtered out".
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Location permission refused; the user must change a setting, so
    /// retrying as-is cannot succeed.
    #[error("location permission denied")]
    PermissionDenied,

    /// The provider failed on every query variant.
    #[error("geocoding provider failed: {0}")]
    Provider(#[source] GeoError),
}

impl ResolveError {
    fn from_geo(err: GeoError) -> Self {
        match err {
            GeoError::PermissionDenied => ResolveError::PermissionDenied,
            other => ResolveError::Provider(other),
        }
    }

    /// Whether the caller should offer a retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            ResolveError::PermissionDenied => false,
            ResolveError::Provider(_) => true,
        }
    }
}

/// Sort candidates best-first by combined key and cap the list.
///
/// The sort is stable: equal keys keep provider order.
pub fn rank(
    mut candidates: Vec<RankedCandidate>,
    distance_weight: f64,
    max_results: usize,
) -> Vec<RankedCandidate> {
    candidates.sort_by(|a, b| {
        b.combined_key(distance_weight)
            .partial_cmp(&a.combined_key(distance_weight))
            .unwrap_or(Ordering::Equal)
    });
    candidates.truncate(max_results);
    candidates
}

/// Resolves free-text queries to ranked address candidates.
pub struct AddressResolutionEngine<P> {
    provider: Arc<P>,
    config: SearchConfig,
}

impl<P: GeoProvider> AddressResolutionEngine<P> {
    /// Create a new engine over the given provider.
    pub fn new(provider: Arc<P>, config: SearchConfig) -> Self {
        Self { provider, config }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Resolve a query to a ranked, deduplicated, capped candidate list.
    ///
    /// Queries shorter than the configured minimum return an empty list
    /// immediately without touching the provider; the caller shows recents
    /// instead.
    pub async fn resolve(&self, query: &str) -> Result<Vec<RankedCandidate>, ResolveError> {
        let query = query.trim();
        if query.chars().count() < self.config.min_query_len {
            return Ok(Vec::new());
        }

        let terms = query_terms(query);
        let matches = self.forward_matches(query).await?;
        if matches.is_empty() {
            return Ok(Vec::new());
        }

        // Reverse-geocode every forward match concurrently. A failed or
        // empty lookup drops that candidate only; only the first address
        // per coordinate is used.
        let lookups = matches.into_iter().map(|position| {
            let provider = Arc::clone(&self.provider);
            async move {
                match provider.reverse(position).await {
                    Ok(addresses) => addresses
                        .first()
                        .and_then(|addr| AddressCandidate::from_structured(position, addr)),
                    Err(e) => {
                        tracing::debug!(error = %e, "reverse geocode failed, dropping candidate");
                        None
                    }
                }
            }
        });

        // Nearby forward matches often reverse to the same composed
        // address; only the first occurrence keeps its slot.
        let mut seen = HashSet::new();
        let candidates: Vec<RankedCandidate> = join_all(lookups)
            .await
            .into_iter()
            .flatten()
            .filter(|c| seen.insert(c.composed_address.clone()))
            .filter(|c| matches_all_terms(&c.composed_address, &terms))
            .map(|candidate| {
                let relevance_score = relevance_score(
                    &candidate.composed_address,
                    query,
                    &self.config.context,
                    &self.config.weights,
                );
                let distance_km = haversine_km(self.config.reference_point, candidate.coordinate);
                RankedCandidate {
                    candidate,
                    relevance_score,
                    distance_km,
                }
            })
            .collect();

        Ok(rank(
            candidates,
            self.config.distance_weight,
            self.config.max_results,
        ))
    }

    /// Forward-geocode the query variants in order; first non-empty result
    /// wins. Per-variant errors are swallowed unless every variant fails
    /// hard, in which case the worst error classifies the failure
    /// (permission refusals outrank transient errors).
    async fn forward_matches(&self, query: &str) -> Result<Vec<Coordinate>, ResolveError> {
        let variants = expand(query, &self.config.context);
        let mut failures = 0;
        let mut last_error: Option<GeoError> = None;

        for variant in &variants {
            match self.provider.forward(variant).await {
                Ok(found) if !found.is_empty() => return Ok(found),
                Ok(_) => {
                    tracing::debug!(%variant, "forward geocode variant had no matches");
                }
                Err(e) => {
                    tracing::debug!(%variant, error = %e, "forward geocode variant failed");
                    failures += 1;
                    // A permission refusal, once seen, wins classification.
                    let overwrite = last_error.as_ref().is_none_or(GeoError::is_transient);
                    if overwrite {
                        last_error = Some(e);
                    }
                }
            }
        }

        if failures == variants.len()
            && let Some(err) = last_error
        {
            return Err(ResolveError::from_geo(err));
        }

        Ok(Vec::new())
    }
}
