//! Keystroke-driven search controller.
//!
//! The picker's state machine: debounces keystrokes, decides when to run
//! the engine versus show recents, guards against stale responses, and
//! promotes selected results into the recent store.
//!
//! Transitions:
//!
//! ```text
//! Idle ──keystroke(1-2 chars)──▶ ShowingRecents
//! any  ──keystroke(≥3 chars)───▶ Debouncing ──timer──▶ Searching
//! Searching ──▶ Results | NoResults | Error
//! any  ──select──▶ Idle
//! ```
//!
//! Every keystroke bumps a generation counter. In-flight work is never
//! cancelled; it checks the counter before applying its outcome and
//! discards itself when superseded (stale-response guard).

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;

use crate::domain::{AddressCandidate, RankedCandidate, StructuredAddress};
use crate::geo::{GeoProvider, PositionSource};
use crate::recents::{RecentEntry, RecentLocationStore};
use crate::search::{AddressResolutionEngine, SearchConfig};

/// Fallback label when the device position cannot be reverse-geocoded.
const CURRENT_LOCATION_LABEL: &str = "Localização atual";

/// UI-facing phase of the picker.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPhase {
    /// Query is empty.
    Idle,
    /// Query is 1-2 characters; recents are shown instead of searching.
    ShowingRecents,
    /// Query is long enough; the debounce timer is armed.
    Debouncing,
    /// A resolve call is in flight.
    Searching,
    /// Ranked candidates ready to render.
    Results(Vec<RankedCandidate>),
    /// The search completed without candidates.
    NoResults,
    /// The search failed.
    Error { retryable: bool },
}

/// A render-ready snapshot of the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSnapshot {
    pub phase: SearchPhase,
    /// User-facing hint for the current phase; empty when nothing applies.
    pub hint: &'static str,
}

/// Hint copy per phase (product strings, pt-BR).
fn hint_for(phase: &SearchPhase) -> &'static str {
    match phase {
        SearchPhase::Idle => "",
        SearchPhase::ShowingRecents => "Digite mais caracteres para buscar",
        SearchPhase::Debouncing | SearchPhase::Searching => "Buscando endereços...",
        SearchPhase::Results(_) => "Selecione um endereço da lista",
        SearchPhase::NoResults => "Nenhum endereço encontrado. Tente adicionar o bairro ou cidade.",
        SearchPhase::Error { retryable: true } => "Erro ao buscar endereço. Tente novamente.",
        SearchPhase::Error { retryable: false } => "Permissão de localização necessária",
    }
}

/// Drives the address picker from keystrokes.
///
/// Clone-able handle; clones share phase, generation, and recents, so a
/// spawned debounce task observes later keystrokes.
pub struct SearchController<P> {
    engine: Arc<AddressResolutionEngine<P>>,
    provider: Arc<P>,
    recents: RecentLocationStore,
    phase: Arc<Mutex<SearchPhase>>,
    /// Bumped on every keystroke and selection; the stale-response guard.
    generation: Arc<AtomicU64>,
    on_select: Arc<dyn Fn(&AddressCandidate) + Send + Sync>,
}

impl<P> Clone for SearchController<P> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            provider: Arc::clone(&self.provider),
            recents: self.recents.clone(),
            phase: Arc::clone(&self.phase),
            generation: Arc::clone(&self.generation),
            on_select: Arc::clone(&self.on_select),
        }
    }
}

impl<P: GeoProvider + 'static> SearchController<P> {
    /// Create a controller over the given provider and recent store.
    pub fn new(provider: Arc<P>, config: SearchConfig, recents: RecentLocationStore) -> Self {
        Self {
            engine: Arc::new(AddressResolutionEngine::new(
                Arc::clone(&provider),
                config,
            )),
            provider,
            recents,
            phase: Arc::new(Mutex::new(SearchPhase::Idle)),
            generation: Arc::new(AtomicU64::new(0)),
            on_select: Arc::new(|_| {}),
        }
    }

    /// Register a callback invoked exactly once per selection.
    pub fn with_on_select(
        mut self,
        callback: impl Fn(&AddressCandidate) + Send + Sync + 'static,
    ) -> Self {
        self.on_select = Arc::new(callback);
        self
    }

    /// Feed the current text of the input field.
    ///
    /// Supersedes any armed debounce timer and any in-flight search; their
    /// results will be discarded on arrival.
    pub async fn handle_input(&self, text: &str) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let trimmed = text.trim();

        if trimmed.is_empty() {
            self.set_phase(SearchPhase::Idle).await;
            return;
        }

        let config = self.engine.config();
        if trimmed.chars().count() < config.min_query_len {
            self.set_phase(SearchPhase::ShowingRecents).await;
            return;
        }

        self.set_phase(SearchPhase::Debouncing).await;

        let controller = self.clone();
        let debounce = config.debounce;
        let query = trimmed.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            controller.run_search(query, generation).await;
        });
    }

    /// Execute the debounced search for `query`, unless superseded.
    async fn run_search(&self, query: String, generation: u64) {
        if !self
            .set_phase_if_current(generation, SearchPhase::Searching)
            .await
        {
            return;
        }

        let outcome = self.engine.resolve(&query).await;

        let phase = match outcome {
            Ok(candidates) if candidates.is_empty() => SearchPhase::NoResults,
            Ok(candidates) => SearchPhase::Results(candidates),
            Err(e) => {
                tracing::warn!(%query, error = %e, "address search failed");
                SearchPhase::Error {
                    retryable: e.is_retryable(),
                }
            }
        };
        if !self.set_phase_if_current(generation, phase).await {
            tracing::debug!(%query, "discarding stale search outcome");
        }
    }

    /// Record a selection: persists it to recents, returns to `Idle`, and
    /// fires the selection callback exactly once.
    pub async fn select(&self, candidate: AddressCandidate) {
        // Invalidate any in-flight search for the typed query.
        self.generation.fetch_add(1, Ordering::SeqCst);

        self.recents.record(candidate.clone()).await;
        self.set_phase(SearchPhase::Idle).await;
        (self.on_select)(&candidate);
    }

    /// Resolve the device position into a selectable candidate.
    ///
    /// The fetch is capped at the configured timeout; on expiry or failure
    /// the campus reference point is used instead of blocking the UI. The
    /// position is reverse-geocoded for a label, best effort.
    pub async fn use_current_location<S: PositionSource + ?Sized>(
        &self,
        source: &S,
    ) -> AddressCandidate {
        let config = self.engine.config();

        let position =
            match tokio::time::timeout(config.position_timeout, source.current_position()).await {
                Ok(Ok(position)) => position,
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "device position fetch failed, using reference point");
                    config.reference_point
                }
                Err(_) => {
                    tracing::warn!("device position fetch timed out, using reference point");
                    config.reference_point
                }
            };

        let composed_address = match self.provider.reverse(position).await {
            Ok(addresses) => addresses
                .first()
                .and_then(StructuredAddress::compose)
                .unwrap_or_else(|| CURRENT_LOCATION_LABEL.to_string()),
            Err(e) => {
                tracing::debug!(error = %e, "reverse geocode of device position failed");
                CURRENT_LOCATION_LABEL.to_string()
            }
        };

        AddressCandidate {
            coordinate: position,
            composed_address,
            is_current_location: true,
        }
    }

    /// Render-ready snapshot of the current phase.
    pub async fn snapshot(&self) -> SearchSnapshot {
        let phase = self.phase.lock().await.clone();
        let hint = hint_for(&phase);
        SearchSnapshot { phase, hint }
    }

    /// Stored recents, most-recent-first, for the `ShowingRecents` phase.
    pub async fn recent_entries(&self) -> Vec<RecentEntry> {
        self.recents.entries().await
    }

    async fn set_phase(&self, phase: SearchPhase) {
        *self.phase.lock().await = phase;
    }

    /// Store `phase` only if `generation` is still current.
    ///
    /// The generation check and the write share one acquisition of the
    /// phase lock, so a superseded task can never overwrite a phase set
    /// after a newer keystroke or selection.
    async fn set_phase_if_current(&self, generation: u64, phase: SearchPhase) -> bool {
        let mut guard = self.phase.lock().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        *guard = phase;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use tempfile::tempdir;

    use crate::domain::Coordinate;
    use crate::geo::{FailureKind, MockGeoProvider, MockPositionSource};
    use crate::recents::RecentStoreConfig;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn address(street: &str) -> StructuredAddress {
        StructuredAddress {
            street: Some(street.to_string()),
            city: Some("Belo Horizonte".to_string()),
            ..StructuredAddress::default()
        }
    }

    /// Config with a short debounce so tests stay fast.
    fn fast_config() -> SearchConfig {
        SearchConfig {
            debounce: Duration::from_millis(20),
            position_timeout: Duration::from_millis(50),
            ..SearchConfig::default()
        }
    }

    fn controller(
        provider: MockGeoProvider,
        dir: &tempfile::TempDir,
    ) -> SearchController<MockGeoProvider> {
        let recents =
            RecentLocationStore::open(RecentStoreConfig::new(dir.path().join("recents.json")));
        SearchController::new(Arc::new(provider), fast_config(), recents)
    }

    /// Wait for the debounced pipeline to settle.
    async fn settle() {
        tokio::time::sleep(Duration::from_millis(120)).await;
    }

    #[tokio::test]
    async fn empty_input_is_idle() {
        let dir = tempdir().unwrap();
        let ctl = controller(MockGeoProvider::new(), &dir);

        ctl.handle_input("").await;

        let snap = ctl.snapshot().await;
        assert_eq!(snap.phase, SearchPhase::Idle);
        assert_eq!(snap.hint, "");
    }

    #[tokio::test]
    async fn short_query_shows_recents_without_searching() {
        let dir = tempdir().unwrap();
        let provider = MockGeoProvider::new();
        let ctl = controller(provider.clone(), &dir);

        ctl.handle_input("ru").await;
        settle().await;

        let snap = ctl.snapshot().await;
        assert_eq!(snap.phase, SearchPhase::ShowingRecents);
        assert_eq!(snap.hint, "Digite mais caracteres para buscar");
        assert_eq!(provider.forward_calls(), 0);
    }

    #[tokio::test]
    async fn long_query_debounces_then_searches() {
        let dir = tempdir().unwrap();
        let position = coord(-19.87, -43.96);
        let provider = MockGeoProvider::new()
            .with_forward("bahia", vec![position])
            .await
            .with_reverse(position, vec![address("Rua da Bahia")])
            .await;
        let ctl = controller(provider, &dir);

        ctl.handle_input("bahia").await;
        assert_eq!(ctl.snapshot().await.phase, SearchPhase::Debouncing);

        settle().await;
        let snap = ctl.snapshot().await;
        match snap.phase {
            SearchPhase::Results(candidates) => {
                assert_eq!(candidates.len(), 1);
                assert!(candidates[0].candidate.composed_address.contains("Bahia"));
            }
            other => panic!("expected results, got {other:?}"),
        }
        assert_eq!(snap.hint, "Selecione um endereço da lista");
    }

    #[tokio::test]
    async fn no_match_reaches_no_results() {
        let dir = tempdir().unwrap();
        let ctl = controller(MockGeoProvider::new(), &dir);

        ctl.handle_input("rua inexistente").await;
        settle().await;

        let snap = ctl.snapshot().await;
        assert_eq!(snap.phase, SearchPhase::NoResults);
        assert_eq!(
            snap.hint,
            "Nenhum endereço encontrado. Tente adicionar o bairro ou cidade."
        );
    }

    #[tokio::test]
    async fn provider_failure_reaches_retryable_error() {
        let dir = tempdir().unwrap();
        let provider = MockGeoProvider::new()
            .with_forward_failure(FailureKind::Transient)
            .await;
        let ctl = controller(provider, &dir);

        ctl.handle_input("qualquer").await;
        settle().await;

        let snap = ctl.snapshot().await;
        assert_eq!(snap.phase, SearchPhase::Error { retryable: true });
        assert_eq!(snap.hint, "Erro ao buscar endereço. Tente novamente.");
    }

    #[tokio::test]
    async fn permission_failure_hint_points_to_settings() {
        let dir = tempdir().unwrap();
        let provider = MockGeoProvider::new()
            .with_forward_failure(FailureKind::PermissionDenied)
            .await;
        let ctl = controller(provider, &dir);

        ctl.handle_input("qualquer").await;
        settle().await;

        let snap = ctl.snapshot().await;
        assert_eq!(snap.phase, SearchPhase::Error { retryable: false });
        assert_eq!(snap.hint, "Permissão de localização necessária");
    }

    #[tokio::test]
    async fn stale_results_are_discarded() {
        // The first query has matches; the second does not. Keystroke two
        // arrives while query one is still debouncing, so query one's
        // results must never surface.
        let dir = tempdir().unwrap();
        let position = coord(-19.87, -43.96);
        let provider = MockGeoProvider::new()
            .with_forward("bahia", vec![position])
            .await
            .with_reverse(position, vec![address("Rua da Bahia")])
            .await;
        let ctl = controller(provider, &dir);

        ctl.handle_input("bahia").await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        ctl.handle_input("bahia x").await;

        settle().await;
        assert_eq!(ctl.snapshot().await.phase, SearchPhase::NoResults);
    }

    #[tokio::test]
    async fn selection_records_recent_and_fires_callback_once() {
        let dir = tempdir().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_seen = Arc::clone(&calls);

        let ctl = controller(MockGeoProvider::new(), &dir).with_on_select(move |_| {
            calls_seen.fetch_add(1, Ordering::SeqCst);
        });

        let candidate = AddressCandidate {
            coordinate: coord(-19.87, -43.96),
            composed_address: "Rua da Bahia, Belo Horizonte".to_string(),
            is_current_location: false,
        };
        ctl.select(candidate.clone()).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(ctl.snapshot().await.phase, SearchPhase::Idle);

        let recents = ctl.recent_entries().await;
        assert_eq!(recents.len(), 1);
        assert_eq!(recents[0].candidate, candidate);
    }

    #[tokio::test]
    async fn selection_supersedes_in_flight_search() {
        let dir = tempdir().unwrap();
        let position = coord(-19.87, -43.96);
        let provider = MockGeoProvider::new()
            .with_forward("bahia", vec![position])
            .await
            .with_reverse(position, vec![address("Rua da Bahia")])
            .await;
        let ctl = controller(provider, &dir);

        ctl.handle_input("bahia").await;
        // Select (e.g. from recents) before the debounce fires.
        ctl.select(AddressCandidate {
            coordinate: position,
            composed_address: "Rua da Bahia, Belo Horizonte".to_string(),
            is_current_location: false,
        })
        .await;

        settle().await;
        // The late search outcome must not overwrite Idle.
        assert_eq!(ctl.snapshot().await.phase, SearchPhase::Idle);
    }

    #[tokio::test]
    async fn superseded_task_cannot_overwrite_newer_phase() {
        // A task that passed its generation check before a newer keystroke
        // must find the guard closed when it writes its outcome.
        let dir = tempdir().unwrap();
        let ctl = controller(MockGeoProvider::new(), &dir);

        let generation = ctl.generation.load(Ordering::SeqCst);
        assert!(
            ctl.set_phase_if_current(generation, SearchPhase::Searching)
                .await
        );

        // A newer keystroke bumps the generation and sets its own phase.
        ctl.generation.fetch_add(1, Ordering::SeqCst);
        ctl.set_phase(SearchPhase::ShowingRecents).await;

        assert!(
            !ctl.set_phase_if_current(generation, SearchPhase::NoResults)
                .await
        );
        assert_eq!(ctl.snapshot().await.phase, SearchPhase::ShowingRecents);
    }

    #[tokio::test]
    async fn current_location_is_labeled_by_reverse_geocode() {
        let dir = tempdir().unwrap();
        let position = coord(-19.8721, -43.9673);
        let provider = MockGeoProvider::new()
            .with_reverse(position, vec![address("Av. Antônio Carlos")])
            .await;
        let ctl = controller(provider, &dir);

        let source = MockPositionSource::Position(position);
        let candidate = ctl.use_current_location(&source).await;

        assert!(candidate.is_current_location);
        assert_eq!(candidate.coordinate, position);
        assert!(candidate.composed_address.contains("Antônio Carlos"));
    }

    #[tokio::test]
    async fn hanging_position_fetch_falls_back_to_reference_point() {
        let dir = tempdir().unwrap();
        let ctl = controller(MockGeoProvider::new(), &dir);

        let candidate = ctl.use_current_location(&MockPositionSource::Hang).await;

        assert!(candidate.is_current_location);
        assert_eq!(
            candidate.coordinate,
            fast_config().reference_point
        );
        assert_eq!(candidate.composed_address, CURRENT_LOCATION_LABEL);
    }

    #[tokio::test]
    async fn denied_position_fetch_falls_back_to_reference_point() {
        let dir = tempdir().unwrap();
        let ctl = controller(MockGeoProvider::new(), &dir);

        let candidate = ctl
            .use_current_location(&MockPositionSource::PermissionDenied)
            .await;

        assert_eq!(candidate.coordinate, fast_config().reference_point);
    }
}
