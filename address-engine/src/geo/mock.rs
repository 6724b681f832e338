//! Mock geocoding provider for testing without network access.
//!
//! Serves canned forward/reverse tables and can inject failures,
//! mimicking the real client's interface.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{Coordinate, StructuredAddress};

use super::error::GeoError;
use super::position::PositionSource;
use super::provider::GeoProvider;

/// How an injected failure presents itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FailureKind {
    /// Transient network/provider failure
    Transient,
    /// Location permission refused
    PermissionDenied,
}

impl FailureKind {
    fn to_error(self) -> GeoError {
        match self {
            FailureKind::Transient => GeoError::Api {
                status: 503,
                message: "injected failure".to_string(),
            },
            FailureKind::PermissionDenied => GeoError::PermissionDenied,
        }
    }
}

#[derive(Default)]
struct MockTables {
    /// Forward matches keyed by exact query text.
    forward: HashMap<String, Vec<Coordinate>>,
    /// Reverse results keyed by quantized coordinate.
    reverse: HashMap<(i64, i64), Vec<StructuredAddress>>,
    /// When set, every forward call fails with this kind.
    fail_forward: Option<FailureKind>,
    /// Coordinates whose reverse lookup fails.
    fail_reverse: Vec<(i64, i64)>,
}

/// Mock provider with canned data and injectable failures.
#[derive(Clone, Default)]
pub struct MockGeoProvider {
    tables: Arc<RwLock<MockTables>>,
    forward_calls: Arc<AtomicUsize>,
    reverse_calls: Arc<AtomicUsize>,
}

impl MockGeoProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register forward matches for an exact query string.
    pub async fn with_forward(self, query: impl Into<String>, matches: Vec<Coordinate>) -> Self {
        self.tables.write().await.forward.insert(query.into(), matches);
        self
    }

    /// Register a reverse result for a coordinate.
    pub async fn with_reverse(self, position: Coordinate, addresses: Vec<StructuredAddress>) -> Self {
        self.tables
            .write()
            .await
            .reverse
            .insert(position.key_e5(), addresses);
        self
    }

    /// Make every forward call fail.
    pub async fn with_forward_failure(self, kind: FailureKind) -> Self {
        self.tables.write().await.fail_forward = Some(kind);
        self
    }

    /// Make reverse lookups for one coordinate fail.
    pub async fn with_reverse_failure(self, position: Coordinate) -> Self {
        self.tables.write().await.fail_reverse.push(position.key_e5());
        self
    }

    /// Number of forward calls issued so far.
    pub fn forward_calls(&self) -> usize {
        self.forward_calls.load(Ordering::SeqCst)
    }

    /// Number of reverse calls issued so far.
    pub fn reverse_calls(&self) -> usize {
        self.reverse_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeoProvider for MockGeoProvider {
    async fn forward(&self, query: &str) -> Result<Vec<Coordinate>, GeoError> {
        self.forward_calls.fetch_add(1, Ordering::SeqCst);

        let tables = self.tables.read().await;
        if let Some(kind) = tables.fail_forward {
            return Err(kind.to_error());
        }

        Ok(tables.forward.get(query).cloned().unwrap_or_default())
    }

    async fn reverse(&self, position: Coordinate) -> Result<Vec<StructuredAddress>, GeoError> {
        self.reverse_calls.fetch_add(1, Ordering::SeqCst);

        let key = position.key_e5();
        let tables = self.tables.read().await;

        if tables.fail_reverse.contains(&key) {
            return Err(FailureKind::Transient.to_error());
        }

        Ok(tables.reverse.get(&key).cloned().unwrap_or_default())
    }
}

/// Mock device position source.
#[derive(Clone)]
pub enum MockPositionSource {
    /// Resolves immediately with the given position.
    Position(Coordinate),
    /// Fails with permission denied.
    PermissionDenied,
    /// Never resolves, for exercising caller-side timeouts.
    Hang,
}

#[async_trait]
impl PositionSource for MockPositionSource {
    async fn current_position(&self) -> Result<Coordinate, GeoError> {
        match self {
            MockPositionSource::Position(c) => Ok(*c),
            MockPositionSource::PermissionDenied => Err(GeoError::PermissionDenied),
            MockPositionSource::Hang => futures::future::pending().await,
        }
    }
}
