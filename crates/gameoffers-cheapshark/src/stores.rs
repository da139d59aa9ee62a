//! Time-bounded cache of the store-id → store-name directory.
//!
//! The cache holds at most one snapshot. A refresh replaces it wholesale by
//! swapping an `Arc`, so readers only ever see a complete directory. A failed
//! refresh leaves the previous snapshot in place and keeps serving it.
//! Callers queued behind a refresh take its outcome instead of fetching again.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::error::CheapSharkError;
use crate::source::DealSource;
use crate::types::StoreEntry;

/// Display name for store ids missing from the directory.
pub const UNKNOWN_STORE: &str = "Unknown";

pub const DEFAULT_STORE_TTL: Duration = Duration::from_secs(60 * 60);

/// Time source for freshness checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A complete snapshot of the store directory.
#[derive(Debug, Clone)]
pub struct StoreDirectory {
    entries: HashMap<String, String>,
    fetched_at: Instant,
}

impl StoreDirectory {
    /// Builds a snapshot, skipping entries without an id. A missing name
    /// maps to [`UNKNOWN_STORE`].
    pub fn from_entries<I>(entries: I, fetched_at: Instant) -> Self
    where
        I: IntoIterator<Item = StoreEntry>,
    {
        let entries = entries
            .into_iter()
            .filter_map(|entry| {
                let id = entry.store_id?;
                let name = entry
                    .store_name
                    .unwrap_or_else(|| UNKNOWN_STORE.to_string());
                Some((id, name))
            })
            .collect();
        Self {
            entries,
            fetched_at,
        }
    }

    /// Display name for `store_id`, or [`UNKNOWN_STORE`].
    #[must_use]
    pub fn name_for(&self, store_id: Option<&str>) -> &str {
        store_id
            .and_then(|id| self.entries.get(id))
            .map_or(UNKNOWN_STORE, String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn fetched_at(&self) -> Instant {
        self.fetched_at
    }

    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.fetched_at) < ttl
    }
}

/// What a failed refresh leaves behind for the callers queued behind it.
#[derive(Debug, Clone)]
struct RefreshFailure {
    reason: String,
    upstream_status: Option<u16>,
    transport: bool,
}

impl RefreshFailure {
    fn from_error(error: &CheapSharkError) -> Self {
        Self {
            reason: error.to_string(),
            upstream_status: error.upstream_status(),
            transport: error.is_transport(),
        }
    }

    fn to_error(&self) -> CheapSharkError {
        CheapSharkError::StoreDirectoryUnavailable {
            reason: self.reason.clone(),
            upstream_status: self.upstream_status,
            transport: self.transport,
        }
    }
}

/// Lazily populated, TTL-refreshed store directory.
///
/// Constructed once and shared (`Arc`) between the deal resolver and the
/// deal listing. Concurrent callers that find the snapshot stale queue on a
/// refresh gate; the first performs the upstream fetch and the rest reuse
/// its result, whether it succeeded or failed.
pub struct StoreDirectoryCache<S> {
    source: Arc<S>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    snapshot: RwLock<Option<Arc<StoreDirectory>>>,
    /// Completed refresh attempts, successful or not.
    attempts: AtomicU64,
    /// Refresh gate. Holds the failure of the latest attempt, if it failed.
    refresh: Mutex<Option<RefreshFailure>>,
}

impl<S: DealSource> StoreDirectoryCache<S> {
    #[must_use]
    pub fn new(source: Arc<S>, ttl: Duration) -> Self {
        Self::with_clock(source, ttl, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(source: Arc<S>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            clock,
            ttl,
            snapshot: RwLock::new(None),
            attempts: AtomicU64::new(0),
            refresh: Mutex::new(None),
        }
    }

    /// Returns a fresh directory, refreshing from upstream when the cached
    /// snapshot is missing or at least `ttl` old.
    ///
    /// A caller that waited while another refresh attempt completed takes
    /// that attempt's outcome: the snapshot it left, or its failure.
    ///
    /// # Errors
    ///
    /// Returns the upstream error only when the refresh fails and no earlier
    /// snapshot exists. With an earlier snapshot the stale copy is returned.
    /// Callers that queued behind such a failure get
    /// [`CheapSharkError::StoreDirectoryUnavailable`].
    pub async fn directory(&self) -> Result<Arc<StoreDirectory>, CheapSharkError> {
        let attempts_seen = self.attempts.load(Ordering::Acquire);
        if let Some(current) = self.current() {
            if current.is_fresh(self.clock.now(), self.ttl) {
                return Ok(current);
            }
        }

        let mut last_failure = self.refresh.lock().await;

        // Re-check: another caller may have refreshed while we waited.
        let previous = self.current();
        if let Some(current) = &previous {
            if current.is_fresh(self.clock.now(), self.ttl) {
                return Ok(Arc::clone(current));
            }
        }
        if self.attempts.load(Ordering::Acquire) != attempts_seen {
            if let Some(stale) = previous {
                return Ok(stale);
            }
            if let Some(failure) = last_failure.as_ref() {
                return Err(failure.to_error());
            }
        }

        let outcome = self.source.store_directory().await;
        self.attempts.fetch_add(1, Ordering::Release);

        match outcome {
            Ok(entries) => {
                *last_failure = None;
                let directory = Arc::new(StoreDirectory::from_entries(entries, self.clock.now()));
                tracing::debug!(stores = directory.len(), "store directory refreshed");
                self.replace(Arc::clone(&directory));
                Ok(directory)
            }
            Err(error) => {
                *last_failure = Some(RefreshFailure::from_error(&error));
                match previous {
                    Some(stale) => {
                        let age_secs = self
                            .clock
                            .now()
                            .saturating_duration_since(stale.fetched_at)
                            .as_secs();
                        tracing::warn!(
                            error = %error,
                            age_secs,
                            "store directory refresh failed; serving stale snapshot"
                        );
                        Ok(stale)
                    }
                    None => Err(error),
                }
            }
        }
    }

    /// Resolves a store id to its display name.
    ///
    /// # Errors
    ///
    /// Propagates [`StoreDirectoryCache::directory`] failures.
    pub async fn resolve_store_name(&self, store_id: &str) -> Result<String, CheapSharkError> {
        let directory = self.directory().await?;
        Ok(directory.name_for(Some(store_id)).to_owned())
    }

    fn current(&self) -> Option<Arc<StoreDirectory>> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, directory: Arc<StoreDirectory>) {
        *self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(directory);
    }
}

#[cfg(test)]
#[path = "stores_test.rs"]
mod tests;
