//! In-memory [`DealSource`] and manual clock shared by the unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use gameoffers_core::Lookup;

use crate::error::CheapSharkError;
use crate::listing::DealListQuery;
use crate::source::DealSource;
use crate::stores::Clock;
use crate::types::{DealLookup, GameLookup, GameSummary, RawDealPage, StoreEntry};

fn shape_error(context: &str) -> CheapSharkError {
    CheapSharkError::UpstreamShape {
        context: context.to_string(),
        reason: "scripted failure".to_string(),
    }
}

pub(crate) fn store(id: &str, name: &str) -> StoreEntry {
    StoreEntry {
        store_id: Some(id.to_string()),
        store_name: Some(name.to_string()),
    }
}

#[derive(Default)]
pub(crate) struct FakeSource {
    pub games: HashMap<String, GameSummary>,
    pub deals: HashMap<String, DealLookup>,
    pub lookups: HashMap<String, GameLookup>,
    pub failing_lookups: HashSet<String>,
    pub failing_deals: HashSet<String>,
    pub listing: Option<RawDealPage>,
    /// `None` makes the next directory fetch fail.
    stores: Mutex<Option<Vec<StoreEntry>>>,
    /// Simulated upstream latency for directory fetches.
    pub store_delay: Option<Duration>,
    pub store_calls: AtomicUsize,
    pub deal_calls: AtomicUsize,
    pub lookup_calls: AtomicUsize,
}

impl FakeSource {
    pub fn with_stores(entries: Vec<StoreEntry>) -> Self {
        let source = Self::default();
        source.set_stores(entries);
        source
    }

    pub fn set_stores(&self, entries: Vec<StoreEntry>) {
        *self.stores.lock().expect("stores lock") = Some(entries);
    }

    pub fn fail_stores(&self) {
        *self.stores.lock().expect("stores lock") = None;
    }

    pub fn store_calls(&self) -> usize {
        self.store_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DealSource for FakeSource {
    async fn primary_game_record(
        &self,
        steam_app_id: &str,
    ) -> Result<Lookup<GameSummary>, CheapSharkError> {
        Ok(self
            .games
            .get(steam_app_id)
            .cloned()
            .map_or(Lookup::NotFound, Lookup::Found))
    }

    async fn deal_by_id(&self, deal_id: &str) -> Result<Lookup<DealLookup>, CheapSharkError> {
        self.deal_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_deals.contains(deal_id) {
            return Err(shape_error("deal"));
        }
        Ok(self
            .deals
            .get(deal_id)
            .cloned()
            .map_or(Lookup::NotFound, Lookup::Found))
    }

    async fn game_by_id(&self, game_id: &str) -> Result<Lookup<GameLookup>, CheapSharkError> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_lookups.contains(game_id) {
            return Err(CheapSharkError::UnexpectedStatus {
                status: 503,
                url: format!("games?id={game_id}"),
            });
        }
        Ok(self
            .lookups
            .get(game_id)
            .cloned()
            .map_or(Lookup::NotFound, Lookup::Found))
    }

    async fn store_directory(&self) -> Result<Vec<StoreEntry>, CheapSharkError> {
        self.store_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.store_delay {
            tokio::time::sleep(delay).await;
        }
        self.stores
            .lock()
            .expect("stores lock")
            .clone()
            .ok_or_else(|| shape_error("stores"))
    }

    async fn deal_listing(&self, _query: &DealListQuery) -> Result<RawDealPage, CheapSharkError> {
        self.listing.clone().ok_or_else(|| shape_error("deals listing"))
    }
}

pub(crate) struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().expect("clock lock") += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().expect("clock lock")
    }
}
