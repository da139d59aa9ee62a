//! The upstream collaborator calls the resolver and store cache depend on.

use async_trait::async_trait;

use gameoffers_core::Lookup;

use crate::error::CheapSharkError;
use crate::listing::DealListQuery;
use crate::types::{DealLookup, GameLookup, GameSummary, RawDealPage, StoreEntry};

/// Source of deal-aggregator data.
///
/// [`crate::CheapSharkClient`] is the production implementation; tests
/// substitute an in-memory fake. Single-record calls report a missing record
/// as [`Lookup::NotFound`] and reserve `Err` for transport and shape failures.
#[async_trait]
pub trait DealSource: Send + Sync {
    /// The aggregator's record for a Steam app id.
    async fn primary_game_record(
        &self,
        steam_app_id: &str,
    ) -> Result<Lookup<GameSummary>, CheapSharkError>;

    async fn deal_by_id(&self, deal_id: &str) -> Result<Lookup<DealLookup>, CheapSharkError>;

    async fn game_by_id(&self, game_id: &str) -> Result<Lookup<GameLookup>, CheapSharkError>;

    /// The full store directory.
    async fn store_directory(&self) -> Result<Vec<StoreEntry>, CheapSharkError>;

    /// One page of the current deal listing.
    async fn deal_listing(&self, query: &DealListQuery) -> Result<RawDealPage, CheapSharkError>;
}
