//! Resolves a Steam app id to the best known deal and price history.

use std::sync::Arc;

use serde::Serialize;

use gameoffers_core::Lookup;

use crate::error::CheapSharkError;
use crate::merge::{
    deal_link, merge_deal_id, merge_retail_price, merge_sale_price, merge_savings, merge_store_id,
    merge_title, pick_lowest_candidate,
};
use crate::source::DealSource;
use crate::stores::{StoreDirectory, StoreDirectoryCache};
use crate::types::{DealLookup, GameLookup, GameSummary, PriceHistory};

pub const NO_MAPPING_REASON: &str = "no mapping for this application";
pub const NO_DEAL_DATA_REASON: &str = "no current deals or price history";

/// The merged view of the current best deal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestKnownDeal {
    pub deal_id: Option<String>,
    pub store_id: Option<String>,
    /// Always populated; `"Unknown"` when the store cannot be resolved.
    pub store_name: String,
    pub sale_price: Option<f64>,
    pub retail_price: Option<f64>,
    pub savings: Option<i32>,
    pub deal_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedDeal {
    pub steam_app_id: String,
    pub game_id: Option<String>,
    pub title: String,
    /// Capsule image from the primary record, else from the game lookup.
    pub thumb: Option<String>,
    /// Cheapest price the primary record reports.
    pub cheapest: Option<f64>,
    pub cheapest_deal_id: Option<String>,
    pub deal: BestKnownDeal,
    pub cheapest_price_ever: Option<PriceHistory>,
}

/// Result of a resolution that reached the upstream successfully.
#[derive(Debug, Clone, PartialEq)]
pub enum DealResolution {
    Resolved(Box<NormalizedDeal>),
    /// No usable record; `reason` is human readable.
    Absent { reason: String },
}

impl DealResolution {
    fn absent(reason: &str) -> Self {
        Self::Absent {
            reason: reason.to_string(),
        }
    }

    #[must_use]
    pub fn record(&self) -> Option<&NormalizedDeal> {
        match self {
            Self::Resolved(deal) => Some(deal.as_ref()),
            Self::Absent { .. } => None,
        }
    }

    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Resolved(_) => None,
            Self::Absent { reason } => Some(reason),
        }
    }
}

/// Cross-references the primary game record, the single-deal lookup, the
/// game lookup and the store directory into one [`NormalizedDeal`].
pub struct DealResolver<S> {
    source: Arc<S>,
    stores: Arc<StoreDirectoryCache<S>>,
}

impl<S: DealSource> DealResolver<S> {
    #[must_use]
    pub fn new(source: Arc<S>, stores: Arc<StoreDirectoryCache<S>>) -> Self {
        Self { source, stores }
    }

    #[must_use]
    pub fn stores(&self) -> &Arc<StoreDirectoryCache<S>> {
        &self.stores
    }

    /// Resolves the best known deal for `steam_app_id`.
    ///
    /// A missing mapping or a record without any pricing, store or history
    /// data is reported as [`DealResolution::Absent`], not as an error.
    ///
    /// # Errors
    ///
    /// Any transport or shape failure from the primary lookup, the deal
    /// lookup, the game lookup or the store directory (when no earlier
    /// snapshot exists) aborts the resolution and is returned as-is.
    pub async fn resolve_deal(&self, steam_app_id: &str) -> Result<DealResolution, CheapSharkError> {
        let steam_app_id = steam_app_id.trim();
        if steam_app_id.is_empty() {
            return Ok(DealResolution::absent(NO_MAPPING_REASON));
        }

        let Lookup::Found(game) = self.source.primary_game_record(steam_app_id).await? else {
            tracing::debug!(steam_app_id, "no aggregator mapping for app");
            return Ok(DealResolution::absent(NO_MAPPING_REASON));
        };

        let deal = async {
            match game.cheapest_deal_id.as_deref() {
                Some(deal_id) => self.source.deal_by_id(deal_id).await.map(Lookup::found),
                None => Ok(None),
            }
        };
        let lookup = async {
            match game.game_id.as_deref() {
                Some(game_id) => self.source.game_by_id(game_id).await.map(Lookup::found),
                None => Ok(None),
            }
        };

        let (deal, lookup, directory) = tokio::try_join!(deal, lookup, self.stores.directory())?;

        let resolution = assemble(
            steam_app_id,
            &game,
            deal.as_ref(),
            lookup.as_ref(),
            &directory,
        );
        tracing::debug!(
            steam_app_id,
            resolved = resolution.record().is_some(),
            "deal resolution finished"
        );
        Ok(resolution)
    }
}

/// Merges the fetched records and applies the presence gate.
fn assemble(
    steam_app_id: &str,
    game: &GameSummary,
    deal: Option<&DealLookup>,
    lookup: Option<&GameLookup>,
    directory: &StoreDirectory,
) -> DealResolution {
    let candidate = lookup.and_then(|l| pick_lowest_candidate(&l.deals));

    let store_id = merge_store_id(deal, candidate);
    let sale_price = merge_sale_price(deal, candidate);
    let retail_price = merge_retail_price(deal, candidate);
    let savings = merge_savings(deal, sale_price, retail_price);
    let deal_id = merge_deal_id(deal, candidate, game);
    let cheapest_price_ever = lookup.and_then(|l| l.cheapest_price_ever.clone());

    let has_deal_data = sale_price.is_some() || retail_price.is_some() || store_id.is_some();
    let has_history = cheapest_price_ever
        .as_ref()
        .and_then(|h| h.price)
        .is_some_and(|price| price > 0.0);
    if !has_deal_data && !has_history {
        return DealResolution::absent(NO_DEAL_DATA_REASON);
    }

    let store_name = directory.name_for(store_id.as_deref()).to_owned();

    DealResolution::Resolved(Box::new(NormalizedDeal {
        steam_app_id: steam_app_id.to_owned(),
        game_id: game.game_id.clone(),
        title: merge_title(game, lookup, deal),
        thumb: game.thumb.clone().or_else(|| {
            lookup
                .and_then(|l| l.info.as_ref())
                .and_then(|info| info.thumb.clone())
        }),
        cheapest: game.cheapest,
        cheapest_deal_id: game.cheapest_deal_id.clone(),
        deal: BestKnownDeal {
            deal_link: deal_id.as_deref().map(deal_link),
            deal_id,
            store_id,
            store_name,
            sale_price,
            retail_price,
            savings,
        },
        cheapest_price_ever,
    }))
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
