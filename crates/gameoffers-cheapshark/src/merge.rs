//! Per-field merge rules for building a [`crate::BestKnownDeal`].
//!
//! Three sources can describe the same deal: the single-deal lookup (with its
//! embedded `gameInfo`), the lowest-priced candidate from the game lookup,
//! and the primary game record. Each field has its own precedence chain;
//! the first usable value wins.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::numeric::{compute_savings, round_percent};
use crate::types::{DealGameInfo, DealLookup, GameDeal, GameLookup, GameSummary};

pub const DEAL_REDIRECT_URL: &str = "https://www.cheapshark.com/redirect";

/// Characters left unescaped by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Picks the candidate with the lowest `price` (falling back to
/// `sale_price`). Entries without a usable price are ignored; on a tie the
/// earliest entry wins.
#[must_use]
pub fn pick_lowest_candidate(deals: &[GameDeal]) -> Option<&GameDeal> {
    let mut best: Option<(&GameDeal, f64)> = None;
    for deal in deals {
        let Some(price) = deal.effective_price() else {
            continue;
        };
        if best.is_none_or(|(_, best_price)| price < best_price) {
            best = Some((deal, price));
        }
    }
    best.map(|(deal, _)| deal)
}

fn game_info(deal: Option<&DealLookup>) -> Option<&DealGameInfo> {
    deal.and_then(|d| d.game_info.as_ref())
}

/// Embedded `gameInfo.storeID`, else the candidate's store.
#[must_use]
pub fn merge_store_id(deal: Option<&DealLookup>, candidate: Option<&GameDeal>) -> Option<String> {
    game_info(deal)
        .and_then(|info| info.store_id.clone())
        .or_else(|| candidate.and_then(|c| c.store_id.clone()))
}

/// Embedded sale price, then the deal's own, then the candidate's `price`,
/// then the candidate's `sale_price`.
#[must_use]
pub fn merge_sale_price(deal: Option<&DealLookup>, candidate: Option<&GameDeal>) -> Option<f64> {
    game_info(deal)
        .and_then(|info| info.sale_price)
        .or_else(|| deal.and_then(|d| d.sale_price))
        .or_else(|| candidate.and_then(|c| c.price))
        .or_else(|| candidate.and_then(|c| c.sale_price))
}

/// Embedded retail price, then the deal's own, then the candidate's.
#[must_use]
pub fn merge_retail_price(deal: Option<&DealLookup>, candidate: Option<&GameDeal>) -> Option<f64> {
    game_info(deal)
        .and_then(|info| info.retail_price)
        .or_else(|| deal.and_then(|d| d.retail_price))
        .or_else(|| candidate.and_then(|c| c.retail_price))
}

/// Embedded savings (rounded), else computed from the merged prices.
#[must_use]
pub fn merge_savings(
    deal: Option<&DealLookup>,
    sale_price: Option<f64>,
    retail_price: Option<f64>,
) -> Option<i32> {
    game_info(deal)
        .and_then(|info| info.savings)
        .and_then(round_percent)
        .or_else(|| compute_savings(sale_price, retail_price))
}

/// The deal's own id, then the candidate's, then the primary record's
/// cheapest deal id.
#[must_use]
pub fn merge_deal_id(
    deal: Option<&DealLookup>,
    candidate: Option<&GameDeal>,
    game: &GameSummary,
) -> Option<String> {
    deal.and_then(|d| d.deal_id.clone())
        .or_else(|| candidate.and_then(|c| c.deal_id.clone()))
        .or_else(|| game.cheapest_deal_id.clone())
}

/// The primary record's external title, then the lookup's title, then the
/// embedded name, else empty.
#[must_use]
pub fn merge_title(
    game: &GameSummary,
    lookup: Option<&GameLookup>,
    deal: Option<&DealLookup>,
) -> String {
    game.external
        .clone()
        .or_else(|| lookup.and_then(|l| l.info.as_ref()).and_then(|i| i.title.clone()))
        .or_else(|| game_info(deal).and_then(|info| info.name.clone()))
        .unwrap_or_default()
}

/// Redirect link for a deal id, escaped like `encodeURIComponent`.
#[must_use]
pub fn deal_link(deal_id: &str) -> String {
    format!(
        "{DEAL_REDIRECT_URL}?dealID={}",
        utf8_percent_encode(deal_id, URI_COMPONENT)
    )
}

#[cfg(test)]
#[path = "merge_test.rs"]
mod tests;
