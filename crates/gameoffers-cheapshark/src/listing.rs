//! Paged listing of current deals with store names and redirect links.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::CheapSharkError;
use crate::merge::deal_link;
use crate::source::DealSource;
use crate::stores::{StoreDirectory, StoreDirectoryCache};
use crate::types::DealSummary;

pub const DEFAULT_PAGE_SIZE: u32 = 24;
pub const DEFAULT_SORT: &str = "DealRating";

/// Parameters for one page of the deal listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealListQuery {
    pub page_number: u32,
    pub page_size: u32,
    pub sort_by: String,
    pub desc: bool,
    pub on_sale: bool,
}

impl Default for DealListQuery {
    fn default() -> Self {
        Self {
            page_number: 0,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: DEFAULT_SORT.to_string(),
            desc: true,
            on_sale: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListedDeal {
    pub deal_id: Option<String>,
    pub store_id: Option<String>,
    pub store_name: String,
    pub title: String,
    pub sale_price: Option<f64>,
    pub normal_price: Option<f64>,
    pub savings: Option<f64>,
    pub deal_rating: Option<f64>,
    pub thumb: Option<String>,
    pub steam_app_id: Option<String>,
    pub metacritic_score: Option<f64>,
    pub steam_rating_text: Option<String>,
    pub steam_rating_percent: Option<f64>,
    pub release_date: Option<DateTime<Utc>>,
    pub deal_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DealPage {
    pub deals: Vec<ListedDeal>,
    pub page_number: u32,
    pub page_size: u32,
    /// From the `x-total-page-count` header; `None` when missing or zero.
    pub total_pages: Option<u32>,
}

/// Fetches one page of current deals and resolves each row's store name.
///
/// # Errors
///
/// Propagates listing failures, and store directory failures when no
/// earlier snapshot exists.
pub async fn list_deals<S: DealSource>(
    source: &S,
    stores: &StoreDirectoryCache<S>,
    query: &DealListQuery,
) -> Result<DealPage, CheapSharkError> {
    let raw = source.deal_listing(query).await?;
    let directory = stores.directory().await?;

    let deals: Vec<ListedDeal> = raw
        .deals
        .into_iter()
        .map(|summary| listed_deal(summary, &directory))
        .collect();
    tracing::debug!(
        page = query.page_number,
        deals = deals.len(),
        total_pages = ?raw.total_pages,
        "deal listing fetched"
    );

    Ok(DealPage {
        deals,
        page_number: query.page_number,
        page_size: query.page_size,
        total_pages: raw.total_pages,
    })
}

fn listed_deal(summary: DealSummary, directory: &StoreDirectory) -> ListedDeal {
    let store_name = directory.name_for(summary.store_id.as_deref()).to_owned();
    ListedDeal {
        deal_link: summary.deal_id.as_deref().map(deal_link),
        deal_id: summary.deal_id,
        store_id: summary.store_id,
        store_name,
        title: summary.title.unwrap_or_default(),
        sale_price: summary.sale_price,
        normal_price: summary.normal_price,
        savings: summary.savings,
        deal_rating: summary.deal_rating,
        thumb: summary.thumb,
        steam_app_id: summary.steam_app_id,
        metacritic_score: summary.metacritic_score.filter(|score| *score > 0.0),
        steam_rating_text: summary.steam_rating_text,
        steam_rating_percent: summary.steam_rating_percent.filter(|pct| *pct > 0.0),
        release_date: summary.release_date,
    }
}
