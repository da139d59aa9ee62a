//! Steam storefront response types and the normalized records built from
//! them.

use serde::{Deserialize, Serialize};

/// Public store page for an app.
pub const STORE_PAGE_URL: &str = "https://store.steampowered.com/app";

// ---------------------------------------------------------------------------
// GET /api/storesearch/
// ---------------------------------------------------------------------------

/// One storefront search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub appid: u32,
    pub name: String,
    pub tiny_image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSearchItem {
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tiny_image: Option<String>,
}

impl RawSearchItem {
    /// Items without an app id cannot be linked anywhere and are dropped.
    pub(crate) fn into_hit(self) -> Option<SearchHit> {
        Some(SearchHit {
            appid: self.id?,
            name: self.name.unwrap_or_default(),
            tiny_image: self.tiny_image.filter(|s| !s.is_empty()),
        })
    }
}

// ---------------------------------------------------------------------------
// GET /api/appdetails
// ---------------------------------------------------------------------------

/// Normalized storefront details for one app.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppDetails {
    pub appid: u32,
    pub name: String,
    pub short_description: Option<String>,
    pub header_image: Option<String>,
    pub is_free: bool,
    pub price_overview: Option<PriceOverview>,
    pub release_date: Option<ReleaseDate>,
    pub developers: Vec<String>,
    pub publishers: Vec<String>,
    pub platforms: Option<Platforms>,
    pub metacritic: Option<Metacritic>,
    pub genres: Vec<Genre>,
    pub steam_link: String,
}

/// Prices are in the currency's minor unit (cents for USD).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceOverview {
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub initial: Option<u64>,
    #[serde(rename = "final", default)]
    pub final_price: Option<u64>,
    #[serde(default)]
    pub discount_percent: Option<u32>,
    #[serde(default)]
    pub initial_formatted: Option<String>,
    #[serde(default)]
    pub final_formatted: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseDate {
    #[serde(default)]
    pub coming_soon: bool,
    /// Display string as the store renders it, e.g. `"18 Apr, 2011"`.
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platforms {
    #[serde(default)]
    pub windows: bool,
    #[serde(default)]
    pub mac: bool,
    #[serde(default)]
    pub linux: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metacritic {
    pub score: u32,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    #[serde(default)]
    pub id: Option<String>,
    pub description: String,
}

/// One entry of the `appdetails` envelope, keyed by app id upstream.
#[derive(Debug, Deserialize)]
pub(crate) struct RawAppEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<RawAppData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawAppData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub header_image: Option<String>,
    #[serde(default)]
    pub is_free: bool,
    #[serde(default)]
    pub price_overview: Option<PriceOverview>,
    #[serde(default)]
    pub release_date: Option<ReleaseDate>,
    #[serde(default)]
    pub developers: Vec<String>,
    #[serde(default)]
    pub publishers: Vec<String>,
    #[serde(default)]
    pub platforms: Option<Platforms>,
    #[serde(default)]
    pub metacritic: Option<Metacritic>,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

impl RawAppData {
    pub(crate) fn into_details(self, appid: u32) -> AppDetails {
        AppDetails {
            appid,
            name: self.name.unwrap_or_default(),
            short_description: self.short_description.filter(|s| !s.is_empty()),
            header_image: self.header_image.filter(|s| !s.is_empty()),
            is_free: self.is_free,
            price_overview: self.price_overview,
            release_date: self.release_date,
            developers: self.developers,
            publishers: self.publishers,
            platforms: self.platforms,
            metacritic: self.metacritic,
            genres: self.genres,
            steam_link: format!("{STORE_PAGE_URL}/{appid}/"),
        }
    }
}
