//! CheapShark API response types.
//!
//! Every field is optional and leniently decoded: the API mixes numeric
//! strings, numbers and nulls, and omits fields freely. See
//! [`crate::numeric`] for the coercion rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::numeric::{loose_id, loose_number, loose_text, loose_timestamp};

// ---------------------------------------------------------------------------
// GET /games?steamAppID=..
// ---------------------------------------------------------------------------

/// The aggregator's record for a Steam app, as returned by the
/// `steamAppID` game search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameSummary {
    #[serde(rename = "gameID", default, deserialize_with = "loose_id")]
    pub game_id: Option<String>,
    /// Cheapest price the aggregator has seen for the title.
    #[serde(default, deserialize_with = "loose_number")]
    pub cheapest: Option<f64>,
    #[serde(rename = "cheapestDealID", default, deserialize_with = "loose_id")]
    pub cheapest_deal_id: Option<String>,
    /// Display title.
    #[serde(default, deserialize_with = "loose_text")]
    pub external: Option<String>,
    /// Capsule image URL.
    #[serde(default, deserialize_with = "loose_text")]
    pub thumb: Option<String>,
}

// ---------------------------------------------------------------------------
// GET /deals?id=..
// ---------------------------------------------------------------------------

/// A single deal looked up by deal id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DealLookup {
    #[serde(rename = "dealID", default, deserialize_with = "loose_id")]
    pub deal_id: Option<String>,
    #[serde(rename = "storeID", default, deserialize_with = "loose_id")]
    pub store_id: Option<String>,
    #[serde(rename = "salePrice", default, deserialize_with = "loose_number")]
    pub sale_price: Option<f64>,
    #[serde(rename = "retailPrice", default, deserialize_with = "loose_number")]
    pub retail_price: Option<f64>,
    #[serde(rename = "gameInfo", default, deserialize_with = "lenient_object")]
    pub game_info: Option<DealGameInfo>,
}

/// The `gameInfo` block embedded in a deal lookup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DealGameInfo {
    #[serde(rename = "storeID", default, deserialize_with = "loose_id")]
    pub store_id: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub name: Option<String>,
    #[serde(rename = "salePrice", default, deserialize_with = "loose_number")]
    pub sale_price: Option<f64>,
    #[serde(rename = "retailPrice", default, deserialize_with = "loose_number")]
    pub retail_price: Option<f64>,
    #[serde(default, deserialize_with = "loose_number")]
    pub savings: Option<f64>,
}

// ---------------------------------------------------------------------------
// GET /games?id=..
// ---------------------------------------------------------------------------

/// Full game lookup by the aggregator's own game id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameLookup {
    #[serde(default, deserialize_with = "lenient_object")]
    pub info: Option<GameInfo>,
    #[serde(rename = "cheapestPriceEver", default, deserialize_with = "lenient_object")]
    pub cheapest_price_ever: Option<PriceHistory>,
    /// Candidate deals in upstream order. Entries that are not objects are
    /// dropped; a non-array value decodes as empty.
    #[serde(default, deserialize_with = "lenient_deals")]
    pub deals: Vec<GameDeal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameInfo {
    #[serde(default, deserialize_with = "loose_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub thumb: Option<String>,
}

/// One candidate deal from a game lookup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameDeal {
    #[serde(rename = "storeID", default, deserialize_with = "loose_id")]
    pub store_id: Option<String>,
    #[serde(rename = "dealID", default, deserialize_with = "loose_id")]
    pub deal_id: Option<String>,
    #[serde(default, deserialize_with = "loose_number")]
    pub price: Option<f64>,
    #[serde(rename = "salePrice", default, deserialize_with = "loose_number")]
    pub sale_price: Option<f64>,
    #[serde(rename = "retailPrice", default, deserialize_with = "loose_number")]
    pub retail_price: Option<f64>,
}

impl GameDeal {
    /// `price`, falling back to `sale_price`.
    #[must_use]
    pub fn effective_price(&self) -> Option<f64> {
        self.price.or(self.sale_price)
    }
}

/// Lowest historical price recorded for a title.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    #[serde(default, deserialize_with = "loose_number")]
    pub price: Option<f64>,
    #[serde(
        rename(deserialize = "date"),
        default,
        deserialize_with = "loose_timestamp"
    )]
    pub observed_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// GET /stores
// ---------------------------------------------------------------------------

/// One row of the store directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreEntry {
    #[serde(rename = "storeID", default, deserialize_with = "loose_id")]
    pub store_id: Option<String>,
    #[serde(rename = "storeName", default, deserialize_with = "loose_text")]
    pub store_name: Option<String>,
}

// ---------------------------------------------------------------------------
// GET /deals (listing)
// ---------------------------------------------------------------------------

/// One row of the deal listing, before store-name resolution.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DealSummary {
    #[serde(rename = "dealID", default, deserialize_with = "loose_id")]
    pub deal_id: Option<String>,
    #[serde(rename = "storeID", default, deserialize_with = "loose_id")]
    pub store_id: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub title: Option<String>,
    #[serde(rename = "salePrice", default, deserialize_with = "loose_number")]
    pub sale_price: Option<f64>,
    #[serde(rename = "normalPrice", default, deserialize_with = "loose_number")]
    pub normal_price: Option<f64>,
    #[serde(default, deserialize_with = "loose_number")]
    pub savings: Option<f64>,
    #[serde(rename = "dealRating", default, deserialize_with = "loose_number")]
    pub deal_rating: Option<f64>,
    #[serde(default, deserialize_with = "loose_text")]
    pub thumb: Option<String>,
    #[serde(rename = "steamAppID", default, deserialize_with = "loose_id")]
    pub steam_app_id: Option<String>,
    #[serde(rename = "metacriticScore", default, deserialize_with = "loose_number")]
    pub metacritic_score: Option<f64>,
    #[serde(rename = "steamRatingText", default, deserialize_with = "loose_text")]
    pub steam_rating_text: Option<String>,
    #[serde(rename = "steamRatingPercent", default, deserialize_with = "loose_number")]
    pub steam_rating_percent: Option<f64>,
    #[serde(rename = "releaseDate", default, deserialize_with = "loose_timestamp")]
    pub release_date: Option<DateTime<Utc>>,
}

/// A page of the deal listing plus the page count from the
/// `x-total-page-count` header.
#[derive(Debug, Clone, Default)]
pub struct RawDealPage {
    pub deals: Vec<DealSummary>,
    pub total_pages: Option<u32>,
}

/// Decodes an object, treating any other JSON value as absent.
fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(v @ Value::Object(_)) => serde_json::from_value(v).ok(),
        _ => None,
    })
}

fn lenient_deals<'de, D>(deserializer: D) -> Result<Vec<GameDeal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(items)) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value::<GameDeal>(item).ok())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn game_summary_parses_string_fields() {
        let summary: GameSummary = serde_json::from_value(json!({
            "gameID": "612",
            "steamAppID": "620",
            "cheapest": "1.99",
            "cheapestDealID": "tyTH88J0PXRvYALBjV3cNHd5Juq1qKcu4tG4lBiUCt4%3D",
            "external": "Portal 2",
            "internalName": "PORTAL2",
            "thumb": "https://cdn.example/portal2.jpg"
        }))
        .expect("parse summary");

        assert_eq!(summary.game_id.as_deref(), Some("612"));
        assert_eq!(summary.cheapest, Some(1.99));
        assert_eq!(summary.external.as_deref(), Some("Portal 2"));
        assert!(summary.cheapest_deal_id.is_some());
        assert_eq!(
            summary.thumb.as_deref(),
            Some("https://cdn.example/portal2.jpg")
        );
    }

    #[test]
    fn deal_lookup_tolerates_missing_game_info() {
        let deal: DealLookup = serde_json::from_value(json!({
            "gameInfo": null,
            "cheaperStores": [],
            "cheapestPrice": {"price": "1.99", "date": 1_700_000_000}
        }))
        .expect("parse deal");

        assert!(deal.game_info.is_none());
        assert!(deal.sale_price.is_none());
    }

    #[test]
    fn deal_game_info_coerces_prices() {
        let deal: DealLookup = serde_json::from_value(json!({
            "gameInfo": {
                "storeID": "1",
                "name": "Portal 2",
                "salePrice": "1.99",
                "retailPrice": "9.99",
                "savings": ""
            }
        }))
        .expect("parse deal");

        let info = deal.game_info.expect("game info present");
        assert_eq!(info.store_id.as_deref(), Some("1"));
        assert_eq!(info.sale_price, Some(1.99));
        assert_eq!(info.retail_price, Some(9.99));
        assert_eq!(info.savings, None);
    }

    #[test]
    fn game_lookup_drops_malformed_deals() {
        let lookup: GameLookup = serde_json::from_value(json!({
            "info": {"title": "Portal 2", "steamAppID": "620"},
            "cheapestPriceEver": {"price": "0.99", "date": 1_500_000_000},
            "deals": [
                {"storeID": "1", "dealID": "a", "price": "1.99", "retailPrice": "9.99"},
                "not-an-object",
                {"storeID": "7", "dealID": "b", "price": null}
            ]
        }))
        .expect("parse lookup");

        assert_eq!(lookup.deals.len(), 2);
        assert_eq!(lookup.deals[0].effective_price(), Some(1.99));
        assert_eq!(lookup.deals[1].effective_price(), None);
        let history = lookup.cheapest_price_ever.expect("history present");
        assert_eq!(history.price, Some(0.99));
        assert_eq!(history.observed_at.map(|d| d.timestamp()), Some(1_500_000_000));
    }

    #[test]
    fn game_lookup_non_array_deals_decode_as_empty() {
        let lookup: GameLookup =
            serde_json::from_value(json!({"deals": {"0": {}}})).expect("parse lookup");
        assert!(lookup.deals.is_empty());
        assert!(lookup.info.is_none());
    }

    #[test]
    fn price_history_serializes_observed_at() {
        let history = PriceHistory {
            price: Some(4.99),
            observed_at: DateTime::from_timestamp(0, 0),
        };
        let json = serde_json::to_value(&history).expect("serialize");
        assert_eq!(json["price"], json!(4.99));
        assert_eq!(json["observed_at"], json!("1970-01-01T00:00:00Z"));
    }
}
