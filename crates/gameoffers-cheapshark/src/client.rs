//! HTTP client for the CheapShark REST API.
//!
//! Wraps `reqwest` with a fixed timeout, maps HTTP 404 and empty payloads to
//! [`Lookup::NotFound`], and surfaces every other failure as a typed
//! [`CheapSharkError`]. No request is ever retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use gameoffers_core::Lookup;

use crate::error::CheapSharkError;
use crate::listing::DealListQuery;
use crate::source::DealSource;
use crate::types::{DealLookup, DealSummary, GameLookup, GameSummary, RawDealPage, StoreEntry};

pub const DEFAULT_BASE_URL: &str = "https://www.cheapshark.com/api/1.0";

const TOTAL_PAGE_COUNT_HEADER: &str = "x-total-page-count";

/// Client for the CheapShark REST API.
///
/// Use [`CheapSharkClient::new`] for production or
/// [`CheapSharkClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct CheapSharkClient {
    client: Client,
    base_url: Url,
}

impl CheapSharkClient {
    /// Creates a client pointed at the public CheapShark API.
    ///
    /// # Errors
    ///
    /// Returns [`CheapSharkError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, CheapSharkError> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout_secs, user_agent)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`CheapSharkError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`CheapSharkError::InvalidBaseUrl`] if
    /// `base_url` is not an absolute http(s) URL.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, CheapSharkError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let invalid = |reason: String| CheapSharkError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason,
        };
        let base_url = Url::parse(base_url.trim_end_matches('/')).map_err(|e| invalid(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid("URL cannot be used as a base".to_string()));
        }

        Ok(Self { client, base_url })
    }

    /// Looks up the aggregator's game record for a Steam app id
    /// (`GET /games?steamAppID=..&limit=1`).
    ///
    /// A blank id, a 404, or an empty result list is [`Lookup::NotFound`].
    ///
    /// # Errors
    ///
    /// - [`CheapSharkError::Http`] / [`CheapSharkError::UnexpectedStatus`] on
    ///   transport failure.
    /// - [`CheapSharkError::UpstreamShape`] if the body is not a JSON array.
    /// - [`CheapSharkError::Deserialize`] if the first entry cannot be decoded.
    pub async fn game_by_steam_app_id(
        &self,
        steam_app_id: &str,
    ) -> Result<Lookup<GameSummary>, CheapSharkError> {
        let id = steam_app_id.trim();
        if id.is_empty() {
            return Ok(Lookup::NotFound);
        }

        let context = format!("games(steamAppID={id})");
        let url = self.build_url("games", &[("steamAppID", id), ("limit", "1")]);
        let Lookup::Found((body, _)) = self.get_json(&url).await? else {
            return Ok(Lookup::NotFound);
        };

        let Value::Array(items) = body else {
            return Err(CheapSharkError::UpstreamShape {
                context,
                reason: "expected a JSON array of games".to_string(),
            });
        };

        match items.into_iter().next() {
            Some(first) => decode(first, &context).map(Lookup::Found),
            None => Ok(Lookup::NotFound),
        }
    }

    /// Looks up a game by the aggregator's own id (`GET /games?id=..`).
    ///
    /// # Errors
    ///
    /// Transport failures, [`CheapSharkError::UpstreamShape`] if the body is
    /// not a JSON object, or [`CheapSharkError::Deserialize`] if the record
    /// cannot be decoded.
    pub async fn game_lookup(&self, game_id: &str) -> Result<Lookup<GameLookup>, CheapSharkError> {
        self.single_record("games", game_id).await
    }

    /// Looks up a single deal (`GET /deals?id=..`).
    ///
    /// # Errors
    ///
    /// Transport failures, [`CheapSharkError::UpstreamShape`] if the body is
    /// not a JSON object, or [`CheapSharkError::Deserialize`] if the record
    /// cannot be decoded.
    pub async fn deal_lookup(&self, deal_id: &str) -> Result<Lookup<DealLookup>, CheapSharkError> {
        self.single_record("deals", deal_id).await
    }

    /// Fetches the full store directory (`GET /stores`).
    ///
    /// Entries that are not objects are skipped.
    ///
    /// # Errors
    ///
    /// Transport failures, or [`CheapSharkError::UpstreamShape`] if the body is
    /// not a JSON array (a 404 counts as a shape failure here: the directory
    /// must exist).
    pub async fn stores(&self) -> Result<Vec<StoreEntry>, CheapSharkError> {
        let url = self.build_url("stores", &[]);
        let body = match self.get_json(&url).await? {
            Lookup::Found((body, _)) => body,
            Lookup::NotFound => Value::Null,
        };

        let Value::Array(items) = body else {
            return Err(CheapSharkError::UpstreamShape {
                context: "stores".to_string(),
                reason: "expected a JSON array of stores".to_string(),
            });
        };

        Ok(items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value::<StoreEntry>(item).ok())
            .collect())
    }

    /// Fetches one page of the current deal listing (`GET /deals`).
    ///
    /// # Errors
    ///
    /// Transport failures, or [`CheapSharkError::UpstreamShape`] if the body is
    /// not a JSON array.
    pub async fn deals_page(&self, query: &DealListQuery) -> Result<RawDealPage, CheapSharkError> {
        let page_number = query.page_number.to_string();
        let page_size = query.page_size.to_string();
        let url = self.build_url(
            "deals",
            &[
                ("pageNumber", &page_number),
                ("pageSize", &page_size),
                ("sortBy", &query.sort_by),
                ("desc", if query.desc { "1" } else { "0" }),
                ("onSale", if query.on_sale { "1" } else { "0" }),
            ],
        );

        let (body, total_pages) = match self.get_json(&url).await? {
            Lookup::Found(found) => found,
            Lookup::NotFound => (Value::Null, None),
        };

        let Value::Array(items) = body else {
            return Err(CheapSharkError::UpstreamShape {
                context: "deals listing".to_string(),
                reason: "expected a JSON array of deals".to_string(),
            });
        };

        let deals = items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value::<DealSummary>(item).ok())
            .collect();

        Ok(RawDealPage { deals, total_pages })
    }

    /// Shared path for the `?id=` lookups: blank ids, 404s, `null` and `[]`
    /// bodies are all not-found.
    async fn single_record<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        id: &str,
    ) -> Result<Lookup<T>, CheapSharkError> {
        let id = id.trim();
        if id.is_empty() {
            return Ok(Lookup::NotFound);
        }

        let url = self.build_url(endpoint, &[("id", id)]);
        let Lookup::Found((body, _)) = self.get_json(&url).await? else {
            return Ok(Lookup::NotFound);
        };

        if is_empty_payload(&body) {
            return Ok(Lookup::NotFound);
        }

        let context = format!("{endpoint}(id={id})");
        if !body.is_object() {
            return Err(CheapSharkError::UpstreamShape {
                context,
                reason: format!("expected a JSON object, got {}", json_kind(&body)),
            });
        }
        decode(body, &context).map(Lookup::Found)
    }

    /// Builds `<base>/<endpoint>?<params>` with percent-encoded values.
    fn build_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(endpoint);
        }
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Sends a GET request and parses the body as JSON.
    ///
    /// Returns the body together with the `x-total-page-count` header, or
    /// [`Lookup::NotFound`] on HTTP 404.
    async fn get_json(&self, url: &Url) -> Result<Lookup<(Value, Option<u32>)>, CheapSharkError> {
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            tracing::debug!(url = %url, "cheapshark returned 404");
            return Ok(Lookup::NotFound);
        }

        if !status.is_success() {
            return Err(CheapSharkError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let total_pages = response
            .headers()
            .get(TOTAL_PAGE_COUNT_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u32>().ok())
            .filter(|pages| *pages > 0);

        let body = response.text().await?;
        let value = serde_json::from_str(&body).map_err(|e| CheapSharkError::Deserialize {
            context: url.to_string(),
            source: e,
        })?;

        Ok(Lookup::Found((value, total_pages)))
    }
}

#[async_trait]
impl DealSource for CheapSharkClient {
    async fn primary_game_record(
        &self,
        steam_app_id: &str,
    ) -> Result<Lookup<GameSummary>, CheapSharkError> {
        self.game_by_steam_app_id(steam_app_id).await
    }

    async fn deal_by_id(&self, deal_id: &str) -> Result<Lookup<DealLookup>, CheapSharkError> {
        self.deal_lookup(deal_id).await
    }

    async fn game_by_id(&self, game_id: &str) -> Result<Lookup<GameLookup>, CheapSharkError> {
        self.game_lookup(game_id).await
    }

    async fn store_directory(&self) -> Result<Vec<StoreEntry>, CheapSharkError> {
        self.stores().await
    }

    async fn deal_listing(&self, query: &DealListQuery) -> Result<RawDealPage, CheapSharkError> {
        self.deals_page(query).await
    }
}

fn is_empty_payload(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        Value::Bool(_) | Value::Number(_) | Value::String(_) => false,
    }
}

fn json_kind(body: &Value) -> &'static str {
    match body {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn decode<T: DeserializeOwned>(value: Value, context: &str) -> Result<T, CheapSharkError> {
    serde_json::from_value(value).map_err(|e| CheapSharkError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
