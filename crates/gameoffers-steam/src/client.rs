//! HTTP client for the keyless Steam storefront endpoints.

use std::time::Duration;

use reqwest::{Client, Url};
use serde_json::Value;

use gameoffers_core::Lookup;

use crate::error::SteamError;
use crate::types::{AppDetails, RawAppEnvelope, RawSearchItem, SearchHit};

pub const DEFAULT_BASE_URL: &str = "https://store.steampowered.com";

const LANGUAGE: &str = "english";
const COUNTRY: &str = "US";

/// Client for `storesearch` and `appdetails`.
///
/// One fixed timeout per client; requests are never retried.
#[derive(Debug, Clone)]
pub struct SteamClient {
    client: Client,
    base_url: Url,
}

impl SteamClient {
    /// Creates a client pointed at the public Steam store.
    ///
    /// # Errors
    ///
    /// Returns [`SteamError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, SteamError> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout_secs, user_agent)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SteamError::Http`] if the client cannot be built, or
    /// [`SteamError::InvalidBaseUrl`] if `base_url` cannot serve as a base.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SteamError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let invalid = |reason: String| SteamError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason,
        };
        let base_url =
            Url::parse(base_url.trim_end_matches('/')).map_err(|e| invalid(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid("URL cannot be used as a base".to_string()));
        }

        Ok(Self { client, base_url })
    }

    /// Searches the storefront by name, keeping at most `limit` hits in
    /// upstream order.
    ///
    /// A blank query returns an empty list without contacting Steam.
    ///
    /// # Errors
    ///
    /// - [`SteamError::Http`] / [`SteamError::UnexpectedStatus`] on transport
    ///   failure.
    /// - [`SteamError::UpstreamShape`] if the body has no `items` array.
    pub async fn search_games(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SteamError> {
        let term = query.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.build_url(
            &["api", "storesearch", ""],
            &[("term", term), ("l", LANGUAGE), ("cc", COUNTRY)],
        );
        let mut body = self.get_json(&url).await?;

        let Some(Value::Array(items)) = body.get_mut("items").map(Value::take) else {
            return Err(SteamError::UpstreamShape {
                context: format!("storesearch(term={term})"),
                reason: "expected an `items` array".to_string(),
            });
        };

        let hits: Vec<SearchHit> = items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<RawSearchItem>(item).ok())
            .filter_map(RawSearchItem::into_hit)
            .take(limit)
            .collect();
        tracing::debug!(term, hits = hits.len(), "steam search finished");
        Ok(hits)
    }

    /// Fetches storefront details for one app.
    ///
    /// `success: false`, a missing entry, or a `null` body is
    /// [`Lookup::NotFound`].
    ///
    /// # Errors
    ///
    /// Transport failures, [`SteamError::UpstreamShape`] when a successful
    /// entry carries no `data` object, or [`SteamError::Deserialize`] when the
    /// entry cannot be decoded.
    pub async fn app_details(&self, appid: u32) -> Result<Lookup<AppDetails>, SteamError> {
        let id = appid.to_string();
        let context = format!("appdetails(appids={id})");
        let url = self.build_url(
            &["api", "appdetails"],
            &[("appids", &id), ("cc", COUNTRY), ("l", LANGUAGE)],
        );

        let body = self.get_json(&url).await?;
        let mut entries = match body {
            Value::Object(entries) => entries,
            Value::Null => return Ok(Lookup::NotFound),
            _ => {
                return Err(SteamError::UpstreamShape {
                    context,
                    reason: "expected an object keyed by app id".to_string(),
                })
            }
        };

        let Some(entry) = entries.remove(&id) else {
            return Ok(Lookup::NotFound);
        };
        let envelope: RawAppEnvelope =
            serde_json::from_value(entry).map_err(|source| SteamError::Deserialize {
                context: context.clone(),
                source,
            })?;

        if !envelope.success {
            tracing::debug!(appid, "steam reports no details for app");
            return Ok(Lookup::NotFound);
        }
        let Some(data) = envelope.data else {
            return Err(SteamError::UpstreamShape {
                context,
                reason: "successful entry without `data`".to_string(),
            });
        };

        Ok(Lookup::Found(data.into_details(appid)))
    }

    /// Builds `<base>/<segments..>?<params>` with percent-encoded values.
    /// An empty trailing segment yields a trailing slash.
    fn build_url(&self, segments: &[&str], params: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    async fn get_json(&self, url: &Url) -> Result<Value, SteamError> {
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            return Err(SteamError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| SteamError::Deserialize {
            context: url.to_string(),
            source,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
