mod deal;
mod deals;
mod game;
mod search;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use gameoffers_cheapshark::{CheapSharkClient, CheapSharkError, DealResolver, StoreDirectoryCache};
use gameoffers_core::AppConfig;
use gameoffers_steam::{SteamClient, SteamError};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

/// Shared handles for every route. All clients are cheap to clone; the store
/// directory cache is shared between the resolver and the deal listing.
#[derive(Clone)]
pub struct AppState {
    pub steam: Arc<SteamClient>,
    pub cheapshark: Arc<CheapSharkClient>,
    pub stores: Arc<StoreDirectoryCache<CheapSharkClient>>,
    pub resolver: Arc<DealResolver<CheapSharkClient>>,
}

impl AppState {
    /// Builds both upstream clients and the shared store cache.
    ///
    /// # Errors
    ///
    /// Fails if either HTTP client cannot be constructed or a base URL is
    /// unusable.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let steam = SteamClient::with_base_url(
            &config.steam_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?;
        let cheapshark = Arc::new(CheapSharkClient::with_base_url(
            &config.cheapshark_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?);
        let stores = Arc::new(StoreDirectoryCache::new(
            Arc::clone(&cheapshark),
            Duration::from_secs(config.store_cache_ttl_secs),
        ));
        let resolver = Arc::new(DealResolver::new(
            Arc::clone(&cheapshark),
            Arc::clone(&stores),
        ));

        Ok(Self {
            steam: Arc::new(steam),
            cheapshark,
            stores,
            resolver,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

/// `?appid=` for the per-app routes.
#[derive(Debug, Deserialize)]
pub(super) struct AppIdQuery {
    pub appid: Option<String>,
}

impl AppIdQuery {
    /// The trimmed app id, or a `bad_request` error when missing or blank.
    pub(super) fn require(&self, request_id: &str) -> Result<&str, ApiError> {
        self.appid
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ApiError::new(request_id, "bad_request", "missing appid"))
    }
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(request_id: String, data: T) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
                details: None,
                upstream_status: None,
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.error.details = Some(details.into());
        self
    }

    #[must_use]
    pub fn with_upstream_status(mut self, status: Option<u16>) -> Self {
        self.error.upstream_status = status;
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" => StatusCode::BAD_REQUEST,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_cheapshark_error(
    request_id: String,
    message: &str,
    error: &CheapSharkError,
) -> ApiError {
    tracing::error!(
        error = %error,
        upstream_status = ?error.upstream_status(),
        transport = error.is_transport(),
        "{message}"
    );
    ApiError::new(request_id, "upstream_error", message)
        .with_details(error.to_string())
        .with_upstream_status(error.upstream_status())
}

pub(super) fn map_steam_error(request_id: String, message: &str, error: &SteamError) -> ApiError {
    tracing::error!(
        error = %error,
        upstream_status = ?error.upstream_status(),
        transport = error.is_transport(),
        "{message}"
    );
    ApiError::new(request_id, "upstream_error", message)
        .with_details(error.to_string())
        .with_upstream_status(error.upstream_status())
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)])
}

/// API routes under `/api`, with every other path served from `static_dir`.
pub fn build_app(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/search", get(search::search_games))
        .route("/api/game", get(game::get_game))
        .route("/api/deal", get(deal::get_deal))
        .route("/api/deals", get(deals::list_deals))
        .fallback_service(ServeDir::new(static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    Json(ApiResponse::new(req_id.0, HealthData { status: "ok" }))
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
