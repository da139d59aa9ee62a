use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use gameoffers_steam::SearchHit;

use crate::middleware::RequestId;

use super::{map_steam_error, ApiError, ApiResponse, AppState};

pub(super) const SEARCH_LIMIT: usize = 20;

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct SearchResults {
    query: String,
    count: usize,
    results: Vec<SearchHit>,
}

pub(super) async fn search_games(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<ApiResponse<SearchResults>>, ApiError> {
    let query = params.query.unwrap_or_default();
    let results = state
        .steam
        .search_games(&query, SEARCH_LIMIT)
        .await
        .map_err(|e| map_steam_error(req_id.0.clone(), "failed to search Steam", &e))?;

    Ok(Json(ApiResponse::new(
        req_id.0,
        SearchResults {
            query,
            count: results.len(),
            results,
        },
    )))
}
