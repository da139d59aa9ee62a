use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use gameoffers_cheapshark::{DealListQuery, DealPage};

use crate::middleware::RequestId;

use super::{map_cheapshark_error, ApiError, ApiResponse, AppState};

/// Upstream rejects larger pages.
const MAX_PAGE_SIZE: u32 = 60;

/// Raw `/api/deals` parameters. Numbers are parsed by hand so a bad value
/// gets the JSON error envelope instead of a plain-text rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DealsQuery {
    pub page_number: Option<String>,
    pub page_size: Option<String>,
    pub sort_by: Option<String>,
}

impl DealsQuery {
    /// Applies defaults, clamps `pageSize` to 1..=60 and treats blank values
    /// as absent.
    ///
    /// # Errors
    ///
    /// A `bad_request` error when a page parameter is not a non-negative
    /// integer.
    pub(super) fn into_list_query(self, request_id: &str) -> Result<DealListQuery, ApiError> {
        let defaults = DealListQuery::default();
        let page_number = parse_page_param(self.page_number, "pageNumber", request_id)?;
        let page_size = parse_page_param(self.page_size, "pageSize", request_id)?;
        Ok(DealListQuery {
            page_number: page_number.unwrap_or(defaults.page_number),
            page_size: page_size
                .unwrap_or(defaults.page_size)
                .clamp(1, MAX_PAGE_SIZE),
            sort_by: non_blank(self.sort_by).unwrap_or(defaults.sort_by),
            ..defaults
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_page_param(
    value: Option<String>,
    name: &str,
    request_id: &str,
) -> Result<Option<u32>, ApiError> {
    non_blank(value)
        .map(|raw| {
            raw.parse::<u32>().map_err(|_| {
                ApiError::new(
                    request_id,
                    "bad_request",
                    format!("{name} must be a non-negative integer"),
                )
                .with_details(format!("got {raw:?}"))
            })
        })
        .transpose()
}

pub(super) async fn list_deals(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<DealsQuery>,
) -> Result<Json<ApiResponse<DealPage>>, ApiError> {
    let list_query = query.into_list_query(&req_id.0)?;

    let page = gameoffers_cheapshark::list_deals(state.cheapshark.as_ref(), &state.stores, &list_query)
        .await
        .map_err(|e| map_cheapshark_error(req_id.0.clone(), "failed to fetch deals list", &e))?;

    Ok(Json(ApiResponse::new(req_id.0, page)))
}
