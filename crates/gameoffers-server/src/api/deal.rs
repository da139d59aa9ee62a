use axum::{
    extract::{Query, State},
    Extension, Json,
};

use gameoffers_cheapshark::{DealResolution, NormalizedDeal};

use crate::middleware::RequestId;

use super::{map_cheapshark_error, ApiError, ApiResponse, AppIdQuery, AppState};

pub(super) async fn get_deal(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<AppIdQuery>,
) -> Result<Json<ApiResponse<NormalizedDeal>>, ApiError> {
    let appid = query.require(&req_id.0)?;

    let resolution = state
        .resolver
        .resolve_deal(appid)
        .await
        .map_err(|e| map_cheapshark_error(req_id.0.clone(), "failed to fetch deal data", &e))?;

    match resolution {
        DealResolution::Resolved(deal) => Ok(Json(ApiResponse::new(req_id.0, *deal))),
        DealResolution::Absent { reason } => Err(ApiError::new(req_id.0, "not_found", reason)),
    }
}
