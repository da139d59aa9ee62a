use axum::{
    extract::{Query, State},
    Extension, Json,
};

use gameoffers_steam::{AppDetails, Lookup};

use crate::middleware::RequestId;

use super::{map_steam_error, ApiError, ApiResponse, AppIdQuery, AppState};

pub(super) async fn get_game(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<AppIdQuery>,
) -> Result<Json<ApiResponse<AppDetails>>, ApiError> {
    let raw = query.require(&req_id.0)?;
    let appid = raw.parse::<u32>().map_err(|_| {
        ApiError::new(req_id.0.as_str(), "bad_request", "appid must be a numeric Steam app id")
    })?;

    let details = state
        .steam
        .app_details(appid)
        .await
        .map_err(|e| map_steam_error(req_id.0.clone(), "failed to fetch game details", &e))?;

    match details {
        Lookup::Found(details) => Ok(Json(ApiResponse::new(req_id.0, details))),
        Lookup::NotFound => Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("no Steam app with id {appid}"),
        )),
    }
}
