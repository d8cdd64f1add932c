//! # Restaurant Finder Handlers

use super::{wrap_response, ApiResponse, AppState, DebugParams};
use axum::{
    extract::{Query, State},
    Json,
};
use geosql::{
    geo::{present_places, PlacesView},
    search_places, GeoSearchRequest,
};
use serde::Serialize;
use serde_json::json;
use tracing::info;

#[derive(Serialize)]
pub struct PlacesResponse {
    #[serde(flatten)]
    pub view: PlacesView,
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Handler for `POST /places/search`.
///
/// Search failures are part of the result rather than an HTTP error: the
/// page shows the "not found" notice along with the error text.
pub async fn search_places_handler(
    State(app_state): State<AppState>,
    debug_params: Query<DebugParams>,
    Json(request): Json<GeoSearchRequest>,
) -> Json<ApiResponse<PlacesResponse>> {
    info!("Received restaurant search: {:?}", request);
    let outcome = search_places(app_state.place_connector.as_ref(), &request).await;
    let view = present_places(&outcome.places, request.radius);

    let debug_info = Some(json!({
        "request": request,
        "documents": outcome.places.len(),
    }));
    wrap_response(
        PlacesResponse {
            view,
            warnings: outcome.warnings,
            error: outcome.error,
        },
        debug_params,
        debug_info,
    )
}
