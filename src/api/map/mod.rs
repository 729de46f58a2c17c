use axum::{extract::State, Json};

use crate::api::AppState;
use crate::config::MapSettings;

/// Base map style, viewport and bike lane overlays for the map frontend
#[utoipa::path(
    get,
    path = "/api/map",
    responses(
        (status = 200, description = "Map host configuration", body = MapSettings)
    ),
    tag = "map"
)]
pub async fn get_map_settings(State(state): State<AppState>) -> Json<MapSettings> {
    Json(state.map.as_ref().clone())
}
