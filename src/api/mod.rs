pub mod dataset;
pub mod error;
pub mod map;
pub mod stations;

pub use error::{bad_gateway, bad_request, internal_error, service_unavailable, ApiError, ErrorResponse};

use axum::Router;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::config::MapSettings;
use crate::loader::DatasetLoader;
use crate::models::Dataset;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bikewatch API",
        description = "Bike-share station traffic for the bike lane map"
    ),
    tags(
        (name = "stations", description = "Station markers with trip counts"),
        (name = "dataset", description = "Station and trip data loading"),
        (name = "map", description = "Map host configuration")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub loader: Arc<DatasetLoader>,
    pub map: Arc<MapSettings>,
    pub max_radius: f64,
}

impl AppState {
    /// Snapshot of the loaded dataset; the store lock is released before returning
    pub async fn current_dataset(&self) -> Option<Arc<Dataset>> {
        let store = self.loader.store();
        let state = store.read().await;
        state.dataset.clone()
    }
}

/// API routes plus the OpenAPI document describing them
pub fn router(state: AppState) -> (Router, utoipa::openapi::OpenApi) {
    OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(stations::list_stations))
        .routes(routes!(dataset::get_status))
        .routes(routes!(dataset::reload))
        .routes(routes!(map::get_map_settings))
        .with_state(state)
        .split_for_parts()
}
