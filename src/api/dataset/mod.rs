use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::{bad_gateway, ApiError, AppState, ErrorResponse};
use crate::loader::{DatasetState, LoadStatus};

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub state: LoadStatus,
    pub station_count: Option<usize>,
    pub trip_count: Option<usize>,
    pub loaded_at: Option<DateTime<Utc>>,
    pub last_attempt: Option<DateTime<Utc>>,
    /// Error of the most recent failed load, cleared by a successful one
    pub last_error: Option<String>,
}

impl From<&DatasetState> for StatusResponse {
    fn from(state: &DatasetState) -> Self {
        let dataset = state.dataset.as_deref();
        Self {
            state: state.status(),
            station_count: dataset.map(|d| d.stations.len()),
            trip_count: dataset.map(|d| d.trips.len()),
            loaded_at: dataset.map(|d| d.loaded_at),
            last_attempt: state.last_attempt,
            last_error: state.last_error.clone(),
        }
    }
}

/// Whether station and trip data is loaded
#[utoipa::path(
    get,
    path = "/api/status",
    responses(
        (status = 200, description = "Dataset load status", body = StatusResponse)
    ),
    tag = "dataset"
)]
pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let store = state.loader.store();
    let current = store.read().await;
    Json(StatusResponse::from(&*current))
}

/// Fetch station and trip data again, keeping the current data if the fetch fails
#[utoipa::path(
    post,
    path = "/api/reload",
    responses(
        (status = 200, description = "New dataset loaded", body = StatusResponse),
        (status = 502, description = "A data source could not be fetched or parsed", body = ErrorResponse)
    ),
    tag = "dataset"
)]
pub async fn reload(State(state): State<AppState>) -> Result<Json<StatusResponse>, ApiError> {
    state.loader.reload().await.map_err(bad_gateway)?;

    let store = state.loader.store();
    let current = store.read().await;
    Ok(Json(StatusResponse::from(&*current)))
}
