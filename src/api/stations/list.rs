use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::{
    bad_request, internal_error, service_unavailable, ApiError, AppState, ErrorResponse,
};
use crate::models::{Dataset, Station, StationTraffic};
use crate::services::radius::quantize_flow;
use crate::services::time_filter::ANY_TIME;
use crate::services::time_format::filter_label;
use crate::services::traffic::{enrich_stations, max_total_traffic, TrafficCounts};
use crate::services::{filter_trips_by_time, RadiusScale, TimeFilter};

/// Station marker as drawn on the map
#[derive(Debug, Serialize, ToSchema)]
pub struct StationMarker {
    #[serde(flatten)]
    pub station: Station,
    pub arrivals: u32,
    pub departures: u32,
    /// arrivals + departures
    pub total_traffic: u32,
    /// Marker radius in pixels
    pub radius: f64,
    /// departures / total_traffic, 0.5 for a station without trips
    pub departure_ratio: f64,
    /// departure_ratio bucketed to 0, 0.5 or 1 for coloring
    pub flow: f64,
}

impl StationMarker {
    fn new(traffic: StationTraffic, scale: &RadiusScale) -> Self {
        let departure_ratio = traffic.departure_ratio();
        Self {
            radius: scale.radius(traffic.total_traffic),
            flow: quantize_flow(departure_ratio),
            departure_ratio,
            arrivals: traffic.arrivals,
            departures: traffic.departures,
            total_traffic: traffic.total_traffic,
            station: traffic.station,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StationListResponse {
    /// Selector the counts were computed for, -1 for all trips
    pub time: i32,
    /// Human readable selector, e.g. "8:00 AM" or "any time"
    pub time_label: String,
    /// Trips inside the time window, including ones at unknown stations
    pub trip_count: usize,
    pub max_traffic: u32,
    pub max_radius: f64,
    pub stations: Vec<StationMarker>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct StationQuery {
    /// Minutes since midnight (0-1439) to center the one hour window on, -1 for all trips
    pub time: Option<i32>,
}

/// Aggregate the dataset's trips for `filter` into station markers
pub fn build_station_list(dataset: &Dataset, filter: TimeFilter, max_radius: f64) -> StationListResponse {
    let filtered = filter_trips_by_time(&dataset.trips, filter);
    let counts = TrafficCounts::from_trips(filtered);
    let traffic = enrich_stations(&dataset.stations, &counts);
    let scale = RadiusScale::for_stations(&traffic, max_radius);

    StationListResponse {
        time: filter.selector(),
        time_label: filter_label(filter),
        trip_count: counts.trip_count(),
        max_traffic: max_total_traffic(&traffic),
        max_radius: scale.max_radius(),
        stations: traffic
            .into_iter()
            .map(|t| StationMarker::new(t, &scale))
            .collect(),
    }
}

/// List all stations with their trip counts, optionally around a time of day
#[utoipa::path(
    get,
    path = "/api/stations",
    params(StationQuery),
    responses(
        (status = 200, description = "Stations with arrivals, departures and marker radius", body = StationListResponse),
        (status = 400, description = "Time selector out of range", body = ErrorResponse),
        (status = 503, description = "Station and trip data not loaded", body = ErrorResponse)
    ),
    tag = "stations"
)]
pub async fn list_stations(
    State(state): State<AppState>,
    Query(query): Query<StationQuery>,
) -> Result<Json<StationListResponse>, ApiError> {
    let filter = TimeFilter::try_from(query.time.unwrap_or(ANY_TIME)).map_err(bad_request)?;

    let dataset = state
        .current_dataset()
        .await
        .ok_or_else(|| service_unavailable("Station and trip data is not loaded"))?;

    let max_radius = state.max_radius;
    let response =
        tokio::task::spawn_blocking(move || build_station_list(&dataset, filter, max_radius))
            .await
            .map_err(internal_error)?;

    tracing::debug!(
        time = response.time,
        trips = response.trip_count,
        max_traffic = response.max_traffic,
        "Computed station traffic"
    );

    Ok(Json(response))
}
