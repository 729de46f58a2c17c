use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::ToSchema;

/// A single bike rental, start dock to end dock
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub ride_id: Option<String>,
    pub bike_type: Option<String>,
    pub is_member: Option<bool>,
    /// Short identifier of the start station
    pub start_station_id: String,
    /// Short identifier of the end station
    pub end_station_id: String,
    /// Wall-clock start time
    pub started_at: NaiveDateTime,
    /// Wall-clock end time
    pub ended_at: NaiveDateTime,
}

impl Trip {
    pub fn new(
        start_station_id: impl Into<String>,
        end_station_id: impl Into<String>,
        started_at: NaiveDateTime,
        ended_at: NaiveDateTime,
    ) -> Self {
        Self {
            ride_id: None,
            bike_type: None,
            is_member: None,
            start_station_id: start_station_id.into(),
            end_station_id: end_station_id.into(),
            started_at,
            ended_at,
        }
    }
}

/// A bike dock, as reference data
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Station {
    /// Short identifier trips refer to (e.g. "A32000")
    pub id: String,
    /// Internal feed identifier, never used to match trips
    pub station_id: Option<String>,
    pub name: String,
    pub lon: f64,
    pub lat: f64,
    pub capacity: Option<u32>,
}

impl Station {
    pub fn new(id: impl Into<String>, name: impl Into<String>, lon: f64, lat: f64) -> Self {
        Self {
            id: id.into(),
            station_id: None,
            name: name.into(),
            lon,
            lat,
            capacity: None,
        }
    }
}

/// A station joined with its trip counts for one aggregation pass
#[derive(Debug, Clone, PartialEq)]
pub struct StationTraffic {
    pub station: Station,
    pub arrivals: u32,
    pub departures: u32,
    /// Always arrivals + departures
    pub total_traffic: u32,
}

impl StationTraffic {
    pub fn new(station: Station, arrivals: u32, departures: u32) -> Self {
        Self {
            station,
            arrivals,
            departures,
            total_traffic: arrivals + departures,
        }
    }

    /// Share of the station's traffic that leaves it, 0.5 for an idle station
    pub fn departure_ratio(&self) -> f64 {
        if self.total_traffic == 0 {
            0.5
        } else {
            f64::from(self.departures) / f64::from(self.total_traffic)
        }
    }
}

/// Everything loaded from the two data sources
#[derive(Debug, Clone)]
pub struct Dataset {
    pub stations: Vec<Station>,
    pub trips: Vec<Trip>,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}
