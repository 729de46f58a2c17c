//! Station information feed parsing
//!
//! Accepts a GBFS `station_information` document (`{"data": {"stations": [...]}}`)
//! or a bare array of the same records. Each station is keyed by its
//! `short_name`, which is what trip tables reference; the feed's `station_id`
//! is kept only as metadata.
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use super::LoadError;
use crate::models::Station;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StationFeed {
    Gbfs { data: StationList },
    Bare(Vec<Value>),
}

#[derive(Debug, Deserialize)]
struct StationList {
    stations: Vec<Value>,
}

/// A coordinate as found in the wild: a JSON number or a numeric string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    fn value(&self) -> Option<f64> {
        let value = match self {
            Coordinate::Number(v) => *v,
            Coordinate::Text(s) => s.trim().parse().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

/// One station record. Older exports use capitalized column names, which are
/// read as fallbacks for the GBFS fields.
#[derive(Debug, Deserialize)]
struct RawStation {
    short_name: Option<String>,
    #[serde(rename = "Number")]
    number: Option<String>,
    station_id: Option<String>,
    name: Option<String>,
    #[serde(rename = "NAME")]
    name_upper: Option<String>,
    lat: Option<Coordinate>,
    #[serde(rename = "Lat")]
    lat_upper: Option<Coordinate>,
    lon: Option<Coordinate>,
    #[serde(rename = "Long")]
    long: Option<Coordinate>,
    capacity: Option<u32>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn first_coordinate(primary: Option<&Coordinate>, fallback: Option<&Coordinate>) -> Option<f64> {
    primary
        .and_then(Coordinate::value)
        .or_else(|| fallback.and_then(Coordinate::value))
}

impl RawStation {
    fn into_station(self) -> Option<Station> {
        let id = non_blank(self.short_name).or(non_blank(self.number))?;
        let lat = first_coordinate(self.lat.as_ref(), self.lat_upper.as_ref())?;
        let lon = first_coordinate(self.lon.as_ref(), self.long.as_ref())?;
        let name = non_blank(self.name)
            .or(non_blank(self.name_upper))
            .unwrap_or_else(|| id.clone());
        Some(Station {
            name,
            id,
            station_id: self.station_id,
            lon,
            lat,
            capacity: self.capacity,
        })
    }
}

/// Parse the station feed. Records that are malformed or lack a short
/// identifier or coordinates are skipped; only an unreadable document fails.
pub fn parse_stations(body: &str) -> Result<Vec<Station>, LoadError> {
    let feed: StationFeed = serde_json::from_str(body).map_err(|e| {
        tracing::error!(
            error = %e,
            body_preview = %body.chars().take(500).collect::<String>(),
            "Failed to parse station feed"
        );
        LoadError::ParseError {
            dataset: "stations",
            message: e.to_string(),
        }
    })?;

    let raw = match feed {
        StationFeed::Gbfs { data } => data.stations,
        StationFeed::Bare(stations) => stations,
    };

    let mut seen = HashSet::new();
    let mut stations = Vec::with_capacity(raw.len());
    let mut skipped = 0usize;
    let mut duplicates = 0usize;
    for (index, value) in raw.into_iter().enumerate() {
        let record = match serde_json::from_value::<RawStation>(value) {
            Ok(record) => record,
            Err(e) => {
                debug!(index, error = %e, "Malformed station record");
                skipped += 1;
                continue;
            }
        };
        let Some(station) = record.into_station() else {
            skipped += 1;
            continue;
        };
        if !seen.insert(station.id.clone()) {
            duplicates += 1;
            continue;
        }
        stations.push(station);
    }

    if skipped > 0 || duplicates > 0 {
        warn!(skipped, duplicates, "Dropped invalid station records");
    }
    info!(count = stations.len(), "Parsed stations");

    Ok(stations)
}
