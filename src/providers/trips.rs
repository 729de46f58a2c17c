use chrono::{DateTime, NaiveDateTime};
use tracing::{debug, info, warn};

use super::LoadError;
use crate::models::Trip;

const DATASET: &str = "trips";

/// Timestamp layouts seen in trip exports, tried in order before RFC 3339
const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// Parse a trip export timestamp, keeping the wall-clock time as written
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.naive_local())
        })
}

fn parse_member_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "member" => Some(true),
        "0" | "false" | "casual" => Some(false),
        _ => None,
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Parse a trip table. The four required columns must be present in the header;
/// rows that are short, unreadable, or carry unparseable timestamps are skipped.
pub fn parse_trips(body: &str) -> Result<Vec<Trip>, LoadError> {
    let parse_error = |e: csv::Error| LoadError::ParseError {
        dataset: DATASET,
        message: e.to_string(),
    };

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(body.as_bytes());
    let headers = rdr.headers().map_err(parse_error)?.clone();

    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(LoadError::MissingColumn {
                dataset: DATASET,
                column: name,
            })
    };
    let idx_start = column("start_station_id")?;
    let idx_end = column("end_station_id")?;
    let idx_started = column("started_at")?;
    let idx_ended = column("ended_at")?;
    let idx_ride = headers.iter().position(|h| h == "ride_id");
    let idx_bike = headers
        .iter()
        .position(|h| h == "bike_type" || h == "rideable_type");
    let idx_member = headers
        .iter()
        .position(|h| h == "is_member" || h == "member_casual");

    let mut trips = Vec::new();
    let mut skipped = 0usize;
    for result in rdr.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                debug!(error = %e, "Unreadable trip row");
                skipped += 1;
                continue;
            }
        };

        let (Some(start_station_id), Some(end_station_id)) = (record.get(idx_start), record.get(idx_end)) else {
            skipped += 1;
            continue;
        };
        let started_at = record.get(idx_started).and_then(parse_timestamp);
        let ended_at = record.get(idx_ended).and_then(parse_timestamp);
        let (Some(started_at), Some(ended_at)) = (started_at, ended_at) else {
            skipped += 1;
            continue;
        };

        trips.push(Trip {
            ride_id: idx_ride.and_then(|i| record.get(i)).and_then(non_empty),
            bike_type: idx_bike.and_then(|i| record.get(i)).and_then(non_empty),
            is_member: idx_member.and_then(|i| record.get(i)).and_then(parse_member_flag),
            start_station_id: start_station_id.to_string(),
            end_station_id: end_station_id.to_string(),
            started_at,
            ended_at,
        });
    }

    if skipped > 0 {
        warn!(skipped, "Dropped incomplete trip rows");
    }
    info!(count = trips.len(), "Parsed trips");

    Ok(trips)
}
