use std::collections::HashMap;

use crate::models::{Station, StationTraffic, Trip};

/// Departures and arrivals grouped by station short identifier
#[derive(Debug, Clone, Default)]
pub struct TrafficCounts {
    departures: HashMap<String, u32>,
    arrivals: HashMap<String, u32>,
    trip_count: usize,
}

impl TrafficCounts {
    /// Count departures by start station and arrivals by end station
    pub fn from_trips<'a, I>(trips: I) -> Self
    where
        I: IntoIterator<Item = &'a Trip>,
    {
        let mut counts = TrafficCounts::default();
        for trip in trips {
            *counts
                .departures
                .entry(trip.start_station_id.clone())
                .or_default() += 1;
            *counts
                .arrivals
                .entry(trip.end_station_id.clone())
                .or_default() += 1;
            counts.trip_count += 1;
        }
        counts
    }

    /// Departures from `station_id`, 0 when no trip started there
    pub fn departures_or_zero(&self, station_id: &str) -> u32 {
        self.departures.get(station_id).copied().unwrap_or(0)
    }

    /// Arrivals at `station_id`, 0 when no trip ended there
    pub fn arrivals_or_zero(&self, station_id: &str) -> u32 {
        self.arrivals.get(station_id).copied().unwrap_or(0)
    }

    /// Number of trips counted, matched to a station or not
    pub fn trip_count(&self) -> usize {
        self.trip_count
    }
}

/// Join trip counts onto every station, keyed by the station's short identifier.
///
/// Stations without trips get zero counts. Trips naming a station that is not
/// in `stations` are counted but never attributed to any output record.
pub fn compute_station_traffic<'a, I>(stations: &[Station], trips: I) -> Vec<StationTraffic>
where
    I: IntoIterator<Item = &'a Trip>,
{
    let counts = TrafficCounts::from_trips(trips);
    enrich_stations(stations, &counts)
}

pub fn enrich_stations(stations: &[Station], counts: &TrafficCounts) -> Vec<StationTraffic> {
    stations
        .iter()
        .map(|station| {
            StationTraffic::new(
                station.clone(),
                counts.arrivals_or_zero(&station.id),
                counts.departures_or_zero(&station.id),
            )
        })
        .collect()
}

/// Largest total traffic among the stations, 0 for an empty set
pub fn max_total_traffic(stations: &[StationTraffic]) -> u32 {
    stations.iter().map(|s| s.total_traffic).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn trip(start: &str, end: &str) -> Trip {
        let t = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        Trip::new(start, end, t, t)
    }

    fn stations(ids: &[&str]) -> Vec<Station> {
        ids.iter()
            .map(|id| Station::new(*id, format!("Station {id}"), -71.09, 42.36))
            .collect()
    }

    fn by_id<'a>(traffic: &'a [StationTraffic], id: &str) -> &'a StationTraffic {
        traffic.iter().find(|s| s.station.id == id).unwrap()
    }

    #[test]
    fn test_counts_departures_and_arrivals() {
        let stations = stations(&["A", "B"]);
        let trips = vec![trip("A", "B"), trip("A", "A")];
        let traffic = compute_station_traffic(&stations, &trips);

        let a = by_id(&traffic, "A");
        assert_eq!((a.departures, a.arrivals, a.total_traffic), (2, 1, 3));
        let b = by_id(&traffic, "B");
        assert_eq!((b.departures, b.arrivals, b.total_traffic), (0, 1, 1));
    }

    #[test]
    fn test_no_trips_gives_zero_traffic() {
        let stations = stations(&["A", "B", "C"]);
        let traffic = compute_station_traffic(&stations, &[]);
        assert_eq!(traffic.len(), 3);
        for s in &traffic {
            assert_eq!((s.departures, s.arrivals, s.total_traffic), (0, 0, 0));
        }
        assert_eq!(max_total_traffic(&traffic), 0);
    }

    #[test]
    fn test_unknown_station_ids_are_dropped() {
        let stations = stations(&["A", "B"]);
        let trips = vec![trip("A", "Z"), trip("Z", "B"), trip("Y", "X")];
        let traffic = compute_station_traffic(&stations, &trips);

        assert_eq!(by_id(&traffic, "A").departures, 1);
        assert_eq!(by_id(&traffic, "A").arrivals, 0);
        assert_eq!(by_id(&traffic, "B").arrivals, 1);

        let departures: u32 = traffic.iter().map(|s| s.departures).sum();
        let arrivals: u32 = traffic.iter().map(|s| s.arrivals).sum();
        assert_eq!(departures, 1);
        assert_eq!(arrivals, 1);
        assert!(departures as usize <= trips.len());
    }

    #[test]
    fn test_total_is_sum_for_every_station() {
        let stations = stations(&["A", "B", "C", "D"]);
        let trips: Vec<Trip> = [("A", "B"), ("B", "C"), ("C", "A"), ("A", "C"), ("D", "D"), ("A", "Q")]
            .iter()
            .map(|(s, e)| trip(s, e))
            .collect();
        let traffic = compute_station_traffic(&stations, &trips);
        for s in &traffic {
            assert_eq!(s.total_traffic, s.arrivals + s.departures);
        }
        assert_eq!(by_id(&traffic, "D").total_traffic, 2);
        assert_eq!(max_total_traffic(&traffic), 4);
    }

    #[test]
    fn test_matches_on_short_id_not_internal_id() {
        let mut station = Station::new("A32000", "Kendall T", -71.08, 42.36);
        station.station_id = Some("f83474a4-0de8-11e7-991c-3863bb43a7d0".to_string());
        let trips = vec![
            trip("A32000", "A32000"),
            trip("f83474a4-0de8-11e7-991c-3863bb43a7d0", "A32000"),
        ];
        let traffic = compute_station_traffic(&[station], &trips);
        assert_eq!(traffic[0].departures, 1);
        assert_eq!(traffic[0].arrivals, 2);
    }

    #[test]
    fn test_accepts_filtered_view_and_is_repeatable() {
        let stations = stations(&["A", "B"]);
        let trips = vec![trip("A", "B"), trip("B", "A"), trip("A", "B")];
        let view: Vec<&Trip> = trips.iter().skip(1).collect();

        let first = compute_station_traffic(&stations, view.iter().copied());
        let second = compute_station_traffic(&stations, view.iter().copied());
        assert_eq!(first, second);
        assert_eq!(by_id(&first, "A").departures, 1);
        assert_eq!(by_id(&first, "B").departures, 1);

        let full = compute_station_traffic(&stations, &trips);
        assert_eq!(by_id(&full, "A").departures, 2);
    }

    #[test]
    fn test_lookup_with_default() {
        let trips = vec![trip("A", "B")];
        let counts = TrafficCounts::from_trips(&trips);
        assert_eq!(counts.departures_or_zero("A"), 1);
        assert_eq!(counts.departures_or_zero("B"), 0);
        assert_eq!(counts.arrivals_or_zero("missing"), 0);
        assert_eq!(counts.trip_count(), 1);
    }
}
