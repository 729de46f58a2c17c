/// Time-of-day filtering of trips
///
/// A trip is "around" a selected minute when its start or its end falls within
/// an hour of it. Minutes are wall-clock `hour * 60 + minute` and compared by
/// plain difference: the window does not wrap at midnight, so a trip at 23:50
/// is not near 00:00.
use chrono::{NaiveTime, Timelike};

use crate::models::Trip;

pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Half-width of the window around the selected minute, inclusive
pub const WINDOW_MINUTES: i32 = 60;

/// Selector value meaning "no filtering"
pub const ANY_TIME: i32 = -1;

/// Minutes since midnight, always in 0..=1439
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MinuteOfDay(u16);

impl MinuteOfDay {
    pub fn new(minutes: u16) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self(minutes))
    }

    pub fn of(time: &impl Timelike) -> Self {
        Self((time.hour() * 60 + time.minute()) as u16)
    }

    pub fn get(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u32 {
        u32::from(self.0 / 60)
    }

    pub fn minute(self) -> u32 {
        u32::from(self.0 % 60)
    }

    pub fn to_naive_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour(), self.minute(), 0).unwrap_or(NaiveTime::MIN)
    }

    /// Whether `other` lies within `WINDOW_MINUTES` of this minute (non-circular)
    pub fn is_near(self, other: MinuteOfDay) -> bool {
        (i32::from(self.0) - i32::from(other.0)).abs() <= WINDOW_MINUTES
    }
}

/// The time-of-day selector as sent by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFilter {
    #[default]
    Any,
    Around(MinuteOfDay),
}

impl TimeFilter {
    /// The raw selector value: -1 for `Any`, otherwise minutes since midnight
    pub fn selector(self) -> i32 {
        match self {
            TimeFilter::Any => ANY_TIME,
            TimeFilter::Around(minute) => i32::from(minute.get()),
        }
    }

    pub fn matches(self, trip: &Trip) -> bool {
        match self {
            TimeFilter::Any => true,
            TimeFilter::Around(minute) => {
                minute.is_near(MinuteOfDay::of(&trip.started_at))
                    || minute.is_near(MinuteOfDay::of(&trip.ended_at))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("time selector must be -1 or between 0 and 1439, got {0}")]
pub struct InvalidSelector(pub i32);

impl TryFrom<i32> for TimeFilter {
    type Error = InvalidSelector;

    fn try_from(selector: i32) -> Result<Self, Self::Error> {
        if selector == ANY_TIME {
            return Ok(TimeFilter::Any);
        }
        u16::try_from(selector)
            .ok()
            .and_then(MinuteOfDay::new)
            .map(TimeFilter::Around)
            .ok_or(InvalidSelector(selector))
    }
}

/// Trips whose start or end is within an hour of the selector, in input order
pub fn filter_trips_by_time(trips: &[Trip], filter: TimeFilter) -> Vec<&Trip> {
    match filter {
        TimeFilter::Any => trips.iter().collect(),
        TimeFilter::Around(_) => trips.iter().filter(|trip| filter.matches(trip)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(minutes: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(minutes / 60, minutes % 60, 0)
            .unwrap()
    }

    fn trip(start: u32, end: u32) -> Trip {
        Trip::new("A", "B", at(start), at(end))
    }

    fn around(minutes: i32) -> TimeFilter {
        TimeFilter::try_from(minutes).unwrap()
    }

    #[test]
    fn test_selector_parsing() {
        assert_eq!(TimeFilter::try_from(-1), Ok(TimeFilter::Any));
        assert_eq!(
            TimeFilter::try_from(0),
            Ok(TimeFilter::Around(MinuteOfDay::new(0).unwrap()))
        );
        assert_eq!(TimeFilter::try_from(1439).unwrap().selector(), 1439);
        assert_eq!(TimeFilter::try_from(1440), Err(InvalidSelector(1440)));
        assert_eq!(TimeFilter::try_from(-2), Err(InvalidSelector(-2)));
    }

    #[test]
    fn test_any_time_returns_everything_in_order() {
        let trips = vec![trip(10, 20), trip(900, 950), trip(10, 20), trip(1400, 1430)];
        let filtered = filter_trips_by_time(&trips, TimeFilter::Any);
        assert_eq!(filtered.len(), trips.len());
        for (kept, original) in filtered.iter().zip(&trips) {
            assert!(std::ptr::eq(*kept, original));
        }
    }

    #[test]
    fn test_window_on_start_or_end() {
        let trips = vec![trip(100, 500)];
        assert_eq!(filter_trips_by_time(&trips, around(150)).len(), 1);
        assert_eq!(filter_trips_by_time(&trips, around(450)).len(), 1);
        assert!(filter_trips_by_time(&trips, around(600)).is_empty());
        assert!(filter_trips_by_time(&trips, around(300)).is_empty());
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let trips = vec![trip(600, 600)];
        assert_eq!(filter_trips_by_time(&trips, around(540)).len(), 1);
        assert_eq!(filter_trips_by_time(&trips, around(660)).len(), 1);
        assert!(filter_trips_by_time(&trips, around(539)).is_empty());
        assert!(filter_trips_by_time(&trips, around(661)).is_empty());
    }

    #[test]
    fn test_window_does_not_wrap_at_midnight() {
        // 23:50 is ten minutes from midnight on a clock, but not here
        let trips = vec![trip(23 * 60 + 50, 23 * 60 + 55)];
        assert!(filter_trips_by_time(&trips, around(0)).is_empty());
        assert_eq!(filter_trips_by_time(&trips, around(1439)).len(), 1);
    }

    #[test]
    fn test_filter_keeps_input_order() {
        let trips = vec![trip(100, 110), trip(900, 910), trip(120, 130), trip(95, 100)];
        let filtered = filter_trips_by_time(&trips, around(120));
        let starts: Vec<u16> = filtered
            .iter()
            .map(|t| MinuteOfDay::of(&t.started_at).get())
            .collect();
        assert_eq!(starts, vec![100, 120, 95]);
    }

    #[test]
    fn test_minute_of_day_ignores_seconds_and_date() {
        let time = NaiveDate::from_ymd_opt(2024, 3, 31)
            .unwrap()
            .and_hms_opt(14, 30, 59)
            .unwrap();
        assert_eq!(MinuteOfDay::of(&time).get(), 870);
    }
}
