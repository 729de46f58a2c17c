use super::time_filter::{MinuteOfDay, TimeFilter};

pub const ANY_TIME_LABEL: &str = "any time";

/// Short 12-hour clock label, e.g. "2:30 PM"
pub fn format_time(minutes: MinuteOfDay) -> String {
    minutes.to_naive_time().format("%-I:%M %p").to_string()
}

pub fn filter_label(filter: TimeFilter) -> String {
    match filter {
        TimeFilter::Any => ANY_TIME_LABEL.to_string(),
        TimeFilter::Around(minutes) => format_time(minutes),
    }
}
