pub mod radius;
pub mod time_filter;
pub mod time_format;
pub mod traffic;

pub use radius::RadiusScale;
pub use time_filter::{filter_trips_by_time, MinuteOfDay, TimeFilter};
pub use time_format::format_time;
pub use traffic::compute_station_traffic;
