use crate::models::StationTraffic;

pub const DEFAULT_MAX_RADIUS: f64 = 25.0;

/// Square-root scale from total traffic to marker radius, so marker area grows
/// linearly with traffic. Maps [0, max_traffic] onto [0, max_radius].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusScale {
    max_traffic: u32,
    max_radius: f64,
}

impl RadiusScale {
    pub fn new(max_traffic: u32, max_radius: f64) -> Self {
        Self {
            max_traffic,
            max_radius,
        }
    }

    /// Scale whose domain ends at the busiest of `stations`
    pub fn for_stations(stations: &[StationTraffic], max_radius: f64) -> Self {
        Self::new(super::traffic::max_total_traffic(stations), max_radius)
    }

    pub fn max_traffic(&self) -> u32 {
        self.max_traffic
    }

    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    /// Radius for a station with `total_traffic` trips; 0 when every station is idle
    pub fn radius(&self, total_traffic: u32) -> f64 {
        if self.max_traffic == 0 {
            return 0.0;
        }
        (f64::from(total_traffic) / f64::from(self.max_traffic)).sqrt() * self.max_radius
    }
}

/// Bucket a departure ratio into 0 (mostly arrivals), 0.5 (balanced) or 1 (mostly departures)
pub fn quantize_flow(departure_ratio: f64) -> f64 {
    const STEPS: [f64; 3] = [0.0, 0.5, 1.0];
    let ratio = departure_ratio.clamp(0.0, 1.0);
    let index = ((ratio * STEPS.len() as f64) as usize).min(STEPS.len() - 1);
    STEPS[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_domain_is_zero() {
        let scale = RadiusScale::new(0, DEFAULT_MAX_RADIUS);
        assert_eq!(scale.radius(0), 0.0);
        assert!(!scale.radius(0).is_nan());
        assert_eq!(RadiusScale::for_stations(&[], DEFAULT_MAX_RADIUS).radius(0), 0.0);
    }

    #[test]
    fn test_max_maps_to_max_radius() {
        let scale = RadiusScale::new(400, DEFAULT_MAX_RADIUS);
        assert_eq!(scale.radius(400), 25.0);
        assert_eq!(scale.radius(0), 0.0);
        assert_eq!(scale.radius(100), 12.5);
    }

    #[test]
    fn test_radius_is_monotonic() {
        let scale = RadiusScale::new(977, DEFAULT_MAX_RADIUS);
        let radii: Vec<f64> = (0..=977).map(|t| scale.radius(t)).collect();
        assert!(radii.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_quantize_flow() {
        assert_eq!(quantize_flow(0.0), 0.0);
        assert_eq!(quantize_flow(0.2), 0.0);
        assert_eq!(quantize_flow(0.5), 0.5);
        assert_eq!(quantize_flow(0.6), 0.5);
        assert_eq!(quantize_flow(0.7), 1.0);
        assert_eq!(quantize_flow(1.0), 1.0);
    }
}
