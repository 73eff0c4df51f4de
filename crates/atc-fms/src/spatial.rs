//! Spatial math for procedure headings and waypoint distances.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the great-circle helpers.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A resolved 2D position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        haversine_distance(self.lat, self.lon, other.lat, other.lon)
    }

    /// Initial true heading toward `other`, in degrees (0-360).
    pub fn heading_to(&self, other: &Coordinate) -> f64 {
        heading_between(self.lat, self.lon, other.lat, other.lon)
    }
}

/// Calculate distance between two points in meters using Haversine formula.
///
/// # Arguments
/// * `lat1`, `lon1` - First point coordinates in decimal degrees
/// * `lat2`, `lon2` - Second point coordinates in decimal degrees
///
/// # Returns
/// Distance in meters
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Calculate bearing from point 1 to point 2 in radians.
/// Returns bearing in radians, 0 = north, π/2 = east.
pub fn bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let x = delta_lambda.sin() * phi2.cos();
    let y = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    x.atan2(y)
}

/// Bearing from point 1 to point 2 as a compass heading in degrees.
pub fn heading_between(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    normalize_heading(bearing(lat1, lon1, lat2, lon2).to_degrees())
}

/// Wrap any angle in degrees into `[0, 360)`.
pub fn normalize_heading(heading_deg: f64) -> f64 {
    heading_deg.rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_known_distance() {
        // ~111km between these points (1 degree latitude)
        let dist = haversine_distance(0.0, 0.0, 1.0, 0.0);
        assert!((dist - 111_194.0).abs() < 100.0);
    }

    #[test]
    fn test_haversine_same_point() {
        let dist = haversine_distance(37.6188, -122.3750, 37.6188, -122.3750);
        assert!(dist < 0.001);
    }

    #[test]
    fn heading_points_east_and_south() {
        let origin = Coordinate::new(0.0, 0.0);
        let east = Coordinate::new(0.0, 1.0);
        let south = Coordinate::new(-1.0, 0.0);

        assert!((origin.heading_to(&east) - 90.0).abs() < 1e-6);
        assert!((origin.heading_to(&south) - 180.0).abs() < 1e-6);
    }

    #[test]
    fn normalize_wraps_negative_headings() {
        assert!((normalize_heading(-90.0) - 270.0).abs() < 1e-9);
        assert!((normalize_heading(720.0)).abs() < 1e-9);
    }
}
