//! Values injected into the FMS instead of global airport/aircraft state.

use crate::spatial::Coordinate;
use serde::{Deserialize, Serialize};

/// Airport session facts an aircraft's FMS needs for waypoint generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AirportContext {
    /// ICAO of the airport the aircraft departs from, if it is a departure.
    pub departure_airport: Option<String>,
    pub arrival_airport: Option<String>,
    pub departure_runway: Option<String>,
    pub arrival_runway: Option<String>,
    /// Fix used to vector arrivals that have no procedure.
    pub default_arrival_fix: Option<String>,
    /// Center of the controlled airspace.
    pub airspace_center: Option<Coordinate>,
}

impl AirportContext {
    pub fn is_departure_airport(&self, name: &str) -> bool {
        self.departure_airport
            .as_deref()
            .is_some_and(|icao| icao.eq_ignore_ascii_case(name))
    }

    pub fn is_default_arrival_fix(&self, name: &str) -> bool {
        self.default_arrival_fix
            .as_deref()
            .is_some_and(|fix| fix.eq_ignore_ascii_case(name))
    }
}

/// Static performance figures of the aircraft owning the FMS.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AircraftProfile {
    pub cruise_speed_kt: f64,
    pub service_ceiling_ft: f64,
}

impl Default for AircraftProfile {
    fn default() -> Self {
        Self {
            cruise_speed_kt: 450.0,
            service_ceiling_ft: 41_000.0,
        }
    }
}

/// Live aircraft values sampled by the caller when an operation needs them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AircraftState {
    pub altitude_ft: f64,
    pub speed_kt: f64,
    pub heading: f64,
    pub position: Coordinate,
}
