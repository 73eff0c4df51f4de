//! Altitude and speed targets for climb-via and descend-via clearances.

use crate::restriction::{AltitudeConstraint, Qualifier, SpeedConstraint};
use crate::waypoint::Waypoint;

/// Value reached when climbing toward `target` past a published restriction.
/// Restrictions only ever cap the climb; an at-or-above restriction is not a floor.
fn climb_value(target: f64, restriction: Option<(f64, Qualifier)>) -> f64 {
    match restriction {
        Some((limit, Qualifier::At | Qualifier::AtOrBelow)) => target.min(limit),
        Some((_, Qualifier::AtOrAbove)) | None => target,
    }
}

/// Value carried through a waypoint while descending from `current`; only the
/// waypoint's own restriction can move it.
fn descent_value(current: f64, restriction: Option<(f64, Qualifier)>) -> f64 {
    match restriction {
        None => current,
        Some((limit, qualifier)) => {
            if qualifier.permits(current, limit) {
                current
            } else {
                limit
            }
        }
    }
}

/// Set every waypoint's targets for a climb toward `altitude_ft` at `speed_kt`.
pub fn apply_climb(waypoints: &mut [Waypoint], altitude_ft: f64, speed_kt: f64) {
    for waypoint in waypoints {
        let published = *waypoint.restrictions();
        let altitude = climb_value(
            altitude_ft,
            published.altitude.map(|a| (a.feet(), a.qualifier)),
        );
        let speed = climb_value(
            speed_kt,
            published.speed.map(|s| (f64::from(s.value), s.qualifier)),
        );

        waypoint.altitude = Some(AltitudeConstraint::at(altitude));
        waypoint.speed = Some(SpeedConstraint::at(speed));
    }
}

/// Walk `waypoints` in order, each one's computed targets becoming the
/// starting point for the next.
pub fn apply_descent(waypoints: &mut [Waypoint], start_altitude_ft: f64, start_speed_kt: f64) {
    let mut altitude = start_altitude_ft;
    let mut speed = start_speed_kt;

    for waypoint in waypoints {
        let published = *waypoint.restrictions();
        altitude = descent_value(
            altitude,
            published.altitude.map(|a| (a.feet(), a.qualifier)),
        );
        speed = descent_value(
            speed,
            published.speed.map(|s| (f64::from(s.value), s.qualifier)),
        );

        waypoint.altitude = Some(AltitudeConstraint::at(altitude));
        waypoint.speed = Some(SpeedConstraint::at(speed));
    }
}
