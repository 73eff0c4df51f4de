//! Flight plan scenarios driven through the public API.
//!
//! Run with: cargo test -p atc-fms --test fms_scenarios

use atc_fms::{
    decode, route, AircraftProfile, AircraftState, AirportContext, AmendmentMode, Coordinate,
    FlightManagementSystem, FmsConfig, FmsError, Leg, NavigationLibrary, ProcedureLookup,
    Qualifier, TurnDirection,
};
use serde_json::json;
use std::sync::Arc;

fn library() -> NavigationLibrary {
    NavigationLibrary::from_value(json!({
        "fixes": {
            "ALPHA": {"lat": 37.90, "lon": -122.90},
            "BRAVO": {"lat": 37.80, "lon": -122.70},
            "CHRLY": {"lat": 37.70, "lon": -122.50},
            "XRAY": {"lat": 38.00, "lon": -122.60},
            "YANKE": {"lat": 37.85, "lon": -122.55},
            "SEPDY": {"lat": 37.60, "lon": -122.52},
            "ZUPAX": {"lat": 37.55, "lon": -122.70},
            "SXC": {"lat": 33.37, "lon": -118.42},
            "MOVER": {"lat": 35.00, "lon": -119.00},
            "IPL": {"lat": 32.75, "lon": -115.51},
            "BDEGA": {"lat": 38.30, "lon": -123.40},
            "LOZIT": {"lat": 38.10, "lon": -123.10},
            "BGGLO": {"lat": 37.95, "lon": -122.85},
            "CORKK": {"lat": 37.80, "lon": -122.60}
        },
        "airports": {
            "KSFO": {
                "position": {"lat": 37.6188, "lon": -122.3750},
                "runways": {
                    "28R": {"heading": 284.0, "threshold": {"lat": 37.6132, "lon": -122.3571}},
                    "28L": {"heading": 284.0, "threshold": {"lat": 37.6112, "lon": -122.3580}},
                    "01L": {"heading": 14.0, "threshold": {"lat": 37.6086, "lon": -122.3810}}
                }
            }
        },
        "sids": {
            "OFFSH9": {
                "rwy": {"28R": [["SEPDY", "A30+"]], "28L": ["SEPDY"]},
                "body": ["SEPDY", ["ZUPAX", "A80+|S250"]],
                "exitPoints": {"SXC": [["SXC", "A450"]]}
            }
        },
        "stars": {
            "BDEGA3": {
                "entryPoints": {"BDEGA": ["BDEGA"]},
                "body": [["LOZIT", "A100"], "BGGLO", ["CORKK", "A60-|S210"]],
                "rwy": {"28R": ["CORKK"], "28L": ["CORKK", "BRAVO"]}
            }
        },
        "airways": {
            "V458": ["SXC", "MOVER", "IPL"]
        }
    }))
    .unwrap()
}

fn arrival_context() -> AirportContext {
    AirportContext {
        arrival_airport: Some("KSFO".to_string()),
        arrival_runway: Some("28R".to_string()),
        default_arrival_fix: Some("BDEGA".to_string()),
        airspace_center: Some(Coordinate::new(37.6188, -122.3750)),
        ..AirportContext::default()
    }
}

fn fms_with(airport: AirportContext, route: &str) -> FlightManagementSystem {
    FlightManagementSystem::new(
        Arc::new(library()),
        airport,
        AircraftProfile::default(),
        FmsConfig::default(),
        35_000.0,
        route,
    )
    .unwrap()
}

fn state(altitude_ft: f64, speed_kt: f64) -> AircraftState {
    AircraftState {
        altitude_ft,
        speed_kt,
        heading: 120.0,
        position: Coordinate::new(38.4, -123.6),
    }
}

fn assert_pointer_valid(fms: &FlightManagementSystem) {
    if !fms.is_empty() {
        let cursor = fms.cursor().unwrap();
        let leg = fms.leg(cursor.leg).expect("cursor leg exists");
        assert!(leg.waypoint(cursor.waypoint).is_some(), "dangling cursor {cursor:?}");
    }
}

#[test]
fn test_route_string_scenarios() {
    let segments = route::parse_syntax("KSFO.OFFSH9.SXC.V458.IPL").unwrap();
    let strings: Vec<_> = segments.iter().map(ToString::to_string).collect();
    assert_eq!(strings, vec!["KSFO.OFFSH9.SXC", "SXC.V458.IPL"]);

    let restrictions = decode("A80+|S210");
    let altitude = restrictions.altitude.unwrap();
    assert_eq!((altitude.value, altitude.qualifier), (80, Qualifier::AtOrAbove));
    let speed = restrictions.speed.unwrap();
    assert_eq!((speed.value, speed.qualifier), (210, Qualifier::At));

    assert!(decode("garbage").is_empty());
}

#[test]
fn test_round_trip_preserves_fix_sequence() {
    let library = library();
    for filed in [
        "KSFO.OFFSH9.SXC.V458.IPL",
        "ALPHA..BRAVO..CHRLY",
        "bdega.bdega3.ksfo",
        "SXC.V458.IPL..IPL.V458.MOVER",
    ] {
        let parsed = route::parse(filed, &library).unwrap();
        let reparsed = route::parse(&route::serialize(&parsed), &library).unwrap();
        assert_eq!(route::fix_sequence(&reparsed), route::fix_sequence(&parsed));
    }
}

#[test]
fn test_empty_plan_sentinel() {
    let fms = fms_with(arrival_context(), "");
    assert!(fms.current_waypoint().is_none());
    assert!(fms.fixes().is_empty());
    assert_eq!(fms.flight_plan_route(), "");
}

#[test]
fn test_monotonic_advancement() {
    let mut fms = fms_with(arrival_context(), "ALPHA..SXC.V458.IPL..BDEGA.BDEGA3.KSFO");
    let mut last = fms.index_of_current_waypoint().unwrap().flat;

    while !fms.at_last_waypoint() {
        assert!(fms.next_waypoint());
        let flat = fms.index_of_current_waypoint().unwrap().flat;
        assert!(flat > last);
        last = flat;
        assert_pointer_valid(&fms);
    }

    assert_eq!(last + 1, fms.waypoint_count());
    for _ in 0..3 {
        assert!(!fms.next_waypoint());
        assert_eq!(fms.index_of_current_waypoint().unwrap().flat, last);
    }
}

#[test]
fn test_restriction_backfill() {
    let mut fms = fms_with(arrival_context(), "BDEGA.BDEGA3.KSFO");
    fms.apply_descend_via(&state(8_000.0, 250.0)).unwrap();
    let bdega = fms.current_waypoint().unwrap();
    assert_eq!(bdega.altitude.map(|a| a.value), Some(8_000.0));
    assert_eq!(bdega.speed.map(|s| s.value), Some(250.0));

    // the reroute keeps the clearance already issued
    fms.apply_partial_route_amendment("ALPHA..BRAVO").unwrap();
    let alpha = fms.current_waypoint().unwrap();
    assert_eq!(alpha.fix_name(), Some("ALPHA"));
    assert_eq!(alpha.altitude.map(|a| a.value), Some(8_000.0));

    assert!(fms.next_waypoint());
    let bravo = fms.current_waypoint().unwrap();
    assert_eq!(bravo.fix_name(), Some("BRAVO"));
    assert_eq!(bravo.altitude.map(|a| a.value), Some(8_000.0));
    assert_eq!(bravo.speed.map(|s| s.value), Some(250.0));
}

#[test]
fn test_continuity_merge() {
    let mut fms = fms_with(arrival_context(), "ALPHA..BRAVO..CHRLY");
    assert!(fms.next_waypoint());
    assert_eq!(fms.current_waypoint().unwrap().fix_name(), Some("BRAVO"));

    fms.apply_partial_route_amendment("XRAY..YANKE..CHRLY").unwrap();

    assert_eq!(fms.fixes(), vec!["ALPHA", "XRAY", "YANKE", "CHRLY"]);
    assert_eq!(fms.current_waypoint().unwrap().fix_name(), Some("XRAY"));
    assert_eq!(fms.flight_plan_route(), "ALPHA..XRAY..YANKE..CHRLY");
    assert_pointer_valid(&fms);
}

#[test]
fn test_continuity_search_ignores_flown_history() {
    let mut fms = fms_with(arrival_context(), "ALPHA..BRAVO..CHRLY");
    fms.skip_to_fix("CHRLY");

    // ALPHA is behind the aircraft, so this is a pure insertion
    fms.apply_partial_route_amendment("XRAY..ALPHA").unwrap();

    assert_eq!(fms.fixes(), vec!["ALPHA", "BRAVO", "CHRLY", "XRAY", "ALPHA"]);
    assert_eq!(fms.current_waypoint().unwrap().fix_name(), Some("XRAY"));
}

#[test]
fn test_descend_via_star_is_non_increasing() {
    let mut fms = fms_with(arrival_context(), "BDEGA.BDEGA3.KSFO");

    let outcome = fms.descend_via_procedure(&state(18_000.0, 280.0));
    assert!(outcome.success, "{:?}", outcome.message);

    let altitudes: Vec<f64> = fms
        .waypoints()
        .map(|wp| wp.altitude.map(|a| a.value).unwrap_or(f64::NAN))
        .collect();
    assert_eq!(altitudes, vec![18_000.0, 10_000.0, 10_000.0, 6_000.0]);
    assert!(altitudes.windows(2).all(|pair| pair[1] <= pair[0]));

    let speeds: Vec<f64> = fms.waypoints().map(|wp| wp.speed.unwrap().value).collect();
    assert_eq!(speeds, vec![280.0, 280.0, 280.0, 210.0]);
}

#[test]
fn test_arrival_runway_change_regenerates_star() {
    let mut fms = fms_with(arrival_context(), "BDEGA.BDEGA3.KSFO");
    fms.skip_to_fix("BGGLO");

    fms.set_arrival_runway("28L").unwrap();

    assert_eq!(fms.fixes(), vec!["BDEGA", "LOZIT", "BGGLO", "CORKK", "BRAVO"]);
    assert_eq!(fms.current_waypoint().unwrap().fix_name(), Some("BGGLO"));
    assert!(matches!(
        fms.set_arrival_runway("36"),
        Err(FmsError::UnknownRunway { .. })
    ));
}

#[test]
fn test_star_then_approach() {
    let mut fms = fms_with(arrival_context(), "SXC.V458.IPL");

    assert!(fms.apply_instrument_approach("28R").success);
    assert!(fms.apply_arrival_procedure("BDEGA.BDEGA3.KSFO").success);

    assert_eq!(
        fms.fixes(),
        vec!["SXC", "MOVER", "IPL", "BDEGA", "LOZIT", "BGGLO", "CORKK", "RW28R"]
    );
    assert_eq!(fms.following().star.as_deref(), Some("BDEGA3"));
    assert_eq!(fms.following().approach.as_deref(), Some("28R"));
    // approach legs are not part of the route string
    assert_eq!(fms.flight_plan_route(), "SXC.V458.IPL..BDEGA.BDEGA3.KSFO");
}

#[test]
fn test_wrong_star_airport_is_rejected() {
    let airport = AirportContext {
        arrival_airport: Some("KOAK".to_string()),
        ..arrival_context()
    };
    let mut fms = fms_with(airport, "SXC");

    let outcome = fms.apply_arrival_procedure("BDEGA.BDEGA3.KSFO");
    assert!(!outcome.success);
    assert_eq!(fms.fixes(), vec!["SXC"]);
}

#[test]
fn test_departure_flow() {
    let airport = AirportContext {
        departure_airport: Some("KSFO".to_string()),
        departure_runway: Some("28R".to_string()),
        ..AirportContext::default()
    };
    let mut fms = fms_with(airport, "KSFO.OFFSH9.SXC.V458.IPL");
    assert_eq!(fms.following().sid.as_deref(), Some("OFFSH9"));
    assert_eq!(fms.fixes(), vec!["SEPDY", "ZUPAX", "SXC", "SXC", "MOVER", "IPL"]);

    let first = fms.current_waypoint().unwrap();
    assert_eq!(first.speed.map(|s| s.value), Some(450.0));

    assert!(fms.climb_via_procedure().success);
    // SXC publishes A450, above the filed altitude
    assert_eq!(sid_altitudes(&fms), vec![35_000.0, 35_000.0, 35_000.0]);

    fms.set_departure_runway("28L").unwrap();
    assert_eq!(fms.current_waypoint().unwrap().fix_name(), Some("SEPDY"));
    assert_eq!(fms.fixes(), vec!["SEPDY", "ZUPAX", "SXC", "SXC", "MOVER", "IPL"]);
    // the climb clearance survives the runway change
    assert_eq!(sid_altitudes(&fms), vec![35_000.0, 35_000.0, 35_000.0]);
    assert!(fms.set_departure_runway("99").is_err());
}

fn departure_context() -> AirportContext {
    AirportContext {
        departure_airport: Some("KSFO".to_string()),
        departure_runway: Some("28R".to_string()),
        ..AirportContext::default()
    }
}

fn sid_altitudes(fms: &FlightManagementSystem) -> Vec<f64> {
    fms.leg(0)
        .unwrap()
        .waypoints()
        .iter()
        .map(|wp| wp.altitude.map(|a| a.value).unwrap_or(f64::NAN))
        .collect()
}

#[test]
fn test_climb_via_never_exceeds_service_ceiling() {
    let profile = AircraftProfile {
        service_ceiling_ft: 30_000.0,
        ..AircraftProfile::default()
    };
    let mut fms = FlightManagementSystem::new(
        Arc::new(library()),
        departure_context(),
        profile,
        FmsConfig::default(),
        35_000.0,
        "KSFO.OFFSH9.SXC",
    )
    .unwrap();
    assert_eq!(fms.flight_plan_altitude(), 30_000.0);

    assert!(fms.climb_via_procedure().success);
    let altitudes = sid_altitudes(&fms);
    assert_eq!(altitudes, vec![30_000.0, 30_000.0, 30_000.0]);
    assert!(altitudes.iter().all(|altitude| *altitude <= profile.service_ceiling_ft));
}

#[test]
fn test_runway_change_keeps_present_position_hold() {
    let mut fms = fms_with(departure_context(), "SXC");
    assert_eq!(fms.fixes(), vec!["HDG284", "SXC"]);

    let hold = fms.enter_hold(None, None, None, &state(3_000.0, 200.0)).unwrap();
    assert_eq!(fms.fixes(), vec!["HDG120", "HDG284", "SXC"]);

    fms.set_departure_runway("01L").unwrap();

    assert_eq!(fms.fixes(), vec!["HDG120", "HDG014", "SXC"]);
    let current = fms.current_waypoint().unwrap();
    assert!(current.is_hold());
    assert_eq!(current.hold, Some(hold));
    assert_pointer_valid(&fms);

    assert!(fms.cancel_hold().success);
    assert_eq!(fms.current_waypoint().unwrap().heading, Some(14.0));
}

#[test]
fn test_reroute_into_star_survives_regeneration() {
    let mut fms = fms_with(arrival_context(), "BDEGA.BDEGA3.KSFO");

    fms.apply_partial_route_amendment("SXC..LOZIT").unwrap();
    assert_eq!(fms.fixes(), vec!["SXC", "LOZIT", "BGGLO", "CORKK"]);
    assert_eq!(fms.flight_plan_route(), "SXC..LOZIT.BDEGA3.KSFO");

    let outcome = fms.apply_instrument_approach("28R");
    assert!(outcome.success, "{:?}", outcome.message);
    assert_eq!(fms.fixes(), vec!["SXC", "LOZIT", "BGGLO", "CORKK", "RW28R"]);

    // the plan's own route string rebuilds the same STAR
    let route = fms.flight_plan_route();
    fms.replace_flight_plan(&route).unwrap();
    assert_eq!(fms.fixes(), vec!["SXC", "LOZIT", "BGGLO", "CORKK"]);
}

#[test]
fn test_pointer_invariant_under_mixed_mutations() {
    let library = Arc::new(library());
    let mut fms = FlightManagementSystem::new(
        library.clone(),
        arrival_context(),
        AircraftProfile::default(),
        FmsConfig::default(),
        35_000.0,
        "ALPHA..SXC.V458.IPL",
    )
    .unwrap();

    fms.next_waypoint();
    assert_pointer_valid(&fms);
    fms.insert_leg(0, Leg::single_fix("CHRLY", &*library).unwrap());
    assert_pointer_valid(&fms);
    fms.insert_leg_here(Leg::single_fix("XRAY", &*library).unwrap());
    assert_pointer_valid(&fms);
    fms.apply_partial_route_amendment("YANKE..MOVER").unwrap();
    assert_pointer_valid(&fms);
    fms.skip_to_fix("IPL");
    assert_pointer_valid(&fms);
    assert!(fms
        .initiate_hold(None, Some(TurnDirection::Left), None, &state(9_000.0, 220.0))
        .success);
    assert_pointer_valid(&fms);
    assert!(fms.cancel_hold().success);
    assert_pointer_valid(&fms);
    fms.replace_flight_plan("BRAVO").unwrap();
    assert_pointer_valid(&fms);

    assert!(library.find_fix_position("IPL").is_some());
}

#[test]
fn test_distance_to_current_waypoint() {
    let fms = fms_with(arrival_context(), "ALPHA");
    let here = Coordinate::new(37.90, -122.80);
    let distance = fms.distance_to_current_waypoint_m(&here).unwrap();
    assert!(distance > 8_000.0 && distance < 9_500.0);
}

#[test]
fn test_apply_new_route_modes() {
    let mut fms = fms_with(arrival_context(), "ALPHA..BRAVO..CHRLY");

    let outcome = fms.apply_new_route("XRAY..CHRLY", AmendmentMode::Merge);
    assert!(outcome.success);
    assert_eq!(outcome.message.log, "Route: XRAY..CHRLY");
    assert_eq!(fms.fixes(), vec!["XRAY", "CHRLY"]);

    let outcome = fms.apply_new_route("SXC.V458.IPL", AmendmentMode::Replace);
    assert!(outcome.success);
    assert_eq!(fms.fixes(), vec!["SXC", "MOVER", "IPL"]);
    assert_eq!(fms.following().airway.as_deref(), Some("V458"));

    let outcome = fms.apply_new_route("SXC.V458.GHOST", AmendmentMode::Replace);
    assert!(!outcome.success);
    assert!(outcome.message.log.contains("GHOST"));
    assert_eq!(fms.fixes(), vec!["SXC", "MOVER", "IPL"]);
}
