//! Legs: one procedure or direct segment of a flight plan.
//!
//! A leg owns its waypoints and knows how to regenerate them from its route
//! descriptor. Generation dispatches on [`LegKind`]; a leg never ends up with
//! zero waypoints, a single vector placeholder is substituted instead.

use crate::config::FmsConfig;
use crate::context::{AircraftProfile, AirportContext};
use crate::error::{FmsError, Result, RouteError};
use crate::navigation::{ProcedureKind, ProcedureLookup};
use crate::restriction::{decode, SpeedConstraint};
use crate::route::{SegmentDescriptor, TOKEN_SEPARATOR};
use crate::waypoint::Waypoint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LegKind {
    Sid,
    Star,
    Approach,
    Airway,
    Fix,
    Manual,
}

impl LegKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LegKind::Sid => "SID",
            LegKind::Star => "STAR",
            LegKind::Approach => "APPROACH",
            LegKind::Airway => "AIRWAY",
            LegKind::Fix => "FIX",
            LegKind::Manual => "MANUAL",
        }
    }
}

impl fmt::Display for LegKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LegKind {
    type Err = FmsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "SID" => Ok(LegKind::Sid),
            "STAR" => Ok(LegKind::Star),
            "APPROACH" | "IAP" => Ok(LegKind::Approach),
            "AIRWAY" => Ok(LegKind::Airway),
            "FIX" => Ok(LegKind::Fix),
            "MANUAL" => Ok(LegKind::Manual),
            _ => Err(FmsError::InvalidLegKind(s.to_string())),
        }
    }
}

/// Everything waypoint generation reads besides navigation data.
#[derive(Debug, Clone, Copy)]
pub struct LegContext<'a> {
    pub airport: &'a AirportContext,
    pub profile: &'a AircraftProfile,
    pub config: &'a FmsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    kind: LegKind,
    route: String,
    waypoints: Vec<Waypoint>,
}

impl Leg {
    /// Build a leg for one parsed route descriptor.
    pub fn from_descriptor(
        descriptor: &SegmentDescriptor,
        ctx: &LegContext<'_>,
        lookup: &dyn ProcedureLookup,
    ) -> Result<Self> {
        let kind = match descriptor {
            SegmentDescriptor::Fix { name, .. } => {
                if ctx.airport.is_departure_airport(name)
                    || lookup.find_fix_position(name).is_none()
                {
                    LegKind::Manual
                } else {
                    LegKind::Fix
                }
            }
            SegmentDescriptor::Link { procedure, .. } => match lookup.procedure_kind(procedure) {
                Some(ProcedureKind::Sid) => LegKind::Sid,
                Some(ProcedureKind::Star) => LegKind::Star,
                Some(ProcedureKind::Airway) => LegKind::Airway,
                None => return Err(FmsError::UnknownProcedure(procedure.clone())),
            },
        };

        Self::generate(kind, descriptor.route_string(), ctx, lookup)
    }

    /// Build a leg of `kind` from its route descriptor.
    pub fn generate(
        kind: LegKind,
        route: impl Into<String>,
        ctx: &LegContext<'_>,
        lookup: &dyn ProcedureLookup,
    ) -> Result<Self> {
        let mut leg = Self {
            kind,
            route: route.into().to_uppercase(),
            waypoints: Vec::new(),
        };
        leg.generate_waypoints(ctx, lookup)?;
        Ok(leg)
    }

    /// A direct-to leg for one named fix.
    pub fn single_fix(name: &str, lookup: &dyn ProcedureLookup) -> Result<Self> {
        let name = name.to_uppercase();
        let position = lookup
            .find_fix_position(&name)
            .ok_or_else(|| FmsError::UnknownFix(name.clone()))?;

        Ok(Self {
            kind: LegKind::Fix,
            waypoints: vec![Waypoint::fix(name.clone(), Some(position), Default::default())],
            route: name,
        })
    }

    /// A vector leg; see [`LegKind::Manual`] generation for default headings.
    pub fn manual(route: &str, ctx: &LegContext<'_>, lookup: &dyn ProcedureLookup) -> Self {
        let route = route.to_uppercase();
        Self {
            kind: LegKind::Manual,
            waypoints: vec![manual_waypoint(&route, ctx, lookup)],
            route,
        }
    }

    /// An instrument approach to `runway` at `airport`.
    pub fn approach(airport: &str, runway: &str, lookup: &dyn ProcedureLookup) -> Result<Self> {
        let route = format!("{}{}{}", airport, TOKEN_SEPARATOR, runway).to_uppercase();
        let waypoints = approach_waypoints(&route, lookup)?;
        Ok(Self {
            kind: LegKind::Approach,
            route,
            waypoints,
        })
    }

    /// Wrap a ready-made waypoint, e.g. a present-position hold.
    pub fn from_waypoint(kind: LegKind, route: impl Into<String>, waypoint: Waypoint) -> Self {
        Self {
            kind,
            route: route.into().to_uppercase(),
            waypoints: vec![waypoint],
        }
    }

    /// (Re)generate this leg's waypoints from its route descriptor.
    pub fn generate_waypoints(
        &mut self,
        ctx: &LegContext<'_>,
        lookup: &dyn ProcedureLookup,
    ) -> Result<()> {
        let waypoints = match self.kind {
            LegKind::Sid => sid_waypoints(&self.route, ctx, lookup)?,
            LegKind::Star => star_waypoints(&self.route, ctx, lookup)?,
            LegKind::Airway => airway_waypoints(&self.route, lookup)?,
            LegKind::Approach => approach_waypoints(&self.route, lookup)?,
            LegKind::Fix => match lookup.find_fix_position(&self.route) {
                Some(position) => {
                    vec![Waypoint::fix(self.route.clone(), Some(position), Default::default())]
                }
                None => Vec::new(),
            },
            LegKind::Manual => vec![manual_waypoint(&self.route, ctx, lookup)],
        };

        self.waypoints = waypoints;
        self.ensure_not_empty();
        Ok(())
    }

    /// Regenerate after an airport context change, keeping what was issued on
    /// top of the published data: targets and holds on fixes that survive, and
    /// unnamed holds at their old index. Returns where the waypoint previously
    /// at `tracked` ended up, or 0 when it is gone.
    pub(crate) fn regenerate(
        &mut self,
        ctx: &LegContext<'_>,
        lookup: &dyn ProcedureLookup,
        tracked: usize,
    ) -> Result<usize> {
        let previous = self.waypoints.clone();
        self.generate_waypoints(ctx, lookup)?;

        for waypoint in &mut self.waypoints {
            let issued = waypoint
                .fix_name()
                .and_then(|name| previous.iter().find(|old| old.is_named(name)));
            if let Some(old) = issued {
                waypoint.carry_assignments_from(old);
            }
        }

        let mut tracked_hold = None;
        for (index, old) in previous.iter().enumerate() {
            if old.fix_name().is_none() && old.is_hold() {
                let at = index.min(self.waypoints.len());
                self.waypoints.insert(at, old.clone());
                if index == tracked {
                    tracked_hold = Some(at);
                }
            }
        }

        Ok(tracked_hold
            .or_else(|| {
                previous
                    .get(tracked)
                    .and_then(Waypoint::fix_name)
                    .and_then(|name| self.index_of(name))
            })
            .unwrap_or(0))
    }

    fn ensure_not_empty(&mut self) {
        if self.waypoints.is_empty() {
            tracing::warn!(
                kind = %self.kind,
                route = %self.route,
                "Leg generated no waypoints, substituting a vector placeholder"
            );
            self.waypoints.push(Waypoint::placeholder());
        }
    }

    pub fn kind(&self) -> LegKind {
        self.kind
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub(crate) fn waypoints_mut(&mut self) -> &mut [Waypoint] {
        &mut self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn waypoint(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    pub(crate) fn waypoint_mut(&mut self, index: usize) -> Option<&mut Waypoint> {
        self.waypoints.get_mut(index)
    }

    pub fn last_waypoint(&self) -> Option<&Waypoint> {
        self.waypoints.last()
    }

    pub fn index_of(&self, fix_name: &str) -> Option<usize> {
        self.waypoints.iter().position(|wp| wp.is_named(fix_name))
    }

    pub fn is_procedure(&self) -> bool {
        matches!(self.kind, LegKind::Sid | LegKind::Star | LegKind::Airway)
    }

    /// Name of the SID/STAR/airway this leg flies, if any.
    pub fn procedure_name(&self) -> Option<&str> {
        if !self.is_procedure() {
            return None;
        }
        self.route.split(TOKEN_SEPARATOR).nth(1)
    }

    /// Insert a waypoint before `index` (clamped to the end).
    pub(crate) fn insert_waypoint(&mut self, index: usize, waypoint: Waypoint) {
        let index = index.min(self.waypoints.len());
        self.waypoints.insert(index, waypoint);
    }

    /// Drop every waypoint before `index` and restart the route descriptor at
    /// the new first fix, e.g. `KSFO.OFFSH9.SXC` becomes `ZUPAX.OFFSH9.SXC`.
    /// Regenerating from the rewritten descriptor yields the same waypoints.
    pub fn truncate_to(&mut self, index: usize) {
        if index == 0 || index >= self.waypoints.len() {
            return;
        }
        self.waypoints.drain(..index);

        let Some(first) = self.waypoints[0].fix_name().map(str::to_string) else {
            return;
        };
        let mut tokens: Vec<String> = self
            .route
            .split(TOKEN_SEPARATOR)
            .map(str::to_string)
            .collect();
        if tokens.len() == 3 {
            tokens[0] = first;
            self.route = tokens.join(&TOKEN_SEPARATOR.to_string());
        } else {
            self.route = first;
        }
    }

    /// Remove the final waypoint. Returns false (and leaves the leg as is)
    /// when it is the only one, since a leg may never be empty.
    pub fn drop_last_waypoint(&mut self) -> bool {
        if self.waypoints.len() <= 1 {
            return false;
        }
        self.waypoints.pop();
        true
    }
}

fn split_link(route: &str) -> Result<(&str, &str, &str)> {
    let mut tokens = route.split(TOKEN_SEPARATOR);
    match (tokens.next(), tokens.next(), tokens.next(), tokens.next()) {
        (Some(entry), Some(procedure), Some(exit), None) => Ok((entry, procedure, exit)),
        _ => Err(FmsError::NotSingleProcedure(route.to_string())),
    }
}

fn procedure_fix_waypoints(
    procedure: &str,
    runway: &str,
    transition: &str,
    lookup: &dyn ProcedureLookup,
) -> Vec<Waypoint> {
    lookup
        .find_procedure_waypoints(procedure, runway, transition)
        .into_iter()
        .map(|fix| {
            let restrictions = fix.restriction.as_deref().map(decode).unwrap_or_default();
            let position = lookup.find_fix_position(&fix.fix_name);
            Waypoint::fix(fix.fix_name, position, restrictions)
        })
        .collect()
}

fn sid_waypoints(
    route: &str,
    ctx: &LegContext<'_>,
    lookup: &dyn ProcedureLookup,
) -> Result<Vec<Waypoint>> {
    let (start, procedure, exit) = split_link(route)?;
    let runway = ctx
        .airport
        .departure_runway
        .as_deref()
        .ok_or(FmsError::NoDepartureRunway)?;

    let mut waypoints = procedure_fix_waypoints(procedure, runway, exit, lookup);
    if ctx.config.sid_default_speed {
        if let Some(first) = waypoints.first_mut() {
            if first.speed.is_none() {
                first.speed = Some(SpeedConstraint::at(ctx.profile.cruise_speed_kt));
            }
        }
    }

    // a truncated SID starts at a fix instead of the airport
    if let Some(index) = waypoints.iter().position(|wp| wp.is_named(start)) {
        waypoints.drain(..index);
    }
    Ok(waypoints)
}

fn star_waypoints(
    route: &str,
    ctx: &LegContext<'_>,
    lookup: &dyn ProcedureLookup,
) -> Result<Vec<Waypoint>> {
    let (entry, procedure, _airport) = split_link(route)?;
    let runway = ctx
        .airport
        .arrival_runway
        .as_deref()
        .ok_or(FmsError::NoArrivalRunway)?;

    Ok(procedure_fix_waypoints(procedure, runway, entry, lookup))
}

fn airway_waypoints(route: &str, lookup: &dyn ProcedureLookup) -> Result<Vec<Waypoint>> {
    let (start, airway, end) = split_link(route)?;
    if !lookup.has_airway(airway) {
        return Err(FmsError::UnknownProcedure(airway.to_string()));
    }
    let sequence = lookup
        .airway_fix_sequence(airway)
        .ok_or_else(|| FmsError::UnknownProcedure(airway.to_string()))?;

    let position_of = |fix: &str| {
        sequence
            .iter()
            .position(|candidate| candidate.eq_ignore_ascii_case(fix))
            .ok_or_else(|| {
                FmsError::Route(RouteError::FixNotOnAirway {
                    airway: airway.to_string(),
                    fix: fix.to_string(),
                })
            })
    };
    let start_index = position_of(start)?;
    let end_index = position_of(end)?;

    let traversed: Vec<&String> = if end_index >= start_index {
        sequence[start_index..=end_index].iter().collect()
    } else {
        sequence[end_index..=start_index].iter().rev().collect()
    };

    Ok(traversed
        .into_iter()
        .map(|fix| Waypoint::fix(fix.clone(), lookup.find_fix_position(fix), Default::default()))
        .collect())
}

fn approach_waypoints(route: &str, lookup: &dyn ProcedureLookup) -> Result<Vec<Waypoint>> {
    let (airport, runway_name) = route
        .split_once(TOKEN_SEPARATOR)
        .ok_or_else(|| FmsError::NotSingleProcedure(route.to_string()))?;
    let runway = lookup
        .runway(airport, runway_name)
        .ok_or_else(|| FmsError::UnknownRunway {
            airport: airport.to_string(),
            runway: runway_name.to_string(),
        })?;

    Ok(vec![Waypoint::runway(runway_name, runway.threshold, runway.heading)])
}

fn manual_waypoint(route: &str, ctx: &LegContext<'_>, lookup: &dyn ProcedureLookup) -> Waypoint {
    let heading = if ctx.airport.is_departure_airport(route) {
        ctx.airport
            .departure_runway
            .as_deref()
            .and_then(|runway| lookup.runway(route, runway))
            .map(|runway| runway.heading)
    } else if ctx.airport.is_default_arrival_fix(route) {
        match (lookup.find_fix_position(route), ctx.airport.airspace_center) {
            (Some(fix), Some(center)) => Some(fix.heading_to(&center)),
            _ => None,
        }
    } else {
        None
    };

    Waypoint::vector(heading)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::tests::sample_library;
    use crate::restriction::Qualifier;
    use crate::spatial::Coordinate;
    use crate::restriction::AltitudeConstraint;
    use crate::waypoint::{HoldLegLength, HoldParameters, NavigationMode, TurnDirection};

    fn airport() -> AirportContext {
        AirportContext {
            departure_airport: Some("KSFO".to_string()),
            arrival_airport: Some("KSFO".to_string()),
            departure_runway: Some("28R".to_string()),
            arrival_runway: Some("28R".to_string()),
            default_arrival_fix: Some("BDEGA".to_string()),
            airspace_center: Some(Coordinate::new(37.6188, -122.3750)),
        }
    }

    fn names(leg: &Leg) -> Vec<&str> {
        leg.waypoints()
            .iter()
            .map(|wp| wp.fix_name().unwrap_or(""))
            .collect()
    }

    #[test]
    fn test_sid_generation_decodes_restrictions() {
        let library = sample_library();
        let airport = airport();
        let profile = AircraftProfile::default();
        let config = FmsConfig::default();
        let ctx = LegContext { airport: &airport, profile: &profile, config: &config };

        let leg = Leg::from_descriptor(&SegmentDescriptor::link("KSFO", "OFFSH9", "SXC"), &ctx, &library)
            .unwrap();

        assert_eq!(leg.kind(), LegKind::Sid);
        assert_eq!(leg.route(), "KSFO.OFFSH9.SXC");
        assert_eq!(names(&leg), vec!["SEPDY", "ZUPAX", "SXC"]);
        assert_eq!(leg.procedure_name(), Some("OFFSH9"));

        let first = &leg.waypoints()[0];
        assert_eq!(first.altitude.map(|a| a.value), Some(3_000.0));
        assert_eq!(first.speed.map(|s| s.value), Some(profile.cruise_speed_kt));

        let zupax = &leg.waypoints()[1];
        assert_eq!(zupax.altitude.map(|a| a.qualifier), Some(Qualifier::AtOrAbove));
        assert_eq!(zupax.speed.map(|s| s.value), Some(250.0));
    }

    #[test]
    fn test_sid_requires_departure_runway() {
        let library = sample_library();
        let airport = AirportContext { departure_runway: None, ..airport() };
        let profile = AircraftProfile::default();
        let config = FmsConfig::default();
        let ctx = LegContext { airport: &airport, profile: &profile, config: &config };

        let result = Leg::generate(LegKind::Sid, "KSFO.OFFSH9.SXC", &ctx, &library);
        assert!(matches!(result, Err(FmsError::NoDepartureRunway)));
    }

    #[test]
    fn test_star_generation() {
        let library = sample_library();
        let airport = airport();
        let profile = AircraftProfile::default();
        let config = FmsConfig::default();
        let ctx = LegContext { airport: &airport, profile: &profile, config: &config };

        let leg = Leg::generate(LegKind::Star, "BDEGA.BDEGA3.KSFO", &ctx, &library).unwrap();
        assert_eq!(names(&leg), vec!["BDEGA", "LOZIT", "BGGLO", "CORKK"]);
        // STARs get no cruise-speed default
        assert!(leg.waypoints()[0].speed.is_none());

        let no_runway = AirportContext { arrival_runway: None, ..airport.clone() };
        let ctx = LegContext { airport: &no_runway, profile: &profile, config: &config };
        assert!(matches!(
            Leg::generate(LegKind::Star, "BDEGA.BDEGA3.KSFO", &ctx, &library),
            Err(FmsError::NoArrivalRunway)
        ));
    }

    #[test]
    fn test_airway_walks_in_both_directions() {
        let library = sample_library();
        let airport = airport();
        let profile = AircraftProfile::default();
        let config = FmsConfig::default();
        let ctx = LegContext { airport: &airport, profile: &profile, config: &config };

        let forward = Leg::generate(LegKind::Airway, "SXC.V458.IPL", &ctx, &library).unwrap();
        assert_eq!(names(&forward), vec!["SXC", "MOVER", "IPL"]);

        let backward = Leg::generate(LegKind::Airway, "IPL.V458.MOVER", &ctx, &library).unwrap();
        assert_eq!(names(&backward), vec!["IPL", "MOVER"]);
        assert!(backward.waypoints().iter().all(|wp| wp.restrictions().is_empty()));

        assert!(Leg::generate(LegKind::Airway, "SXC.V458.ZUPAX", &ctx, &library).is_err());
    }

    #[test]
    fn test_manual_leg_headings() {
        let library = sample_library();
        let airport = airport();
        let profile = AircraftProfile::default();
        let config = FmsConfig::default();
        let ctx = LegContext { airport: &airport, profile: &profile, config: &config };

        let departure = Leg::from_descriptor(&SegmentDescriptor::fix("KSFO"), &ctx, &library).unwrap();
        assert_eq!(departure.kind(), LegKind::Manual);
        assert_eq!(departure.waypoints()[0].heading, Some(284.0));
        assert_eq!(departure.waypoints()[0].navigation_mode, NavigationMode::Heading);

        let arrival = Leg::manual("BDEGA", &ctx, &library);
        let heading = arrival.waypoints()[0].heading.expect("points at the center");
        // BDEGA is north-west of the field
        assert!(heading > 90.0 && heading < 180.0);

        let other = Leg::manual("SOMEWHERE", &ctx, &library);
        assert_eq!(other.waypoints()[0].heading, None);
    }

    #[test]
    fn test_unpublished_combination_gets_placeholder() {
        let library = sample_library();
        let airport = AirportContext { departure_runway: Some("01R".to_string()), ..airport() };
        let profile = AircraftProfile::default();
        let config = FmsConfig::default();
        let ctx = LegContext { airport: &airport, profile: &profile, config: &config };

        let leg = Leg::generate(LegKind::Sid, "KSFO.OFFSH9.SXC", &ctx, &library).unwrap();
        assert_eq!(leg.len(), 1);
        assert_eq!(leg.waypoints()[0].fix_name(), None);
    }

    #[test]
    fn test_approach_leg() {
        let library = sample_library();
        let leg = Leg::approach("KSFO", "28R", &library).unwrap();

        assert_eq!(leg.kind(), LegKind::Approach);
        assert_eq!(leg.waypoints()[0].navigation_mode, NavigationMode::Runway);
        assert_eq!(leg.waypoints()[0].fix_name(), Some("RW28R"));
        assert!(Leg::approach("KSFO", "36", &library).is_err());
    }

    #[test]
    fn test_truncate_rewrites_route() {
        let library = sample_library();
        let airport = airport();
        let profile = AircraftProfile::default();
        let config = FmsConfig::default();
        let ctx = LegContext { airport: &airport, profile: &profile, config: &config };

        let mut leg = Leg::generate(LegKind::Sid, "KSFO.OFFSH9.SXC", &ctx, &library).unwrap();
        leg.truncate_to(1);

        assert_eq!(leg.route(), "ZUPAX.OFFSH9.SXC");
        assert_eq!(names(&leg), vec!["ZUPAX", "SXC"]);

        leg.generate_waypoints(&ctx, &library).unwrap();
        assert_eq!(names(&leg), vec!["ZUPAX", "SXC"]);

        assert!(leg.drop_last_waypoint());
        assert!(!leg.drop_last_waypoint());
        assert_eq!(leg.len(), 1);
    }

    #[test]
    fn test_truncated_star_regenerates_from_its_new_entry() {
        let library = sample_library();
        let airport = airport();
        let profile = AircraftProfile::default();
        let config = FmsConfig::default();
        let ctx = LegContext { airport: &airport, profile: &profile, config: &config };

        let mut leg = Leg::generate(LegKind::Star, "BDEGA.BDEGA3.KSFO", &ctx, &library).unwrap();
        leg.truncate_to(1);
        assert_eq!(leg.route(), "LOZIT.BDEGA3.KSFO");

        leg.generate_waypoints(&ctx, &library).unwrap();
        assert_eq!(names(&leg), vec!["LOZIT", "BGGLO", "CORKK"]);
    }

    #[test]
    fn test_regenerate_keeps_issued_targets_and_holds() {
        let library = sample_library();
        let airport = airport();
        let profile = AircraftProfile::default();
        let config = FmsConfig::default();
        let ctx = LegContext { airport: &airport, profile: &profile, config: &config };

        let mut leg = Leg::generate(LegKind::Star, "BDEGA.BDEGA3.KSFO", &ctx, &library).unwrap();
        leg.waypoints_mut()[1].altitude = Some(AltitudeConstraint::at(12_000.0));
        let hold = HoldParameters {
            turn_direction: TurnDirection::Left,
            leg_length: HoldLegLength::Minutes(1.0),
            inbound_heading: Some(90.0),
            timer: None,
        };
        leg.insert_waypoint(2, Waypoint::hold_at(Coordinate::new(38.0, -123.0), hold));

        let tracked = leg.regenerate(&ctx, &library, 2).unwrap();

        assert_eq!(names(&leg), vec!["BDEGA", "LOZIT", "", "BGGLO", "CORKK"]);
        assert_eq!(tracked, 2);
        assert!(leg.waypoints()[2].is_hold());
        assert_eq!(leg.waypoints()[1].altitude.map(|a| a.value), Some(12_000.0));
        // nothing was issued at CORKK, so the published target stays
        assert_eq!(leg.waypoints()[4].altitude.map(|a| a.value), Some(6_000.0));

        assert_eq!(leg.regenerate(&ctx, &library, 3).unwrap(), 3);
    }

    #[test]
    fn test_leg_kind_from_str() {
        assert_eq!("star".parse::<LegKind>().unwrap(), LegKind::Star);
        assert!(matches!("bogus".parse::<LegKind>(), Err(FmsError::InvalidLegKind(_))));
    }
}
