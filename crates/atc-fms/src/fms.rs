//! The flight management system: an ordered plan of legs and a cursor over it.
//!
//! The cursor is a `(leg, waypoint)` pair. Whenever the plan is non-empty it
//! always addresses an existing waypoint; every mutator below restores that
//! before returning. Legs before the cursor are flown history and are kept so
//! that read-back and continuity searches see the whole plan.

use crate::config::FmsConfig;
use crate::context::{AircraftProfile, AircraftState, AirportContext};
use crate::error::{FmsError, Result};
use crate::leg::{Leg, LegContext, LegKind};
use crate::merge::{self, LegArena, LegId, Splice};
use crate::navigation::{ProcedureKind, ProcedureLookup};
use crate::route::{self, SegmentDescriptor};
use crate::spatial::Coordinate;
use crate::vertical;
use crate::waypoint::{HoldLegLength, HoldParameters, TurnDirection, Waypoint};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Position of the waypoint currently being flown to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub leg: usize,
    pub waypoint: usize,
}

/// Where a waypoint sits, both as a flat ordinal and as a leg/waypoint pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaypointIndex {
    pub flat: usize,
    pub leg: usize,
    pub waypoint: usize,
}

/// Procedures currently being flown, for read-back only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowingState {
    pub sid: Option<String>,
    pub star: Option<String>,
    pub approach: Option<String>,
    pub airway: Option<String>,
}

/// How a requested route is combined with the existing plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmendmentMode {
    /// Discard the whole plan.
    Replace,
    /// Splice at the continuity point, or insert after the current leg.
    Merge,
}

pub struct FlightManagementSystem {
    lookup: Arc<dyn ProcedureLookup>,
    airport: AirportContext,
    profile: AircraftProfile,
    config: FmsConfig,
    arena: LegArena,
    order: Vec<LegId>,
    cursor: Cursor,
    flight_plan_altitude: f64,
    following: FollowingState,
}

impl FlightManagementSystem {
    /// Build the FMS for one aircraft from its filed route (may be empty).
    ///
    /// Departures whose route does not open with a SID get a leading vector
    /// leg to the departure airport, flown on runway heading until a SID is
    /// assigned.
    pub fn new(
        lookup: Arc<dyn ProcedureLookup>,
        airport: AirportContext,
        profile: AircraftProfile,
        config: FmsConfig,
        cruise_altitude_ft: f64,
        route: &str,
    ) -> Result<Self> {
        let mut fms = Self {
            lookup,
            airport,
            profile,
            config,
            arena: LegArena::default(),
            order: Vec::new(),
            cursor: Cursor::default(),
            flight_plan_altitude: cruise_altitude_ft.min(profile.service_ceiling_ft),
            following: FollowingState::default(),
        };

        let mut legs = if route.is_empty() {
            Vec::new()
        } else {
            fms.legs_from_route(route)?
        };

        if let Some(departure) = fms.airport.departure_airport.as_deref() {
            let starts_at_departure = legs.first().is_some_and(|leg| {
                leg.kind() == LegKind::Sid
                    || (leg.kind() == LegKind::Manual && leg.route().eq_ignore_ascii_case(departure))
            });
            if !starts_at_departure {
                legs.insert(0, Leg::manual(departure, &fms.leg_context(), fms.lookup.as_ref()));
            }
        }

        fms.order = legs.into_iter().map(|leg| fms.arena.insert(leg)).collect();
        fms.refresh_following();

        tracing::debug!(
            legs = fms.order.len(),
            route = %fms.flight_plan_route(),
            altitude = fms.flight_plan_altitude,
            "Flight plan initialised"
        );
        Ok(fms)
    }

    fn leg_context(&self) -> LegContext<'_> {
        LegContext {
            airport: &self.airport,
            profile: &self.profile,
            config: &self.config,
        }
    }

    fn legs_from_route(&self, route: &str) -> Result<Vec<Leg>> {
        let descriptors = route::parse(route, self.lookup.as_ref())?;
        let ctx = self.leg_context();
        descriptors
            .iter()
            .map(|descriptor| Leg::from_descriptor(descriptor, &ctx, self.lookup.as_ref()))
            .collect()
    }

    // ========== ACCESSORS ==========

    /// Filed cruise altitude in feet, already clamped to the service ceiling.
    pub fn flight_plan_altitude(&self) -> f64 {
        self.flight_plan_altitude
    }

    pub fn following(&self) -> &FollowingState {
        &self.following
    }

    pub fn airport(&self) -> &AirportContext {
        &self.airport
    }

    pub fn profile(&self) -> &AircraftProfile {
        &self.profile
    }

    pub fn config(&self) -> &FmsConfig {
        &self.config
    }

    /// The current position, or `None` for an empty plan.
    pub fn cursor(&self) -> Option<Cursor> {
        (!self.order.is_empty()).then_some(self.cursor)
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn leg_count(&self) -> usize {
        self.order.len()
    }

    pub fn legs(&self) -> impl Iterator<Item = &Leg> + '_ {
        self.order.iter().filter_map(move |id| self.arena.get(*id))
    }

    pub fn leg(&self, index: usize) -> Option<&Leg> {
        self.arena.get(*self.order.get(index)?)
    }

    fn leg_mut(&mut self, index: usize) -> Option<&mut Leg> {
        let id = *self.order.get(index)?;
        self.arena.get_mut(id)
    }

    pub fn current_leg(&self) -> Option<&Leg> {
        self.leg(self.cursor.leg)
    }

    /// The waypoint being flown to; `None` only when the plan is empty.
    pub fn current_waypoint(&self) -> Option<&Waypoint> {
        self.current_leg()?.waypoint(self.cursor.waypoint)
    }

    fn current_waypoint_mut(&mut self) -> Option<&mut Waypoint> {
        let cursor = self.cursor;
        self.leg_mut(cursor.leg)?.waypoint_mut(cursor.waypoint)
    }

    /// Carry the previously-current waypoint's targets into the current one.
    fn backfill_current(&mut self, previous: Option<Waypoint>) {
        let Some(previous) = previous else {
            return;
        };
        if let Some(current) = self.current_waypoint_mut() {
            current.backfill_from(&previous);
        }
    }

    fn refresh_following(&mut self) {
        let mut following = FollowingState::default();
        for (index, leg) in self.legs().enumerate().skip(self.cursor.leg) {
            let name = leg.procedure_name().map(str::to_string);
            match leg.kind() {
                LegKind::Sid if following.sid.is_none() => following.sid = name,
                LegKind::Star if following.star.is_none() => following.star = name,
                LegKind::Airway if index == self.cursor.leg => following.airway = name,
                LegKind::Approach if following.approach.is_none() => {
                    following.approach = leg.route().split('.').nth(1).map(str::to_string);
                }
                _ => {}
            }
        }
        self.following = following;
    }

    // ========== CURSOR MOVEMENT ==========

    /// Advance to the next waypoint, crossing into the next leg when needed.
    ///
    /// Returns false at the end of the route, where the cursor stays put.
    pub fn next_waypoint(&mut self) -> bool {
        let Some(current_leg_len) = self.current_leg().map(Leg::len) else {
            return false;
        };
        let previous = self.current_waypoint().cloned();

        if self.cursor.waypoint + 1 < current_leg_len {
            self.cursor.waypoint += 1;
        } else if self.cursor.leg + 1 < self.order.len() {
            self.cursor = Cursor { leg: self.cursor.leg + 1, waypoint: 0 };
            self.refresh_following();
        } else {
            return false;
        }

        self.backfill_current(previous);
        true
    }

    /// Jump to the first waypoint named `fix_name`. Returns whether it exists.
    pub fn skip_to_fix(&mut self, fix_name: &str) -> bool {
        let Some(index) = self.index_of_waypoint(fix_name) else {
            return false;
        };
        let previous = self.current_waypoint().cloned();
        self.cursor = Cursor { leg: index.leg, waypoint: index.waypoint };
        self.backfill_current(previous);
        self.refresh_following();
        true
    }

    // ========== STRUCTURAL MUTATORS ==========

    pub fn prepend_leg(&mut self, leg: Leg) {
        self.insert_leg(0, leg);
    }

    pub fn append_leg(&mut self, leg: Leg) {
        self.insert_leg(self.order.len(), leg);
    }

    /// Insert at the current leg index; the new leg becomes the current one.
    pub fn insert_leg_here(&mut self, leg: Leg) {
        self.insert_leg(self.cursor.leg, leg);
    }

    /// Insert `leg` before `index` (clamped to the end of the plan).
    ///
    /// Inserting at the current leg makes the new leg current, starting at its
    /// first waypoint; inserting before it shifts the cursor so the same
    /// waypoint stays current.
    pub fn insert_leg(&mut self, index: usize, leg: Leg) {
        let index = index.min(self.order.len());
        let previous = self.current_waypoint().cloned();
        let id = self.arena.insert(leg);
        self.order.insert(index, id);

        if self.order.len() == 1 {
            self.cursor = Cursor::default();
        } else if index == self.cursor.leg {
            self.cursor.waypoint = 0;
        } else if index < self.cursor.leg {
            self.cursor.leg += 1;
        }

        self.backfill_current(previous);
        self.refresh_following();
    }

    /// Insert a waypoint at the cursor inside the current leg; it becomes the
    /// current waypoint.
    pub fn insert_waypoint_here(&mut self, waypoint: Waypoint) {
        if self.order.is_empty() {
            let (kind, route) = match waypoint.fix_name() {
                Some(name) => (LegKind::Fix, name.to_string()),
                None => (LegKind::Manual, String::new()),
            };
            self.append_leg(Leg::from_waypoint(kind, route, waypoint));
            return;
        }

        let previous = self.current_waypoint().cloned();
        let cursor = self.cursor;
        if let Some(leg) = self.leg_mut(cursor.leg) {
            leg.insert_waypoint(cursor.waypoint, waypoint);
        }
        self.backfill_current(previous);
    }

    /// Swap the leg at `index` for `leg`, keeping the cursor valid.
    fn replace_leg(&mut self, index: usize, leg: Leg) {
        let previous = self.current_waypoint().cloned();
        let id = self.arena.insert(leg);
        let old = std::mem::replace(&mut self.order[index], id);
        self.arena.remove(old);

        if self.cursor.leg == index {
            self.cursor.waypoint = 0;
        }
        self.backfill_current(previous);
        self.refresh_following();
    }

    fn position_of_kind(&self, kind: LegKind, from: usize) -> Option<usize> {
        self.legs()
            .enumerate()
            .skip(from)
            .find(|(_, leg)| leg.kind() == kind)
            .map(|(index, _)| index)
    }

    // ========== ROUTE AMENDMENT ==========

    /// Apply a route string either as a full replacement or as a merge.
    pub fn amend_route(&mut self, route: &str, mode: AmendmentMode) -> Result<()> {
        match mode {
            AmendmentMode::Replace => self.replace_flight_plan(route),
            AmendmentMode::Merge => self.apply_partial_route_amendment(route),
        }
    }

    /// Discard every leg and fly `route` from its first waypoint.
    pub fn replace_flight_plan(&mut self, route: &str) -> Result<()> {
        let legs = self.legs_from_route(route)?;
        let previous = self.current_waypoint().cloned();

        let ids: Vec<LegId> = legs.into_iter().map(|leg| self.arena.insert(leg)).collect();
        let splice = merge::replace_all(&self.order, &ids);
        self.apply_splice(splice, previous);

        tracing::debug!(route = %route, "Flight plan replaced");
        Ok(())
    }

    /// Merge `route` into the plan at the first waypoint (at or after the
    /// current one) named like the route's final fix.
    ///
    /// With a continuity point, the legs between the current leg and the
    /// continuity leg are replaced by the new legs and the continuity fix is
    /// not duplicated; a continuity point inside a leg truncates that leg to
    /// start there. Without one, the new legs are inserted after the current
    /// leg. Either way the cursor moves to the first new leg.
    pub fn apply_partial_route_amendment(&mut self, route: &str) -> Result<()> {
        let mut legs = self.legs_from_route(route)?;
        let previous = self.current_waypoint().cloned();

        let last_fix = legs
            .last()
            .and_then(Leg::last_waypoint)
            .and_then(Waypoint::fix_name)
            .map(str::to_string);
        let from = self.index_of_current_waypoint().map_or(0, |index| index.flat);
        let continuity = last_fix
            .as_deref()
            .and_then(|fix| self.index_of_waypoint_from(fix, from));

        let splice = match continuity {
            Some(point) => {
                if let Some(last) = legs.last_mut() {
                    if !last.drop_last_waypoint() {
                        legs.pop();
                    }
                }
                if point.waypoint > 0 {
                    if let Some(leg) = self.leg_mut(point.leg) {
                        leg.truncate_to(point.waypoint);
                    }
                }

                tracing::debug!(
                    route = %route,
                    continuity_leg = point.leg,
                    continuity_waypoint = point.waypoint,
                    "Merging route amendment at continuity point"
                );
                let ids: Vec<LegId> = legs.into_iter().map(|leg| self.arena.insert(leg)).collect();
                merge::merge_at_continuity(&self.order, self.cursor.leg, point.leg, &ids)
            }
            None => {
                tracing::debug!(route = %route, "No continuity, inserting after current leg");
                let ids: Vec<LegId> = legs.into_iter().map(|leg| self.arena.insert(leg)).collect();
                merge::insert_after_current(&self.order, self.cursor.leg, &ids)
            }
        };

        self.apply_splice(splice, previous);
        Ok(())
    }

    fn apply_splice(&mut self, splice: Splice, previous: Option<Waypoint>) {
        for id in &splice.removed {
            self.arena.remove(*id);
        }
        self.order = self.arena.compact(&splice.order);
        self.cursor = if self.order.is_empty() {
            Cursor::default()
        } else {
            Cursor { leg: splice.current_leg.min(self.order.len() - 1), waypoint: 0 }
        };

        self.backfill_current(previous);
        self.refresh_following();
    }

    // ========== PROCEDURES ==========

    /// Parse `route` as exactly one procedure link of the expected kind and
    /// build its leg.
    fn single_procedure_leg(
        &self,
        route: &str,
        expected: ProcedureKind,
    ) -> Result<(SegmentDescriptor, Leg)> {
        let descriptors = route::parse(route, self.lookup.as_ref())?;
        let [descriptor] = descriptors.as_slice() else {
            return Err(FmsError::NotSingleProcedure(route.to_uppercase()));
        };
        let SegmentDescriptor::Link { procedure, .. } = descriptor else {
            return Err(FmsError::NotSingleProcedure(route.to_uppercase()));
        };

        if self.lookup.procedure_kind(procedure) != Some(expected) {
            return Err(FmsError::WrongProcedureKind {
                procedure: procedure.clone(),
                expected: match expected {
                    ProcedureKind::Sid => "SID",
                    ProcedureKind::Star => "STAR",
                    ProcedureKind::Airway => "airway",
                },
            });
        }

        let leg = Leg::from_descriptor(descriptor, &self.leg_context(), self.lookup.as_ref())?;
        Ok((descriptor.clone(), leg))
    }

    /// Assign a SID given as `AIRPORT.SID.EXIT`; returns the procedure name.
    ///
    /// Replaces an existing SID leg, otherwise the departure-airport vector
    /// leg at the head of the plan, otherwise prepends.
    pub fn assign_departure_procedure(&mut self, route: &str) -> Result<String> {
        let (descriptor, leg) = self.single_procedure_leg(route, ProcedureKind::Sid)?;
        let procedure = leg.procedure_name().unwrap_or_default().to_string();

        if let Some(departure) = self.airport.departure_airport.as_deref() {
            if !descriptor.first_fix().eq_ignore_ascii_case(departure) {
                return Err(FmsError::WrongAirport {
                    procedure,
                    airport: departure.to_string(),
                });
            }
        }

        let placeholder = self.leg(0).is_some_and(|first| {
            first.kind() == LegKind::Manual && self.airport.is_departure_airport(first.route())
        });
        match self.position_of_kind(LegKind::Sid, 0) {
            Some(index) => self.replace_leg(index, leg),
            None if placeholder => self.replace_leg(0, leg),
            None => self.prepend_leg(leg),
        }

        tracing::info!(procedure = %procedure, "Departure procedure assigned");
        Ok(procedure)
    }

    /// Assign a STAR given as `ENTRY.STAR.AIRPORT`; returns the procedure name.
    ///
    /// Replaces an existing STAR leg, otherwise goes in front of any approach
    /// leg, otherwise at the end of the plan.
    pub fn assign_arrival_procedure(&mut self, route: &str) -> Result<String> {
        let (descriptor, leg) = self.single_procedure_leg(route, ProcedureKind::Star)?;
        let procedure = leg.procedure_name().unwrap_or_default().to_string();

        if let Some(arrival) = self.airport.arrival_airport.as_deref() {
            if !descriptor.last_fix().eq_ignore_ascii_case(arrival) {
                return Err(FmsError::WrongAirport {
                    procedure,
                    airport: arrival.to_string(),
                });
            }
        }

        match (
            self.position_of_kind(LegKind::Star, 0),
            self.position_of_kind(LegKind::Approach, 0),
        ) {
            (Some(index), _) => self.replace_leg(index, leg),
            (None, Some(index)) => self.insert_leg(index, leg),
            (None, None) => self.append_leg(leg),
        }

        tracing::info!(procedure = %procedure, "Arrival procedure assigned");
        Ok(procedure)
    }

    /// Clear the aircraft for an approach to `runway` at the arrival airport.
    /// Also makes it the arrival runway, regenerating any STAR.
    pub fn assign_approach(&mut self, runway: &str) -> Result<String> {
        let airport = self
            .airport
            .arrival_airport
            .clone()
            .ok_or(FmsError::NoArrivalAirport)?;
        let leg = Leg::approach(&airport, runway, self.lookup.as_ref())?;
        self.set_arrival_runway(runway)?;

        match self.position_of_kind(LegKind::Approach, 0) {
            Some(index) => self.replace_leg(index, leg),
            None => self.append_leg(leg),
        }

        let runway = runway.to_uppercase();
        tracing::info!(airport = %airport, runway = %runway, "Approach assigned");
        Ok(runway)
    }

    /// Make `runway` the departure runway, regenerating the SID and the
    /// runway-heading vector leg.
    pub fn set_departure_runway(&mut self, runway: &str) -> Result<()> {
        let airport = self.airport.departure_airport.clone().unwrap_or_default();
        if self.lookup.runway(&airport, runway).is_none() {
            return Err(FmsError::UnknownRunway { airport, runway: runway.to_string() });
        }
        self.airport.departure_runway = Some(runway.to_uppercase());
        self.regenerate_legs(|leg, airport| match leg.kind() {
            LegKind::Sid => true,
            LegKind::Manual => airport.is_departure_airport(leg.route()),
            _ => false,
        })
    }

    pub fn set_arrival_runway(&mut self, runway: &str) -> Result<()> {
        let airport = self.airport.arrival_airport.clone().unwrap_or_default();
        if self.lookup.runway(&airport, runway).is_none() {
            return Err(FmsError::UnknownRunway { airport, runway: runway.to_string() });
        }
        self.airport.arrival_runway = Some(runway.to_uppercase());
        self.regenerate_legs(|leg, _| leg.kind() == LegKind::Star)
    }

    /// Regenerate the legs `affected` selects after a context change. Issued
    /// targets and holds survive, and the cursor stays on the same waypoint
    /// when the regenerated leg still has it.
    fn regenerate_legs(
        &mut self,
        affected: impl Fn(&Leg, &AirportContext) -> bool,
    ) -> Result<()> {
        let previous = self.current_waypoint().cloned();

        let ctx = LegContext {
            airport: &self.airport,
            profile: &self.profile,
            config: &self.config,
        };
        let lookup = self.lookup.as_ref();
        for (index, id) in self.order.iter().enumerate() {
            let Some(leg) = self.arena.get_mut(*id) else {
                continue;
            };
            if !affected(leg, ctx.airport) {
                continue;
            }

            let tracked = if index == self.cursor.leg { self.cursor.waypoint } else { 0 };
            let moved_to = leg.regenerate(&ctx, lookup, tracked)?;
            if index == self.cursor.leg {
                self.cursor.waypoint = moved_to;
            }
        }

        self.backfill_current(previous);
        self.refresh_following();
        Ok(())
    }

    /// Set the current SID's targets for a climb to the filed altitude.
    /// Returns the SID name.
    pub fn apply_climb_via(&mut self) -> Result<String> {
        let leg = self.current_leg().ok_or(FmsError::EmptyFlightPlan)?;
        if leg.kind() != LegKind::Sid {
            return Err(FmsError::NotOnDepartureProcedure);
        }
        let procedure = leg.procedure_name().unwrap_or_default().to_string();

        let altitude = self.flight_plan_altitude.min(self.profile.service_ceiling_ft);
        let speed = self.profile.cruise_speed_kt;
        let cursor = self.cursor;
        if let Some(leg) = self.leg_mut(cursor.leg) {
            vertical::apply_climb(leg.waypoints_mut(), altitude, speed);
        }

        tracing::debug!(procedure = %procedure, altitude, "Climb via SID");
        Ok(procedure)
    }

    /// Set the upcoming STAR's targets for a descent that starts from the
    /// current waypoint's targets, or the aircraft's when those are unset.
    /// Returns the STAR name.
    pub fn apply_descend_via(&mut self, state: &AircraftState) -> Result<String> {
        if self.order.is_empty() {
            return Err(FmsError::EmptyFlightPlan);
        }
        let star_index = self
            .position_of_kind(LegKind::Star, self.cursor.leg)
            .ok_or(FmsError::NoArrivalProcedure)?;

        let current = self.current_waypoint();
        let altitude = current
            .and_then(|wp| wp.altitude)
            .map_or(state.altitude_ft, |a| a.value);
        let speed = current
            .and_then(|wp| wp.speed)
            .map_or(state.speed_kt, |s| s.value);
        let from = if star_index == self.cursor.leg { self.cursor.waypoint } else { 0 };

        let mut procedure = String::new();
        if let Some(leg) = self.leg_mut(star_index) {
            procedure = leg.procedure_name().unwrap_or_default().to_string();
            vertical::apply_descent(&mut leg.waypoints_mut()[from..], altitude, speed);
        }

        tracing::debug!(procedure = %procedure, altitude, speed, "Descend via STAR");
        Ok(procedure)
    }

    // ========== DIRECT-TO AND HOLDS ==========

    /// Fly direct to `fix_name`: skip ahead when it is in the plan, otherwise
    /// insert it as a new leg at the cursor.
    pub fn direct_to(&mut self, fix_name: &str) -> Result<()> {
        if self.skip_to_fix(fix_name) {
            return Ok(());
        }
        let leg = Leg::single_fix(fix_name, self.lookup.as_ref())?;
        self.insert_leg_here(leg);
        Ok(())
    }

    /// Hold at `fix_name`, or over the present position when `None`.
    pub fn enter_hold(
        &mut self,
        fix_name: Option<&str>,
        turn_direction: Option<TurnDirection>,
        leg_length: Option<HoldLegLength>,
        state: &AircraftState,
    ) -> Result<HoldParameters> {
        let mut hold = HoldParameters {
            turn_direction: turn_direction.unwrap_or(self.config.hold_turn_direction),
            leg_length: leg_length.unwrap_or(self.config.hold_leg_length),
            inbound_heading: None,
            timer: None,
        };

        match fix_name {
            Some(fix_name) => {
                self.direct_to(fix_name)?;
                hold.inbound_heading = self
                    .current_waypoint()
                    .and_then(Waypoint::position)
                    .map(|fix| state.position.heading_to(&fix));
                if let Some(current) = self.current_waypoint_mut() {
                    current.activate_hold(hold);
                }
            }
            None => {
                hold.inbound_heading = Some(state.heading);
                self.insert_waypoint_here(Waypoint::hold_at(state.position, hold));
            }
        }

        tracing::debug!(fix = ?fix_name, "Hold entered");
        Ok(hold)
    }

    /// Leave the hold at the current waypoint. A present-position hold is
    /// skipped entirely; a hold at a fix continues on to the fix.
    pub fn exit_hold(&mut self) -> Result<()> {
        let current = self.current_waypoint_mut().ok_or(FmsError::EmptyFlightPlan)?;
        if !current.is_hold() {
            return Err(FmsError::NotHolding);
        }
        current.cancel_hold();
        let unnamed = current.fix_name().is_none();

        if unnamed {
            self.next_waypoint();
        }
        Ok(())
    }

    // ========== QUERIES ==========

    fn indexed_waypoints(&self) -> impl Iterator<Item = (WaypointIndex, &Waypoint)> + '_ {
        self.legs()
            .enumerate()
            .flat_map(|(leg_index, leg)| {
                leg.waypoints()
                    .iter()
                    .enumerate()
                    .map(move |(waypoint_index, waypoint)| (leg_index, waypoint_index, waypoint))
            })
            .enumerate()
            .map(|(flat, (leg, waypoint, wp))| (WaypointIndex { flat, leg, waypoint }, wp))
    }

    /// All waypoints of all legs in flight order.
    pub fn waypoints(&self) -> impl Iterator<Item = &Waypoint> + '_ {
        self.legs().flat_map(|leg| leg.waypoints().iter())
    }

    pub fn waypoint_count(&self) -> usize {
        self.legs().map(Leg::len).sum()
    }

    /// Display names of every waypoint in flight order.
    pub fn fixes(&self) -> Vec<String> {
        self.waypoints().map(ToString::to_string).collect()
    }

    pub fn has_waypoint(&self, fix_name: &str) -> bool {
        self.index_of_waypoint(fix_name).is_some()
    }

    pub fn index_of_waypoint(&self, fix_name: &str) -> Option<WaypointIndex> {
        self.index_of_waypoint_from(fix_name, 0)
    }

    fn index_of_waypoint_from(&self, fix_name: &str, from_flat: usize) -> Option<WaypointIndex> {
        self.indexed_waypoints()
            .skip(from_flat)
            .find(|(_, waypoint)| waypoint.is_named(fix_name))
            .map(|(index, _)| index)
    }

    pub fn index_of_current_waypoint(&self) -> Option<WaypointIndex> {
        if self.order.is_empty() {
            return None;
        }
        let before: usize = self.legs().take(self.cursor.leg).map(Leg::len).sum();
        Some(WaypointIndex {
            flat: before + self.cursor.waypoint,
            leg: self.cursor.leg,
            waypoint: self.cursor.waypoint,
        })
    }

    /// True when the current waypoint is the final one of the plan.
    pub fn at_last_waypoint(&self) -> bool {
        self.index_of_current_waypoint()
            .is_some_and(|index| index.flat + 1 == self.waypoint_count())
    }

    /// Distance from `position` to the current waypoint, when it has a position.
    pub fn distance_to_current_waypoint_m(&self, position: &Coordinate) -> Option<f64> {
        let target = self.current_waypoint()?.position()?;
        Some(position.distance_to(&target))
    }

    /// The plan as a canonical route string. Approach legs are not part of
    /// the route grammar and are left out.
    pub fn flight_plan_route(&self) -> String {
        let mut descriptors: Vec<SegmentDescriptor> = self
            .legs()
            .filter(|leg| leg.kind() != LegKind::Approach)
            .filter_map(|leg| route::parse_syntax(leg.route()).ok())
            .flatten()
            .collect();
        route::join_chains(&mut descriptors);
        route::serialize(&descriptors)
    }
}
