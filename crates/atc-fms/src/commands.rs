//! Controller instructions, one method per command.
//!
//! Each method runs the matching domain operation and reports the result as a
//! [`CommandOutcome`]. A failed command leaves the flight plan unchanged.

use crate::context::AircraftState;
use crate::fms::{AmendmentMode, FlightManagementSystem};
use crate::readback::{self, spell, CommandOutcome};
use crate::waypoint::{HoldLegLength, TurnDirection};

impl FlightManagementSystem {
    /// "Proceed direct SXC".
    pub fn proceed_direct(&mut self, fix_name: &str) -> CommandOutcome {
        let fix = fix_name.to_uppercase();
        match self.direct_to(&fix) {
            Ok(()) => readback::success(
                format!("Direct {fix}"),
                format!("proceed direct {}", spell(&fix)),
            ),
            Err(e) => readback::failure(&e),
        }
    }

    /// "Cleared to IPL via ..." (replace) or a partial reroute (merge).
    pub fn apply_new_route(&mut self, route: &str, mode: AmendmentMode) -> CommandOutcome {
        match self.amend_route(route, mode) {
            Ok(()) => {
                let route = self.flight_plan_route();
                let say = match mode {
                    AmendmentMode::Replace => "rerouted, cleared as filed",
                    AmendmentMode::Merge => "rerouted, route amended",
                };
                readback::success(format!("Route: {route}"), say)
            }
            Err(e) => readback::failure(&e),
        }
    }

    /// Assign a SID, e.g. `KSFO.OFFSH9.SXC`.
    pub fn apply_departure_procedure(&mut self, route: &str) -> CommandOutcome {
        match self.assign_departure_procedure(route) {
            Ok(procedure) => readback::success(
                format!("Cleared {procedure} departure"),
                format!("cleared the {} departure", spell(&procedure)),
            ),
            Err(e) => readback::failure(&e),
        }
    }

    /// Assign a STAR, e.g. `BDEGA.BDEGA3.KSFO`.
    pub fn apply_arrival_procedure(&mut self, route: &str) -> CommandOutcome {
        match self.assign_arrival_procedure(route) {
            Ok(procedure) => readback::success(
                format!("Cleared {procedure} arrival"),
                format!("cleared the {} arrival", spell(&procedure)),
            ),
            Err(e) => readback::failure(&e),
        }
    }

    pub fn apply_instrument_approach(&mut self, runway: &str) -> CommandOutcome {
        match self.assign_approach(runway) {
            Ok(runway) => readback::success(
                format!("Cleared ILS {runway}"),
                format!("cleared ILS runway {}", spell(&runway)),
            ),
            Err(e) => readback::failure(&e),
        }
    }

    pub fn climb_via_procedure(&mut self) -> CommandOutcome {
        match self.apply_climb_via() {
            Ok(procedure) => readback::success(
                format!("Climb via {procedure}"),
                format!("climb via the {} departure", spell(&procedure)),
            ),
            Err(e) => readback::failure(&e),
        }
    }

    pub fn descend_via_procedure(&mut self, state: &AircraftState) -> CommandOutcome {
        match self.apply_descend_via(state) {
            Ok(procedure) => readback::success(
                format!("Descend via {procedure}"),
                format!("descend via the {} arrival", spell(&procedure)),
            ),
            Err(e) => readback::failure(&e),
        }
    }

    /// Hold at `fix_name`, or over the present position when `None`.
    pub fn initiate_hold(
        &mut self,
        fix_name: Option<&str>,
        turn_direction: Option<TurnDirection>,
        leg_length: Option<HoldLegLength>,
        state: &AircraftState,
    ) -> CommandOutcome {
        match self.enter_hold(fix_name, turn_direction, leg_length, state) {
            Ok(hold) => {
                let place = fix_name.map_or_else(
                    || "present position".to_string(),
                    |fix| fix.to_uppercase(),
                );
                let spoken_place = fix_name.map_or_else(|| "present position".to_string(), spell);
                readback::success(
                    format!("Hold {place} {} turns {}", hold.turn_direction, hold.leg_length),
                    format!(
                        "hold at {spoken_place}, {} turns, {} legs",
                        hold.turn_direction,
                        spoken_leg_length(hold.leg_length)
                    ),
                )
            }
            Err(e) => readback::failure(&e),
        }
    }

    pub fn cancel_hold(&mut self) -> CommandOutcome {
        match self.exit_hold() {
            Ok(()) => {
                let next = self
                    .current_waypoint()
                    .map(ToString::to_string)
                    .unwrap_or_default();
                readback::success(
                    format!("Cancel hold, continue to {next}"),
                    format!("cancel the hold, continue to {}", spell(&next)),
                )
            }
            Err(e) => readback::failure(&e),
        }
    }
}

fn spoken_leg_length(length: HoldLegLength) -> String {
    match length {
        HoldLegLength::Minutes(minutes) if minutes == 1.0 => "one minute".to_string(),
        HoldLegLength::Minutes(minutes) => format!("{minutes} minute"),
        HoldLegLength::Miles(miles) => format!("{miles} mile"),
    }
}
