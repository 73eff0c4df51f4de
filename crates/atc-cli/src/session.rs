//! Controller command parsing and dispatch.

use anyhow::{bail, Result};
use atc_fms::readback::{self, spell};
use atc_fms::{
    AircraftState, AmendmentMode, CommandOutcome, FlightManagementSystem, HoldLegLength,
    TurnDirection,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One typed instruction, e.g. `hold SXC left 1min`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub name: String,
    pub args: Vec<String>,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut words = s.split_whitespace();
        let Some(name) = words.next() else {
            bail!("empty command");
        };
        Ok(Self {
            name: name.to_ascii_lowercase(),
            args: words.map(str::to_string).collect(),
        })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Run `command` against the aircraft's FMS and return its read-back.
///
/// `state` is the aircraft's sampled altitude/speed/position, needed by
/// descend-via and present-position holds.
pub fn dispatch(
    fms: &mut FlightManagementSystem,
    command: &Command,
    state: &AircraftState,
) -> CommandOutcome {
    tracing::debug!(command = %command, "Dispatching command");

    let arg = command.args.first().map(String::as_str);
    match (command.name.as_str(), arg) {
        ("direct" | "dct", Some(fix)) => fms.proceed_direct(fix),
        ("route", Some(route)) => fms.apply_new_route(route, AmendmentMode::Replace),
        ("reroute" | "rr", Some(route)) => fms.apply_new_route(route, AmendmentMode::Merge),
        ("sid", Some(route)) => fms.apply_departure_procedure(route),
        ("star", Some(route)) => fms.apply_arrival_procedure(route),
        ("ils" | "i", Some(runway)) => fms.apply_instrument_approach(runway),
        ("cvs", None) => fms.climb_via_procedure(),
        ("dvs", None) => fms.descend_via_procedure(state),
        ("hold", _) => hold(fms, &command.args, state),
        ("cancelhold" | "nohold", None) => fms.cancel_hold(),
        ("next", None) => next(fms),
        (name, _) => {
            tracing::warn!(command = %command, "Unrecognised command");
            readback::unable(format!("Unrecognised command `{name}`"), "say again")
        }
    }
}

/// `hold [FIX] [left|right] [1min|5nm]`, arguments in any order.
fn hold(fms: &mut FlightManagementSystem, args: &[String], state: &AircraftState) -> CommandOutcome {
    let mut fix = None;
    let mut turn = None;
    let mut leg_length = None;

    for arg in args {
        if let Ok(direction) = arg.parse::<TurnDirection>() {
            turn = Some(direction);
        } else if let Ok(length) = arg.parse::<HoldLegLength>() {
            leg_length = Some(length);
        } else if fix.is_none() {
            fix = Some(arg.as_str());
        } else {
            return readback::unable(format!("Unexpected hold argument `{arg}`"), "say again the hold");
        }
    }

    fms.initiate_hold(fix, turn, leg_length, state)
}

fn next(fms: &mut FlightManagementSystem) -> CommandOutcome {
    if !fms.next_waypoint() {
        return readback::unable("End of route", "end of route, continuing present heading");
    }
    let current = fms
        .current_waypoint()
        .map(ToString::to_string)
        .unwrap_or_default();
    readback::success(format!("Next {current}"), spell(&current))
}
