//! Turns command results into the `{success, message: {log, say}}` pair the UI
//! layer reads back to the controller.
//!
//! `log` is the written strip/log text; `say` is the spoken pilot read-back,
//! with fix and procedure names spelled the way they are spoken.

use crate::error::{FmsError, RouteError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadBack {
    pub log: String,
    pub say: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutcome {
    pub success: bool,
    pub message: ReadBack,
}

impl CommandOutcome {
    pub fn is_success(&self) -> bool {
        self.success
    }
}

/// A successful read-back; `say` falls back to `log` when empty.
pub fn success(log: impl Into<String>, say: impl Into<String>) -> CommandOutcome {
    let log = log.into();
    let mut say = say.into();
    if say.is_empty() {
        say = log.to_lowercase();
    }
    CommandOutcome {
        success: true,
        message: ReadBack { log, say },
    }
}

/// A failed read-back that did not come from the FMS, e.g. an unknown command.
pub fn unable(log: impl Into<String>, say: impl Into<String>) -> CommandOutcome {
    CommandOutcome {
        success: false,
        message: ReadBack {
            log: log.into(),
            say: say.into(),
        },
    }
}

/// A failed read-back naming the offending token, if any.
pub fn failure(error: &FmsError) -> CommandOutcome {
    CommandOutcome {
        success: false,
        message: ReadBack {
            log: error.to_string(),
            say: spoken_failure(error),
        },
    }
}

fn spoken_failure(error: &FmsError) -> String {
    match error {
        FmsError::Route(RouteError::UnknownFix(fix)) | FmsError::UnknownFix(fix) => {
            format!("unable, we don't have {} in our database", spell(fix))
        }
        FmsError::Route(RouteError::UnknownProcedure(name)) | FmsError::UnknownProcedure(name) => {
            format!("unable, we don't have the {} procedure", spell(name))
        }
        FmsError::Route(_) => "unable, say again the route".to_string(),
        FmsError::UnknownRunway { runway, .. } => {
            format!("unable, we don't know runway {}", spell(runway))
        }
        FmsError::NoDepartureRunway => "unable, we haven't been assigned a runway".to_string(),
        FmsError::NoArrivalRunway | FmsError::NoArrivalAirport => {
            "unable, we haven't been told where we're landing".to_string()
        }
        FmsError::WrongProcedureKind { procedure, expected } => {
            format!("unable, {} is not a {}", spell(procedure), expected.to_lowercase())
        }
        FmsError::WrongAirport { procedure, airport } => {
            format!("unable, {} is not valid for {}", spell(procedure), spell(airport))
        }
        FmsError::NotSingleProcedure(_) => "unable, say again the procedure".to_string(),
        FmsError::NotOnDepartureProcedure => {
            "unable to climb via the SID, we're not on one".to_string()
        }
        FmsError::NoArrivalProcedure => {
            "unable to descend via the STAR, we don't have one".to_string()
        }
        FmsError::EmptyFlightPlan => "unable, we have no route".to_string(),
        FmsError::NotHolding => "we're not holding".to_string(),
        FmsError::InvalidLegKind(_) | FmsError::NavData(_) => "say again".to_string(),
    }
}

/// Spell an identifier the way it is read over the radio: letters stay as
/// words (fix names are pronounceable), digits are read one by one.
pub fn spell(name: &str) -> String {
    let mut spoken = String::new();
    let mut letters = String::new();

    let flush = |letters: &mut String, spoken: &mut String| {
        if !letters.is_empty() {
            if !spoken.is_empty() {
                spoken.push(' ');
            }
            spoken.push_str(&letters.to_lowercase());
            letters.clear();
        }
    };

    for c in name.chars() {
        match c.to_digit(10) {
            Some(digit) => {
                flush(&mut letters, &mut spoken);
                if !spoken.is_empty() {
                    spoken.push(' ');
                }
                spoken.push_str(DIGIT_WORDS[digit as usize]);
            }
            None => letters.push(c),
        }
    }
    flush(&mut letters, &mut spoken);
    spoken
}

const DIGIT_WORDS: [&str; 10] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "niner",
];
