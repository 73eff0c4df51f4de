//! Dotted route strings.
//!
//! A route is a list of segments separated by `..` (a direct-to break).
//! Inside a segment tokens are separated by `.` and are either a single fix
//! (`SXC`) or a chain of procedure links (`KSFO.OFFSH9.SXC.V458.IPL`), which
//! is chopped into `ENTRY.PROC.EXIT` triples sharing their joining fix.

use crate::error::RouteError;
use crate::navigation::{ProcedureKind, ProcedureLookup};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SEGMENT_SEPARATOR: &str = "..";
pub const TOKEN_SEPARATOR: char = '.';

/// One parsed piece of a route.
///
/// `direct` is true when the descriptor opens a new `..` segment; chained
/// links after the first in a segment carry `direct: false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SegmentDescriptor {
    Fix {
        name: String,
        direct: bool,
    },
    Link {
        entry: String,
        procedure: String,
        exit: String,
        direct: bool,
    },
}

impl SegmentDescriptor {
    pub fn fix(name: impl Into<String>) -> Self {
        SegmentDescriptor::Fix { name: name.into().to_uppercase(), direct: true }
    }

    pub fn link(
        entry: impl Into<String>,
        procedure: impl Into<String>,
        exit: impl Into<String>,
    ) -> Self {
        SegmentDescriptor::Link {
            entry: entry.into().to_uppercase(),
            procedure: procedure.into().to_uppercase(),
            exit: exit.into().to_uppercase(),
            direct: true,
        }
    }

    pub fn is_direct(&self) -> bool {
        match self {
            SegmentDescriptor::Fix { direct, .. } | SegmentDescriptor::Link { direct, .. } => {
                *direct
            }
        }
    }

    pub fn first_fix(&self) -> &str {
        match self {
            SegmentDescriptor::Fix { name, .. } => name,
            SegmentDescriptor::Link { entry, .. } => entry,
        }
    }

    pub fn last_fix(&self) -> &str {
        match self {
            SegmentDescriptor::Fix { name, .. } => name,
            SegmentDescriptor::Link { exit, .. } => exit,
        }
    }

    /// The descriptor on its own, e.g. `KSFO.OFFSH9.SXC`.
    pub fn route_string(&self) -> String {
        match self {
            SegmentDescriptor::Fix { name, .. } => name.clone(),
            SegmentDescriptor::Link { entry, procedure, exit, .. } => {
                format!("{entry}.{procedure}.{exit}")
            }
        }
    }
}

impl fmt::Display for SegmentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.route_string())
    }
}

/// Split a route into descriptors without consulting navigation data.
pub fn parse_syntax(route: &str) -> Result<Vec<SegmentDescriptor>, RouteError> {
    if route.chars().any(char::is_whitespace) {
        return Err(RouteError::ContainsWhitespace(route.to_string()));
    }
    if route.is_empty() {
        return Err(RouteError::EmptyRoute);
    }

    let route = route.to_uppercase();
    let mut descriptors = Vec::new();

    for segment in route.split(SEGMENT_SEPARATOR) {
        let tokens: Vec<&str> = segment.split(TOKEN_SEPARATOR).collect();
        if tokens.iter().any(|token| token.is_empty()) {
            return Err(RouteError::EmptySegment(route.clone()));
        }

        match tokens.len() {
            1 => descriptors.push(SegmentDescriptor::Fix {
                name: tokens[0].to_string(),
                direct: true,
            }),
            n if n % 2 == 0 => return Err(RouteError::EvenTokenCount(segment.to_string())),
            _ => descriptors.extend(chop_links(&tokens)),
        }
    }

    Ok(descriptors)
}

/// Chop `A.P1.B.P2.C` into `A.P1.B` and `B.P2.C`, advancing two tokens at a time.
fn chop_links(tokens: &[&str]) -> Vec<SegmentDescriptor> {
    (0..tokens.len().saturating_sub(2))
        .step_by(2)
        .map(|i| SegmentDescriptor::Link {
            entry: tokens[i].to_string(),
            procedure: tokens[i + 1].to_string(),
            exit: tokens[i + 2].to_string(),
            direct: i == 0,
        })
        .collect()
}

/// Parse a route and validate every fix and procedure against `lookup`.
pub fn parse(
    route: &str,
    lookup: &dyn ProcedureLookup,
) -> Result<Vec<SegmentDescriptor>, RouteError> {
    let descriptors = parse_syntax(route)?;
    for descriptor in &descriptors {
        validate(descriptor, lookup)?;
    }
    Ok(descriptors)
}

fn validate(
    descriptor: &SegmentDescriptor,
    lookup: &dyn ProcedureLookup,
) -> Result<(), RouteError> {
    match descriptor {
        SegmentDescriptor::Fix { name, .. } => {
            if lookup.find_fix_position(name).is_none() {
                return Err(RouteError::UnknownFix(name.clone()));
            }
        }
        SegmentDescriptor::Link { entry, procedure, exit, .. } => {
            for fix in [entry, exit] {
                if lookup.find_fix_position(fix).is_none() {
                    return Err(RouteError::UnknownFix(fix.clone()));
                }
            }

            let kind = lookup
                .procedure_kind(procedure)
                .ok_or_else(|| RouteError::UnknownProcedure(procedure.clone()))?;

            if kind == ProcedureKind::Airway {
                let sequence = lookup
                    .airway_fix_sequence(procedure)
                    .ok_or_else(|| RouteError::UnknownProcedure(procedure.clone()))?;
                for fix in [entry, exit] {
                    if !sequence.iter().any(|candidate| candidate == fix) {
                        return Err(RouteError::FixNotOnAirway {
                            airway: procedure.clone(),
                            fix: fix.clone(),
                        });
                    }
                }
            }
        }
    }
    Ok(())
}

/// Render descriptors back into a route string; the inverse of [`parse_syntax`].
pub fn serialize(descriptors: &[SegmentDescriptor]) -> String {
    let mut route = String::new();
    let mut previous_exit: Option<&str> = None;

    for descriptor in descriptors {
        let chained = !descriptor.is_direct()
            && matches!(descriptor, SegmentDescriptor::Link { .. })
            && previous_exit == Some(descriptor.first_fix());

        if chained {
            if let SegmentDescriptor::Link { procedure, exit, .. } = descriptor {
                route.push(TOKEN_SEPARATOR);
                route.push_str(procedure);
                route.push(TOKEN_SEPARATOR);
                route.push_str(exit);
            }
        } else {
            if !route.is_empty() {
                route.push_str(SEGMENT_SEPARATOR);
            }
            route.push_str(&descriptor.route_string());
        }

        previous_exit = Some(descriptor.last_fix());
    }

    route
}

/// Mark every link that starts where the previous link ended as chained, so
/// [`serialize`] joins them into one dotted segment.
pub fn join_chains(descriptors: &mut [SegmentDescriptor]) {
    for i in 1..descriptors.len() {
        let SegmentDescriptor::Link { exit: previous_exit, .. } = &descriptors[i - 1] else {
            continue;
        };
        let previous_exit = previous_exit.clone();
        if let SegmentDescriptor::Link { entry, direct, .. } = &mut descriptors[i] {
            if *entry == previous_exit {
                *direct = false;
            }
        }
    }
}

/// Flatten descriptors into the ordered fix names they name, collapsing the
/// fix shared by consecutive descriptors.
pub fn fix_sequence(descriptors: &[SegmentDescriptor]) -> Vec<String> {
    let mut fixes: Vec<String> = Vec::new();
    for descriptor in descriptors {
        for fix in [descriptor.first_fix(), descriptor.last_fix()] {
            if fixes.last().map(String::as_str) != Some(fix) {
                fixes.push(fix.to_string());
            }
        }
    }
    fixes
}
