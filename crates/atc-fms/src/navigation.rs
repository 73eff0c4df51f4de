//! Procedure and fix lookup shared by every aircraft of an airport session.
//!
//! [`ProcedureLookup`] is the seam the FMS depends on; [`NavigationLibrary`]
//! is the in-memory implementation loaded from airport JSON. The library is
//! read-only after load, so one `Arc<NavigationLibrary>` can back any number
//! of flight management systems without locking.

use crate::error::Result;
use crate::spatial::Coordinate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;

/// What kind of named route a procedure identifier refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcedureKind {
    Sid,
    Star,
    Airway,
}

/// One fix of a published procedure with its raw restriction token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureFix {
    pub fix_name: String,
    pub restriction: Option<String>,
}

impl ProcedureFix {
    pub fn new(fix_name: impl Into<String>, restriction: Option<&str>) -> Self {
        Self {
            fix_name: fix_name.into(),
            restriction: restriction.map(str::to_string),
        }
    }
}

/// A runway end: its magnetic heading and threshold position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Runway {
    pub heading: f64,
    pub threshold: Coordinate,
}

/// Navigation data consumed by route parsing and waypoint generation.
pub trait ProcedureLookup: Send + Sync {
    /// Ordered fixes of `procedure_id` flown from/to `runway` and ending at
    /// (SID) or starting from (STAR) `entry_or_exit`. Empty when the
    /// combination is not published.
    ///
    /// A STAR may also be entered at any fix along it, in which case the
    /// sequence starts at that fix.
    fn find_procedure_waypoints(
        &self,
        procedure_id: &str,
        runway: &str,
        entry_or_exit: &str,
    ) -> Vec<ProcedureFix>;

    /// Position of a fix or airport.
    fn find_fix_position(&self, fix_name: &str) -> Option<Coordinate>;

    fn has_airway(&self, airway_id: &str) -> bool;

    fn airway_fix_sequence(&self, airway_id: &str) -> Option<Vec<String>>;

    fn procedure_kind(&self, procedure_id: &str) -> Option<ProcedureKind>;

    fn runway(&self, airport: &str, runway: &str) -> Option<Runway>;
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawProcedureFix {
    Name(String),
    Restricted(String, String),
}

impl From<RawProcedureFix> for ProcedureFix {
    fn from(raw: RawProcedureFix) -> Self {
        match raw {
            RawProcedureFix::Name(name) => ProcedureFix::new(name.to_uppercase(), None),
            RawProcedureFix::Restricted(name, token) => {
                ProcedureFix::new(name.to_uppercase(), Some(&token))
            }
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProcedure {
    #[serde(default)]
    rwy: HashMap<String, Vec<RawProcedureFix>>,
    #[serde(default)]
    body: Vec<RawProcedureFix>,
    #[serde(default)]
    entry_points: HashMap<String, Vec<RawProcedureFix>>,
    #[serde(default)]
    exit_points: HashMap<String, Vec<RawProcedureFix>>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawAirport {
    position: Coordinate,
    #[serde(default)]
    runways: HashMap<String, Runway>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawLibrary {
    #[serde(default)]
    fixes: HashMap<String, Coordinate>,
    #[serde(default)]
    airports: HashMap<String, RawAirport>,
    #[serde(default)]
    sids: HashMap<String, RawProcedure>,
    #[serde(default)]
    stars: HashMap<String, RawProcedure>,
    #[serde(default)]
    airways: HashMap<String, Vec<String>>,
}

/// A published SID or STAR split into its runway, body and transition parts.
#[derive(Debug, Clone, Default)]
struct Procedure {
    rwy: HashMap<String, Vec<ProcedureFix>>,
    body: Vec<ProcedureFix>,
    entry_points: HashMap<String, Vec<ProcedureFix>>,
    exit_points: HashMap<String, Vec<ProcedureFix>>,
}

impl Procedure {
    fn from_raw(raw: RawProcedure) -> Self {
        Self {
            rwy: convert_segments(raw.rwy),
            body: raw.body.into_iter().map(ProcedureFix::from).collect(),
            entry_points: convert_segments(raw.entry_points),
            exit_points: convert_segments(raw.exit_points),
        }
    }

    /// Look up an optional segment: an empty map means the procedure has no
    /// such part, a missing key means the requested one is not published.
    fn segment<'a>(
        map: &'a HashMap<String, Vec<ProcedureFix>>,
        key: &str,
    ) -> Option<&'a [ProcedureFix]> {
        if map.is_empty() {
            return Some(&[]);
        }
        map.get(key).map(Vec::as_slice)
    }
}

fn convert_segments(
    raw: HashMap<String, Vec<RawProcedureFix>>,
) -> HashMap<String, Vec<ProcedureFix>> {
    raw.into_iter()
        .map(|(key, fixes)| {
            (
                key.to_uppercase(),
                fixes.into_iter().map(ProcedureFix::from).collect(),
            )
        })
        .collect()
}

/// Concatenate procedure parts, collapsing the fix shared at each joint.
fn join_segments(parts: &[&[ProcedureFix]]) -> Vec<ProcedureFix> {
    let mut joined: Vec<ProcedureFix> = Vec::new();
    for fix in parts.iter().flat_map(|part| part.iter()) {
        match joined.last_mut() {
            Some(last) if last.fix_name == fix.fix_name => {
                if last.restriction.is_none() {
                    last.restriction = fix.restriction.clone();
                }
            }
            _ => joined.push(fix.clone()),
        }
    }
    joined
}

/// The tail of `fixes` from the first one named `fix_name`.
fn starting_at(fixes: &[ProcedureFix], fix_name: &str) -> Option<Vec<ProcedureFix>> {
    let start = fixes.iter().position(|fix| fix.fix_name == fix_name)?;
    Some(fixes[start..].to_vec())
}

#[derive(Debug, Clone)]
struct Airport {
    position: Coordinate,
    runways: HashMap<String, Runway>,
}

/// In-memory navigation data for one airport session.
#[derive(Debug, Clone, Default)]
pub struct NavigationLibrary {
    fixes: HashMap<String, Coordinate>,
    airports: HashMap<String, Airport>,
    sids: HashMap<String, Procedure>,
    stars: HashMap<String, Procedure>,
    airways: HashMap<String, Vec<String>>,
}

impl NavigationLibrary {
    /// Parse navigation data from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawLibrary = serde_json::from_str(json)?;
        Ok(Self::from_raw(raw))
    }

    /// Parse navigation data from any reader (e.g. an open file).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let raw: RawLibrary = serde_json::from_reader(reader)?;
        Ok(Self::from_raw(raw))
    }

    /// Build from an already-parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let raw: RawLibrary = serde_json::from_value(value)?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawLibrary) -> Self {
        let library = Self {
            fixes: raw
                .fixes
                .into_iter()
                .map(|(name, position)| (name.to_uppercase(), position))
                .collect(),
            airports: raw
                .airports
                .into_iter()
                .map(|(icao, airport)| {
                    let runways = airport
                        .runways
                        .into_iter()
                        .map(|(name, runway)| (name.to_uppercase(), runway))
                        .collect();
                    (
                        icao.to_uppercase(),
                        Airport { position: airport.position, runways },
                    )
                })
                .collect(),
            sids: raw
                .sids
                .into_iter()
                .map(|(id, procedure)| (id.to_uppercase(), Procedure::from_raw(procedure)))
                .collect(),
            stars: raw
                .stars
                .into_iter()
                .map(|(id, procedure)| (id.to_uppercase(), Procedure::from_raw(procedure)))
                .collect(),
            airways: raw
                .airways
                .into_iter()
                .map(|(id, fixes)| {
                    (
                        id.to_uppercase(),
                        fixes.into_iter().map(|fix| fix.to_uppercase()).collect(),
                    )
                })
                .collect(),
        };

        tracing::debug!(
            fixes = library.fixes.len(),
            airports = library.airports.len(),
            sids = library.sids.len(),
            stars = library.stars.len(),
            airways = library.airways.len(),
            "Navigation library loaded"
        );

        library
    }

    pub fn fix_count(&self) -> usize {
        self.fixes.len()
    }

    /// Reference position of an airport, used as the airspace center.
    pub fn airport_position(&self, icao: &str) -> Option<Coordinate> {
        self.airports
            .get(&icao.to_uppercase())
            .map(|airport| airport.position)
    }
}

impl ProcedureLookup for NavigationLibrary {
    fn find_procedure_waypoints(
        &self,
        procedure_id: &str,
        runway: &str,
        entry_or_exit: &str,
    ) -> Vec<ProcedureFix> {
        let procedure_id = procedure_id.to_uppercase();
        let runway = runway.to_uppercase();
        let transition = entry_or_exit.to_uppercase();

        if let Some(sid) = self.sids.get(&procedure_id) {
            let parts = (
                Procedure::segment(&sid.rwy, &runway),
                Procedure::segment(&sid.exit_points, &transition),
            );
            return match parts {
                (Some(rwy), Some(exit)) => join_segments(&[rwy, &sid.body, exit]),
                _ => Vec::new(),
            };
        }

        if let Some(star) = self.stars.get(&procedure_id) {
            let Some(rwy) = Procedure::segment(&star.rwy, &runway) else {
                return Vec::new();
            };
            if let Some(entry) = Procedure::segment(&star.entry_points, &transition) {
                let fixes = join_segments(&[entry, &star.body, rwy]);
                return starting_at(&fixes, &transition).unwrap_or(fixes);
            }

            // joined part way along, e.g. after a reroute to one of its fixes
            let mut entries: Vec<_> = star.entry_points.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            return std::iter::once(join_segments(&[star.body.as_slice(), rwy]))
                .chain(
                    entries
                        .into_iter()
                        .map(|(_, entry)| join_segments(&[entry, &star.body, rwy])),
                )
                .find_map(|fixes| starting_at(&fixes, &transition))
                .unwrap_or_default();
        }

        Vec::new()
    }

    fn find_fix_position(&self, fix_name: &str) -> Option<Coordinate> {
        let name = fix_name.to_uppercase();
        self.fixes
            .get(&name)
            .copied()
            .or_else(|| self.airports.get(&name).map(|airport| airport.position))
    }

    fn has_airway(&self, airway_id: &str) -> bool {
        self.airways.contains_key(&airway_id.to_uppercase())
    }

    fn airway_fix_sequence(&self, airway_id: &str) -> Option<Vec<String>> {
        self.airways.get(&airway_id.to_uppercase()).cloned()
    }

    fn procedure_kind(&self, procedure_id: &str) -> Option<ProcedureKind> {
        let id = procedure_id.to_uppercase();
        if self.sids.contains_key(&id) {
            Some(ProcedureKind::Sid)
        } else if self.stars.contains_key(&id) {
            Some(ProcedureKind::Star)
        } else if self.airways.contains_key(&id) {
            Some(ProcedureKind::Airway)
        } else {
            None
        }
    }

    fn runway(&self, airport: &str, runway: &str) -> Option<Runway> {
        self.airports
            .get(&airport.to_uppercase())?
            .runways
            .get(&runway.to_uppercase())
            .copied()
    }
}
