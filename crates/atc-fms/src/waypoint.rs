//! A single navigation target within a leg.

use crate::restriction::{AltitudeConstraint, Restrictions, SpeedConstraint};
use crate::spatial::Coordinate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the aircraft navigates toward or through a waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NavigationMode {
    Fix,
    Heading,
    Hold,
    Runway,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnDirection {
    Left,
    Right,
}

impl fmt::Display for TurnDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnDirection::Left => write!(f, "left"),
            TurnDirection::Right => write!(f, "right"),
        }
    }
}

impl FromStr for TurnDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "l" | "left" => Ok(TurnDirection::Left),
            "r" | "right" => Ok(TurnDirection::Right),
            other => Err(format!("invalid turn direction `{other}`")),
        }
    }
}

/// Length of the outbound hold leg, either timed or by distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "lowercase")]
pub enum HoldLegLength {
    Minutes(f64),
    Miles(f64),
}

impl fmt::Display for HoldLegLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HoldLegLength::Minutes(minutes) => write!(f, "{minutes}min"),
            HoldLegLength::Miles(miles) => write!(f, "{miles}nm"),
        }
    }
}

impl FromStr for HoldLegLength {
    type Err = String;

    /// Accepts `1min`, `1.5min` or `5nm`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        let parse = |value: &str| {
            value
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v > 0.0)
                .ok_or_else(|| format!("invalid hold leg length `{s}`"))
        };

        if let Some(value) = lower.strip_suffix("min") {
            parse(value).map(HoldLegLength::Minutes)
        } else if let Some(value) = lower.strip_suffix("nm") {
            parse(value).map(HoldLegLength::Miles)
        } else {
            Err(format!("invalid hold leg length `{s}`"))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoldParameters {
    pub turn_direction: TurnDirection,
    pub leg_length: HoldLegLength,
    /// Inbound course in degrees; `None` means "the course used to arrive".
    pub inbound_heading: Option<f64>,
    /// Seconds remaining on the current hold leg, set by the kinematic layer.
    pub timer: Option<f64>,
}

/// A navigation target: fix identity, position and constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    fix_name: Option<String>,
    position: Option<Coordinate>,
    restrictions: Restrictions,
    pub navigation_mode: NavigationMode,
    /// Effective altitude target in feet; starts as the published restriction.
    pub altitude: Option<AltitudeConstraint>,
    /// Effective speed target in knots; starts as the published restriction.
    pub speed: Option<SpeedConstraint>,
    pub heading: Option<f64>,
    pub turn_direction: Option<TurnDirection>,
    pub hold: Option<HoldParameters>,
}

impl Waypoint {
    /// A waypoint flown to a named fix.
    pub fn fix(
        name: impl Into<String>,
        position: Option<Coordinate>,
        restrictions: Restrictions,
    ) -> Self {
        Self {
            fix_name: Some(name.into().to_uppercase()),
            position,
            altitude: restrictions.altitude.map(AltitudeConstraint::from),
            speed: restrictions.speed.map(SpeedConstraint::from),
            restrictions,
            navigation_mode: NavigationMode::Fix,
            heading: None,
            turn_direction: None,
            hold: None,
        }
    }

    /// A vector: fly a heading (or keep the present one when `None`).
    pub fn vector(heading: Option<f64>) -> Self {
        Self {
            fix_name: None,
            position: None,
            restrictions: Restrictions::default(),
            navigation_mode: NavigationMode::Heading,
            altitude: None,
            speed: None,
            heading,
            turn_direction: None,
            hold: None,
        }
    }

    /// Stand-in used when a leg could not produce any waypoint.
    pub fn placeholder() -> Self {
        Self::vector(None)
    }

    /// Runway threshold target for an approach.
    pub fn runway(designator: impl Into<String>, threshold: Coordinate, heading: f64) -> Self {
        Self {
            fix_name: Some(format!("RW{}", designator.into().to_uppercase())),
            position: Some(threshold),
            restrictions: Restrictions::default(),
            navigation_mode: NavigationMode::Runway,
            altitude: None,
            speed: None,
            heading: Some(heading),
            turn_direction: None,
            hold: None,
        }
    }

    /// An unnamed hold over an arbitrary position.
    pub fn hold_at(position: Coordinate, hold: HoldParameters) -> Self {
        Self {
            fix_name: None,
            position: Some(position),
            restrictions: Restrictions::default(),
            navigation_mode: NavigationMode::Hold,
            altitude: None,
            speed: None,
            heading: hold.inbound_heading,
            turn_direction: Some(hold.turn_direction),
            hold: Some(hold),
        }
    }

    pub fn fix_name(&self) -> Option<&str> {
        self.fix_name.as_deref()
    }

    pub fn position(&self) -> Option<Coordinate> {
        self.position
    }

    /// Restrictions as published by the procedure this waypoint came from.
    pub fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.fix_name
            .as_deref()
            .is_some_and(|fix| fix.eq_ignore_ascii_case(name))
    }

    pub fn is_hold(&self) -> bool {
        self.navigation_mode == NavigationMode::Hold
    }

    /// Carry the previous target's altitude, speed and heading into any that
    /// are unset here.
    pub fn backfill_from(&mut self, previous: &Waypoint) {
        if self.altitude.is_none() {
            self.altitude = previous.altitude;
        }
        if self.speed.is_none() {
            self.speed = previous.speed;
        }
        if self.heading.is_none() {
            self.heading = previous.heading;
        }
    }

    /// Take over what was issued on `previous`, the same fix before its leg
    /// was regenerated. Targets still equal to the published restriction are
    /// left to the new data.
    pub(crate) fn carry_assignments_from(&mut self, previous: &Waypoint) {
        let published = previous.restrictions;
        if previous.altitude != published.altitude.map(AltitudeConstraint::from) {
            self.altitude = previous.altitude;
        }
        if previous.speed != published.speed.map(SpeedConstraint::from) {
            self.speed = previous.speed;
        }
        if let Some(hold) = previous.hold {
            self.activate_hold(hold);
        }
    }

    pub fn activate_hold(&mut self, hold: HoldParameters) {
        self.navigation_mode = NavigationMode::Hold;
        self.turn_direction = Some(hold.turn_direction);
        if hold.inbound_heading.is_some() {
            self.heading = hold.inbound_heading;
        }
        self.hold = Some(hold);
    }

    pub fn cancel_hold(&mut self) {
        self.hold = None;
        self.turn_direction = None;
        self.navigation_mode = if self.fix_name.is_some() {
            NavigationMode::Fix
        } else {
            NavigationMode::Heading
        };
    }
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.fix_name, self.heading) {
            (Some(name), _) => f.write_str(name),
            (None, Some(heading)) => write!(f, "HDG{:03.0}", heading),
            (None, None) => f.write_str("VECTOR"),
        }
    }
}
