//! Compact altitude/speed restriction tokens attached to procedure fixes.
//!
//! Tokens look like `A80+|S210`: an `A` piece is an altitude in hundreds of
//! feet, an `S` piece is a speed in knots, and an optional trailing `+`/`-`
//! turns the restriction into at-or-above/at-or-below. Decoding never fails;
//! a malformed piece simply yields no restriction for its field.

use serde::{Deserialize, Serialize};
use std::fmt;

const PIECE_SEPARATOR: char = '|';
const FEET_PER_ALTITUDE_UNIT: f64 = 100.0;

/// How a restriction value bounds the target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Qualifier {
    #[default]
    At,
    AtOrAbove,
    AtOrBelow,
}

impl Qualifier {
    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "" => Some(Qualifier::At),
            "+" => Some(Qualifier::AtOrAbove),
            "-" => Some(Qualifier::AtOrBelow),
            _ => None,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Qualifier::At => "",
            Qualifier::AtOrAbove => "+",
            Qualifier::AtOrBelow => "-",
        }
    }

    /// Whether `target` satisfies a restriction of this kind at `limit`.
    pub fn permits(self, target: f64, limit: f64) -> bool {
        match self {
            Qualifier::At => (target - limit).abs() < f64::EPSILON,
            Qualifier::AtOrAbove => target >= limit,
            Qualifier::AtOrBelow => target <= limit,
        }
    }
}

/// Decoded altitude piece, value in hundreds of feet as written in the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AltitudeRestriction {
    pub value: u32,
    pub qualifier: Qualifier,
}

impl AltitudeRestriction {
    pub fn feet(&self) -> f64 {
        f64::from(self.value) * FEET_PER_ALTITUDE_UNIT
    }
}

/// Decoded speed piece, value in knots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedRestriction {
    pub value: u32,
    pub qualifier: Qualifier,
}

/// Both halves of a decoded restriction token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restrictions {
    pub altitude: Option<AltitudeRestriction>,
    pub speed: Option<SpeedRestriction>,
}

impl Restrictions {
    pub fn is_empty(&self) -> bool {
        self.altitude.is_none() && self.speed.is_none()
    }
}

impl fmt::Display for Restrictions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self))
    }
}

/// Effective altitude target carried by a waypoint, in feet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AltitudeConstraint {
    pub value: f64,
    pub qualifier: Qualifier,
}

impl AltitudeConstraint {
    pub fn at(value: f64) -> Self {
        Self { value, qualifier: Qualifier::At }
    }
}

impl From<AltitudeRestriction> for AltitudeConstraint {
    fn from(restriction: AltitudeRestriction) -> Self {
        Self {
            value: restriction.feet(),
            qualifier: restriction.qualifier,
        }
    }
}

/// Effective speed target carried by a waypoint, in knots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedConstraint {
    pub value: f64,
    pub qualifier: Qualifier,
}

impl SpeedConstraint {
    pub fn at(value: f64) -> Self {
        Self { value, qualifier: Qualifier::At }
    }
}

impl From<SpeedRestriction> for SpeedConstraint {
    fn from(restriction: SpeedRestriction) -> Self {
        Self {
            value: f64::from(restriction.value),
            qualifier: restriction.qualifier,
        }
    }
}

/// Decode a restriction token such as `A80+|S210`.
///
/// Case-insensitive. When a field appears more than once the first
/// well-formed piece wins.
pub fn decode(token: &str) -> Restrictions {
    let mut restrictions = Restrictions::default();

    for piece in token.split(PIECE_SEPARATOR) {
        let Some((kind, value, qualifier)) = decode_piece(piece) else {
            continue;
        };

        match kind {
            'A' if restrictions.altitude.is_none() => {
                restrictions.altitude = Some(AltitudeRestriction { value, qualifier });
            }
            'S' if restrictions.speed.is_none() => {
                restrictions.speed = Some(SpeedRestriction { value, qualifier });
            }
            _ => {}
        }
    }

    restrictions
}

fn decode_piece(piece: &str) -> Option<(char, u32, Qualifier)> {
    let piece = piece.trim();
    let mut chars = piece.chars();
    let kind = chars.next()?.to_ascii_uppercase();
    if kind != 'A' && kind != 'S' {
        return None;
    }

    let rest = chars.as_str();
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let (digits, suffix) = rest.split_at(digits_end);
    if digits.is_empty() {
        return None;
    }

    let value = digits.parse().ok()?;
    let qualifier = Qualifier::from_suffix(suffix)?;
    Some((kind, value, qualifier))
}

/// Encode restrictions back into token form; empty when nothing is restricted.
pub fn encode(restrictions: &Restrictions) -> String {
    let mut pieces = Vec::with_capacity(2);
    if let Some(altitude) = restrictions.altitude {
        pieces.push(format!("A{}{}", altitude.value, altitude.qualifier.suffix()));
    }
    if let Some(speed) = restrictions.speed {
        pieces.push(format!("S{}{}", speed.value, speed.qualifier.suffix()));
    }
    pieces.join("|")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_altitude_and_speed() {
        let decoded = decode("A80+|S210");

        assert_eq!(
            decoded.altitude,
            Some(AltitudeRestriction { value: 80, qualifier: Qualifier::AtOrAbove })
        );
        assert_eq!(
            decoded.speed,
            Some(SpeedRestriction { value: 210, qualifier: Qualifier::At })
        );
    }

    #[test]
    fn test_decode_is_case_insensitive() {
        let decoded = decode("a120-|s250");
        assert_eq!(decoded.altitude.map(|a| a.qualifier), Some(Qualifier::AtOrBelow));
        assert_eq!(decoded.altitude.map(|a| a.feet()), Some(12_000.0));
        assert_eq!(decoded.speed.map(|s| s.value), Some(250));
    }

    #[test]
    fn test_decode_garbage_yields_nothing() {
        assert!(decode("garbage").is_empty());
        assert!(decode("").is_empty());
        assert!(decode("A|S").is_empty());
        assert!(decode("A80*").is_empty());
        assert!(decode("X100").is_empty());
    }

    #[test]
    fn malformed_piece_does_not_hide_good_piece() {
        let decoded = decode("A8O|S230-");
        assert!(decoded.altitude.is_none());
        assert_eq!(
            decoded.speed,
            Some(SpeedRestriction { value: 230, qualifier: Qualifier::AtOrBelow })
        );
    }

    #[test]
    fn first_piece_of_a_kind_wins() {
        let decoded = decode("A50|A70");
        assert_eq!(decoded.altitude.map(|a| a.value), Some(50));
    }

    #[test]
    fn test_encode_inverse() {
        assert_eq!(encode(&decode("a80+|s210")), "A80+|S210");
        assert_eq!(encode(&decode("S180-")), "S180-");
        assert_eq!(encode(&Restrictions::default()), "");
    }

    #[test]
    fn qualifier_permits() {
        assert!(Qualifier::AtOrAbove.permits(9_000.0, 8_000.0));
        assert!(!Qualifier::AtOrBelow.permits(9_000.0, 8_000.0));
        assert!(Qualifier::At.permits(8_000.0, 8_000.0));
    }

    #[test]
    fn constraint_from_restriction_converts_to_feet() {
        let constraint = AltitudeConstraint::from(AltitudeRestriction {
            value: 60,
            qualifier: Qualifier::AtOrBelow,
        });
        assert_eq!(constraint.value, 6_000.0);
        assert_eq!(constraint.qualifier, Qualifier::AtOrBelow);
    }
}
