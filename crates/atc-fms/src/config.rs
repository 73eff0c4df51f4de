//! FMS tunables, with defaults and environment overrides.

use crate::waypoint::{HoldLegLength, TurnDirection};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FmsConfig {
    /// Outbound leg length used when a hold is issued without one
    pub hold_leg_length: HoldLegLength,
    /// Turn direction used when a hold is issued without one
    pub hold_turn_direction: TurnDirection,
    /// Give the first SID waypoint the filed cruise speed when it has none
    pub sid_default_speed: bool,
}

impl Default for FmsConfig {
    fn default() -> Self {
        Self {
            hold_leg_length: HoldLegLength::Minutes(1.0),
            hold_turn_direction: TurnDirection::Right,
            sid_default_speed: true,
        }
    }
}

impl FmsConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            hold_leg_length: env::var("FMS_HOLD_LEG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.hold_leg_length),
            hold_turn_direction: env::var("FMS_HOLD_TURN")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.hold_turn_direction),
            sid_default_speed: env::var("FMS_SID_DEFAULT_SPEED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.sid_default_speed),
        }
    }
}
