//! Flight management core for an ATC simulator.
//!
//! An aircraft's planned route is an ordered list of legs (SID, STAR,
//! airway, direct fix, vector), each holding waypoints generated from
//! published procedures. [`FlightManagementSystem`] tracks the current
//! waypoint and applies controller amendments while keeping that pointer
//! valid.

pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod fms;
pub mod leg;
pub mod merge;
pub mod navigation;
pub mod readback;
pub mod restriction;
pub mod route;
pub mod spatial;
pub mod vertical;
pub mod waypoint;

pub use config::FmsConfig;
pub use context::{AircraftProfile, AircraftState, AirportContext};
pub use error::{FmsError, Result, RouteError};
pub use fms::{AmendmentMode, Cursor, FlightManagementSystem, FollowingState, WaypointIndex};
pub use leg::{Leg, LegKind};
pub use navigation::{NavigationLibrary, ProcedureFix, ProcedureKind, ProcedureLookup, Runway};
pub use readback::{CommandOutcome, ReadBack};
pub use restriction::{decode, encode, Qualifier, Restrictions};
pub use route::SegmentDescriptor;
pub use spatial::{haversine_distance, Coordinate};
pub use waypoint::{HoldLegLength, HoldParameters, NavigationMode, TurnDirection, Waypoint};
