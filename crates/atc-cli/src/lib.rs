//! ATC CLI - command line driver for the flight management core.
//!
//! Stands in for the controller's command line: typed instructions are
//! parsed into a [`session::Command`] and dispatched to the aircraft's FMS.
//! - fms_route: load navigation data, file a route and replay commands

pub mod session;

pub use session::{dispatch, Command};
