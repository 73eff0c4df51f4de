//! Load navigation data, file a route for one aircraft and replay controller
//! commands against its FMS, printing each read-back.
//!
//! Example:
//!   fms_route --navdata crates/atc-cli/data/ksfo.json \
//!     --departure KSFO --departure-runway 28R --route SXC.V458.IPL \
//!     "sid KSFO.OFFSH9.SXC" cvs "direct MOVER" "hold left"

use anyhow::{Context, Result};
use atc_cli::session::{dispatch, Command};
use atc_fms::{
    AircraftProfile, AircraftState, AirportContext, Coordinate, FlightManagementSystem, FmsConfig,
    NavigationLibrary,
};
use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Navigation data JSON (fixes, airports, sids, stars, airways)
    #[arg(long)]
    navdata: PathBuf,

    /// Filed route, e.g. KSFO.OFFSH9.SXC.V458.IPL
    #[arg(long, default_value = "")]
    route: String,

    /// Filed cruise altitude in feet
    #[arg(long, default_value_t = 35_000.0)]
    cruise_altitude: f64,

    /// Filed cruise speed in knots
    #[arg(long, default_value_t = 450.0)]
    cruise_speed: f64,

    /// Service ceiling in feet
    #[arg(long, default_value_t = 41_000.0)]
    ceiling: f64,

    #[arg(long)]
    departure: Option<String>,

    #[arg(long)]
    departure_runway: Option<String>,

    #[arg(long)]
    arrival: Option<String>,

    #[arg(long)]
    arrival_runway: Option<String>,

    /// Fix arrivals without a procedure are vectored from
    #[arg(long)]
    arrival_fix: Option<String>,

    /// Aircraft altitude in feet, used by descend-via and holds
    #[arg(long, default_value_t = 10_000.0)]
    altitude: f64,

    /// Aircraft speed in knots
    #[arg(long, default_value_t = 250.0)]
    speed: f64,

    /// Print each read-back as JSON
    #[arg(long)]
    json: bool,

    /// Commands to replay, e.g. "direct SXC" "hold left 1min"
    commands: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("atc_fms=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = FmsConfig::from_env();

    let file = File::open(&args.navdata)
        .with_context(|| format!("opening {}", args.navdata.display()))?;
    let library = NavigationLibrary::from_reader(BufReader::new(file))
        .with_context(|| format!("reading {}", args.navdata.display()))?;
    tracing::info!(fixes = library.fix_count(), "Navigation data loaded");

    let airspace_center = args
        .departure
        .as_deref()
        .or(args.arrival.as_deref())
        .and_then(|icao| library.airport_position(icao));

    let airport = AirportContext {
        departure_airport: args.departure.map(|s| s.to_uppercase()),
        arrival_airport: args.arrival.map(|s| s.to_uppercase()),
        departure_runway: args.departure_runway.map(|s| s.to_uppercase()),
        arrival_runway: args.arrival_runway.map(|s| s.to_uppercase()),
        default_arrival_fix: args.arrival_fix.map(|s| s.to_uppercase()),
        airspace_center,
    };
    let profile = AircraftProfile {
        cruise_speed_kt: args.cruise_speed,
        service_ceiling_ft: args.ceiling,
    };

    let mut fms = FlightManagementSystem::new(
        Arc::new(library),
        airport,
        profile,
        config,
        args.cruise_altitude,
        &args.route,
    )
    .context("filing route")?;

    println!("Route: {}", fms.flight_plan_route());
    println!("Fixes: {}", fms.fixes().join(" "));

    for text in &args.commands {
        let command: Command = text.parse()?;
        let state = AircraftState {
            altitude_ft: args.altitude,
            speed_kt: args.speed,
            heading: fms
                .current_waypoint()
                .and_then(|wp| wp.heading)
                .unwrap_or(0.0),
            position: fms
                .current_waypoint()
                .and_then(|wp| wp.position())
                .or(airspace_center)
                .unwrap_or(Coordinate::new(0.0, 0.0)),
        };

        let outcome = dispatch(&mut fms, &command, &state);
        if args.json {
            println!("{}", serde_json::to_string(&outcome)?);
        } else {
            let mark = if outcome.success { "OK " } else { "ERR" };
            println!("{mark} {command}: {} ({})", outcome.message.log, outcome.message.say);
        }
    }

    println!("Route: {}", fms.flight_plan_route());
    println!("Fixes: {}", fms.fixes().join(" "));
    if let Some(current) = fms.current_waypoint() {
        println!("Current: {current}");
    }

    Ok(())
}
