//! Error types for the flight management core.

use thiserror::Error;

/// Failures while reading or validating a dotted route string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("route is empty")]
    EmptyRoute,
    #[error("route `{0}` contains whitespace")]
    ContainsWhitespace(String),
    #[error("route `{0}` contains an empty segment")]
    EmptySegment(String),
    #[error("segment `{0}` has an even number of tokens")]
    EvenTokenCount(String),
    #[error("unknown fix `{0}`")]
    UnknownFix(String),
    #[error("`{0}` is not a known SID, STAR or airway")]
    UnknownProcedure(String),
    #[error("`{fix}` is not on airway `{airway}`")]
    FixNotOnAirway { airway: String, fix: String },
}

/// Every failure the FMS can report back to the command layer.
#[derive(Debug, Error)]
pub enum FmsError {
    #[error("invalid route: {0}")]
    Route(#[from] RouteError),

    #[error("unknown fix `{0}`")]
    UnknownFix(String),
    #[error("unknown procedure `{0}`")]
    UnknownProcedure(String),
    #[error("unknown runway `{runway}` at `{airport}`")]
    UnknownRunway { airport: String, runway: String },
    #[error("no departure runway")]
    NoDepartureRunway,
    #[error("no arrival runway")]
    NoArrivalRunway,
    #[error("no arrival airport")]
    NoArrivalAirport,

    #[error("`{procedure}` is not a {expected}")]
    WrongProcedureKind { procedure: String, expected: &'static str },
    #[error("`{procedure}` does not serve {airport}")]
    WrongAirport { procedure: String, airport: String },
    #[error("expected a single procedure, got `{0}`")]
    NotSingleProcedure(String),
    #[error("not currently flying a departure procedure")]
    NotOnDepartureProcedure,
    #[error("no arrival procedure in the flight plan")]
    NoArrivalProcedure,
    #[error("flight plan is empty")]
    EmptyFlightPlan,
    #[error("not currently holding")]
    NotHolding,

    #[error("invalid leg kind `{0}`")]
    InvalidLegKind(String),

    #[error("navigation data could not be read: {0}")]
    NavData(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FmsError>;
