//! Error types for rule documents and flight plan messages.

/// A time of day that is not `HH:MM`, `HH:MM:SS` or `HHMM`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time of day: {0:?}")]
pub struct ParseTimeError(pub String);

/// Failure to decode an ICAO ATS flight plan message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlightPlanError {
    #[error("message does not start with (FPL-")]
    NotFlightPlan,

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("malformed field {field}: {value:?}")]
    Malformed { field: &'static str, value: String },

    #[error("unknown aircraft: {0}")]
    UnknownAircraft(String),

    #[error("missing DOF in other information")]
    MissingDateOfFlight,
}

/// Failure to load a rule snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read rule snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse rule snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Grammar violation in a filed route string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("empty route")]
    Empty,

    #[error("route contains no route")]
    NoRoute,

    #[error("route and flight plan origin do not match")]
    OriginMismatch,

    #[error("route and flight plan destination do not match")]
    DestinationMismatch,

    #[error("invalid change of speed/level")]
    InvalidChange,

    #[error("cruise climb does not include climb")]
    ClimbWithoutChange,

    #[error("invalid token in flight plan: {0}")]
    InvalidToken(String),
}
