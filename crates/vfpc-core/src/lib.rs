pub mod aircraft;
pub mod check;
pub mod error;
pub mod flightplan;
pub mod matching;
pub mod models;
pub mod restriction;
pub mod route;
pub mod source;

pub use aircraft::AircraftType;
pub use check::{Checker, Outcome, Report};
pub use error::{FlightPlanError, ParseTimeError, RouteError, SnapshotError};
pub use flightplan::{FlightPlan, FlightPlanView, IcaoFlightPlan};
pub use models::{
    Alert, AirportRecord, Constraint, DateTime, Direction, Restriction, Sid, SidRecord, Time,
    Version,
};
pub use route::{ParsedRoute, RouteToken, SidDesignator};
pub use source::{AirportStatus, SidIndex, Source, StaticSource};
