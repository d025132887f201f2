//! Flight plan validation facade.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};

use crate::flightplan::FlightPlanView;
use crate::matching::{self, MatchInput};
use crate::restriction::RestrictionContext;
use crate::route::{ParsedRoute, SidDesignator};
use crate::source::{AirportStatus, Source};

/// Validation outcome, ordered by severity.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Outcome {
    #[default]
    Success = 0,
    Warning,
    /// Not an IFR plan, so not evaluated
    NonIfr,

    // data availability
    Pending,
    Error,
    Unknown,

    // validation failures
    Syntax,
    SidUnknown,
    CondBan,
    CondFail,
    Destination,
    ExitPoint,
    LevelBlock,
    LevelParity,
    LevelSeries,
    Route,
    CstrBan,
}

impl Outcome {
    /// Numeric code, also used as the process exit status of the checker.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Coarse classification for simple consumers.
    pub fn classification(self) -> &'static str {
        match self {
            Outcome::Pending | Outcome::Error => "pending",
            Outcome::Success | Outcome::Warning | Outcome::NonIfr | Outcome::Unknown => "pass",
            _ => "fail",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Outcome of a check together with the reasons that led to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub outcome: Outcome,
    pub trail: Vec<String>,
}

impl Report {
    fn new(outcome: Outcome, note: impl Into<String>) -> Self {
        Self {
            outcome,
            trail: vec![note.into()],
        }
    }
}

impl fmt::Display for Report {
    /// `reason; reason; class`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for note in &self.trail {
            write!(f, "{note}; ")?;
        }
        f.write_str(self.outcome.classification())
    }
}

/// Validates flight plans against the rules supplied by a [`Source`].
pub struct Checker<'a> {
    source: &'a dyn Source,
}

impl<'a> Checker<'a> {
    pub fn new(source: &'a dyn Source) -> Self {
        Self { source }
    }

    /// Check `fp`. Never panics; internal faults surface as [`Outcome::Error`].
    pub fn check(&self, fp: &dyn FlightPlanView) -> Report {
        let report = panic::catch_unwind(AssertUnwindSafe(|| self.evaluate(fp)))
            .unwrap_or_else(|_| {
                tracing::error!("fault while checking flight plan");
                Report::new(Outcome::Error, "internal error during validation")
            });

        tracing::debug!(outcome = %report.outcome, trail = %report, "flight plan checked");
        report
    }

    fn evaluate(&self, fp: &dyn FlightPlanView) -> Report {
        if !fp.is_ifr() {
            return Report::new(Outcome::NonIfr, "plan type is not IFR");
        }

        let (Some(origin), Some(destination)) = (
            fp.departure().filter(|code| !code.is_empty()),
            fp.destination().filter(|code| !code.is_empty()),
        ) else {
            return Report::new(Outcome::Syntax, "origin/destination is missing");
        };
        let origin = origin.to_uppercase();
        let destination = destination.to_uppercase();

        match self.source.airport(&origin) {
            AirportStatus::Pending => {
                return Report::new(Outcome::Pending, "loading data for origin")
            }
            AirportStatus::Missing => {
                return Report::new(Outcome::Unknown, "server has no data for origin")
            }
            AirportStatus::Error => {
                return Report::new(
                    Outcome::Error,
                    "an error occurred when fetching data for origin",
                )
            }
            AirportStatus::Resolved => {}
        }

        let route = fp.route().unwrap_or_default();
        let route = match ParsedRoute::parse(route, &origin, &destination) {
            Ok(route) => route,
            Err(err) => return Report::new(Outcome::Syntax, err.to_string()),
        };

        let designator = SidDesignator::parse(fp.sid_name(), &origin);
        let Some(sid) = self.source.sid(&origin, &designator.point) else {
            return Report::new(Outcome::SidUnknown, "departure not in database");
        };

        let points = fp.points();
        let selection = matching::select(&MatchInput {
            sid: &sid,
            sid_point: &designator.point,
            destination: &destination,
            points: &points,
            route: route.bare(),
            cruise_level: fp.cruise_level(),
            restriction: RestrictionContext {
                now: self.source.datetime(),
                suffix: &designator.suffix,
                engine_type: fp.engine_type(),
                aircraft_type: fp.aircraft_type(),
            },
        });

        Report {
            outcome: selection.outcome,
            trail: selection.trail,
        }
    }
}
