//! Flight plan capability consumed by the checker.
//!
//! Hosts expose their own flight plan records through [`FlightPlanView`].
//! [`FlightPlan`] is a plain owned implementation, and [`IcaoFlightPlan`]
//! decodes an ICAO ATS `(FPL-...)` message into one.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::error::FlightPlanError;
use crate::models::{DateTime, Time};

static CRUISE_LEVEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:M\d{3}|[NK]\d{4})[FA](\d{3})$").expect("valid cruise level regex")
});

/// Read-only view of a filed flight plan.
pub trait FlightPlanView {
    fn is_ifr(&self) -> bool;

    fn departure(&self) -> Option<&str>;
    fn destination(&self) -> Option<&str>;

    /// Requested cruise level in feet.
    fn cruise_level(&self) -> i32;
    fn route(&self) -> Option<&str>;
    /// Route point names as extracted by the host, in order.
    fn points(&self) -> Vec<String>;
    fn sid_name(&self) -> &str;

    fn engine_type(&self) -> char;
    fn aircraft_type(&self) -> char;
}

/// Owned flight plan record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightPlan {
    pub ifr: bool,
    pub departure: Option<String>,
    pub destination: Option<String>,
    pub cruise_level: i32,
    pub route: Option<String>,
    pub points: Vec<String>,
    pub sid_name: String,
    pub engine_type: char,
    pub aircraft_type: char,
}

impl Default for FlightPlan {
    fn default() -> Self {
        Self {
            ifr: true,
            departure: None,
            destination: None,
            cruise_level: 0,
            route: None,
            points: Vec::new(),
            sid_name: String::new(),
            engine_type: 'J',
            aircraft_type: 'L',
        }
    }
}

impl FlightPlanView for FlightPlan {
    fn is_ifr(&self) -> bool {
        self.ifr
    }

    fn departure(&self) -> Option<&str> {
        self.departure.as_deref()
    }

    fn destination(&self) -> Option<&str> {
        self.destination.as_deref()
    }

    fn cruise_level(&self) -> i32 {
        self.cruise_level
    }

    fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    fn points(&self) -> Vec<String> {
        self.points.clone()
    }

    fn sid_name(&self) -> &str {
        &self.sid_name
    }

    fn engine_type(&self) -> char {
        self.engine_type
    }

    fn aircraft_type(&self) -> char {
        self.aircraft_type
    }
}

/// Flight plan decoded from an ICAO ATS message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcaoFlightPlan {
    pub callsign: String,
    /// ICAO aircraft type designator (item 9)
    pub aircraft: String,
    /// Date of flight weekday and EOBT
    pub dof_eobt: DateTime,
    pub plan: FlightPlan,
}

impl IcaoFlightPlan {
    /// Decode an `(FPL-...)` message.
    ///
    /// Engine and aircraft type codes come from the item 9 designator, which
    /// must be a known ICAO type; see [`Self::with_type_codes`] to override.
    pub fn parse(message: &str) -> Result<Self, FlightPlanError> {
        let body = message
            .trim()
            .strip_prefix("(FPL-")
            .ok_or(FlightPlanError::NotFlightPlan)?;
        let body = body.strip_suffix(')').unwrap_or(body);

        let mut fields = body.splitn(8, '-').map(str::trim);
        let mut next =
            |name: &'static str| fields.next().ok_or(FlightPlanError::MissingField(name));

        let callsign = next("aircraft identification")?.to_string();
        let rules = next("flight rules")?;
        let aircraft_field = next("aircraft type")?;
        let _equipment = next("equipment")?;
        let departure_field = next("departure")?;
        let route_field = next("route")?;
        let destination_field = next("destination")?;
        let other = next("other information")?;

        if rules.is_empty() {
            return Err(malformed("flight rules", rules));
        }

        let aircraft = aircraft_field
            .split_once('/')
            .map(|(designator, _)| designator.trim_start_matches(|c: char| c.is_ascii_digit()))
            .filter(|designator| !designator.is_empty())
            .ok_or_else(|| malformed("aircraft type", aircraft_field))?
            .to_string();
        let codes = crate::aircraft::lookup(&aircraft)
            .ok_or_else(|| FlightPlanError::UnknownAircraft(aircraft.clone()))?;

        let (departure, eobt) = split_aerodrome_time(departure_field, "departure")?;

        let (speed_level, route) = route_field
            .split_once(char::is_whitespace)
            .ok_or_else(|| malformed("route", route_field))?;
        let cruise_level = CRUISE_LEVEL
            .captures(speed_level)
            .and_then(|captures| captures[1].parse::<i32>().ok())
            .ok_or_else(|| malformed("cruise level", speed_level))?
            * 100;

        let route = route.split_whitespace().collect::<Vec<_>>().join(" ");
        let sid_name = match route.split(' ').next() {
            Some("DCT") | None => String::new(),
            Some(first) => first.to_string(),
        };
        let points = route.split(' ').map(str::to_string).collect();

        let (destination, _eet) = split_aerodrome_time(destination_field, "destination")?;

        let dof = other
            .split_whitespace()
            .find_map(|item| item.strip_prefix("DOF/"))
            .ok_or(FlightPlanError::MissingDateOfFlight)?;
        let weekday = dof
            .get(..6)
            .and_then(|digits| NaiveDate::parse_from_str(digits, "%y%m%d").ok())
            .map(|date| date.weekday().num_days_from_sunday() as u8)
            .ok_or_else(|| malformed("date of flight", dof))?;

        Ok(Self {
            callsign,
            aircraft,
            dof_eobt: DateTime::new(Some(weekday), Some(eobt)),
            plan: FlightPlan {
                ifr: rules.starts_with('I'),
                departure: Some(departure),
                destination: Some(destination),
                cruise_level,
                route: Some(route),
                points,
                sid_name,
                engine_type: codes.engine_type,
                aircraft_type: codes.aircraft_type,
            },
        })
    }

    /// Override the engine and aircraft type codes taken from the designator.
    pub fn with_type_codes(mut self, engine_type: char, aircraft_type: char) -> Self {
        self.plan.engine_type = engine_type;
        self.plan.aircraft_type = aircraft_type;
        self
    }
}

fn malformed(field: &'static str, value: &str) -> FlightPlanError {
    FlightPlanError::Malformed {
        field,
        value: value.to_string(),
    }
}

/// Split an `ICAOHHMM` aerodrome/time field.
fn split_aerodrome_time(
    field: &str,
    name: &'static str,
) -> Result<(String, Time), FlightPlanError> {
    let code = field.get(..4).ok_or_else(|| malformed(name, field))?;
    let time = field
        .get(4..8)
        .and_then(|hhmm| hhmm.parse::<Time>().ok())
        .ok_or_else(|| malformed(name, field))?;

    Ok((code.to_string(), time))
}

impl FlightPlanView for IcaoFlightPlan {
    fn is_ifr(&self) -> bool {
        self.plan.is_ifr()
    }

    fn departure(&self) -> Option<&str> {
        self.plan.departure()
    }

    fn destination(&self) -> Option<&str> {
        self.plan.destination()
    }

    fn cruise_level(&self) -> i32 {
        self.plan.cruise_level()
    }

    fn route(&self) -> Option<&str> {
        self.plan.route()
    }

    fn points(&self) -> Vec<String> {
        self.plan.points()
    }

    fn sid_name(&self) -> &str {
        self.plan.sid_name()
    }

    fn engine_type(&self) -> char {
        self.plan.engine_type()
    }

    fn aircraft_type(&self) -> char {
        self.plan.aircraft_type()
    }
}
