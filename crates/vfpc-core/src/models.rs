//! Rule data model as served by the rule server.
//!
//! Every optional field defaults to empty/false/absent when omitted from the
//! source document, so partial records deserialize cleanly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseTimeError;

/// Time of day with minute resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Time {
    pub hour: u8,
    pub minute: u8,
}

impl Time {
    pub fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    /// Minutes since midnight.
    pub fn ord(&self) -> u16 {
        u16::from(self.hour) * 60 + u16::from(self.minute)
    }
}

impl FromStr for Time {
    type Err = ParseTimeError;

    /// Accepts `HH:MM`, `HH:MM:SS` and the compact `HHMM` used by the API.
    ///
    /// `24:00` is accepted as the end of the day.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ParseTimeError(s.to_string());

        let (hour, rest) = split_two_digits(s).ok_or_else(invalid)?;
        let rest = rest.strip_prefix(':').unwrap_or(rest);
        let (minute, rest) = split_two_digits(rest).ok_or_else(invalid)?;

        // seconds are accepted but dropped
        if !rest.is_empty() {
            let seconds = rest.strip_prefix(':').and_then(split_two_digits);
            if !matches!(seconds, Some((0..=59, ""))) {
                return Err(invalid());
            }
        }

        if minute > 59 || hour > 24 || (hour == 24 && minute != 0) {
            return Err(invalid());
        }

        Ok(Self::new(hour, minute))
    }
}

/// Split a leading two-digit number off `s`.
fn split_two_digits(s: &str) -> Option<(u8, &str)> {
    let digits = s.get(..2)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((digits.parse().ok()?, &s[2..]))
}

impl TryFrom<String> for Time {
    type Error = ParseTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Time> for String {
    fn from(time: Time) -> Self {
        time.to_string()
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// A weekday and/or time of day. Either half may be absent.
///
/// Weekdays count from Sunday (0) to Saturday (6).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateTime {
    pub date: Option<u8>,
    pub time: Option<Time>,
}

impl DateTime {
    pub fn new(date: Option<u8>, time: Option<Time>) -> Self {
        Self { date, time }
    }
}

/// Required level parity for a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Odd,
    Even,
}

impl Direction {
    pub fn parity(self) -> i32 {
        match self {
            Direction::Odd => 1,
            Direction::Even => 0,
        }
    }
}

/// Ban or warning attached to a constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Alert {
    pub ban: bool,
    pub warn: bool,
    pub note: Option<String>,
    /// Standard Route Document reference, if the alert points at one
    pub srd: Option<u32>,
}

/// Conditional clause gating a constraint or a whole SID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Restriction {
    /// Overrides a failing SID-wide verdict when this clause matches
    pub sidlevel: bool,
    pub banned: bool,
    /// Suggested alternatives shown when the clause blocks a plan
    pub alt: Vec<String>,
    pub suffix: Vec<String>,
    pub types: Vec<String>,
    pub start: Option<DateTime>,
    pub end: Option<DateTime>,
}

/// One candidate rule for a SID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraint {
    /// Minimum flight level
    pub min: Option<u16>,
    /// Maximum flight level
    pub max: Option<u16>,
    pub dir: Option<Direction>,
    pub dests: Vec<String>,
    pub nodests: Vec<String>,
    pub points: Vec<String>,
    pub nopoints: Vec<String>,
    pub route: Vec<String>,
    pub noroute: Vec<String>,
    pub alerts: Vec<Alert>,
    pub restrictions: Vec<Restriction>,
}

/// Rule set for a single departure fix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sid {
    pub constraints: Vec<Constraint>,
    pub restrictions: Vec<Restriction>,
}

// ========== WIRE RECORDS ==========

/// SID as listed in an airport document, keyed by fix and aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SidRecord {
    pub point: String,
    pub aliases: Vec<String>,
    pub constraints: Vec<Constraint>,
    pub restrictions: Vec<Restriction>,
}

impl SidRecord {
    /// Split into the lookup keys (fix first, then aliases) and the rule set.
    pub fn into_parts(self) -> (Vec<String>, Sid) {
        let mut keys = Vec::with_capacity(1 + self.aliases.len());
        keys.push(self.point);
        keys.extend(self.aliases);

        let sid = Sid {
            constraints: self.constraints,
            restrictions: self.restrictions,
        };

        (keys, sid)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirportRecord {
    pub icao: String,
    #[serde(default)]
    pub sids: Vec<SidRecord>,
}

/// Server version record carrying the authoritative reference time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    #[serde(default)]
    pub api_version: String,
    pub time: Time,
    pub day: u8,
}

impl Version {
    pub fn datetime(&self) -> DateTime {
        DateTime::new(Some(self.day), Some(self.time))
    }
}
