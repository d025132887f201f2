//! Rule data sources.
//!
//! The checker reads rules through the [`Source`] trait. [`StaticSource`]
//! serves a snapshot loaded up front; live, fetching implementations live in
//! the `vfpc-source` crate.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use crate::error::SnapshotError;
use crate::models::{AirportRecord, DateTime, Sid};

/// Availability of rule data for an airport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AirportStatus {
    Resolved,
    /// Fetch in progress, ask again later
    Pending,
    /// The rule server has no data for the airport
    Missing,
    Error,
}

/// Supplier of rule data and the reference time.
pub trait Source {
    /// Reference weekday and time restrictions are evaluated at.
    fn datetime(&self) -> DateTime;

    fn airport(&self, icao: &str) -> AirportStatus;

    /// Rule set for a departure fix (or alias) at a resolved airport.
    fn sid(&self, icao: &str, point: &str) -> Option<Arc<Sid>>;
}

/// SIDs by airport, then by fix or alias.
pub type SidIndex = HashMap<String, HashMap<String, Arc<Sid>>>;

/// Index `airports`, replacing any airport already present in `index`.
///
/// Returns the codes of the airports indexed.
pub fn index_airports(airports: Vec<AirportRecord>, index: &mut SidIndex) -> Vec<String> {
    let mut fresh = SidIndex::new();

    for airport in airports {
        tracing::debug!(icao = %airport.icao, sids = airport.sids.len(), "indexing airport");
        let sids = fresh.entry(airport.icao).or_default();

        for record in airport.sids {
            let (keys, sid) = record.into_parts();
            let sid = Arc::new(sid);

            for key in keys {
                tracing::trace!(point = %key, "indexing SID");
                sids.insert(key, Arc::clone(&sid));
            }
        }
    }

    let codes = fresh.keys().cloned().collect();
    index.extend(fresh);
    codes
}

/// Read an airport document from `path`.
pub fn read_snapshot(path: impl AsRef<Path>) -> Result<Vec<AirportRecord>, SnapshotError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Pre-loaded rule snapshot with a fixed reference time.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    datetime: DateTime,
    sids: SidIndex,
}

impl StaticSource {
    pub fn new(airports: Vec<AirportRecord>, datetime: DateTime) -> Self {
        let mut sids = SidIndex::new();
        index_airports(airports, &mut sids);
        Self { datetime, sids }
    }

    pub fn from_json(json: &str, datetime: DateTime) -> Result<Self, SnapshotError> {
        Ok(Self::new(serde_json::from_str(json)?, datetime))
    }

    pub fn from_path(path: impl AsRef<Path>, datetime: DateTime) -> Result<Self, SnapshotError> {
        Ok(Self::new(read_snapshot(path)?, datetime))
    }
}

impl Source for StaticSource {
    fn datetime(&self) -> DateTime {
        self.datetime
    }

    fn airport(&self, icao: &str) -> AirportStatus {
        if self.sids.contains_key(icao) {
            AirportStatus::Resolved
        } else {
            AirportStatus::Missing
        }
    }

    fn sid(&self, icao: &str, point: &str) -> Option<Arc<Sid>> {
        self.sids.get(icao)?.get(point).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Time;

    const SNAPSHOT: &str = r#"[
        { "icao": "EGLL", "sids": [
            { "point": "CPT", "aliases": ["CHK"], "constraints": [{ "min": 70 }] },
            { "point": "DVR", "constraints": [{}, {}] }
        ] },
        { "icao": "EGKK" }
    ]"#;

    #[test]
    fn test_static_source_lookup() {
        let datetime = DateTime::new(Some(2), Some(Time::new(8, 15)));
        let source = StaticSource::from_json(SNAPSHOT, datetime).unwrap();

        assert_eq!(source.datetime(), datetime);
        assert_eq!(source.airport("EGLL"), AirportStatus::Resolved);
        assert_eq!(source.airport("EGKK"), AirportStatus::Resolved);
        assert_eq!(source.airport("EGSS"), AirportStatus::Missing);

        let cpt = source.sid("EGLL", "CPT").unwrap();
        let chk = source.sid("EGLL", "CHK").unwrap();
        assert!(Arc::ptr_eq(&cpt, &chk));
        assert_eq!(cpt.constraints[0].min, Some(70));

        assert_eq!(source.sid("EGLL", "DVR").unwrap().constraints.len(), 2);
        assert!(source.sid("EGLL", "BPK").is_none());
        assert!(source.sid("EGKK", "CPT").is_none());
    }

    #[test]
    fn test_index_replaces_whole_airport() {
        let mut index = SidIndex::new();
        index_airports(serde_json::from_str(SNAPSHOT).unwrap(), &mut index);

        let update = r#"[{ "icao": "EGLL", "sids": [{ "point": "BPK" }] }]"#;
        let codes = index_airports(serde_json::from_str(update).unwrap(), &mut index);

        assert_eq!(codes, vec!["EGLL".to_string()]);
        assert!(index["EGLL"].contains_key("BPK"));
        assert!(!index["EGLL"].contains_key("CPT"));
        assert!(index.contains_key("EGKK"));
    }

    #[test]
    fn test_bad_snapshot() {
        assert!(matches!(
            StaticSource::from_json("{", DateTime::default()),
            Err(SnapshotError::Json(_))
        ));
        assert!(matches!(
            StaticSource::from_path("/nonexistent/rules.json", DateTime::default()),
            Err(SnapshotError::Io(_))
        ));
    }
}
