//! Command line front end for the SID validator.

pub mod backoff;

use std::io::{self, BufRead};

use vfpc_core::{Checker, FlightPlanView, Outcome, Report, Source};

pub use backoff::PollBackoff;

/// Read an ICAO message spread over several lines into a single line.
pub fn read_message(reader: impl BufRead) -> io::Result<String> {
    let lines = reader.lines().collect::<io::Result<Vec<_>>>()?;
    Ok(lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" "))
}

/// `Result for <callsign>: <trail>; <class>`
pub fn result_line(callsign: &str, report: &Report) -> String {
    format!("Result for {callsign}: {report}")
}

/// Check `fp`, polling again while rule data is still loading.
///
/// Returns the last report once it is no longer pending or `backoff` is spent.
pub async fn check_settled(
    checker: &Checker<'_>,
    fp: &dyn FlightPlanView,
    mut backoff: PollBackoff,
) -> Report {
    loop {
        let report = checker.check(fp);
        if report.outcome != Outcome::Pending {
            return report;
        }

        match backoff.next_delay() {
            Some(delay) => {
                tracing::debug!(?delay, "rule data pending, polling again");
                tokio::time::sleep(delay).await;
            }
            None => {
                tracing::warn!("gave up waiting for rule data");
                return report;
            }
        }
    }
}

/// Wait until `source` knows the reference time.
///
/// Returns false if `backoff` runs out first; restriction windows are then
/// not evaluated.
pub async fn wait_for_datetime(source: &dyn Source, mut backoff: PollBackoff) -> bool {
    while source.datetime().time.is_none() {
        match backoff.next_delay() {
            Some(delay) => tokio::time::sleep(delay).await,
            None => {
                tracing::warn!("reference time unavailable");
                return false;
            }
        }
    }
    true
}
