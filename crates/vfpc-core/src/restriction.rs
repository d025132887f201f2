//! Restriction clause evaluation.
//!
//! Restriction lists are closed-world: the first clause whose predicates all
//! hold decides the verdict, and a non-empty list with no applicable clause
//! fails. An empty list always passes.

use crate::check::Outcome;
use crate::models::{DateTime, Restriction};

/// Inputs a restriction clause is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct RestrictionContext<'a> {
    /// Reference weekday and time of day
    pub now: DateTime,
    /// Variant suffix of the filed SID
    pub suffix: &'a str,
    pub engine_type: char,
    pub aircraft_type: char,
}

/// Outcome of evaluating a restriction list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub outcome: Outcome,
    /// The deciding clause clears a failing SID-wide verdict
    pub overrides_sid: bool,
    pub note: Option<&'static str>,
}

impl Verdict {
    fn pass(overrides_sid: bool) -> Self {
        Self {
            outcome: Outcome::Success,
            overrides_sid,
            note: None,
        }
    }

    fn fail(outcome: Outcome, note: &'static str) -> Self {
        Self {
            outcome,
            overrides_sid: false,
            note: Some(note),
        }
    }

    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Success
    }
}

/// Evaluate `restrictions` in order.
pub fn evaluate(restrictions: &[Restriction], ctx: &RestrictionContext<'_>) -> Verdict {
    if restrictions.is_empty() {
        return Verdict::pass(false);
    }

    match restrictions.iter().find(|restriction| applies(restriction, ctx)) {
        Some(restriction) if restriction.banned => {
            Verdict::fail(Outcome::CondBan, "banned condition matches")
        }
        Some(restriction) => Verdict::pass(restriction.sidlevel),
        None => Verdict::fail(Outcome::CondFail, "no conditions match"),
    }
}

/// Whether every predicate present on `restriction` holds.
pub fn applies(restriction: &Restriction, ctx: &RestrictionContext<'_>) -> bool {
    if let (Some(start), Some(end)) = (&restriction.start, &restriction.end) {
        if !in_window(start, end, &ctx.now) {
            return false;
        }
    }

    if !restriction.suffix.is_empty()
        && !restriction
            .suffix
            .iter()
            .any(|suffix| ctx.suffix.ends_with(suffix.as_str()))
    {
        return false;
    }

    if !restriction.types.is_empty() {
        let codes = [ctx.engine_type.to_string(), ctx.aircraft_type.to_string()];
        if !restriction.types.iter().any(|code| codes.contains(code)) {
            return false;
        }
    }

    true
}

/// Whether `now` falls inside the window from `start` to `end`.
///
/// A window wraps when its start is after its end (Friday to Monday,
/// 22:00 to 06:00). Without a reference time the window is not considered.
pub fn in_window(start: &DateTime, end: &DateTime, now: &DateTime) -> bool {
    let Some(time) = now.time.map(|time| time.ord()) else {
        return true;
    };

    match (start.date, end.date) {
        (Some(start_date), Some(end_date)) => {
            let Some(today) = now.date else {
                return false;
            };

            let min = start_date.min(end_date);
            let max = start_date.max(end_date);
            let wrap = start_date > end_date;
            let between = min < today && today < max;

            // [on the start date, on the end date]
            let mut boundary = [false; 2];
            if today == min {
                boundary[usize::from(wrap)] = true;
            }
            if today == max {
                boundary[usize::from(!wrap)] = true;
            }

            if wrap == between && !boundary[0] && !boundary[1] {
                return false;
            }

            if let (Some(start_time), Some(end_time)) = (start.time, end.time) {
                if boundary[0] && start_time.ord() > time {
                    return false;
                }
                if boundary[1] && end_time.ord() < time {
                    return false;
                }
            }

            true
        }
        _ => match (start.time, end.time) {
            (Some(start_time), Some(end_time)) => {
                let (start_time, end_time) = (start_time.ord(), end_time.ord());
                let wrap = start_time > end_time;
                let between = start_time.min(end_time) < time && time < start_time.max(end_time);
                wrap != between
            }
            _ => true,
        },
    }
}

/// Alternatives suggested by `restrictions`, e.g. `alternatives exist (DVR, BPK)`.
pub fn alternatives(restrictions: &[Restriction]) -> Option<String> {
    let alternatives: Vec<&str> = restrictions
        .iter()
        .flat_map(|restriction| restriction.alt.iter().map(String::as_str))
        .collect();

    if alternatives.is_empty() {
        return None;
    }

    Some(format!("alternatives exist ({})", alternatives.join(", ")))
}
