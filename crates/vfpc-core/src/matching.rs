//! Constraint matching and ranking.
//!
//! Constraints of a SID are tried in declaration order. Each one runs the
//! same battery of checks and earns a point per passing check; the first
//! constraint passing everything wins outright. Otherwise the constraint with
//! the most points (earliest on ties) is reported with its own trail.

use crate::check::Outcome;
use crate::models::{Constraint, Sid};
use crate::restriction::{self, RestrictionContext, Verdict};

/// Highest flight level using conventional parity spacing.
const RVSM_START: i32 = 41;

/// Everything a constraint is checked against.
#[derive(Debug, Clone, Copy)]
pub struct MatchInput<'a> {
    pub sid: &'a Sid,
    pub sid_point: &'a str,
    pub destination: &'a str,
    /// Host-extracted route points, used for exit points
    pub points: &'a [String],
    /// Parsed bare route, used for route patterns
    pub route: &'a [String],
    /// Requested level in feet
    pub cruise_level: i32,
    pub restriction: RestrictionContext<'a>,
}

/// Winning outcome and the diagnostic trail that led to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub outcome: Outcome,
    pub trail: Vec<String>,
}

#[derive(Debug, Clone, Default)]
struct Candidate {
    passes: u8,
    outcome: Outcome,
    trail: Vec<String>,
}

/// Reason a candidate stopped being evaluated.
#[derive(Debug)]
struct Rejection {
    outcome: Outcome,
    notes: Vec<String>,
}

impl Rejection {
    fn new(outcome: Outcome, note: impl Into<String>) -> Self {
        Self {
            outcome,
            notes: vec![note.into()],
        }
    }
}

/// Select the best matching constraint of `input.sid`.
pub fn select(input: &MatchInput<'_>) -> Selection {
    let sid_verdict = restriction::evaluate(&input.sid.restrictions, &input.restriction);

    let mut trail: Vec<String> = sid_verdict.note.map(str::to_string).into_iter().collect();
    let mut best: Option<Candidate> = None;

    for (index, constraint) in input.sid.constraints.iter().enumerate() {
        let candidate = evaluate(constraint, input, &sid_verdict);
        tracing::trace!(
            index,
            passes = candidate.passes,
            outcome = ?candidate.outcome,
            "constraint evaluated"
        );

        if candidate.outcome == Outcome::Success {
            trail.extend(candidate.trail);
            trail.push("candidate constraint passed".to_string());
            return Selection {
                outcome: Outcome::Success,
                trail,
            };
        }

        if best.as_ref().map_or(true, |best| candidate.passes > best.passes) {
            best = Some(candidate);
        }
    }

    let Some(best) = best else {
        trail.push("departure has no constraints".to_string());
        return Selection {
            outcome: Outcome::SidUnknown,
            trail,
        };
    };

    let mut notes = best.trail.into_iter();
    match notes.next() {
        Some(first) => trail.push(format!("best candidate for SID: {first}")),
        None => trail.push("best candidate for SID".to_string()),
    }
    trail.extend(notes);

    Selection {
        outcome: best.outcome,
        trail,
    }
}

fn evaluate(constraint: &Constraint, input: &MatchInput<'_>, sid_verdict: &Verdict) -> Candidate {
    let mut candidate = Candidate::default();

    candidate.outcome = match run_checks(constraint, input, sid_verdict, &mut candidate) {
        Ok(()) => Outcome::Success,
        Err(rejection) => {
            candidate.trail.extend(rejection.notes);
            rejection.outcome
        }
    };

    candidate
}

fn run_checks(
    constraint: &Constraint,
    input: &MatchInput<'_>,
    sid_verdict: &Verdict,
    candidate: &mut Candidate,
) -> Result<(), Rejection> {
    check_destination(constraint, input.destination)?;
    candidate.passes += 1;

    check_exit_point(constraint, input.points)?;
    candidate.passes += 1;

    check_restrictions(constraint, input, sid_verdict, &mut candidate.trail)?;
    candidate.passes += 1;

    check_level_block(constraint, input.cruise_level)?;
    candidate.passes += 1;

    check_level_parity(constraint, input.cruise_level)?;
    candidate.passes += 1;

    check_route(constraint, input.route, input.sid_point)?;
    candidate.passes += 1;

    check_alerts(constraint, &mut candidate.trail)?;
    candidate.passes += 1;

    Ok(())
}

fn check_destination(constraint: &Constraint, destination: &str) -> Result<(), Rejection> {
    let matches = |prefix: &String| destination.starts_with(prefix.as_str());

    if constraint.nodests.iter().any(matches) {
        return Err(Rejection::new(Outcome::Destination, "destination matches blacklist"));
    }

    if !constraint.dests.is_empty() && !constraint.dests.iter().any(matches) {
        return Err(Rejection::new(Outcome::Destination, "destination not in whitelist"));
    }

    Ok(())
}

fn check_exit_point(constraint: &Constraint, points: &[String]) -> Result<(), Rejection> {
    let filed = |exit_point: &String| points.contains(exit_point);

    if constraint.nopoints.iter().any(filed) {
        return Err(Rejection::new(Outcome::ExitPoint, "exit point matches blacklist"));
    }

    if !constraint.points.is_empty() && !constraint.points.iter().any(filed) {
        return Err(Rejection::new(Outcome::ExitPoint, "exit point not in whitelist"));
    }

    Ok(())
}

/// The candidate's own restrictions, then the SID-wide verdict, which a
/// matching `sidlevel` clause of the candidate may clear.
fn check_restrictions(
    constraint: &Constraint,
    input: &MatchInput<'_>,
    sid_verdict: &Verdict,
    trail: &mut Vec<String>,
) -> Result<(), Rejection> {
    let own = restriction::evaluate(&constraint.restrictions, &input.restriction);
    if !own.passed() {
        let mut notes: Vec<String> = own.note.map(str::to_string).into_iter().collect();
        notes.extend(restriction::alternatives(&constraint.restrictions));
        return Err(Rejection {
            outcome: own.outcome,
            notes,
        });
    }

    let mut sid_outcome = sid_verdict.outcome;
    if own.overrides_sid && sid_outcome != Outcome::Success {
        trail.push("overridden by matching constrained condition".to_string());
        sid_outcome = Outcome::Success;
    }

    if sid_outcome != Outcome::Success {
        return Err(Rejection {
            outcome: sid_outcome,
            notes: restriction::alternatives(&input.sid.restrictions)
                .into_iter()
                .collect(),
        });
    }

    Ok(())
}

fn check_level_block(constraint: &Constraint, cruise_level: i32) -> Result<(), Rejection> {
    let level = cruise_level / 100;

    if constraint.min.is_some_and(|min| i32::from(min) > level) {
        return Err(Rejection::new(Outcome::LevelBlock, "requested level beneath minimum"));
    }

    if constraint.max.is_some_and(|max| i32::from(max) < level) {
        return Err(Rejection::new(Outcome::LevelBlock, "requested level above maximum"));
    }

    Ok(())
}

fn check_level_parity(constraint: &Constraint, cruise_level: i32) -> Result<(), Rejection> {
    if cruise_level % 1000 != 0 {
        return Err(Rejection::new(Outcome::LevelSeries, "requested level not IFR"));
    }

    let Some(dir) = constraint.dir else {
        return Ok(());
    };

    let level = cruise_level / 1000;
    if level <= RVSM_START {
        if level % 2 != dir.parity() {
            return Err(Rejection::new(
                Outcome::LevelParity,
                "requested level has incorrect parity",
            ));
        }
    } else if (2 + level - RVSM_START) % 4 != dir.parity() * 2 {
        return Err(Rejection::new(
            Outcome::LevelParity,
            "requested RVSM level has incorrect parity",
        ));
    }

    Ok(())
}

fn check_route(
    constraint: &Constraint,
    route: &[String],
    sid_point: &str,
) -> Result<(), Rejection> {
    let matches = |pattern: &String| route_matches(pattern, route, !sid_point.is_empty());

    if constraint.noroute.iter().any(matches) {
        return Err(Rejection::new(Outcome::Route, "route matches blacklist"));
    }

    if !constraint.route.is_empty() && !constraint.route.iter().any(matches) {
        return Err(Rejection::new(Outcome::Route, "route not in whitelist"));
    }

    Ok(())
}

/// Match a space-separated route pattern against the bare route.
///
/// `*` matches any single element, and a pattern of just `*` matches any
/// route. When `anchored` the route is first advanced to the pattern's first
/// element; elements after the end of the pattern are ignored.
pub fn route_matches(pattern: &str, route: &[String], anchored: bool) -> bool {
    if pattern == "*" {
        return true;
    }

    let pattern: Vec<&str> = pattern.split(' ').collect();
    if route.is_empty() {
        return false;
    }

    let mut route = route.iter().map(String::as_str).peekable();

    if anchored {
        while route.next_if(|element| *element != pattern[0]).is_some() {}
        if route.peek().is_none() {
            return false;
        }
    }

    pattern.iter().all(|expected| {
        route
            .next()
            .is_some_and(|element| *expected == "*" || *expected == element)
    })
}

fn check_alerts(constraint: &Constraint, trail: &mut Vec<String>) -> Result<(), Rejection> {
    let mut warned = false;

    for alert in &constraint.alerts {
        if alert.ban {
            return Err(Rejection::new(
                Outcome::CstrBan,
                with_note("candidate is banned", alert.note.as_deref()),
            ));
        }

        if alert.warn {
            trail.push(with_note("candidate contains warning", alert.note.as_deref()));
            warned = true;
        }
    }

    if warned {
        return Err(Rejection {
            outcome: Outcome::Warning,
            notes: Vec::new(),
        });
    }

    Ok(())
}

fn with_note(message: &str, note: Option<&str>) -> String {
    match note {
        Some(note) => format!("{message}: {note}"),
        None => message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Alert, DateTime, Direction, Restriction, Time};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    struct Fixture {
        sid: Sid,
        points: Vec<String>,
        route: Vec<String>,
        cruise_level: i32,
    }

    impl Fixture {
        fn new(constraints: Vec<Constraint>) -> Self {
            Self {
                sid: Sid {
                    constraints,
                    restrictions: Vec::new(),
                },
                points: strings(&["CPT", "WAL", "EGCC"]),
                route: strings(&["CPT", "WAL"]),
                cruise_level: 35000,
            }
        }

        fn select(&self) -> Selection {
            select(&MatchInput {
                sid: &self.sid,
                sid_point: "CPT",
                destination: "EGCC",
                points: &self.points,
                route: &self.route,
                cruise_level: self.cruise_level,
                restriction: RestrictionContext {
                    now: DateTime::new(Some(1), Some(Time::new(12, 0))),
                    suffix: "F",
                    engine_type: 'J',
                    aircraft_type: 'L',
                },
            })
        }
    }

    fn parity(dir: Direction, cruise_level: i32) -> Outcome {
        let mut fixture = Fixture::new(vec![Constraint {
            dir: Some(dir),
            ..Constraint::default()
        }]);
        fixture.cruise_level = cruise_level;
        fixture.select().outcome
    }

    #[test]
    fn test_unconstrained_candidate_passes() {
        let selection = Fixture::new(vec![Constraint::default()]).select();
        assert_eq!(selection.outcome, Outcome::Success);
        assert_eq!(selection.trail, strings(&["candidate constraint passed"]));
    }

    #[test]
    fn test_higher_score_wins_over_declaration_order() {
        let wrong_destination = Constraint {
            dests: strings(&["EGP"]),
            ..Constraint::default()
        };
        let wrong_route = Constraint {
            route: strings(&["CPT DVR"]),
            ..Constraint::default()
        };

        let selection = Fixture::new(vec![wrong_destination, wrong_route]).select();
        assert_eq!(selection.outcome, Outcome::Route);
        assert_eq!(selection.trail, strings(&["best candidate for SID: route not in whitelist"]));
    }

    #[test]
    fn test_ties_resolve_to_first_declared() {
        let banned = Constraint {
            nodests: strings(&["EGC"]),
            ..Constraint::default()
        };
        let not_listed = Constraint {
            dests: strings(&["EGP"]),
            ..Constraint::default()
        };

        let selection = Fixture::new(vec![banned, not_listed]).select();
        assert_eq!(selection.outcome, Outcome::Destination);
        assert_eq!(
            selection.trail,
            strings(&["best candidate for SID: destination matches blacklist"])
        );
    }

    #[test]
    fn test_first_full_pass_stops_evaluation() {
        let passing = Constraint {
            dests: strings(&["EG"]),
            ..Constraint::default()
        };
        // would be reported if it were ever evaluated
        let banned = Constraint {
            alerts: vec![Alert {
                ban: true,
                ..Alert::default()
            }],
            ..Constraint::default()
        };

        let selection = Fixture::new(vec![passing, banned]).select();
        assert_eq!(selection.outcome, Outcome::Success);
        assert_eq!(selection.trail, strings(&["candidate constraint passed"]));
    }

    #[test]
    fn test_exit_points_use_host_points() {
        let mut fixture = Fixture::new(vec![Constraint {
            points: strings(&["DVR"]),
            ..Constraint::default()
        }]);
        assert_eq!(fixture.select().outcome, Outcome::ExitPoint);

        fixture.sid.constraints[0].points = strings(&["WAL"]);
        fixture.sid.constraints[0].nopoints = strings(&["EGCC"]);
        assert_eq!(fixture.select().outcome, Outcome::ExitPoint);

        fixture.sid.constraints[0].nopoints.clear();
        assert_eq!(fixture.select().outcome, Outcome::Success);
    }

    #[test]
    fn test_level_block() {
        let mut fixture = Fixture::new(vec![Constraint {
            min: Some(70),
            max: Some(250),
            ..Constraint::default()
        }]);
        assert_eq!(fixture.select().outcome, Outcome::LevelBlock);

        fixture.cruise_level = 25000;
        assert_eq!(fixture.select().outcome, Outcome::Success);

        fixture.cruise_level = 6000;
        assert_eq!(fixture.select().outcome, Outcome::LevelBlock);
    }

    #[test]
    fn test_level_parity() {
        assert_eq!(parity(Direction::Odd, 39000), Outcome::Success);
        assert_eq!(parity(Direction::Even, 39000), Outcome::LevelParity);
        assert_eq!(parity(Direction::Odd, 38000), Outcome::LevelParity);
        assert_eq!(parity(Direction::Even, 43000), Outcome::Success);
        assert_eq!(parity(Direction::Even, 45000), Outcome::LevelParity);
        assert_eq!(parity(Direction::Odd, 45000), Outcome::Success);
        assert_eq!(parity(Direction::Odd, 41000), Outcome::Success);
        assert_eq!(parity(Direction::Odd, 35500), Outcome::LevelSeries);
    }

    #[test]
    fn test_route_patterns() {
        let route = strings(&["CPT3F", "CPT", "L9", "KENET", "WAL"]);

        assert!(route_matches("*", &[], true));
        assert!(route_matches("CPT L9 KENET", &route, true));
        assert!(route_matches("CPT * KENET", &route, true));
        assert!(route_matches("CPT", &route, true));
        assert!(!route_matches("CPT L9 DVR", &route, true));
        assert!(!route_matches("DVR", &route, true));
        assert!(!route_matches("CPT", &[], true));
        // a wildcard cannot anchor the pattern
        assert!(!route_matches("* L9", &route, true));
        assert!(!route_matches("CPT L9 KENET WAL BPK", &route, true));

        assert!(!route_matches("CPT L9", &route, false));
        assert!(route_matches("CPT3F CPT", &route, false));
    }

    #[test]
    fn test_route_blacklist() {
        let selection = Fixture::new(vec![Constraint {
            route: strings(&["*"]),
            noroute: strings(&["CPT WAL"]),
            ..Constraint::default()
        }])
        .select();

        assert_eq!(selection.outcome, Outcome::Route);
        assert_eq!(selection.trail, strings(&["best candidate for SID: route matches blacklist"]));
    }

    #[test]
    fn test_alerts() {
        let warned = Constraint {
            alerts: vec![Alert {
                warn: true,
                note: Some("expect late climb".to_string()),
                ..Alert::default()
            }],
            ..Constraint::default()
        };
        let selection = Fixture::new(vec![warned.clone()]).select();
        assert_eq!(selection.outcome, Outcome::Warning);
        assert_eq!(
            selection.trail,
            strings(&["best candidate for SID: candidate contains warning: expect late climb"])
        );

        // a clean later candidate still wins
        let selection = Fixture::new(vec![warned, Constraint::default()]).select();
        assert_eq!(selection.outcome, Outcome::Success);

        let banned = Constraint {
            alerts: vec![
                Alert {
                    warn: true,
                    ..Alert::default()
                },
                Alert {
                    ban: true,
                    note: Some("use DVR".to_string()),
                    ..Alert::default()
                },
            ],
            ..Constraint::default()
        };
        let selection = Fixture::new(vec![banned]).select();
        assert_eq!(selection.outcome, Outcome::CstrBan);
        assert_eq!(
            selection.trail,
            strings(&[
                "best candidate for SID: candidate contains warning",
                "candidate is banned: use DVR"
            ])
        );
    }

    #[test]
    fn test_candidate_restrictions_report_alternatives() {
        let selection = Fixture::new(vec![Constraint {
            restrictions: vec![Restriction {
                suffix: strings(&["J"]),
                alt: strings(&["DVR"]),
                ..Restriction::default()
            }],
            ..Constraint::default()
        }])
        .select();

        assert_eq!(selection.outcome, Outcome::CondFail);
        assert_eq!(
            selection.trail,
            strings(&["best candidate for SID: no conditions match", "alternatives exist (DVR)"])
        );
    }

    #[test]
    fn test_sid_restrictions_apply_to_every_candidate() {
        let mut fixture = Fixture::new(vec![Constraint::default()]);
        fixture.sid.restrictions = vec![Restriction {
            banned: true,
            alt: strings(&["BPK"]),
            ..Restriction::default()
        }];

        let selection = fixture.select();
        assert_eq!(selection.outcome, Outcome::CondBan);
        assert_eq!(
            selection.trail,
            strings(&[
                "banned condition matches",
                "best candidate for SID: alternatives exist (BPK)"
            ])
        );
    }

    #[test]
    fn test_sidlevel_clause_overrides_sid_failure() {
        let mut fixture = Fixture::new(vec![Constraint {
            restrictions: vec![Restriction {
                sidlevel: true,
                ..Restriction::default()
            }],
            ..Constraint::default()
        }]);
        fixture.sid.restrictions = vec![Restriction {
            suffix: strings(&["J"]),
            ..Restriction::default()
        }];

        let selection = fixture.select();
        assert_eq!(selection.outcome, Outcome::Success);
        assert_eq!(
            selection.trail,
            strings(&[
                "no conditions match",
                "overridden by matching constrained condition",
                "candidate constraint passed"
            ])
        );

        // an empty candidate list cannot override
        fixture.sid.constraints[0].restrictions.clear();
        assert_eq!(fixture.select().outcome, Outcome::CondFail);
    }

    #[test]
    fn test_no_constraints() {
        let selection = Fixture::new(Vec::new()).select();
        assert_eq!(selection.outcome, Outcome::SidUnknown);
    }
}
