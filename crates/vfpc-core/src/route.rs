//! ICAO route string parsing.
//!
//! A filed route is split on whitespace, normalized to uppercase and walked
//! once against the item 15 grammar:
//!
//! ```text
//! [csl] [ORIGIN] [csl] { [airway] waypoint[/change] } [DESTINATION]
//! ```
//!
//! Every waypoint and every airway other than `DCT` is collected, in order,
//! into the *bare route* that constraint route patterns are matched against.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::RouteError;

/// Speed and level, e.g. `N0450F350`.
static SPEED_LEVEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(M\d{3}|[NK]\d{4})([FA]\d{3}|[SM]\d{4})$").expect("valid speed/level regex")
});

/// Cruise climb, e.g. `N0450F350F390` or `N0450F350PLUS`.
static CLIMB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(M\d{3}|[NK]\d{4})([FA]\d{3}|[SM]\d{4})([FA]\d{3}|[SM]\d{4}|PLUS)$")
        .expect("valid cruise climb regex")
});

static AIRPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z]{4})(?:/(\d{2}[LCR]?))?$").expect("valid airport regex")
});

static AIRWAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Z]{2,5}\d[A-Z]?|[USK]?[A-Z][1-9]\d{0,2}[A-Z]?|NAT[A-Z]|DCT)$")
        .expect("valid airway regex")
});

/// Named point or coordinates, optionally followed by `/` and a change.
static WAYPOINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z]{2,5}(?:\d{6})?|\d{2}(?:\d{2})?[NS]\d{3}(?:\d{2})?[EW])(?:$|/)")
        .expect("valid waypoint regex")
});

/// Classified element of a route string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteToken {
    /// Standalone speed/level, either initial or after the origin.
    SpeedLevel(String),
    Airport {
        ident: String,
        runway: Option<String>,
    },
    Airway(String),
    Direct,
    Waypoint {
        ident: String,
        /// Speed/level change applied at the point
        change: Option<String>,
        /// `C/` prefixed cruise climb
        climb: bool,
    },
}

/// Result of parsing a route string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedRoute {
    tokens: Vec<RouteToken>,
    bare: Vec<String>,
}

impl ParsedRoute {
    /// Parse `route` filed from `origin` to `destination`.
    ///
    /// `origin` and `destination` are expected in uppercase.
    pub fn parse(route: &str, origin: &str, destination: &str) -> Result<Self, RouteError> {
        let words: Vec<String> = route.split_whitespace().map(str::to_uppercase).collect();
        if words.is_empty() {
            return Err(RouteError::Empty);
        }

        let mut parsed = Self::default();
        let mut words = words.iter().map(String::as_str).peekable();

        if let Some(word) = words.next_if(|word| SPEED_LEVEL.is_match(word)) {
            parsed.tokens.push(RouteToken::SpeedLevel(word.to_string()));
        }

        if words.peek().is_none() {
            return Err(RouteError::NoRoute);
        }

        if let Some(token) = words.peek().and_then(|word| airport(word)) {
            if !matches!(&token, RouteToken::Airport { ident, .. } if ident == origin) {
                return Err(RouteError::OriginMismatch);
            }
            parsed.tokens.push(token);
            words.next();
        }

        if let Some(word) = words.next_if(|word| SPEED_LEVEL.is_match(word)) {
            parsed.tokens.push(RouteToken::SpeedLevel(word.to_string()));
        }

        loop {
            // airways are frequently omitted between points
            if let Some(word) = words.next_if(|word| AIRWAY.is_match(word)) {
                if word == "DCT" {
                    parsed.tokens.push(RouteToken::Direct);
                } else {
                    parsed.bare.push(word.to_string());
                    parsed.tokens.push(RouteToken::Airway(word.to_string()));
                }
            }

            let Some(&word) = words.peek() else {
                break;
            };
            if AIRPORT.is_match(word) {
                break;
            }

            let Some(token) = waypoint(word)? else {
                break;
            };
            if let RouteToken::Waypoint { ident, .. } = &token {
                parsed.bare.push(ident.clone());
            }
            parsed.tokens.push(token);
            words.next();
        }

        if let Some(token) = words.peek().and_then(|word| airport(word)) {
            if !matches!(&token, RouteToken::Airport { ident, .. } if ident == destination) {
                return Err(RouteError::DestinationMismatch);
            }
            parsed.tokens.push(token);
            words.next();
        }

        if let Some(word) = words.next() {
            return Err(RouteError::InvalidToken(word.to_string()));
        }

        Ok(parsed)
    }

    pub fn tokens(&self) -> &[RouteToken] {
        &self.tokens
    }

    /// Waypoints and airways in filed order.
    pub fn bare(&self) -> &[String] {
        &self.bare
    }
}

fn airport(word: &str) -> Option<RouteToken> {
    AIRPORT.captures(word).map(|captures| RouteToken::Airport {
        ident: captures[1].to_string(),
        runway: captures.get(2).map(|runway| runway.as_str().to_string()),
    })
}

/// Classify `word` as a waypoint. `Ok(None)` means the word is not one.
fn waypoint(word: &str) -> Result<Option<RouteToken>, RouteError> {
    let (climb, body) = match word.strip_prefix("C/") {
        Some(body) => (true, body),
        None => (false, word),
    };

    let Some(captures) = WAYPOINT.captures(body) else {
        return Ok(None);
    };
    let ident = captures[1].to_string();
    let rest = &body[captures.get(0).map_or(body.len(), |m| m.end())..];

    let change = if rest.is_empty() {
        if climb {
            return Err(RouteError::ClimbWithoutChange);
        }
        None
    } else {
        let grammar = if climb { &CLIMB } else { &SPEED_LEVEL };
        if !grammar.is_match(rest) {
            return Err(RouteError::InvalidChange);
        }
        Some(rest.to_string())
    };

    Ok(Some(RouteToken::Waypoint {
        ident,
        change,
        climb,
    }))
}

/// Departure fix and variant suffix derived from a SID designator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SidDesignator {
    pub point: String,
    pub suffix: String,
}

impl SidDesignator {
    /// Derive the fix and suffix from `name` filed at `origin`.
    ///
    /// `CPT3F` gives point `CPT` and suffix `F`. A legacy `#` prefix is
    /// ignored.
    pub fn parse(name: &str, origin: &str) -> Self {
        let name = name.trim().to_uppercase();
        let name = name.strip_prefix('#').unwrap_or(&name);

        let Some(last) = name.chars().last() else {
            return Self::default();
        };

        // legacy Compton departures filed without a number
        if origin == "EGLL" && name == "CHK" {
            return Self {
                point: "CPT".to_string(),
                suffix: "CHK".to_string(),
            };
        }

        let point = name
            .split(|c: char| c.is_ascii_digit())
            .next()
            .unwrap_or_default();

        Self {
            point: point.to_string(),
            suffix: last.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare(route: &str) -> Vec<String> {
        ParsedRoute::parse(route, "EGLL", "EGCC")
            .expect("route should parse")
            .bare()
            .to_vec()
    }

    #[test]
    fn test_bare_route_excludes_direct_and_airports() {
        assert_eq!(
            bare(concat!(
                "N0450F350 EGLL/27R N0450F350 CPT3F CPT L9 KENET DCT WAL ",
                "C/WAL/N0450F350F390 EGCC"
            )),
            vec!["CPT3F", "CPT", "L9", "KENET", "WAL", "WAL"]
        );
        assert_eq!(bare("dct cpt dct wal dct"), vec!["CPT", "WAL"]);
    }

    #[test]
    fn test_tokens_are_classified() {
        let route = "EGLL/09L CPT/N0440F300 UL9 5030N00512W EGCC";
        let parsed = ParsedRoute::parse(route, "EGLL", "EGCC").unwrap();
        assert_eq!(
            parsed.tokens(),
            &[
                RouteToken::Airport {
                    ident: "EGLL".to_string(),
                    runway: Some("09L".to_string())
                },
                RouteToken::Waypoint {
                    ident: "CPT".to_string(),
                    change: Some("N0440F300".to_string()),
                    climb: false
                },
                RouteToken::Airway("UL9".to_string()),
                RouteToken::Waypoint {
                    ident: "5030N00512W".to_string(),
                    change: None,
                    climb: false
                },
                RouteToken::Airport {
                    ident: "EGCC".to_string(),
                    runway: None
                },
            ]
        );
    }

    #[test]
    fn test_cruise_climb_requires_climb() {
        assert_eq!(
            ParsedRoute::parse("CPT C/WAL", "EGLL", "EGCC"),
            Err(RouteError::ClimbWithoutChange)
        );
        assert_eq!(
            ParsedRoute::parse("CPT C/WAL/N0450F350", "EGLL", "EGCC"),
            Err(RouteError::InvalidChange)
        );
        assert!(ParsedRoute::parse("CPT C/WAL/N0450F350PLUS", "EGLL", "EGCC").is_ok());
    }

    #[test]
    fn test_malformed_change_is_rejected() {
        assert_eq!(
            ParsedRoute::parse("CPT WAL/N450F350", "EGLL", "EGCC"),
            Err(RouteError::InvalidChange)
        );
        assert_eq!(
            ParsedRoute::parse("CPT WAL/N0450F350F390", "EGLL", "EGCC"),
            Err(RouteError::InvalidChange)
        );
    }

    #[test]
    fn test_airport_mismatches() {
        assert_eq!(ParsedRoute::parse("EGKK CPT", "EGLL", "EGCC"), Err(RouteError::OriginMismatch));
        assert_eq!(
            ParsedRoute::parse("EGLL CPT EGPH", "EGLL", "EGCC"),
            Err(RouteError::DestinationMismatch)
        );
    }

    #[test]
    fn test_trailing_tokens_are_rejected() {
        assert_eq!(ParsedRoute::parse("   ", "EGLL", "EGCC"), Err(RouteError::Empty));
        assert_eq!(ParsedRoute::parse("N0450F350", "EGLL", "EGCC"), Err(RouteError::NoRoute));
        assert_eq!(
            ParsedRoute::parse("CPT EGCC WAL", "EGLL", "EGCC"),
            Err(RouteError::InvalidToken("WAL".to_string()))
        );
        assert_eq!(
            ParsedRoute::parse("CPT L9 UL9", "EGLL", "EGCC"),
            Err(RouteError::InvalidToken("UL9".to_string()))
        );
    }

    #[test]
    fn test_sid_designator() {
        assert_eq!(
            SidDesignator::parse("cpt3f", "EGLL"),
            SidDesignator {
                point: "CPT".to_string(),
                suffix: "F".to_string()
            }
        );
        assert_eq!(
            SidDesignator::parse("#DVR2J", "EGKK"),
            SidDesignator {
                point: "DVR".to_string(),
                suffix: "J".to_string()
            }
        );
        assert_eq!(
            SidDesignator::parse("CHK", "EGLL"),
            SidDesignator {
                point: "CPT".to_string(),
                suffix: "CHK".to_string()
            }
        );
        assert_eq!(SidDesignator::parse("CHK", "EGKK").point, "CHK");
        assert_eq!(SidDesignator::parse("", "EGLL"), SidDesignator::default());
    }
}
