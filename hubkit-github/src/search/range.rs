//! Numeric and date constraints for search qualifiers

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};

use crate::Error;

/// A constraint over a number, e.g. `repos:>5`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Range {
    Exactly(i64),
    GreaterThan(i64),
    GreaterThanOrEqual(i64),
    LessThan(i64),
    LessThanOrEqual(i64),
    /// Inclusive interval, rendered `min..max`
    Between(i64, i64),
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Range::Exactly(n) => write!(f, "{}", n),
            Range::GreaterThan(n) => write!(f, ">{}", n),
            Range::GreaterThanOrEqual(n) => write!(f, ">={}", n),
            Range::LessThan(n) => write!(f, "<{}", n),
            Range::LessThanOrEqual(n) => write!(f, "<={}", n),
            Range::Between(min, max) => write!(f, "{}..{}", min, max),
        }
    }
}

impl FromStr for Range {
    type Err = Error;

    /// Parse the rendered grammar back: `5`, `>5`, `>=5`, `<5`, `<=5`, `1..10`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let number = |v: &str| {
            v.trim()
                .parse::<i64>()
                .map_err(|_| Error::Parse(format!("Invalid range '{}'", s)))
        };

        if let Some(rest) = s.strip_prefix(">=") {
            Ok(Range::GreaterThanOrEqual(number(rest)?))
        } else if let Some(rest) = s.strip_prefix("<=") {
            Ok(Range::LessThanOrEqual(number(rest)?))
        } else if let Some(rest) = s.strip_prefix('>') {
            Ok(Range::GreaterThan(number(rest)?))
        } else if let Some(rest) = s.strip_prefix('<') {
            Ok(Range::LessThan(number(rest)?))
        } else if let Some((min, max)) = s.split_once("..") {
            Ok(Range::Between(number(min)?, number(max)?))
        } else {
            Ok(Range::Exactly(number(s)?))
        }
    }
}

/// A constraint over a timestamp, e.g. `created:>=2014-01-01T00:00:00+00:00`
///
/// Timestamps render with their own offset; no local timezone is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    GreaterThan(DateTime<FixedOffset>),
    GreaterThanOrEqual(DateTime<FixedOffset>),
    LessThan(DateTime<FixedOffset>),
    LessThanOrEqual(DateTime<FixedOffset>),
    /// Inclusive interval, rendered `start..end`
    Between(DateTime<FixedOffset>, DateTime<FixedOffset>),
}

const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateRange::GreaterThan(d) => write!(f, ">{}", d.format(DATE_FORMAT)),
            DateRange::GreaterThanOrEqual(d) => write!(f, ">={}", d.format(DATE_FORMAT)),
            DateRange::LessThan(d) => write!(f, "<{}", d.format(DATE_FORMAT)),
            DateRange::LessThanOrEqual(d) => write!(f, "<={}", d.format(DATE_FORMAT)),
            DateRange::Between(start, end) => {
                write!(f, "{}..{}", start.format(DATE_FORMAT), end.format(DATE_FORMAT))
            }
        }
    }
}
