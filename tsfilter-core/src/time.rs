//! Time bounds and timestamp literals

use chrono::{DateTime, FixedOffset, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FilterError, FilterResult};

/// strftime pattern for time literals, e.g. `2021-01-02T15:04:05.000+00:00`.
/// Always milliseconds and a `+hh:mm` offset, never `Z`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";

/// Format a timestamp as a time literal, keeping its own offset
pub fn format_timestamp<Tz: TimeZone>(ts: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Optional lower and upper bounds for a query.
///
/// Both bounds are exclusive: a point at exactly `start` or `end` does not
/// match. Either bound may be absent.
///
/// [`contains`](Self::contains) compares at full precision, but the clause
/// builders render bounds at millisecond precision and truncate anything
/// finer. A start of `00.0009` is written as `time > '...00.000'`, so the
/// generated query also admits points up to just under 1ms before the
/// given start. An end is moved earlier the same way, so points in that
/// last sub-millisecond before it are left out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBounds {
    /// Lower bound (exclusive)
    pub start: Option<DateTime<FixedOffset>>,
    /// Upper bound (exclusive)
    pub end: Option<DateTime<FixedOffset>>,
}

impl TimeBounds {
    /// Create bounds, rejecting a start that is not before the end
    pub fn new(
        start: Option<DateTime<FixedOffset>>,
        end: Option<DateTime<FixedOffset>>,
    ) -> FilterResult<Self> {
        if let (Some(s), Some(e)) = (start, end) {
            if s >= e {
                return Err(FilterError::TimeRange(format!(
                    "Start time {} must be before end time {}",
                    format_timestamp(&s),
                    format_timestamp(&e)
                )));
            }
        }

        Ok(Self { start, end })
    }

    /// No bounds at all
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Only a lower bound
    pub fn since(start: DateTime<FixedOffset>) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    /// Only an upper bound
    pub fn until(end: DateTime<FixedOffset>) -> Self {
        Self {
            start: None,
            end: Some(end),
        }
    }

    /// Check if neither bound is set
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Check if a timestamp falls strictly inside the bounds
    pub fn contains<Tz: TimeZone>(&self, ts: &DateTime<Tz>) -> bool {
        let after_start = self.start.map_or(true, |s| *ts > s);
        let before_end = self.end.map_or(true, |e| *ts < e);
        after_start && before_end
    }
}

impl fmt::Display for TimeBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.start.map(|s| format_timestamp(&s));
        let end = self.end.map(|e| format_timestamp(&e));
        write!(
            f,
            "({} - {})",
            start.as_deref().unwrap_or("-inf"),
            end.as_deref().unwrap_or("+inf")
        )
    }
}
