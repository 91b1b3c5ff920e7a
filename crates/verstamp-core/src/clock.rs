//! Time sources and timestamp parsing.
//!
//! The codec never reads the system clock. Callers that stamp "now" inject a
//! [`Clock`]; [`SystemClock`] in production, [`FixedClock`] in tests.

use chrono::{DateTime, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Source of the current UTC time.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the host's wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    /// The instant to return.
    pub instant: DateTime<Utc>,
}

impl FixedClock {
    /// Creates a clock frozen at `instant`.
    #[must_use]
    pub const fn new(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }
}

/// How to interpret a wall-clock time that carries no UTC offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockKind {
    /// The wall-clock time is already UTC.
    #[default]
    Utc,
    /// The wall-clock time is in the host's local time zone.
    Local,
}

impl ClockKind {
    /// Converts a naive wall-clock time to UTC.
    ///
    /// Ambiguous local times (the repeated hour when clocks go back) resolve
    /// to the earlier instant.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::NonexistentLocalTime`] for a local time skipped
    /// by a daylight-saving transition.
    pub fn resolve(self, naive: NaiveDateTime) -> Result<DateTime<Utc>, ClockError> {
        match self {
            Self::Utc => Ok(naive.and_utc()),
            Self::Local => resolve_in_zone(&Local, naive),
        }
    }
}

/// Maps a wall-clock time in `zone` to UTC, taking the earlier instant of a
/// fold. The order of the two `Ambiguous` candidates varies by zone backend.
fn resolve_in_zone<Tz: TimeZone>(
    zone: &Tz,
    naive: NaiveDateTime,
) -> Result<DateTime<Utc>, ClockError> {
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(local) => Ok(local.with_timezone(&Utc)),
        LocalResult::Ambiguous(a, b) => Ok(a.min(b).with_timezone(&Utc)),
        LocalResult::None => Err(ClockError::NonexistentLocalTime { naive }),
    }
}

impl std::fmt::Display for ClockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Utc => write!(f, "utc"),
            Self::Local => write!(f, "local"),
        }
    }
}

/// Errors turning text into an instant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockError {
    /// The text is neither RFC 3339 nor a supported naive format.
    #[error("cannot parse {text:?} as a timestamp (expected RFC 3339 or YYYY-MM-DD[THH:MM:SS])")]
    Unparseable {
        /// The rejected input.
        text: String,
    },

    /// The local wall-clock time falls in a daylight-saving gap.
    #[error("local time {naive} does not exist in the host time zone")]
    NonexistentLocalTime {
        /// The rejected wall-clock time.
        naive: NaiveDateTime,
    },
}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses a timestamp for encoding.
///
/// RFC 3339 input keeps its own offset and ignores `kind`. Naive date-times
/// and bare dates (midnight) are interpreted according to `kind`.
///
/// # Errors
///
/// Returns [`ClockError`] if the text cannot be parsed or names a local time
/// that does not exist.
pub fn parse_instant(text: &str, kind: ClockKind) -> Result<DateTime<Utc>, ClockError> {
    let text = text.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Ok(instant.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| ClockError::Unparseable {
            text: text.to_string(),
        })?;

    kind.resolve(naive)
}
