//! 64-second date/version codec.
//!
//! Packs a UTC instant into the `Minor` and `Revision` components of a
//! four-part version number, or the `Major` and `Minor` components of a
//! three-part one, and reads such a version back to an approximate instant.
//!
//! # Encoding
//!
//! ```text
//! shifted  = floor(seconds since YYYY-01-01T00:00:00Z / 64)
//! high     = shifted >> 16          (0..=7)
//! revision = shifted & 0xFFFF
//! minor    = YYYY * 10 + high       (<= 65535)
//! ```
//!
//! The encoding is lossy: the decoded instant is the start of the 64-second
//! grain the original instant fell in, so it is never later than the original
//! and at most 63 seconds earlier. Years past 6552 overflow `minor` once the
//! high part grows (6553 partially, 6554 and later always).
//!
//! # Invariants
//!
//! - `0 <= high <= 7`
//! - `revision` fits 16 bits; decode rejects wider values instead of masking
//! - Decode rejects offsets past the last grain of the decoded year,
//!   accounting for leap years
//!
//! # Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use verstamp_core::codec::{decode4, encode4};
//!
//! let instant = Utc.with_ymd_and_hms(2025, 1, 1, 0, 1, 4).unwrap();
//! let version = encode4(1, 0, &instant).unwrap();
//! assert_eq!(version.to_string(), "1.0.20250.1");
//!
//! let decoded = decode4(1, 0, 20250, 1).unwrap();
//! assert_eq!(decoded.computed_instant, instant);
//! ```

mod types;

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, TimeZone, Utc};
use tracing::trace;
pub use types::{
    Decoded, DecodedInstant3, DecodedInstant4, DottedVersion, VersionTuple3, VersionTuple4,
};

use crate::error::{RangeError, YearSource};

/// Bits dropped from the elapsed seconds.
pub const GRAIN_SHIFT: u32 = 6;

/// Width of one grain in seconds.
pub const GRAIN_SECONDS: i64 = 1 << GRAIN_SHIFT;

/// Smallest encodable year.
pub const MIN_YEAR: i32 = 1;

/// Largest year accepted before the minor-overflow check.
pub const MAX_YEAR: i32 = 9999;

/// Largest value of the 3-bit high part.
pub const MAX_HIGH: i64 = 7;

const LOW_BITS: u32 = 16;
const LOW_MASK: i64 = 0xFFFF;

const SECONDS_PER_COMMON_YEAR: i64 = 365 * 86_400;
const SECONDS_PER_LEAP_YEAR: i64 = 366 * 86_400;

/// Returns `true` for Gregorian leap years.
#[must_use]
pub const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of seconds in the given calendar year.
#[must_use]
pub const fn seconds_in_year(year: i32) -> i64 {
    if is_leap_year(year) {
        SECONDS_PER_LEAP_YEAR
    } else {
        SECONDS_PER_COMMON_YEAR
    }
}

/// Largest shifted-seconds value whose grain starts inside `year`.
#[must_use]
pub const fn max_shifted(year: i32) -> i64 {
    (seconds_in_year(year) - 1) / GRAIN_SECONDS
}

fn start_of_year(year: i32, origin: YearSource) -> Result<DateTime<Utc>, RangeError> {
    let out_of_range = RangeError::YearOutOfRange { year, origin };
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(out_of_range);
    }
    NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or(out_of_range)
}

/// Encodes `instant` into a four-part version.
///
/// `build` and `major` are passed through unchanged. Instants in any time zone
/// are converted to UTC before the year is read.
///
/// # Errors
///
/// - [`RangeError::YearOutOfRange`] if the UTC year is not in `1..=9999`
/// - [`RangeError::HighPartOutOfRange`] if the shifted seconds exceed 19 bits
/// - [`RangeError::MinorOverflow`] if `year * 10 + high > 65535`
pub fn encode4<Tz: TimeZone>(
    build: i32,
    major: i32,
    instant: &DateTime<Tz>,
) -> Result<VersionTuple4, RangeError> {
    let instant = instant.with_timezone(&Utc);
    let year = instant.year();
    let start = start_of_year(year, YearSource::Instant)?;

    let elapsed = (instant - start).num_seconds();
    let shifted = elapsed >> GRAIN_SHIFT;
    let low = shifted & LOW_MASK;
    let high = shifted >> LOW_BITS;
    if !(0..=MAX_HIGH).contains(&high) {
        return Err(RangeError::HighPartOutOfRange { high });
    }

    let minor = i64::from(year) * 10 + high;
    let minor = u16::try_from(minor).map_err(|_| RangeError::MinorOverflow { minor })?;
    let revision = u16::try_from(low).map_err(|_| RangeError::HighPartOutOfRange { high })?;

    trace!(year, shifted, high, low, "encoded instant");
    Ok(VersionTuple4 {
        build,
        major,
        minor,
        revision,
    })
}

/// Decodes a four-part version to the start of its 64-second grain.
///
/// # Errors
///
/// - [`RangeError::YearOutOfRange`] if `minor / 10` is not in `1..=9999`
/// - [`RangeError::HighPartOutOfRange`] if `minor % 10` is not in `0..=7`
/// - [`RangeError::RevisionOverflow`] if `revision` does not fit 16 bits
/// - [`RangeError::InstantBeyondYear`] if the offset falls after the last
///   grain of the decoded year
pub fn decode4(
    build: i32,
    major: i32,
    minor: i32,
    revision: i32,
) -> Result<DecodedInstant4, RangeError> {
    let mut year = minor / 10;
    let mut high = minor - year * 10;
    if high < 0 {
        year -= 1;
        high += 10;
    } else if high > 9 {
        year += 1;
        high -= 10;
    }

    let start = start_of_year(year, YearSource::Minor)?;
    let high = i64::from(high);
    if !(0..=MAX_HIGH).contains(&high) {
        return Err(RangeError::HighPartOutOfRange { high });
    }

    let low = revision & 0xFFFF;
    if revision != low {
        return Err(RangeError::RevisionOverflow { revision });
    }

    let shifted = (high << LOW_BITS) | i64::from(low);
    let max_shifted = max_shifted(year);
    if shifted > max_shifted {
        return Err(RangeError::InstantBeyondYear {
            year,
            shifted,
            max_shifted,
        });
    }

    let computed_instant = start + TimeDelta::seconds(shifted * GRAIN_SECONDS);
    trace!(year, shifted, %computed_instant, "decoded version");
    Ok(DecodedInstant4 {
        build,
        major,
        computed_instant,
    })
}

/// Encodes `instant` into a three-part version.
///
/// Equivalent to [`encode4`] with `major = 0`, with the four-part `minor` and
/// `revision` moved into the three-part `major` and `minor`.
///
/// # Errors
///
/// Same as [`encode4`].
pub fn encode3<Tz: TimeZone>(
    build: i32,
    instant: &DateTime<Tz>,
) -> Result<VersionTuple3, RangeError> {
    encode4(build, 0, instant).map(VersionTuple3::from)
}

/// Decodes a three-part version to the start of its 64-second grain.
///
/// # Errors
///
/// Same as [`decode4`] with `major`/`minor` in place of `minor`/`revision`.
pub fn decode3(build: i32, major: i32, minor: i32) -> Result<DecodedInstant3, RangeError> {
    decode4(build, 0, major, minor).map(|decoded| DecodedInstant3 {
        build: decoded.build,
        computed_instant: decoded.computed_instant,
    })
}
