//! Version tuple and decoded-instant records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::{GRAIN_SECONDS, decode3, decode4};
use crate::error::{ParseVersionError, RangeError};

/// Four-part version `Build.Major.Minor.Revision` produced by [`super::encode4`].
///
/// `minor` packs the year and the 3-bit high part (`year * 10 + high`),
/// `revision` holds the low 16 bits of the shifted seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VersionTuple4 {
    /// Caller-supplied build component.
    pub build: i32,
    /// Caller-supplied major component.
    pub major: i32,
    /// `year * 10 + high`.
    pub minor: u16,
    /// Low 16 bits of the shifted seconds.
    pub revision: u16,
}

impl VersionTuple4 {
    /// Decodes this tuple back to the start of its 64-second grain.
    ///
    /// # Errors
    ///
    /// Returns a [`RangeError`] if the tuple was not produced by the encoder.
    pub fn decode(&self) -> Result<DecodedInstant4, RangeError> {
        decode4(
            self.build,
            self.major,
            i32::from(self.minor),
            i32::from(self.revision),
        )
    }
}

impl fmt::Display for VersionTuple4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.build, self.major, self.minor, self.revision
        )
    }
}

/// Three-part version `Build.Major.Minor` produced by [`super::encode3`].
///
/// `major` and `minor` here are the four-part `minor` and `revision`; the
/// four-part `major` is dropped and reads back as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VersionTuple3 {
    /// Caller-supplied build component.
    pub build: i32,
    /// `year * 10 + high`.
    pub major: u16,
    /// Low 16 bits of the shifted seconds.
    pub minor: u16,
}

impl VersionTuple3 {
    /// Decodes this tuple back to the start of its 64-second grain.
    ///
    /// # Errors
    ///
    /// Returns a [`RangeError`] if the tuple was not produced by the encoder.
    pub fn decode(&self) -> Result<DecodedInstant3, RangeError> {
        decode3(self.build, i32::from(self.major), i32::from(self.minor))
    }
}

impl From<VersionTuple4> for VersionTuple3 {
    fn from(tuple: VersionTuple4) -> Self {
        Self {
            build: tuple.build,
            major: tuple.minor,
            minor: tuple.revision,
        }
    }
}

impl fmt::Display for VersionTuple3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.build, self.major, self.minor)
    }
}

/// Result of [`super::decode4`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedInstant4 {
    /// Build component, passed through.
    pub build: i32,
    /// Major component, passed through.
    pub major: i32,
    /// Start of the 64-second grain the encoded instant fell in.
    pub computed_instant: DateTime<Utc>,
}

impl DecodedInstant4 {
    /// Last whole second of the grain starting at `computed_instant`.
    #[must_use]
    pub fn window_end(&self) -> DateTime<Utc> {
        grain_end(self.computed_instant)
    }
}

/// Result of [`super::decode3`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedInstant3 {
    /// Build component, passed through.
    pub build: i32,
    /// Start of the 64-second grain the encoded instant fell in.
    pub computed_instant: DateTime<Utc>,
}

impl DecodedInstant3 {
    /// Last whole second of the grain starting at `computed_instant`.
    #[must_use]
    pub fn window_end(&self) -> DateTime<Utc> {
        grain_end(self.computed_instant)
    }
}

fn grain_end(start: DateTime<Utc>) -> DateTime<Utc> {
    start + TimeDelta::seconds(GRAIN_SECONDS - 1)
}

/// A dotted version string split into raw integer components.
///
/// Parsing only checks shape and integer syntax; the codec invariants are
/// checked by [`DottedVersion::decode`], so out-of-range revisions surface as
/// [`RangeError::RevisionOverflow`] rather than a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DottedVersion {
    /// `build.major.minor`
    Three {
        /// Build component.
        build: i32,
        /// Three-part major (`year * 10 + high`).
        major: i32,
        /// Three-part minor (low 16 bits).
        minor: i32,
    },
    /// `build.major.minor.revision`
    Four {
        /// Build component.
        build: i32,
        /// Major component.
        major: i32,
        /// Minor component (`year * 10 + high`).
        minor: i32,
        /// Revision component (low 16 bits).
        revision: i32,
    },
}

/// Either decoded record, matching the shape of the input version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    /// Decoded from a three-part version.
    Three(DecodedInstant3),
    /// Decoded from a four-part version.
    Four(DecodedInstant4),
}

impl Decoded {
    /// Build component of the decoded version.
    #[must_use]
    pub const fn build(&self) -> i32 {
        match self {
            Self::Three(d) => d.build,
            Self::Four(d) => d.build,
        }
    }

    /// Major component, present only for four-part versions.
    #[must_use]
    pub const fn major(&self) -> Option<i32> {
        match self {
            Self::Three(_) => None,
            Self::Four(d) => Some(d.major),
        }
    }

    /// Start of the decoded grain.
    #[must_use]
    pub const fn computed_instant(&self) -> DateTime<Utc> {
        match self {
            Self::Three(d) => d.computed_instant,
            Self::Four(d) => d.computed_instant,
        }
    }

    /// Last whole second of the decoded grain.
    #[must_use]
    pub fn window_end(&self) -> DateTime<Utc> {
        grain_end(self.computed_instant())
    }
}

impl DottedVersion {
    /// Runs the matching decoder over the raw components.
    ///
    /// # Errors
    ///
    /// Returns a [`RangeError`] if the components are not a valid encoding.
    pub fn decode(&self) -> Result<Decoded, RangeError> {
        match *self {
            Self::Three {
                build,
                major,
                minor,
            } => decode3(build, major, minor).map(Decoded::Three),
            Self::Four {
                build,
                major,
                minor,
                revision,
            } => decode4(build, major, minor, revision).map(Decoded::Four),
        }
    }
}

impl FromStr for DottedVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = [0i32; 4];
        let mut count = 0usize;
        for (index, text) in s.trim().split('.').enumerate() {
            count += 1;
            if index >= parts.len() {
                continue;
            }
            parts[index] = text
                .parse::<i32>()
                .map_err(|_| ParseVersionError::InvalidComponent {
                    index,
                    text: text.to_string(),
                })?;
        }

        match count {
            3 => Ok(Self::Three {
                build: parts[0],
                major: parts[1],
                minor: parts[2],
            }),
            4 => Ok(Self::Four {
                build: parts[0],
                major: parts[1],
                minor: parts[2],
                revision: parts[3],
            }),
            found => Err(ParseVersionError::ComponentCount { found }),
        }
    }
}

impl fmt::Display for DottedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Three {
                build,
                major,
                minor,
            } => write!(f, "{build}.{major}.{minor}"),
            Self::Four {
                build,
                major,
                minor,
                revision,
            } => write!(f, "{build}.{major}.{minor}.{revision}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn display_matches_dotted_wire_format() {
        let four = VersionTuple4 {
            build: 1,
            major: 0,
            minor: 20250,
            revision: 1,
        };
        assert_eq!(four.to_string(), "1.0.20250.1");
        assert_eq!(VersionTuple3::from(four).to_string(), "1.20250.1");
    }

    #[test]
    fn parse_three_and_four_parts() {
        assert_eq!(
            "7.20250.1".parse::<DottedVersion>().unwrap(),
            DottedVersion::Three {
                build: 7,
                major: 20250,
                minor: 1
            }
        );
        assert_eq!(
            " 1.0.25.70000 ".parse::<DottedVersion>().unwrap(),
            DottedVersion::Four {
                build: 1,
                major: 0,
                minor: 25,
                revision: 70000
            }
        );
    }

    #[test]
    fn parse_rejects_wrong_component_count() {
        assert_eq!(
            "1.2".parse::<DottedVersion>().unwrap_err(),
            ParseVersionError::ComponentCount { found: 2 }
        );
        assert_eq!(
            "1.2.3.4.5".parse::<DottedVersion>().unwrap_err(),
            ParseVersionError::ComponentCount { found: 5 }
        );
    }

    #[test]
    fn parse_rejects_non_integer_component() {
        let err = "1.0.x.4".parse::<DottedVersion>().unwrap_err();
        assert_eq!(
            err,
            ParseVersionError::InvalidComponent {
                index: 2,
                text: "x".to_string()
            }
        );
        assert!("1..2".parse::<DottedVersion>().is_err());
    }

    #[test]
    fn window_end_is_63_seconds_after_start() {
        let decoded = DecodedInstant4 {
            build: 1,
            major: 0,
            computed_instant: Utc.with_ymd_and_hms(2025, 1, 1, 0, 1, 4).unwrap(),
        };
        assert_eq!(
            decoded.window_end(),
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 2, 7).unwrap()
        );
    }

    #[test]
    fn tuples_serialize_with_named_fields() {
        let tuple = VersionTuple4 {
            build: 3,
            major: 2,
            minor: 20241,
            revision: 42,
        };
        let json = serde_json::to_value(tuple).unwrap();
        assert_eq!(json["minor"], 20241);
        assert_eq!(json["revision"], 42);
        let back: VersionTuple4 = serde_json::from_value(json).unwrap();
        assert_eq!(back, tuple);
    }
}
