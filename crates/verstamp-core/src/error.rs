//! Error types for the version codec.
//!
//! Every invariant the codec checks has its own [`RangeError`] variant so
//! callers can tell a year outside the encodable range apart from a tuple that
//! was never produced by the encoder.

use thiserror::Error;

/// Where a year value came from when it failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearSource {
    /// The year of the instant handed to the encoder.
    Instant,
    /// The year recovered from a version's minor component.
    Minor,
}

impl std::fmt::Display for YearSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Instant => write!(f, "source instant"),
            Self::Minor => write!(f, "minor component"),
        }
    }
}

/// A value fell outside the range the 64-second encoding can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RangeError {
    /// The year is not in `1..=9999`.
    #[error("year {year} from {origin} is out of encodable range 1..=9999")]
    YearOutOfRange {
        /// Offending year.
        year: i32,
        /// Whether the year was read from an instant or derived from a minor.
        origin: YearSource,
    },

    /// The 3-bit high part of the shifted seconds is not in `0..=7`.
    #[error("high part {high} is not in 0..=7; not an encoded 64-second version")]
    HighPartOutOfRange {
        /// Offending high part.
        high: i64,
    },

    /// `year * 10 + high` does not fit a 16-bit version component.
    #[error("minor component {minor} exceeds 65535")]
    MinorOverflow {
        /// Computed minor value.
        minor: i64,
    },

    /// The revision does not fit in 16 bits.
    #[error("revision {revision} does not fit in 16 bits")]
    RevisionOverflow {
        /// Supplied revision value.
        revision: i32,
    },

    /// The decoded offset lands after December 31 of the decoded year.
    #[error(
        "shifted seconds {shifted} describe a moment beyond year {year} (max {max_shifted})"
    )]
    InstantBeyondYear {
        /// Decoded year.
        year: i32,
        /// Decoded shifted-seconds value.
        shifted: i64,
        /// Largest shifted-seconds value inside that year.
        max_shifted: i64,
    },
}

impl RangeError {
    /// Returns a stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::YearOutOfRange { .. } => "year_out_of_range",
            Self::HighPartOutOfRange { .. } => "high_part_out_of_range",
            Self::MinorOverflow { .. } => "minor_overflow",
            Self::RevisionOverflow { .. } => "revision_overflow",
            Self::InstantBeyondYear { .. } => "instant_beyond_year",
        }
    }
}

/// A dotted version string could not be split into integer components.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseVersionError {
    /// The string does not have three or four dot-separated parts.
    #[error("expected 3 or 4 dot-separated components, found {found}")]
    ComponentCount {
        /// Number of components found.
        found: usize,
    },

    /// A component is not a valid 32-bit integer.
    #[error("component {index} ({text:?}) is not a valid integer")]
    InvalidComponent {
        /// Zero-based position of the component.
        index: usize,
        /// The offending text.
        text: String,
    },
}
