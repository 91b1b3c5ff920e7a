//! `verstamp encode` - stamp a timestamp into a version number.
//!
//! # Resolution order
//!
//! Each component comes from the command-line flag if given, then from the
//! `[stamp]` section of the configuration file, then from the built-in
//! default (`build = 0`, `major = 0`, four-part, UTC).
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Invalid arguments or unparseable `--at`
//! - 2: The instant cannot be encoded (year or minor out of range)

use chrono::{DateTime, SecondsFormat, Utc};
use clap::Args;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use verstamp_core::clock::{Clock, parse_instant};
use verstamp_core::codec::{VersionTuple3, VersionTuple4, encode3, encode4};
use verstamp_core::config::{StampConfig, TupleShape};

use super::{ClockArg, ShapeArg, exit_codes, output_error, print_json};

/// Arguments for `verstamp encode`.
#[derive(Debug, Args)]
pub struct EncodeArgs {
    /// Build component [default: `[stamp] build`]
    #[arg(long, allow_negative_numbers = true)]
    pub build: Option<i32>,

    /// Major component, four-part only [default: `[stamp] major`]
    #[arg(long, allow_negative_numbers = true)]
    pub major: Option<i32>,

    /// Number of version components [default: `[stamp] shape`]
    #[arg(long, value_enum)]
    pub shape: Option<ShapeArg>,

    /// Timestamp to encode instead of the current time.
    ///
    /// RFC 3339 (`2025-01-01T00:01:04Z`), a naive date-time
    /// (`2025-01-01T00:01:04`) or a date (`2025-01-01`).
    #[arg(long)]
    pub at: Option<String>,

    /// How to read an `--at` value without an offset [default: `[stamp] clock`]
    #[arg(long, value_enum)]
    pub clock: Option<ClockArg>,
}

/// Encoded tuple in either shape.
#[derive(Debug, Clone, Copy)]
pub enum EncodedTuple {
    /// Three-part tuple.
    Three(VersionTuple3),
    /// Four-part tuple.
    Four(VersionTuple4),
}

/// Response for the encode command.
///
/// Components always use the four-part field names: `minor` carries
/// `year * 10 + high` and `revision` the low 16 bits in both shapes, and
/// `major` is present only for four-part versions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EncodeResponse {
    /// Dotted version string.
    pub version: String,
    /// Build component.
    pub build: i32,
    /// Major component (four-part versions only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major: Option<i32>,
    /// `year * 10 + high`.
    pub minor: u16,
    /// Low 16 bits of the shifted seconds.
    pub revision: u16,
    /// The UTC instant that was encoded.
    pub source_instant: String,
}

/// Runs the encode command, returning an appropriate exit code.
pub fn run_encode(
    args: &EncodeArgs,
    config: &StampConfig,
    json_output: bool,
    clock: &dyn Clock,
) -> u8 {
    let shape = args.shape.map_or(config.stamp.shape, TupleShape::from);
    let clock_kind = args.clock.map_or(config.stamp.clock, Into::into);
    let build = args.build.unwrap_or(config.stamp.build);

    let major = match (shape, args.major) {
        (TupleShape::Three, Some(_)) => {
            return output_error(
                json_output,
                "invalid_args",
                "--major cannot be used with --shape three; three-part versions carry no major",
                exit_codes::ERROR,
            );
        },
        (TupleShape::Three, None) => {
            if config.stamp.major != 0 {
                warn!(
                    major = config.stamp.major,
                    "ignoring configured major for three-part version"
                );
            }
            0
        },
        (TupleShape::Four, major) => major.unwrap_or(config.stamp.major),
    };

    let instant = match &args.at {
        Some(text) => match parse_instant(text, clock_kind) {
            Ok(instant) => instant,
            Err(e) => {
                return output_error(
                    json_output,
                    "invalid_timestamp",
                    &e.to_string(),
                    exit_codes::ERROR,
                );
            },
        },
        None => clock.now(),
    };
    debug!(%instant, build, major, ?shape, "encoding instant");

    let encoded = match shape {
        TupleShape::Four => encode4(build, major, &instant).map(EncodedTuple::Four),
        TupleShape::Three => encode3(build, &instant).map(EncodedTuple::Three),
    };

    match encoded {
        Ok(tuple) => {
            let response = build_response(tuple, instant);
            if json_output {
                print_json(&response);
            } else {
                println!("{}", response.version);
            }
            exit_codes::SUCCESS
        },
        Err(e) => {
            debug!(error = %e, "instant rejected by codec");
            output_error(json_output, e.code(), &e.to_string(), exit_codes::RANGE_ERROR)
        },
    }
}

fn build_response(tuple: EncodedTuple, instant: DateTime<Utc>) -> EncodeResponse {
    let (version, build, major, minor, revision) = match tuple {
        EncodedTuple::Three(t) => (t.to_string(), t.build, None, t.major, t.minor),
        EncodedTuple::Four(t) => (t.to_string(), t.build, Some(t.major), t.minor, t.revision),
    };
    EncodeResponse {
        version,
        build,
        major,
        minor,
        revision,
        source_instant: instant.to_rfc3339_opts(SecondsFormat::AutoSi, true),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use verstamp_core::clock::FixedClock;

    use super::*;

    fn args() -> EncodeArgs {
        EncodeArgs {
            build: None,
            major: None,
            shape: None,
            at: None,
            clock: None,
        }
    }

    fn clock() -> FixedClock {
        FixedClock::new(Utc.with_ymd_and_hms(2025, 1, 1, 0, 1, 4).unwrap())
    }

    #[test]
    fn encode_uses_injected_clock() {
        let code = run_encode(&args(), &StampConfig::default(), false, &clock());
        assert_eq!(code, exit_codes::SUCCESS);
    }

    #[test]
    fn encode_rejects_major_with_three_part() {
        let mut a = args();
        a.shape = Some(ShapeArg::Three);
        a.major = Some(1);
        let code = run_encode(&a, &StampConfig::default(), true, &clock());
        assert_eq!(code, exit_codes::ERROR);
    }

    #[test]
    fn encode_rejects_unparseable_timestamp() {
        let mut a = args();
        a.at = Some("not-a-time".to_string());
        let code = run_encode(&a, &StampConfig::default(), false, &clock());
        assert_eq!(code, exit_codes::ERROR);
    }

    #[test]
    fn encode_reports_range_error() {
        let mut a = args();
        a.at = Some("9999-12-31T23:59:00Z".to_string());
        let code = run_encode(&a, &StampConfig::default(), false, &clock());
        assert_eq!(code, exit_codes::RANGE_ERROR);
    }

    #[test]
    fn response_uses_four_part_field_names_for_both_shapes() {
        let instant = Utc.with_ymd_and_hms(2025, 1, 1, 0, 1, 4).unwrap();
        let tuple = EncodedTuple::Four(encode4(1, 0, &instant).unwrap());
        let json = serde_json::to_value(build_response(tuple, instant)).unwrap();
        assert_eq!(json["version"], "1.0.20250.1");
        assert_eq!(json["major"], 0);
        assert_eq!(json["minor"], 20250);
        assert_eq!(json["revision"], 1);
        assert_eq!(json["source_instant"], "2025-01-01T00:01:04Z");

        let tuple = EncodedTuple::Three(encode3(1, &instant).unwrap());
        let json = serde_json::to_value(build_response(tuple, instant)).unwrap();
        assert_eq!(json["version"], "1.20250.1");
        assert!(json.get("major").is_none());
        assert_eq!(json["minor"], 20250);
        assert_eq!(json["revision"], 1);

        let back: EncodeResponse = serde_json::from_value(json).unwrap();
        assert_eq!(back.major, None);
    }
}
