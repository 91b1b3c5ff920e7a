//! `verstamp decode` - read a stamped version back to a UTC instant.
//!
//! The shape is taken from the number of components: `B.M.m.r` decodes as a
//! four-part version, `B.m.r` as a three-part one.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: The version string is malformed
//! - 2: The version is not a valid 64-second encoding

use chrono::SecondsFormat;
use clap::Args;
use serde::{Deserialize, Serialize};
use tracing::debug;
use verstamp_core::codec::{Decoded, DottedVersion};

use super::{exit_codes, output_error, print_json};

/// Arguments for `verstamp decode`.
#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// Version to decode (`build.major.minor.revision` or `build.major.minor`)
    pub version: String,
}

/// Response for the decode command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecodeResponse {
    /// The parsed version, normalized.
    pub version: String,
    /// Build component.
    pub build: i32,
    /// Major component (four-part versions only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major: Option<i32>,
    /// Start of the 64-second grain (RFC 3339).
    pub computed_instant: String,
    /// Last second of the grain (RFC 3339).
    pub window_end: String,
}

impl DecodeResponse {
    fn new(version: &DottedVersion, decoded: &Decoded) -> Self {
        Self {
            version: version.to_string(),
            build: decoded.build(),
            major: decoded.major(),
            computed_instant: decoded
                .computed_instant()
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            window_end: decoded
                .window_end()
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// Runs the decode command, returning an appropriate exit code.
pub fn run_decode(args: &DecodeArgs, json_output: bool) -> u8 {
    let version: DottedVersion = match args.version.parse() {
        Ok(version) => version,
        Err(e) => {
            return output_error(
                json_output,
                "invalid_version",
                &format!("Invalid version {:?}: {e}", args.version),
                exit_codes::ERROR,
            );
        },
    };

    match version.decode() {
        Ok(decoded) => {
            let response = DecodeResponse::new(&version, &decoded);
            if json_output {
                print_json(&response);
            } else {
                println!("{}", response.computed_instant);
            }
            exit_codes::SUCCESS
        },
        Err(e) => {
            debug!(%version, error = %e, "version rejected by codec");
            output_error(json_output, e.code(), &e.to_string(), exit_codes::RANGE_ERROR)
        },
    }
}
