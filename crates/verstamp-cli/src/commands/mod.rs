//! CLI command implementations.

pub mod decode;
pub mod encode;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use verstamp_core::clock::ClockKind;
use verstamp_core::config::TupleShape;

/// Exit codes shared by all commands.
pub mod exit_codes {
    /// Success exit code.
    pub const SUCCESS: u8 = 0;
    /// General error exit code (bad arguments, unparseable input).
    pub const ERROR: u8 = 1;
    /// The codec rejected the input as outside the encodable range.
    pub const RANGE_ERROR: u8 = 2;
}

/// Tuple shape selection.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ShapeArg {
    /// `build.minor.revision`
    Three,
    /// `build.major.minor.revision`
    Four,
}

impl From<ShapeArg> for TupleShape {
    fn from(arg: ShapeArg) -> Self {
        match arg {
            ShapeArg::Three => Self::Three,
            ShapeArg::Four => Self::Four,
        }
    }
}

/// Interpretation of timestamps without an offset.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ClockArg {
    /// Treat as UTC.
    Utc,
    /// Treat as host local time.
    Local,
}

impl From<ClockArg> for ClockKind {
    fn from(arg: ClockArg) -> Self {
        match arg {
            ClockArg::Utc => Self::Utc,
            ClockArg::Local => Self::Local,
        }
    }
}

/// Error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorResponse {
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
}

/// Output an error in the appropriate format.
pub fn output_error(json_output: bool, code: &str, message: &str, exit_code: u8) -> u8 {
    if json_output {
        let error = ErrorResponse {
            code: code.to_string(),
            message: message.to_string(),
        };
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&error).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        eprintln!("Error: {message}");
    }
    exit_code
}

/// Print a response as pretty JSON on stdout.
pub fn print_json<T: Serialize>(response: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(response).unwrap_or_else(|_| "{}".to_string())
    );
}
