//! Core library for verstamp.
//!
//! Encodes build timestamps into version numbers with a 64-second grain and
//! decodes them back.
//!
//! # Modules
//!
//! - [`codec`]: the four-part and three-part encoders and decoders
//! - [`clock`]: injected time sources and timestamp parsing
//! - [`config`]: `verstamp.toml` parsing
//! - [`error`]: range and parse errors

pub mod clock;
pub mod codec;
pub mod config;
pub mod error;

pub use clock::{Clock, ClockError, ClockKind, FixedClock, SystemClock, parse_instant};
pub use codec::{
    Decoded, DecodedInstant3, DecodedInstant4, DottedVersion, VersionTuple3, VersionTuple4,
    decode3, decode4, encode3, encode4,
};
pub use config::{ConfigError, StampConfig, TupleShape};
pub use error::{ParseVersionError, RangeError, YearSource};
