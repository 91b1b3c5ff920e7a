//! Fuzz harness for `DottedVersion` parsing and the 64-second decoders.
//!
//! Arbitrary text goes through the dotted-version parser, and arbitrary
//! integer quadruples go straight into `decode4`/`decode3`. Neither path may
//! panic, and any instant that decodes from a 16-bit minor must re-encode to
//! the same tuple.

#![no_main]
use libfuzzer_sys::fuzz_target;
use verstamp_core::codec::{DottedVersion, decode3, decode4, encode4};

fn word(data: &[u8], index: usize) -> i32 {
    let mut bytes = [0u8; 4];
    for (offset, byte) in bytes.iter_mut().enumerate() {
        *byte = data.get(index * 4 + offset).copied().unwrap_or(0);
    }
    i32::from_le_bytes(bytes)
}

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(version) = s.parse::<DottedVersion>() {
            let _ = version.decode();
        }
    }

    let (build, major) = (word(data, 0), word(data, 1));
    let (minor, revision) = (word(data, 2), word(data, 3));
    let _ = decode3(build, minor, revision);
    // Decode accepts years the encoder cannot emit once minor exceeds 16 bits.
    let decoded = decode4(build, major, minor, revision);
    if let (Ok(decoded), true) = (decoded, minor <= i32::from(u16::MAX)) {
        let version = encode4(build, major, &decoded.computed_instant)
            .expect("decoded instant must re-encode");
        assert_eq!(i32::from(version.minor), minor);
        assert_eq!(i32::from(version.revision), revision);
    }
});
