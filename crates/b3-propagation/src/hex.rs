//! Lowercase hexadecimal codec for 64-bit trace and span identifiers.
//!
//! B3 identifiers travel on the wire as lowercase hex. Parsing here is
//! byte-wise and total: any input, including non-ASCII bytes, terminates
//! with either a value or [`MalformedHex`]. Nothing in this module panics
//! on carrier-supplied data.

use thiserror::Error;

/// A value that is not 1-16 lowercase hexadecimal characters.
///
/// Signals malformed input distinctly from a parsed zero; callers decide
/// whether the surrounding field is droppable.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error("not a 1-16 character lowercase hex value")]
pub struct MalformedHex;

/// Parses 1-16 lowercase hex characters into a `u64`.
///
/// Uppercase digits, empty input, input longer than 16 characters, and any
/// non-hex byte are all [`MalformedHex`]. Variable-length input is
/// accepted; leading zeros are not required.
pub fn parse_lower_hex(value: &str) -> Result<u64, MalformedHex> {
    let bytes = value.as_bytes();
    if bytes.is_empty() || bytes.len() > 16 {
        return Err(MalformedHex);
    }

    let mut result: u64 = 0;
    for &byte in bytes {
        let nibble = match byte {
            b'0'..=b'9' => byte - b'0',
            b'a'..=b'f' => byte - b'a' + 10,
            _ => return Err(MalformedHex),
        };
        result = (result << 4) | u64::from(nibble);
    }

    Ok(result)
}

/// Formats a `u64` as exactly 16 zero-padded lowercase hex characters.
#[must_use]
pub fn write_lower_hex(value: u64) -> String {
    format!("{value:016x}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod test {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn parses_full_width() {
        assert_eq!(
            parse_lower_hex("463ac35c9f6413ad").unwrap(),
            0x463a_c35c_9f64_13ad
        );
    }

    #[test]
    fn parses_short_values() {
        assert_eq!(parse_lower_hex("0").unwrap(), 0);
        assert_eq!(parse_lower_hex("f").unwrap(), 15);
        assert_eq!(parse_lower_hex("48485a").unwrap(), 0x0048_485a);
    }

    #[test]
    fn rejects_empty_and_overlong() {
        assert_eq!(parse_lower_hex(""), Err(MalformedHex));
        assert_eq!(parse_lower_hex("463ac35c9f6413ad0"), Err(MalformedHex));
    }

    #[test]
    fn rejects_uppercase() {
        assert_eq!(parse_lower_hex("463AC35C9F6413AD"), Err(MalformedHex));
    }

    #[test]
    fn rejects_non_hex_bytes() {
        assert_eq!(parse_lower_hex("-"), Err(MalformedHex));
        assert_eq!(parse_lower_hex("48485a39 3bb6124"), Err(MalformedHex));
        assert_eq!(parse_lower_hex("463ac35%af6413ad"), Err(MalformedHex));
        assert_eq!(parse_lower_hex("ффффффффффффффff"), Err(MalformedHex));
    }

    #[test]
    fn writes_zero_padded() {
        assert_eq!(write_lower_hex(0), "0000000000000000");
        assert_eq!(write_lower_hex(15), "000000000000000f");
        assert_eq!(write_lower_hex(u64::MAX), "ffffffffffffffff");
    }

    proptest! {
        #[test]
        fn write_then_parse_is_identity(value in any::<u64>()) {
            prop_assert_eq!(parse_lower_hex(&write_lower_hex(value)), Ok(value));
        }

        #[test]
        fn parse_accepts_any_valid_lowercase_hex(value in "[0-9a-f]{1,16}") {
            let parsed = parse_lower_hex(&value).unwrap();
            // The zero-padded form of what we parsed must match the input
            // once the input itself is zero-padded.
            prop_assert_eq!(write_lower_hex(parsed), format!("{:0>16}", value));
        }

        #[test]
        fn parse_never_panics(value in ".*") {
            let _ = parse_lower_hex(&value);
        }
    }
}
