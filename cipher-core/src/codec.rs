// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Hyperpolymath
//
// Hex and ASCII-case codec shared by the HMAC layer and the derivation
// engine. The engine round-trips digest bytes through lowercase hex and
// parses the digits back into nibble values for mixing.

use crate::error::{CipherError, CipherResult};

const HEX_LOWER: &[u8; 16] = b"0123456789abcdef";
const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// Encode bytes as ASCII hex, two digits per byte, high nibble first.
pub fn to_hex(data: &[u8], uppercase: bool) -> String {
    let hexit = if uppercase { HEX_UPPER } else { HEX_LOWER };
    let mut out = String::with_capacity(data.len() * 2);
    for &b in data {
        out.push(hexit[(b >> 4) as usize] as char);
        out.push(hexit[(b & 0x0F) as usize] as char);
    }
    out
}

/// Lowercase hex encoding.
pub fn to_hex_lower(data: &[u8]) -> String {
    to_hex(data, false)
}

/// Uppercase hex encoding.
pub fn to_hex_upper(data: &[u8]) -> String {
    to_hex(data, true)
}

/// ASCII case fold to lowercase; non-letters pass through.
pub fn to_lower(data: &[u8]) -> Vec<u8> {
    data.iter().map(u8::to_ascii_lowercase).collect()
}

/// ASCII case fold to uppercase; non-letters pass through.
pub fn to_upper(data: &[u8]) -> Vec<u8> {
    data.iter().map(u8::to_ascii_uppercase).collect()
}

/// Value of one hex digit, accepting `0-9A-Fa-f`.
pub fn hex_digit_value(digit: u8) -> CipherResult<u32> {
    match digit {
        b'0'..=b'9' => Ok(u32::from(digit - b'0')),
        b'A'..=b'F' => Ok(u32::from(digit - b'A') + 10),
        b'a'..=b'f' => Ok(u32::from(digit - b'a') + 10),
        _ => Err(CipherError::InvalidHexDigit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_encoding() {
        assert_eq!(to_hex_lower(&[0x00, 0xAB, 0xFF]), "00abff");
        assert_eq!(to_hex_upper(&[0x00, 0xAB, 0xFF]), "00ABFF");
        assert_eq!(to_hex(&[0x12, 0x34], false), "1234");
    }

    #[test]
    fn test_hex_round_trip_all_bytes() {
        for b in 0..=255u8 {
            let hex = to_hex_lower(&[b]);
            let hi = hex_digit_value(hex.as_bytes()[0]).unwrap();
            let lo = hex_digit_value(hex.as_bytes()[1]).unwrap();
            assert_eq!((hi << 4) | lo, u32::from(b));
        }
    }

    #[test]
    fn test_hex_digit_value_rejects_non_hex() {
        assert_eq!(hex_digit_value(b'g'), Err(CipherError::InvalidHexDigit));
        assert_eq!(hex_digit_value(b' '), Err(CipherError::InvalidHexDigit));
        assert_eq!(hex_digit_value(b'G'), Err(CipherError::InvalidHexDigit));
        assert_eq!(hex_digit_value(b'A'), Ok(10));
        assert_eq!(hex_digit_value(b'f'), Ok(15));
    }

    #[test]
    fn test_case_fold() {
        assert_eq!(to_lower(b"AbC123!"), b"abc123!".to_vec());
        assert_eq!(to_upper(b"AbC123!"), b"ABC123!".to_vec());
    }
}
