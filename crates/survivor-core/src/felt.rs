//! Conversions between [`Felt`] and the string forms used on the wire.
//!
//! Selector listings and filter inputs carry felts as bare lowercase hex
//! with an even number of digits (whole bytes, leading zero bytes
//! stripped), while decoded records carry owner and id fields in decimal.

use num_bigint::BigUint;
use starknet::core::types::{Felt, FromStrError};

/// Parses a felt from hex, with or without a `0x` prefix.
///
/// Odd-length input is padded with a leading zero nibble, so `0x5` and
/// `0x05` decode to the same element.
pub fn felt_from_hex(hex: &str) -> Result<Felt, FromStrError> {
    let digits = hex.strip_prefix("0x").unwrap_or(hex);
    if digits.len() % 2 == 0 {
        Felt::from_hex(digits)
    } else {
        Felt::from_hex(&format!("0{digits}"))
    }
}

/// Renders a felt as bare lowercase hex of its minimal big-endian bytes.
/// Zero has no bytes, so it renders as the empty string.
pub fn felt_to_hex(felt: &Felt) -> String {
    let bytes = felt.to_bytes_be();
    bytes.iter().skip_while(|b| **b == 0).map(|b| format!("{b:02x}")).collect()
}

/// Returns the low 64 bits of a felt.
pub fn felt_to_u64(felt: &Felt) -> u64 {
    let bytes = felt.to_bytes_be();
    u64::from_be_bytes(bytes[24..32].try_into().expect("felt is 32 bytes"))
}

/// Renders a felt as a decimal string.
pub fn felt_to_decimal(felt: &Felt) -> String {
    BigUint::from_bytes_be(&felt.to_bytes_be()).to_string()
}

/// Decodes a felt's big-endian bytes as an ASCII string, the packing used
/// for adventurer names in the game metadata.
pub fn felt_to_ascii(felt: &Felt) -> String {
    let bytes = felt.to_bytes_be();
    let stripped: Vec<u8> = bytes.iter().copied().skip_while(|b| *b == 0).collect();
    String::from_utf8_lossy(&stripped).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip_strips_leading_zero_bytes() {
        let felt = felt_from_hex("0x023c34c070d9c09046f7f5a319c0d6d482c1f74a5926166f6ff44e5302c4b5b3")
            .unwrap();
        assert_eq!(
            felt_to_hex(&felt),
            "023c34c070d9c09046f7f5a319c0d6d482c1f74a5926166f6ff44e5302c4b5b3"
        );

        let short = felt_from_hex("0x00ff").unwrap();
        assert_eq!(felt_to_hex(&short), "ff");
    }

    #[test]
    fn hex_accepts_odd_length_and_missing_prefix() {
        assert_eq!(felt_from_hex("0x5").unwrap(), Felt::from(5u64));
        assert_eq!(felt_from_hex("05").unwrap(), Felt::from(5u64));
        assert_eq!(felt_from_hex("ff").unwrap(), Felt::from(255u64));
    }

    #[test]
    fn zero_renders_as_empty() {
        assert_eq!(felt_to_hex(&Felt::ZERO), "");
    }

    #[test]
    fn low_u64() {
        assert_eq!(felt_to_u64(&Felt::from(42u64)), 42);
        let wide = felt_from_hex("0x10000000000000001").unwrap();
        assert_eq!(felt_to_u64(&wide), 1);
    }

    #[test]
    fn decimal_rendering() {
        assert_eq!(felt_to_decimal(&Felt::from(0u64)), "0");
        assert_eq!(felt_to_decimal(&Felt::from(123_456_789u64)), "123456789");
        let wide = felt_from_hex("0x10000000000000000").unwrap();
        assert_eq!(felt_to_decimal(&wide), "18446744073709551616");
    }

    #[test]
    fn ascii_names() {
        assert_eq!(felt_to_ascii(&felt_from_hex("0x537572766976").unwrap()), "Surviv");
        assert_eq!(felt_to_ascii(&felt_from_hex("0x5375727669766f72").unwrap()), "Survivor");
    }
}
