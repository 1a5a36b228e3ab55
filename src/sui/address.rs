//! Sui addresses and object ids
//!
//! Both are 32-byte values written as `0x` + 64 lowercase hex digits.
//! Short forms such as `0x2` are accepted and left-padded with zeros.

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Length of an address in bytes
pub const SUI_ADDRESS_LENGTH: usize = 32;

lazy_static::lazy_static! {
    static ref HEX_ADDRESS: Regex =
        Regex::new(r"^(0[xX])?[0-9a-fA-F]{1,64}$").expect("Invalid address regex");
}

/// A normalized Sui address (also used for object and package ids)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SuiAddress([u8; SUI_ADDRESS_LENGTH]);

impl SuiAddress {
    /// Parse an address, accepting short and mixed-case forms
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if !HEX_ADDRESS.is_match(trimmed) {
            return Err(Error::InvalidAddress(input.to_string()));
        }

        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed)
            .to_ascii_lowercase();
        let padded = format!("{:0>64}", digits);

        let mut bytes = [0u8; SUI_ADDRESS_LENGTH];
        hex::decode_to_slice(&padded, &mut bytes)
            .map_err(|e| Error::InvalidAddress(format!("{}: {}", input, e)))?;

        Ok(Self(bytes))
    }

    /// Raw 32 bytes
    pub fn as_bytes(&self) -> &[u8; SUI_ADDRESS_LENGTH] {
        &self.0
    }
}

impl fmt::Display for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for SuiAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for SuiAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for SuiAddress {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        SuiAddress::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Normalize an address string to its canonical `0x` + 64 hex form
pub fn normalize_address(input: &str) -> Result<String> {
    SuiAddress::parse(input).map(|a| a.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_address_is_padded() {
        assert_eq!(
            normalize_address("0x2").unwrap(),
            "0x0000000000000000000000000000000000000000000000000000000000000002"
        );
    }

    #[test]
    fn test_normalization_lowercases_and_adds_prefix() {
        let upper = "ABCDEF0123456789ABCDEF0123456789ABCDEF0123456789ABCDEF0123456789";
        let normalized = normalize_address(upper).unwrap();
        assert_eq!(normalized, format!("0x{}", upper.to_lowercase()));
        assert_eq!(normalize_address(&normalized).unwrap(), normalized);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(SuiAddress::parse("").is_err());
        assert!(SuiAddress::parse("0x").is_err());
        assert!(SuiAddress::parse("0xzz").is_err());
        assert!(SuiAddress::parse(&format!("0x{}", "1".repeat(65))).is_err());
    }

    #[test]
    fn test_bytes_are_big_endian_padded() {
        let addr = SuiAddress::parse("0x0102").unwrap();
        let bytes = addr.as_bytes();
        assert_eq!(bytes[30], 0x01);
        assert_eq!(bytes[31], 0x02);
        assert!(bytes[..30].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_serde_uses_normalized_string() {
        let addr: SuiAddress = serde_json::from_str("\"0x5\"").unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(
            json,
            "\"0x0000000000000000000000000000000000000000000000000000000000000005\""
        );
    }
}
