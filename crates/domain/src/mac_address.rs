use crate::errors::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A 48-bit hardware address.
///
/// Accepts every notation switches print: `aa:bb:cc:dd:ee:ff`,
/// `aa-bb-cc-dd-ee-ff`, Cisco dotted `aabb.ccdd.eeff` and bare
/// `aabbccddeeff`. Always displays in lower-case colon form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// Incomplete ARP entries are reported as all zeros by most platforms.
    pub fn is_zero(&self) -> bool {
        self.0 == [0; 6]
    }

    /// Cisco dotted notation (`aabb.ccdd.eeff`).
    pub fn to_cisco(&self) -> String {
        let o = self.0;
        format!(
            "{:02x}{:02x}.{:02x}{:02x}.{:02x}{:02x}",
            o[0], o[1], o[2], o[3], o[4], o[5]
        )
    }

    /// Parses a token only if it has the exact shape of a device-printed
    /// address. Unlike `from_str`, bare hex runs and IPv6 literals that happen
    /// to contain twelve hex digits are rejected.
    pub fn parse_token(token: &str) -> Option<Self> {
        let shaped = [(':', 6, 2), ('-', 6, 2), ('.', 3, 4)]
            .iter()
            .any(|&(sep, groups, width)| {
                let mut count = 0;
                let all_sized = token.split(sep).all(|part| {
                    count += 1;
                    part.len() == width
                });
                all_sized && count == groups
            });
        if !shaped {
            return None;
        }
        token.parse().ok()
    }
}

impl FromStr for MacAddress {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits: Vec<u8> = trimmed
            .chars()
            .filter(|c| !matches!(c, ':' | '-' | '.'))
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<Vec<u8>>>()
            .ok_or_else(|| DomainError::InvalidMacAddress(trimmed.to_string()))?;

        if digits.len() != 12 {
            return Err(DomainError::InvalidMacAddress(trimmed.to_string()));
        }

        let mut octets = [0u8; 6];
        for (i, pair) in digits.chunks(2).enumerate() {
            octets[i] = (pair[0] << 4) | pair[1];
        }
        Ok(Self(octets))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            o[0], o[1], o[2], o[3], o[4], o[5]
        )
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MacAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
