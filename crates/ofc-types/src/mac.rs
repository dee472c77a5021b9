//! Ethernet MAC address carried in a port descriptor.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 48-bit Ethernet MAC address.
///
/// Accepts the separator styles controllers commonly emit: colon
/// (`00:11:22:33:44:55`), hyphen (`00-11-22-33-44-55`) and the bare
/// twelve-digit form (`001122334455`). Always displays lowercase with colons.
///
/// # Examples
///
/// ```
/// use ofc_types::MacAddress;
///
/// let mac: MacAddress = "FA:16:3E:00:00:01".parse().unwrap();
/// assert_eq!(mac.to_string(), "fa:16:3e:00:00:01");
/// assert_eq!(mac, "fa163e000001".parse::<MacAddress>().unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// The all-zero address. Never valid on a port.
    pub const ZERO: MacAddress = MacAddress([0; 6]);

    /// Creates a MAC address from raw octets.
    pub const fn new(octets: [u8; 6]) -> Self {
        MacAddress(octets)
    }

    /// Returns the raw octets.
    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// Returns the organizationally unique identifier (first three octets).
    pub const fn oui(&self) -> [u8; 3] {
        [self.0[0], self.0[1], self.0[2]]
    }

    /// Group (multicast or broadcast) addresses cannot identify a port.
    pub const fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 != 0
    }

    pub const fn is_zero(&self) -> bool {
        u64::from_be_bytes([0, 0, self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]])
            == 0
    }

    /// Returns true if this address may be bound to a switch port.
    pub const fn is_port_assignable(&self) -> bool {
        !self.is_multicast() && !self.is_zero()
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl FromStr for MacAddress {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidMacAddress(s.to_string());

        let separator = match (s.contains(':'), s.contains('-')) {
            (true, true) => return Err(invalid()),
            (true, false) => Some(':'),
            (false, true) => Some('-'),
            (false, false) => None,
        };

        let digits: String = match separator {
            Some(separator) => {
                let parts: Vec<&str> = s.split(separator).collect();
                if parts.len() != 6 || parts.iter().any(|p| p.len() != 2) {
                    return Err(invalid());
                }
                parts.concat()
            }
            None => s.to_string(),
        };

        if digits.len() != 12 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let mut octets = [0u8; 6];
        for (i, octet) in octets.iter_mut().enumerate() {
            *octet = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
        }
        Ok(MacAddress(octets))
    }
}

impl TryFrom<String> for MacAddress {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> String {
        mac.to_string()
    }
}

impl From<[u8; 6]> for MacAddress {
    fn from(octets: [u8; 6]) -> Self {
        MacAddress(octets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_separator_styles() {
        let expected = MacAddress::new([0xfa, 0x16, 0x3e, 0x12, 0x34, 0x56]);
        assert_eq!("fa:16:3e:12:34:56".parse::<MacAddress>().unwrap(), expected);
        assert_eq!("FA-16-3E-12-34-56".parse::<MacAddress>().unwrap(), expected);
        assert_eq!("fa163e123456".parse::<MacAddress>().unwrap(), expected);
    }

    #[test]
    fn test_display_is_lowercase_colon() {
        let mac = MacAddress::new([0xAA, 0xBB, 0xCC, 0x00, 0x01, 0x02]);
        assert_eq!(mac.to_string(), "aa:bb:cc:00:01:02");
    }

    #[test]
    fn test_rejects_malformed() {
        assert!("".parse::<MacAddress>().is_err());
        assert!("fa:16:3e:12:34".parse::<MacAddress>().is_err());
        assert!("fa:16:3e:12:34:56:78".parse::<MacAddress>().is_err());
        assert!("fa:16:3e:1:234:56".parse::<MacAddress>().is_err());
        assert!("zz:16:3e:12:34:56".parse::<MacAddress>().is_err());
        assert!("fa163e12345".parse::<MacAddress>().is_err());
    }

    #[test]
    fn test_rejects_mixed_separators() {
        assert!("fa:16-3e:12:34:56".parse::<MacAddress>().is_err());
        assert!("fa-16-3e-12-34:56".parse::<MacAddress>().is_err());
        assert!("fa-16-3e-12-34-56".parse::<MacAddress>().is_ok());
    }

    #[test]
    fn test_port_assignable() {
        assert!("fa:16:3e:12:34:56".parse::<MacAddress>().unwrap().is_port_assignable());
        assert!(!"01:00:5e:00:00:01".parse::<MacAddress>().unwrap().is_port_assignable());
        assert!(!MacAddress::ZERO.is_port_assignable());
    }

    #[test]
    fn test_oui() {
        let mac: MacAddress = "fa:16:3e:12:34:56".parse().unwrap();
        assert_eq!(mac.oui(), [0xfa, 0x16, 0x3e]);
    }

    #[test]
    fn test_serde_string_form() {
        let mac: MacAddress = "fa:16:3e:12:34:56".parse().unwrap();
        let json = serde_json::to_string(&mac).unwrap();
        assert_eq!(json, "\"fa:16:3e:12:34:56\"");
        let back: MacAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mac);
    }
}
