//! VLAN tag of a port descriptor.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// VLAN tag as understood by the OpenFlow controller.
///
/// Tagged ports carry an IEEE 802.1Q id in 1-4094. Controllers encode an
/// untagged port with the sentinel `0xffff`, represented here as
/// [`VlanId::UNTAGGED`]. 0 and 4095 are reserved by 802.1Q and rejected.
///
/// # Examples
///
/// ```
/// use ofc_types::VlanId;
///
/// let vlan = VlanId::new(100).unwrap();
/// assert_eq!(vlan.tag(), Some(100));
/// assert_eq!(VlanId::UNTAGGED.tag(), None);
/// assert!(VlanId::new(4095).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct VlanId(u16);

impl VlanId {
    /// Lowest taggable VLAN.
    pub const MIN: u16 = 1;

    /// Highest taggable VLAN.
    pub const MAX: u16 = 4094;

    /// Wire value meaning "no VLAN tag".
    pub const UNTAGGED_RAW: u16 = 0xffff;

    /// An untagged port.
    pub const UNTAGGED: VlanId = VlanId(Self::UNTAGGED_RAW);

    /// Creates a VLAN id from its wire value.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidVlanId`] unless `id` is in 1-4094 or is
    /// the untagged sentinel.
    pub const fn new(id: u16) -> Result<Self, ParseError> {
        if (id >= Self::MIN && id <= Self::MAX) || id == Self::UNTAGGED_RAW {
            Ok(VlanId(id))
        } else {
            Err(ParseError::InvalidVlanId(id))
        }
    }

    /// Returns the raw wire value (`0xffff` for untagged).
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns the 802.1Q tag, or `None` for an untagged port.
    pub const fn tag(&self) -> Option<u16> {
        if self.is_untagged() {
            None
        } else {
            Some(self.0)
        }
    }

    pub const fn is_untagged(&self) -> bool {
        self.0 == Self::UNTAGGED_RAW
    }
}

impl Default for VlanId {
    fn default() -> Self {
        VlanId::UNTAGGED
    }
}

impl fmt::Display for VlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tag() {
            Some(tag) => write!(f, "{}", tag),
            None => f.write_str("untagged"),
        }
    }
}

impl FromStr for VlanId {
    type Err = ParseError;

    /// Parses decimal (`"100"`), hex (`"0xffff"`) or the word `untagged`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("untagged") {
            return Ok(VlanId::UNTAGGED);
        }

        let invalid = || ParseError::InvalidVlanText(s.to_string());
        let id = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) if !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()) => {
                u16::from_str_radix(hex, 16).map_err(|_| invalid())?
            }
            None if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
                s.parse::<u16>().map_err(|_| invalid())?
            }
            _ => return Err(invalid()),
        };

        VlanId::new(id)
    }
}

impl TryFrom<u16> for VlanId {
    type Error = ParseError;

    fn try_from(id: u16) -> Result<Self, Self::Error> {
        VlanId::new(id)
    }
}

impl From<VlanId> for u16 {
    fn from(vlan: VlanId) -> u16 {
        vlan.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_range() {
        assert!(VlanId::new(1).is_ok());
        assert!(VlanId::new(4094).is_ok());
        assert!(VlanId::new(0xffff).is_ok());

        assert_eq!(VlanId::new(0), Err(ParseError::InvalidVlanId(0)));
        assert_eq!(VlanId::new(4095), Err(ParseError::InvalidVlanId(4095)));
        assert!(VlanId::new(5000).is_err());
    }

    #[test]
    fn test_untagged() {
        assert!(VlanId::UNTAGGED.is_untagged());
        assert_eq!(VlanId::default(), VlanId::UNTAGGED);
        assert_eq!(VlanId::UNTAGGED.to_string(), "untagged");
        assert_eq!(VlanId::new(10).unwrap().tag(), Some(10));
    }

    #[test]
    fn test_parse_forms() {
        assert_eq!("100".parse::<VlanId>().unwrap().as_u16(), 100);
        assert_eq!("0xffff".parse::<VlanId>().unwrap(), VlanId::UNTAGGED);
        assert_eq!("Untagged".parse::<VlanId>().unwrap(), VlanId::UNTAGGED);
        assert_eq!(
            "vlan".parse::<VlanId>(),
            Err(ParseError::InvalidVlanText("vlan".to_string()))
        );
    }

    #[test]
    fn test_rejects_signed_text() {
        assert_eq!(
            "+100".parse::<VlanId>(),
            Err(ParseError::InvalidVlanText("+100".to_string()))
        );
        assert!("0x+64".parse::<VlanId>().is_err());
        assert!("-1".parse::<VlanId>().is_err());
        assert!("0x".parse::<VlanId>().is_err());
    }

    #[test]
    fn test_serde_uses_wire_value() {
        let json = serde_json::to_string(&VlanId::UNTAGGED).unwrap();
        assert_eq!(json, "65535");
        assert!(serde_json::from_str::<VlanId>("0").is_err());
    }
}
