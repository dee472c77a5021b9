//! OpenFlow datapath (switch) identifier.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 64-bit OpenFlow datapath id identifying the switch a port lives on.
///
/// The low 48 bits conventionally hold a switch MAC and the high 16 bits an
/// implementer-defined prefix. Accepted text forms:
///
/// - `0x`-prefixed hex: `"0xabc"`
/// - bare hex, up to 16 digits: `"0000000000000abc"`
/// - eight colon-separated octets: `"00:00:00:00:00:00:0a:bc"`
///
/// # Examples
///
/// ```
/// use ofc_types::DatapathId;
///
/// let dpid: DatapathId = "0xabc".parse().unwrap();
/// assert_eq!(dpid.as_u64(), 0xabc);
/// assert_eq!(dpid.to_string(), "0x0000000000000abc");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DatapathId(u64);

impl DatapathId {
    pub const fn new(raw: u64) -> Self {
        DatapathId(raw)
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Returns the low 48 bits as MAC octets.
    pub const fn mac_octets(&self) -> [u8; 6] {
        let b = self.0.to_be_bytes();
        [b[2], b[3], b[4], b[5], b[6], b[7]]
    }
}

impl fmt::Display for DatapathId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}

impl FromStr for DatapathId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidDatapathId(s.to_string());

        if s.contains(':') {
            let parts: Vec<&str> = s.split(':').collect();
            if parts.len() != 8 {
                return Err(invalid());
            }
            let mut octets = [0u8; 8];
            for (octet, part) in octets.iter_mut().zip(parts) {
                if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                    return Err(invalid());
                }
                *octet = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
            }
            return Ok(DatapathId(u64::from_be_bytes(octets)));
        }

        let hex = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if hex.is_empty() || hex.len() > 16 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        u64::from_str_radix(hex, 16)
            .map(DatapathId)
            .map_err(|_| invalid())
    }
}

impl TryFrom<String> for DatapathId {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<DatapathId> for String {
    fn from(dpid: DatapathId) -> String {
        dpid.to_string()
    }
}

impl From<u64> for DatapathId {
    fn from(raw: u64) -> Self {
        DatapathId(raw)
    }
}
