//! Port descriptor passed to the controller when a port is created.

use crate::{DatapathId, MacAddress, ParseError, VlanId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Field names used by the loosely typed port descriptor map.
pub mod fields {
    pub const DATAPATH_ID: &str = "datapath_id";
    pub const PORT_NO: &str = "port_no";
    pub const VLAN_ID: &str = "vlan_id";
    pub const MAC: &str = "mac";
}

/// Highest port number usable by a physical or logical port.
///
/// Numbers above this are OpenFlow reserved ports (`IN_PORT`, `FLOOD`,
/// `CONTROLLER`, ...) and cannot be bound to a network.
pub const OFPP_MAX: u32 = 0xffff_ff00;

/// Where a port attaches to the OpenFlow fabric.
///
/// Immutable once built: every constructor validates its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPortInfo")]
pub struct PortInfo {
    datapath_id: DatapathId,
    port_no: u32,
    vlan_id: VlanId,
    mac: MacAddress,
}

#[derive(Deserialize)]
struct RawPortInfo {
    datapath_id: DatapathId,
    port_no: u32,
    #[serde(default)]
    vlan_id: VlanId,
    mac: MacAddress,
}

impl TryFrom<RawPortInfo> for PortInfo {
    type Error = ParseError;

    fn try_from(raw: RawPortInfo) -> Result<Self, Self::Error> {
        PortInfo::new(raw.datapath_id, raw.port_no, raw.vlan_id, raw.mac)
    }
}

impl PortInfo {
    /// Builds a descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidPortNo`] for port 0 or a reserved port.
    pub fn new(
        datapath_id: DatapathId,
        port_no: u32,
        vlan_id: VlanId,
        mac: MacAddress,
    ) -> Result<Self, ParseError> {
        if port_no == 0 || port_no > OFPP_MAX {
            return Err(ParseError::InvalidPortNo(port_no));
        }
        Ok(Self {
            datapath_id,
            port_no,
            vlan_id,
            mac,
        })
    }

    /// Parses a descriptor from a string map keyed by [`fields`].
    ///
    /// `vlan_id` may be omitted, meaning untagged; every other field is
    /// required.
    pub fn from_fields(map: &HashMap<String, String>) -> Result<Self, ParseError> {
        let required = |name: &'static str| {
            map.get(name)
                .map(String::as_str)
                .ok_or(ParseError::MissingField(name))
        };

        let datapath_id: DatapathId = required(fields::DATAPATH_ID)?.parse()?;
        let port_text = required(fields::PORT_NO)?;
        let port_no = port_text
            .trim()
            .parse::<u32>()
            .map_err(|_| ParseError::InvalidPortNoText(port_text.to_string()))?;
        let vlan_id: VlanId = match map.get(fields::VLAN_ID) {
            Some(text) => text.parse()?,
            None => VlanId::UNTAGGED,
        };
        let mac: MacAddress = required(fields::MAC)?.parse()?;

        Self::new(datapath_id, port_no, vlan_id, mac)
    }

    /// Renders the descriptor back into the string map form.
    pub fn to_fields(&self) -> HashMap<String, String> {
        HashMap::from([
            (fields::DATAPATH_ID.to_string(), self.datapath_id.to_string()),
            (fields::PORT_NO.to_string(), self.port_no.to_string()),
            (fields::VLAN_ID.to_string(), self.vlan_id.as_u16().to_string()),
            (fields::MAC.to_string(), self.mac.to_string()),
        ])
    }

    pub fn datapath_id(&self) -> DatapathId {
        self.datapath_id
    }

    pub fn port_no(&self) -> u32 {
        self.port_no
    }

    pub fn vlan_id(&self) -> VlanId {
        self.vlan_id
    }

    pub fn mac(&self) -> MacAddress {
        self.mac
    }
}

impl fmt::Display for PortInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} vlan={} mac={}",
            self.datapath_id, self.port_no, self.vlan_id, self.mac
        )
    }
}
