//! Value types shared by OpenFlow controller drivers.
//!
//! - [`TenantId`], [`NetworkId`], [`PortId`]: opaque controller-issued ids
//! - [`PortInfo`]: validated port descriptor handed to `create_port`
//! - [`DatapathId`]: 64-bit OpenFlow switch identifier
//! - [`MacAddress`]: 48-bit Ethernet MAC address
//! - [`VlanId`]: 802.1Q tag or the untagged sentinel

mod datapath;
mod ids;
mod mac;
mod port_info;
mod vlan;

pub use datapath::DatapathId;
pub use ids::{NetworkId, PortId, TenantId};
pub use mac::MacAddress;
pub use port_info::{fields, PortInfo, OFPP_MAX};
pub use vlan::VlanId;

/// Error returned when a value fails validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid MAC address format: {0}")]
    InvalidMacAddress(String),

    #[error("invalid datapath id: {0}")]
    InvalidDatapathId(String),

    #[error("invalid VLAN ID: {0} (must be 1-4094 or 0xffff for untagged)")]
    InvalidVlanId(u16),

    #[error("invalid VLAN ID text: {0}")]
    InvalidVlanText(String),

    #[error("invalid port number: {0} (must be 1-0xffffff00)")]
    InvalidPortNo(u32),

    #[error("invalid port number text: {0}")]
    InvalidPortNoText(String),

    #[error("missing port descriptor field: {0}")]
    MissingField(&'static str),
}
