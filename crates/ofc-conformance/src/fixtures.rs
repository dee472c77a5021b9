//! Test fixtures for driver conformance checks.
//!
//! Provides port descriptors, id hints that no other run will pick, and a
//! guard that removes whatever a check created even when the check fails
//! half way.

use ofc_driver::{
    DatapathId, MacAddress, NetworkId, OfcDriver, PortId, PortInfo, TenantId, VlanId, OFPP_MAX,
};
use tracing::warn;
use uuid::Uuid;

/// Description given to every tenant the checks create.
pub const TENANT_DESCRIPTION: &str = "ofc-conformance tenant";

/// Description given to every network the checks create.
pub const NETWORK_DESCRIPTION: &str = "ofc-conformance network";

/// Common port descriptor fixtures
pub mod port_fixtures {
    use super::*;

    /// Datapath all fixture ports attach to.
    pub const DATAPATH: DatapathId = DatapathId::new(0x0000_0000_0000_0abc);

    /// Tagged port `port_no` on the fixture datapath, VLAN 100.
    pub fn tagged(port_no: u32) -> PortInfo {
        build(port_no, VlanId::new(100).unwrap_or(VlanId::UNTAGGED))
    }

    /// Untagged port `port_no` on the fixture datapath.
    pub fn untagged(port_no: u32) -> PortInfo {
        build(port_no, VlanId::UNTAGGED)
    }

    fn build(port_no: u32, vlan_id: VlanId) -> PortInfo {
        let port_no = port_no.clamp(1, OFPP_MAX);
        let low = port_no.to_be_bytes();
        let mac = MacAddress::new([0xfa, 0x16, 0x3e, low[1], low[2], low[3]]);
        match PortInfo::new(DATAPATH, port_no, vlan_id, mac) {
            Ok(info) => info,
            Err(_) => unreachable!("port number clamped into the valid range"),
        }
    }
}

/// Returns an id segment unique to this call, prefixed for readability.
pub fn unique_segment(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

/// Id hints that are valid segments and collide with nothing yet.
pub mod hint_fixtures {
    use super::*;

    pub fn tenant() -> TenantId {
        TenantId::new(unique_segment("conf-tenant"))
    }

    pub fn network() -> NetworkId {
        NetworkId::new(unique_segment("conf-network"))
    }

    pub fn port() -> PortId {
        PortId::new(unique_segment("conf-port"))
    }
}

/// Ids no driver has issued: one bare and one path-shaped of each kind.
pub mod unknown_fixtures {
    use super::*;

    pub fn tenants() -> Vec<TenantId> {
        let segment = unique_segment("missing");
        vec![
            TenantId::new(segment.clone()),
            TenantId::new(format!("/tenants/{}", segment)),
        ]
    }

    pub fn networks() -> Vec<NetworkId> {
        let segment = unique_segment("missing");
        vec![
            NetworkId::new(segment.clone()),
            NetworkId::new(format!("/tenants/{0}/networks/{0}", segment)),
        ]
    }

    pub fn ports() -> Vec<PortId> {
        let segment = unique_segment("missing");
        vec![
            PortId::new(segment.clone()),
            PortId::new(format!("/tenants/{0}/networks/{0}/ports/{0}", segment)),
        ]
    }
}

#[derive(Debug, Clone)]
enum Created {
    Tenant(TenantId),
    Network(NetworkId),
    Port(PortId),
}

/// Deletes every resource registered with it, newest first, when dropped.
///
/// Checks register each id right after it is created; ids the check already
/// deleted are released with [`Cleanup::forget_port`] and friends so the
/// guard does not delete them a second time.
pub struct Cleanup<'a> {
    driver: &'a dyn OfcDriver,
    created: Vec<Created>,
}

impl<'a> Cleanup<'a> {
    pub fn new(driver: &'a dyn OfcDriver) -> Self {
        Self {
            driver,
            created: Vec::new(),
        }
    }

    pub fn tenant(&mut self, id: &TenantId) {
        self.created.push(Created::Tenant(id.clone()));
    }

    pub fn network(&mut self, id: &NetworkId) {
        self.created.push(Created::Network(id.clone()));
    }

    pub fn port(&mut self, id: &PortId) {
        self.created.push(Created::Port(id.clone()));
    }

    pub fn forget_tenant(&mut self, id: &TenantId) {
        self.created
            .retain(|c| !matches!(c, Created::Tenant(t) if t == id));
    }

    pub fn forget_network(&mut self, id: &NetworkId) {
        self.created
            .retain(|c| !matches!(c, Created::Network(n) if n == id));
    }

    pub fn forget_port(&mut self, id: &PortId) {
        self.created
            .retain(|c| !matches!(c, Created::Port(p) if p == id));
    }

    /// Number of resources still tracked.
    pub fn len(&self) -> usize {
        self.created.len()
    }

    pub fn is_empty(&self) -> bool {
        self.created.is_empty()
    }
}

impl Drop for Cleanup<'_> {
    fn drop(&mut self) {
        while let Some(resource) = self.created.pop() {
            let result = match &resource {
                Created::Port(id) => self.driver.delete_port(id),
                Created::Network(id) => self.driver.delete_network(id),
                Created::Tenant(id) => self.driver.delete_tenant(id),
            };
            if let Err(e) = result {
                warn!("Cleanup of {:?} failed: {}", resource, e);
            }
        }
    }
}
