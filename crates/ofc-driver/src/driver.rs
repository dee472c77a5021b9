//! The OpenFlow controller driver contract.

use ofc_types::{NetworkId, PortId, PortInfo, TenantId};

use crate::context::RequestContext;
use crate::error::OfcResult;

/// Operations a network-virtualization plugin needs from an OpenFlow
/// controller backend.
///
/// The plugin manages a three-level hierarchy (tenant, network, port) through
/// create/delete pairs. Ids returned by a `create_*` call are opaque to the
/// caller and must be accepted unchanged by the matching `delete_*` call. If
/// the controller addresses a network or port relative to its parent, the
/// driver embeds that parent in the returned id so it stays self-describing.
///
/// The `convert_*` operations are migration shims: they translate ids
/// issued in an older encoding into the encoding the driver issues now.
///
/// Every call is a single blocking request to the controller. The contract
/// defines no retry, ordering or compensation behavior; callers should assume
/// one call at a time unless a driver documents otherwise.
///
/// # Example
///
/// ```
/// use ofc_driver::{MemoryDriver, OfcDriver};
///
/// let driver = MemoryDriver::new();
/// let tenant = driver.create_tenant("acme", None).unwrap();
/// let network = driver.create_network(&tenant, "backend", None).unwrap();
/// driver.delete_network(&network).unwrap();
/// driver.delete_tenant(&tenant).unwrap();
/// assert!(driver.delete_tenant(&tenant).unwrap_err().is_controller_error());
/// ```
pub trait OfcDriver: Send + Sync {
    /// Returns the driver name (for logging).
    fn name(&self) -> &str;

    /// Creates a tenant at the controller.
    ///
    /// `tenant_id` is a hint: a driver may issue it as the OFC id or ignore
    /// it, but never returns an id of a live tenant.
    fn create_tenant(&self, description: &str, tenant_id: Option<&TenantId>) -> OfcResult<TenantId>;

    /// Deletes a tenant at the controller.
    fn delete_tenant(&self, ofc_tenant_id: &TenantId) -> OfcResult<()>;

    /// Creates a network in `ofc_tenant_id`.
    ///
    /// The returned id is unique in the controller.
    fn create_network(
        &self,
        ofc_tenant_id: &TenantId,
        description: &str,
        network_id: Option<&NetworkId>,
    ) -> OfcResult<NetworkId>;

    /// Deletes a network at the controller.
    fn delete_network(&self, ofc_network_id: &NetworkId) -> OfcResult<()>;

    /// Creates a port on `ofc_network_id` attached where `port_info` says.
    ///
    /// The returned id is unique in the controller.
    fn create_port(
        &self,
        ofc_network_id: &NetworkId,
        port_info: &PortInfo,
        port_id: Option<&PortId>,
    ) -> OfcResult<PortId>;

    /// Deletes a port at the controller.
    fn delete_port(&self, ofc_port_id: &PortId) -> OfcResult<()>;

    /// Converts an old-style OFC tenant id to the current style.
    fn convert_ofc_tenant_id(
        &self,
        context: &RequestContext,
        ofc_tenant_id: &TenantId,
    ) -> OfcResult<TenantId>;

    /// Converts an old-style OFC network id to the current style.
    ///
    /// `tenant_id` is the caller's id of the tenant owning the network.
    fn convert_ofc_network_id(
        &self,
        context: &RequestContext,
        ofc_network_id: &NetworkId,
        tenant_id: &str,
    ) -> OfcResult<NetworkId>;

    /// Converts an old-style OFC port id to the current style.
    ///
    /// `tenant_id` and `network_id` are the caller's ids of the tenant and
    /// network owning the port.
    fn convert_ofc_port_id(
        &self,
        context: &RequestContext,
        ofc_port_id: &PortId,
        tenant_id: &str,
        network_id: &str,
    ) -> OfcResult<PortId>;
}
