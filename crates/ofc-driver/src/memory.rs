//! In-process OpenFlow controller model.
//!
//! `MemoryDriver` keeps the tenant/network/port hierarchy the way a
//! controller would and enforces the same refusals a controller makes:
//! unknown parents, deleting resources that still have children, deleting
//! twice. It backs the conformance suite and lets the plugin run without a
//! controller.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use ofc_types::{NetworkId, PortId, PortInfo, TenantId};

use crate::config::OfcConfig;
use crate::context::RequestContext;
use crate::driver::OfcDriver;
use crate::error::{OfcError, OfcResult, ResourceKind};
use crate::id_style::{self, IdStyle};

#[derive(Debug, Clone)]
struct TenantRecord {
    description: String,
}

#[derive(Debug, Clone)]
struct NetworkRecord {
    tenant: TenantId,
    description: String,
}

#[derive(Debug, Clone)]
struct PortRecord {
    network: NetworkId,
    info: PortInfo,
}

#[derive(Debug, Default)]
struct ControllerState {
    tenants: HashMap<TenantId, TenantRecord>,
    networks: HashMap<NetworkId, NetworkRecord>,
    ports: HashMap<PortId, PortRecord>,
}

/// Operation counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryDriverStats {
    pub tenants_created: u64,
    pub networks_created: u64,
    pub ports_created: u64,
    /// Requests the controller refused.
    pub refused: u64,
}

/// Reference driver holding controller state in memory.
///
/// Safe to share between threads; every operation runs under one lock so
/// the hierarchy checks and the mutation are atomic.
#[derive(Debug)]
pub struct MemoryDriver {
    name: String,
    id_style: IdStyle,
    state: Mutex<ControllerState>,
    stats: Mutex<MemoryDriverStats>,
}

impl MemoryDriver {
    /// Creates a driver issuing path-style ids.
    pub fn new() -> Self {
        Self::with_id_style(IdStyle::Path)
    }

    pub fn with_id_style(id_style: IdStyle) -> Self {
        Self::named(crate::registry::MEMORY_DRIVER, id_style)
    }

    /// Creates a driver reporting `name` in logs.
    pub fn named(name: impl Into<String>, id_style: IdStyle) -> Self {
        Self {
            name: name.into(),
            id_style,
            state: Mutex::new(ControllerState::default()),
            stats: Mutex::new(MemoryDriverStats::default()),
        }
    }

    pub fn from_config(config: &OfcConfig) -> Self {
        Self::with_id_style(config.id_style)
    }

    pub fn id_style(&self) -> IdStyle {
        self.id_style
    }

    // A panic while holding the lock cannot leave the maps half-updated:
    // every mutation is a single insert or remove.
    fn state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn bump(&self, update: impl FnOnce(&mut MemoryDriverStats)) {
        update(&mut self.stats.lock().unwrap_or_else(PoisonError::into_inner));
    }

    fn refuse(&self, err: OfcError) -> OfcError {
        warn!("{} refused: {}", self.name, err);
        self.bump(|s| s.refused = s.refused.saturating_add(1));
        err
    }

    pub fn stats(&self) -> MemoryDriverStats {
        *self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn tenant_count(&self) -> usize {
        self.state().tenants.len()
    }

    pub fn network_count(&self) -> usize {
        self.state().networks.len()
    }

    pub fn port_count(&self) -> usize {
        self.state().ports.len()
    }

    pub fn tenant_exists(&self, id: &TenantId) -> bool {
        self.state().tenants.contains_key(id)
    }

    pub fn network_exists(&self, id: &NetworkId) -> bool {
        self.state().networks.contains_key(id)
    }

    pub fn port_exists(&self, id: &PortId) -> bool {
        self.state().ports.contains_key(id)
    }

    pub fn tenant_description(&self, id: &TenantId) -> Option<String> {
        self.state().tenants.get(id).map(|t| t.description.clone())
    }

    pub fn network_description(&self, id: &NetworkId) -> Option<String> {
        self.state().networks.get(id).map(|n| n.description.clone())
    }

    /// Owning tenant of a live network.
    pub fn network_tenant(&self, id: &NetworkId) -> Option<TenantId> {
        self.state().networks.get(id).map(|n| n.tenant.clone())
    }

    /// Owning network of a live port.
    pub fn port_network(&self, id: &PortId) -> Option<NetworkId> {
        self.state().ports.get(id).map(|p| p.network.clone())
    }

    /// Port descriptor a live port was created with.
    pub fn port_info(&self, id: &PortId) -> Option<PortInfo> {
        self.state().ports.get(id).map(|p| p.info)
    }

    /// Picks an unused id: the hint if it is a usable segment and the id it
    /// yields is free, otherwise a generated one.
    fn allocate<T>(
        kind: ResourceKind,
        hint: Option<&str>,
        build: impl Fn(&str) -> T,
        in_use: impl Fn(&T) -> bool,
    ) -> T {
        if let Some(hint) = hint {
            if id_style::is_segment(hint) {
                let id = build(hint);
                if !in_use(&id) {
                    return id;
                }
                debug!("{} id hint '{}' is in use, generating a new id", kind, hint);
            } else {
                debug!("Ignoring unusable {} id hint '{}'", kind, hint);
            }
        }

        loop {
            let id = build(&Uuid::new_v4().simple().to_string());
            if !in_use(&id) {
                return id;
            }
        }
    }

    fn require_id(raw: &str) -> OfcResult<()> {
        if raw.is_empty() {
            return Err(OfcError::invalid_id(raw, "id is empty"));
        }
        Ok(())
    }

    /// Checks that an old-style id is a bare segment.
    fn require_segment(raw: &str) -> OfcResult<()> {
        Self::require_id(raw)?;
        if !id_style::is_segment(raw) {
            return Err(OfcError::invalid_id(
                raw,
                "neither a current-style id nor a bare legacy id",
            ));
        }
        Ok(())
    }
}

impl Default for MemoryDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl OfcDriver for MemoryDriver {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(driver = %self.name))]
    fn create_tenant(
        &self,
        description: &str,
        tenant_id: Option<&TenantId>,
    ) -> OfcResult<TenantId> {
        let mut state = self.state();
        let id = Self::allocate(
            ResourceKind::Tenant,
            tenant_id.map(TenantId::as_str),
            |segment| self.id_style.tenant_id(segment),
            |id| state.tenants.contains_key(id),
        );
        state.tenants.insert(
            id.clone(),
            TenantRecord {
                description: description.to_string(),
            },
        );
        drop(state);

        self.bump(|s| s.tenants_created = s.tenants_created.saturating_add(1));
        info!("Created OFC tenant {}", id);
        Ok(id)
    }

    #[instrument(skip(self), fields(driver = %self.name))]
    fn delete_tenant(&self, ofc_tenant_id: &TenantId) -> OfcResult<()> {
        let mut state = self.state();
        if !state.tenants.contains_key(ofc_tenant_id) {
            return Err(self.refuse(OfcError::not_found(
                ResourceKind::Tenant,
                ofc_tenant_id.as_str(),
            )));
        }

        let networks = state
            .networks
            .values()
            .filter(|n| &n.tenant == ofc_tenant_id)
            .count();
        if networks > 0 {
            return Err(self.refuse(OfcError::conflict(
                ResourceKind::Tenant,
                ofc_tenant_id.as_str(),
                format!("tenant still has {} network(s)", networks),
            )));
        }

        state.tenants.remove(ofc_tenant_id);
        info!("Deleted OFC tenant {}", ofc_tenant_id);
        Ok(())
    }

    #[instrument(skip(self), fields(driver = %self.name))]
    fn create_network(
        &self,
        ofc_tenant_id: &TenantId,
        description: &str,
        network_id: Option<&NetworkId>,
    ) -> OfcResult<NetworkId> {
        let mut state = self.state();
        if !state.tenants.contains_key(ofc_tenant_id) {
            return Err(self.refuse(OfcError::not_found(
                ResourceKind::Tenant,
                ofc_tenant_id.as_str(),
            )));
        }

        let id = Self::allocate(
            ResourceKind::Network,
            network_id.map(NetworkId::as_str),
            |segment| self.id_style.network_id(ofc_tenant_id, segment),
            |id| state.networks.contains_key(id),
        );
        state.networks.insert(
            id.clone(),
            NetworkRecord {
                tenant: ofc_tenant_id.clone(),
                description: description.to_string(),
            },
        );
        drop(state);

        self.bump(|s| s.networks_created = s.networks_created.saturating_add(1));
        info!("Created OFC network {} in tenant {}", id, ofc_tenant_id);
        Ok(id)
    }

    #[instrument(skip(self), fields(driver = %self.name))]
    fn delete_network(&self, ofc_network_id: &NetworkId) -> OfcResult<()> {
        let mut state = self.state();
        if !state.networks.contains_key(ofc_network_id) {
            return Err(self.refuse(OfcError::not_found(
                ResourceKind::Network,
                ofc_network_id.as_str(),
            )));
        }

        let ports = state
            .ports
            .values()
            .filter(|p| &p.network == ofc_network_id)
            .count();
        if ports > 0 {
            return Err(self.refuse(OfcError::conflict(
                ResourceKind::Network,
                ofc_network_id.as_str(),
                format!("network still has {} port(s)", ports),
            )));
        }

        state.networks.remove(ofc_network_id);
        info!("Deleted OFC network {}", ofc_network_id);
        Ok(())
    }

    #[instrument(skip(self), fields(driver = %self.name))]
    fn create_port(
        &self,
        ofc_network_id: &NetworkId,
        port_info: &PortInfo,
        port_id: Option<&PortId>,
    ) -> OfcResult<PortId> {
        let mut state = self.state();
        if !state.networks.contains_key(ofc_network_id) {
            return Err(self.refuse(OfcError::not_found(
                ResourceKind::Network,
                ofc_network_id.as_str(),
            )));
        }

        let id = Self::allocate(
            ResourceKind::Port,
            port_id.map(PortId::as_str),
            |segment| self.id_style.port_id(ofc_network_id, segment),
            |id| state.ports.contains_key(id),
        );
        state.ports.insert(
            id.clone(),
            PortRecord {
                network: ofc_network_id.clone(),
                info: *port_info,
            },
        );
        drop(state);

        self.bump(|s| s.ports_created = s.ports_created.saturating_add(1));
        info!("Created OFC port {} ({})", id, port_info);
        Ok(id)
    }

    #[instrument(skip(self), fields(driver = %self.name))]
    fn delete_port(&self, ofc_port_id: &PortId) -> OfcResult<()> {
        let removed = self.state().ports.remove(ofc_port_id);
        match removed {
            Some(record) => {
                info!("Deleted OFC port {} from network {}", ofc_port_id, record.network);
                Ok(())
            }
            None => Err(self.refuse(OfcError::not_found(
                ResourceKind::Port,
                ofc_port_id.as_str(),
            ))),
        }
    }

    #[instrument(skip(self, context), fields(request_id = %context.request_id()))]
    fn convert_ofc_tenant_id(
        &self,
        context: &RequestContext,
        ofc_tenant_id: &TenantId,
    ) -> OfcResult<TenantId> {
        let raw = ofc_tenant_id.as_str();
        Self::require_id(raw)?;

        if self.id_style == IdStyle::Flat || id_style::is_path_tenant(raw) {
            return Ok(ofc_tenant_id.clone());
        }

        Self::require_segment(raw)?;
        let converted = self.id_style.tenant_id(raw);
        debug!("Converted OFC tenant id {} -> {}", raw, converted);
        Ok(converted)
    }

    #[instrument(skip(self, context), fields(request_id = %context.request_id()))]
    fn convert_ofc_network_id(
        &self,
        context: &RequestContext,
        ofc_network_id: &NetworkId,
        tenant_id: &str,
    ) -> OfcResult<NetworkId> {
        let raw = ofc_network_id.as_str();
        Self::require_id(raw)?;

        if self.id_style == IdStyle::Flat || id_style::is_path_network(raw) {
            return Ok(ofc_network_id.clone());
        }

        Self::require_segment(raw)?;
        let ofc_tenant_id = context
            .id_mapping()
            .ofc_tenant_id(tenant_id)
            .ok_or_else(|| OfcError::mapping_not_found(ResourceKind::Tenant, tenant_id))?;
        let tenant = self.convert_ofc_tenant_id(context, ofc_tenant_id)?;

        let converted = self.id_style.network_id(&tenant, raw);
        debug!("Converted OFC network id {} -> {}", raw, converted);
        Ok(converted)
    }

    #[instrument(skip(self, context), fields(request_id = %context.request_id()))]
    fn convert_ofc_port_id(
        &self,
        context: &RequestContext,
        ofc_port_id: &PortId,
        tenant_id: &str,
        network_id: &str,
    ) -> OfcResult<PortId> {
        let raw = ofc_port_id.as_str();
        Self::require_id(raw)?;

        if self.id_style == IdStyle::Flat || id_style::is_path_port(raw) {
            return Ok(ofc_port_id.clone());
        }

        Self::require_segment(raw)?;
        let ofc_network_id = context
            .id_mapping()
            .ofc_network_id(network_id)
            .ok_or_else(|| OfcError::mapping_not_found(ResourceKind::Network, network_id))?;
        let network = self.convert_ofc_network_id(context, ofc_network_id, tenant_id)?;

        let converted = self.id_style.port_id(&network, raw);
        debug!("Converted OFC port id {} -> {}", raw, converted);
        Ok(converted)
    }
}
