//! Caller-scoped request metadata.

use ofc_types::{NetworkId, TenantId};
use std::collections::HashMap;
use uuid::Uuid;

/// The caller's record of which OFC ids it holds for its own resources.
///
/// The orchestration layer keys tenants and networks by its own ids; the
/// conversion operations need the matching OFC id of a port's or network's
/// owner to build a compound id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdMapping {
    tenants: HashMap<String, TenantId>,
    networks: HashMap<String, NetworkId>,
}

impl IdMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the OFC tenant id held for `tenant_id`.
    pub fn insert_tenant(&mut self, tenant_id: impl Into<String>, ofc_tenant_id: TenantId) {
        self.tenants.insert(tenant_id.into(), ofc_tenant_id);
    }

    /// Records the OFC network id held for `network_id`.
    pub fn insert_network(&mut self, network_id: impl Into<String>, ofc_network_id: NetworkId) {
        self.networks.insert(network_id.into(), ofc_network_id);
    }

    pub fn with_tenant(mut self, tenant_id: impl Into<String>, ofc_tenant_id: TenantId) -> Self {
        self.insert_tenant(tenant_id, ofc_tenant_id);
        self
    }

    pub fn with_network(
        mut self,
        network_id: impl Into<String>,
        ofc_network_id: NetworkId,
    ) -> Self {
        self.insert_network(network_id, ofc_network_id);
        self
    }

    pub fn ofc_tenant_id(&self, tenant_id: &str) -> Option<&TenantId> {
        self.tenants.get(tenant_id)
    }

    pub fn ofc_network_id(&self, network_id: &str) -> Option<&NetworkId> {
        self.networks.get(network_id)
    }
}

/// Identity and lookup state of the request that triggered a driver call.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: Uuid,
    tenant_id: Option<String>,
    is_admin: bool,
    id_mapping: IdMapping,
}

impl RequestContext {
    /// Creates an anonymous, non-admin context with an empty mapping.
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            tenant_id: None,
            is_admin: false,
            id_mapping: IdMapping::default(),
        }
    }

    /// Creates an admin context.
    pub fn admin() -> Self {
        Self {
            is_admin: true,
            ..Self::new()
        }
    }

    /// Creates a context acting on behalf of `tenant_id`.
    pub fn for_tenant(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: Some(tenant_id.into()),
            ..Self::new()
        }
    }

    pub fn with_mapping(mut self, id_mapping: IdMapping) -> Self {
        self.id_mapping = id_mapping;
        self
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn tenant_id(&self) -> Option<&str> {
        self.tenant_id.as_deref()
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn id_mapping(&self) -> &IdMapping {
        &self.id_mapping
    }

    pub fn id_mapping_mut(&mut self) -> &mut IdMapping {
        &mut self.id_mapping
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
