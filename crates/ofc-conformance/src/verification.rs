//! Behavioral checks every OFC driver must pass
//!
//! Each check drives an [`OfcDriver`] through a short sequence of calls and
//! verifies the contract: generated ids are unique, ids round-trip unchanged
//! into deletes, hints never collide with live resources and deleting
//! something the controller does not have is a controller error.

use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;

use ofc_driver::{OfcDriver, OfcError, OfcResult, ResourceKind};
use thiserror::Error;
use tracing::debug;

use crate::fixtures::{
    hint_fixtures, port_fixtures, unknown_fixtures, Cleanup, NETWORK_DESCRIPTION,
    TENANT_DESCRIPTION,
};

/// Number of siblings created by the uniqueness checks.
pub const SIBLING_COUNT: usize = 8;

/// Conformance failure
#[derive(Error, Debug)]
pub enum ConformanceError {
    #[error("{operation} failed: {source}")]
    Driver {
        operation: &'static str,
        #[source]
        source: OfcError,
    },

    #[error("{operation} of unknown {kind} '{id}' succeeded")]
    UnexpectedSuccess {
        operation: &'static str,
        kind: ResourceKind,
        id: String,
    },

    #[error("{operation} failed with a non-controller error: {source}")]
    WrongErrorKind {
        operation: &'static str,
        #[source]
        source: OfcError,
    },

    #[error("Driver returned duplicate {kind} id '{id}'")]
    DuplicateId { kind: ResourceKind, id: String },

    #[error("Reused {kind} hint produced the live id '{id}' again")]
    HintCollision { kind: ResourceKind, id: String },
}

/// Result type for conformance checks
pub type CheckResult = Result<(), ConformanceError>;

/// A named conformance check.
#[derive(Clone, Copy)]
pub struct Check {
    pub name: &'static str,
    pub description: &'static str,
    pub run: fn(&dyn OfcDriver) -> CheckResult,
}

/// All checks, in the order [`crate::run_all`] runs them.
pub const CHECKS: &[Check] = &[
    Check {
        name: "delete_unknown_fails",
        description: "deleting ids the controller never issued is a controller error",
        run: check_delete_unknown_fails,
    },
    Check {
        name: "network_ids_distinct",
        description: "networks created under one tenant get pairwise distinct ids",
        run: check_network_ids_distinct,
    },
    Check {
        name: "port_ids_distinct",
        description: "ports created on one network get pairwise distinct ids",
        run: check_port_ids_distinct,
    },
    Check {
        name: "ids_distinct_across_parents",
        description: "network and port ids are unique controller-wide, not just per parent",
        run: check_ids_distinct_across_parents,
    },
    Check {
        name: "create_delete_round_trip",
        description: "ids returned by create are accepted unchanged by delete",
        run: check_create_delete_round_trip,
    },
    Check {
        name: "hint_never_collides",
        description: "a hint naming a live resource yields a different id",
        run: check_hint_never_collides,
    },
    Check {
        name: "tenant_lifecycle",
        description: "create tenant 'acme', delete it, deleting again fails",
        run: check_tenant_lifecycle,
    },
];

fn step<T>(operation: &'static str, result: OfcResult<T>) -> Result<T, ConformanceError> {
    result.map_err(|source| ConformanceError::Driver { operation, source })
}

/// Verify that a call failed, and failed as a controller error.
fn expect_controller_error<T>(
    operation: &'static str,
    kind: ResourceKind,
    id: &impl Display,
    result: OfcResult<T>,
) -> CheckResult {
    match result {
        Ok(_) => Err(ConformanceError::UnexpectedSuccess {
            operation,
            kind,
            id: id.to_string(),
        }),
        Err(source) if source.is_controller_error() => {
            debug!("{} of {} '{}' refused: {}", operation, kind, id, source);
            Ok(())
        }
        Err(source) => Err(ConformanceError::WrongErrorKind { operation, source }),
    }
}

fn expect_distinct<T: Eq + Hash + Display>(kind: ResourceKind, ids: &[T]) -> CheckResult {
    let mut seen = HashSet::with_capacity(ids.len());
    for id in ids {
        if !seen.insert(id) {
            return Err(ConformanceError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

/// Deleting a tenant, network or port that was never created fails.
pub fn check_delete_unknown_fails(driver: &dyn OfcDriver) -> CheckResult {
    for id in unknown_fixtures::ports() {
        expect_controller_error("delete_port", ResourceKind::Port, &id, driver.delete_port(&id))?;
    }
    for id in unknown_fixtures::networks() {
        expect_controller_error(
            "delete_network",
            ResourceKind::Network,
            &id,
            driver.delete_network(&id),
        )?;
    }
    for id in unknown_fixtures::tenants() {
        expect_controller_error(
            "delete_tenant",
            ResourceKind::Tenant,
            &id,
            driver.delete_tenant(&id),
        )?;
    }
    Ok(())
}

/// Networks created without hints under one tenant never share an id.
pub fn check_network_ids_distinct(driver: &dyn OfcDriver) -> CheckResult {
    let mut cleanup = Cleanup::new(driver);
    let tenant = step("create_tenant", driver.create_tenant(TENANT_DESCRIPTION, None))?;
    cleanup.tenant(&tenant);

    let mut networks = Vec::with_capacity(SIBLING_COUNT);
    for _ in 0..SIBLING_COUNT {
        let network = step(
            "create_network",
            driver.create_network(&tenant, NETWORK_DESCRIPTION, None),
        )?;
        cleanup.network(&network);
        networks.push(network);
    }
    expect_distinct(ResourceKind::Network, &networks)
}

/// Ports created without hints on one network never share an id.
pub fn check_port_ids_distinct(driver: &dyn OfcDriver) -> CheckResult {
    let mut cleanup = Cleanup::new(driver);
    let tenant = step("create_tenant", driver.create_tenant(TENANT_DESCRIPTION, None))?;
    cleanup.tenant(&tenant);
    let network = step(
        "create_network",
        driver.create_network(&tenant, NETWORK_DESCRIPTION, None),
    )?;
    cleanup.network(&network);

    let mut ports = Vec::with_capacity(SIBLING_COUNT);
    for port_no in 1..=SIBLING_COUNT as u32 {
        let port = step(
            "create_port",
            driver.create_port(&network, &port_fixtures::tagged(port_no), None),
        )?;
        cleanup.port(&port);
        ports.push(port);
    }
    expect_distinct(ResourceKind::Port, &ports)
}

/// Network and port ids stay distinct across different parents, with and
/// without a shared hint.
pub fn check_ids_distinct_across_parents(driver: &dyn OfcDriver) -> CheckResult {
    let mut cleanup = Cleanup::new(driver);

    let mut tenants = Vec::with_capacity(2);
    for _ in 0..2 {
        let tenant = step("create_tenant", driver.create_tenant(TENANT_DESCRIPTION, None))?;
        cleanup.tenant(&tenant);
        tenants.push(tenant);
    }

    let network_hint = hint_fixtures::network();
    let mut networks = Vec::with_capacity(4);
    for tenant in &tenants {
        for hint in [None, Some(&network_hint)] {
            let network = step(
                "create_network",
                driver.create_network(tenant, NETWORK_DESCRIPTION, hint),
            )?;
            cleanup.network(&network);
            networks.push(network);
        }
    }
    expect_distinct(ResourceKind::Network, &networks)?;

    let port_hint = hint_fixtures::port();
    let mut ports = Vec::with_capacity(4);
    for (n, network) in networks.iter().step_by(2).enumerate() {
        for (k, hint) in [None, Some(&port_hint)].into_iter().enumerate() {
            let port_no = (n * 2 + k + 1) as u32;
            let port = step(
                "create_port",
                driver.create_port(network, &port_fixtures::tagged(port_no), hint),
            )?;
            cleanup.port(&port);
            ports.push(port);
        }
    }
    expect_distinct(ResourceKind::Port, &ports)
}

/// Every id a create returns is accepted as-is by the matching delete.
pub fn check_create_delete_round_trip(driver: &dyn OfcDriver) -> CheckResult {
    let mut cleanup = Cleanup::new(driver);

    let tenant = step("create_tenant", driver.create_tenant(TENANT_DESCRIPTION, None))?;
    cleanup.tenant(&tenant);
    let network = step(
        "create_network",
        driver.create_network(&tenant, NETWORK_DESCRIPTION, None),
    )?;
    cleanup.network(&network);
    let port = step(
        "create_port",
        driver.create_port(&network, &port_fixtures::untagged(1), None),
    )?;
    cleanup.port(&port);

    step("delete_port", driver.delete_port(&port))?;
    cleanup.forget_port(&port);
    step("delete_network", driver.delete_network(&network))?;
    cleanup.forget_network(&network);
    step("delete_tenant", driver.delete_tenant(&tenant))?;
    cleanup.forget_tenant(&tenant);
    Ok(())
}

/// A hint that already names a live resource produces a different id.
pub fn check_hint_never_collides(driver: &dyn OfcDriver) -> CheckResult {
    let mut cleanup = Cleanup::new(driver);

    let tenant_hint = hint_fixtures::tenant();
    let first = step(
        "create_tenant",
        driver.create_tenant(TENANT_DESCRIPTION, Some(&tenant_hint)),
    )?;
    cleanup.tenant(&first);
    let second = step(
        "create_tenant",
        driver.create_tenant(TENANT_DESCRIPTION, Some(&tenant_hint)),
    )?;
    cleanup.tenant(&second);
    if first == second {
        return Err(ConformanceError::HintCollision {
            kind: ResourceKind::Tenant,
            id: second.to_string(),
        });
    }

    let network_hint = hint_fixtures::network();
    let first_net = step(
        "create_network",
        driver.create_network(&first, NETWORK_DESCRIPTION, Some(&network_hint)),
    )?;
    cleanup.network(&first_net);
    let second_net = step(
        "create_network",
        driver.create_network(&first, NETWORK_DESCRIPTION, Some(&network_hint)),
    )?;
    cleanup.network(&second_net);
    if first_net == second_net {
        return Err(ConformanceError::HintCollision {
            kind: ResourceKind::Network,
            id: second_net.to_string(),
        });
    }

    let port_hint = hint_fixtures::port();
    let first_port = step(
        "create_port",
        driver.create_port(&first_net, &port_fixtures::tagged(1), Some(&port_hint)),
    )?;
    cleanup.port(&first_port);
    let second_port = step(
        "create_port",
        driver.create_port(&first_net, &port_fixtures::tagged(2), Some(&port_hint)),
    )?;
    cleanup.port(&second_port);
    if first_port == second_port {
        return Err(ConformanceError::HintCollision {
            kind: ResourceKind::Port,
            id: second_port.to_string(),
        });
    }
    Ok(())
}

/// Tenant "acme" can be created and deleted once; the second delete fails.
pub fn check_tenant_lifecycle(driver: &dyn OfcDriver) -> CheckResult {
    let mut cleanup = Cleanup::new(driver);
    let tenant = step("create_tenant", driver.create_tenant("acme", None))?;
    cleanup.tenant(&tenant);

    step("delete_tenant", driver.delete_tenant(&tenant))?;
    cleanup.forget_tenant(&tenant);

    expect_controller_error(
        "delete_tenant",
        ResourceKind::Tenant,
        &tenant,
        driver.delete_tenant(&tenant),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ofc_driver::{IdStyle, MemoryDriver, NetworkId, PortId, PortInfo, RequestContext, TenantId};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_checks_have_unique_names() {
        let names: HashSet<_> = CHECKS.iter().map(|c| c.name).collect();
        assert_eq!(names.len(), CHECKS.len());
    }

    #[test]
    fn test_each_check_passes_on_memory_driver() {
        for style in [IdStyle::Path, IdStyle::Flat] {
            let driver = MemoryDriver::with_id_style(style);
            for check in CHECKS {
                (check.run)(&driver)
                    .unwrap_or_else(|e| panic!("{} ({}): {}", check.name, style, e));
            }
            assert_eq!(driver.tenant_count(), 0, "{} left tenants behind", style);
            assert_eq!(driver.network_count(), 0);
            assert_eq!(driver.port_count(), 0);
        }
    }

    #[test]
    fn test_expect_distinct_reports_duplicate() {
        let ids = vec![NetworkId::from("a"), NetworkId::from("b"), NetworkId::from("a")];
        let err = expect_distinct(ResourceKind::Network, &ids).unwrap_err();
        assert_eq!(err.to_string(), "Driver returned duplicate network id 'a'");
    }

    #[test]
    fn test_expect_controller_error_variants() {
        let id = TenantId::from("t");
        let ok: OfcResult<()> = Ok(());
        assert!(matches!(
            expect_controller_error("delete_tenant", ResourceKind::Tenant, &id, ok),
            Err(ConformanceError::UnexpectedSuccess { .. })
        ));

        let not_found: OfcResult<()> = Err(OfcError::not_found(ResourceKind::Tenant, "t"));
        assert!(
            expect_controller_error("delete_tenant", ResourceKind::Tenant, &id, not_found).is_ok()
        );

        let invalid: OfcResult<()> = Err(OfcError::invalid_id("t", "bad"));
        assert!(matches!(
            expect_controller_error("delete_tenant", ResourceKind::Tenant, &id, invalid),
            Err(ConformanceError::WrongErrorKind { .. })
        ));
    }

    /// Driver that hands out the same ids every time.
    struct StuckDriver;

    impl OfcDriver for StuckDriver {
        fn name(&self) -> &str {
            "stuck"
        }

        fn create_tenant(&self, _: &str, _: Option<&TenantId>) -> OfcResult<TenantId> {
            Ok(TenantId::from("t"))
        }

        fn delete_tenant(&self, _: &TenantId) -> OfcResult<()> {
            Ok(())
        }

        fn create_network(
            &self,
            _: &TenantId,
            _: &str,
            _: Option<&NetworkId>,
        ) -> OfcResult<NetworkId> {
            Ok(NetworkId::from("n"))
        }

        fn delete_network(&self, _: &NetworkId) -> OfcResult<()> {
            Ok(())
        }

        fn create_port(
            &self,
            _: &NetworkId,
            _: &PortInfo,
            _: Option<&PortId>,
        ) -> OfcResult<PortId> {
            Ok(PortId::from("p"))
        }

        fn delete_port(&self, _: &PortId) -> OfcResult<()> {
            Ok(())
        }

        fn convert_ofc_tenant_id(&self, _: &RequestContext, id: &TenantId) -> OfcResult<TenantId> {
            Ok(id.clone())
        }

        fn convert_ofc_network_id(
            &self,
            _: &RequestContext,
            id: &NetworkId,
            _: &str,
        ) -> OfcResult<NetworkId> {
            Ok(id.clone())
        }

        fn convert_ofc_port_id(
            &self,
            _: &RequestContext,
            id: &PortId,
            _: &str,
            _: &str,
        ) -> OfcResult<PortId> {
            Ok(id.clone())
        }
    }

    #[test]
    fn test_checks_catch_broken_driver() {
        let driver = StuckDriver;
        assert!(matches!(
            check_delete_unknown_fails(&driver),
            Err(ConformanceError::UnexpectedSuccess { .. })
        ));
        assert!(matches!(
            check_network_ids_distinct(&driver),
            Err(ConformanceError::DuplicateId { kind: ResourceKind::Network, .. })
        ));
        assert!(matches!(
            check_port_ids_distinct(&driver),
            Err(ConformanceError::DuplicateId { kind: ResourceKind::Port, .. })
        ));
        assert!(matches!(
            check_hint_never_collides(&driver),
            Err(ConformanceError::HintCollision { kind: ResourceKind::Tenant, .. })
        ));
        assert!(matches!(
            check_tenant_lifecycle(&driver),
            Err(ConformanceError::UnexpectedSuccess { .. })
        ));
        assert!(matches!(
            check_ids_distinct_across_parents(&driver),
            Err(ConformanceError::DuplicateId { kind: ResourceKind::Network, .. })
        ));
        assert!(check_create_delete_round_trip(&driver).is_ok());
    }

    /// Driver that numbers networks per tenant and ports per network, so
    /// ids only stay unique within their parent.
    #[derive(Default)]
    struct PerParentDriver {
        tenants: Mutex<u32>,
        children: Mutex<HashMap<String, u32>>,
    }

    impl PerParentDriver {
        fn next_child(&self, parent: &str) -> u32 {
            let mut children = self.children.lock().unwrap();
            let counter = children.entry(parent.to_string()).or_insert(0);
            *counter += 1;
            *counter
        }
    }

    impl OfcDriver for PerParentDriver {
        fn name(&self) -> &str {
            "per-parent"
        }

        fn create_tenant(&self, _: &str, _: Option<&TenantId>) -> OfcResult<TenantId> {
            let mut tenants = self.tenants.lock().unwrap();
            *tenants += 1;
            Ok(TenantId::new(format!("tenant-{}", *tenants)))
        }

        fn delete_tenant(&self, _: &TenantId) -> OfcResult<()> {
            Ok(())
        }

        fn create_network(
            &self,
            tenant: &TenantId,
            _: &str,
            _: Option<&NetworkId>,
        ) -> OfcResult<NetworkId> {
            Ok(NetworkId::new(format!("net-{}", self.next_child(tenant.as_str()))))
        }

        fn delete_network(&self, _: &NetworkId) -> OfcResult<()> {
            Ok(())
        }

        fn create_port(
            &self,
            network: &NetworkId,
            _: &PortInfo,
            _: Option<&PortId>,
        ) -> OfcResult<PortId> {
            Ok(PortId::new(format!("port-{}", self.next_child(network.as_str()))))
        }

        fn delete_port(&self, _: &PortId) -> OfcResult<()> {
            Ok(())
        }

        fn convert_ofc_tenant_id(&self, _: &RequestContext, id: &TenantId) -> OfcResult<TenantId> {
            Ok(id.clone())
        }

        fn convert_ofc_network_id(
            &self,
            _: &RequestContext,
            id: &NetworkId,
            _: &str,
        ) -> OfcResult<NetworkId> {
            Ok(id.clone())
        }

        fn convert_ofc_port_id(
            &self,
            _: &RequestContext,
            id: &PortId,
            _: &str,
            _: &str,
        ) -> OfcResult<PortId> {
            Ok(id.clone())
        }
    }

    #[test]
    fn test_per_parent_numbering_is_caught() {
        let driver = PerParentDriver::default();
        assert!(check_network_ids_distinct(&driver).is_ok());
        assert!(check_port_ids_distinct(&driver).is_ok());

        let err = check_ids_distinct_across_parents(&driver).unwrap_err();
        assert!(matches!(
            err,
            ConformanceError::DuplicateId { kind: ResourceKind::Network, ref id } if id == "net-1"
        ));
    }
}
