//! OpenFlow controller driver contract.
//!
//! A network-virtualization plugin manages tenants, networks and ports on an
//! OpenFlow controller without depending on which controller it is. This
//! crate provides:
//!
//! - [`OfcDriver`]: the operations every controller driver implements
//! - [`OfcError`]: controller and conversion failures
//! - [`RequestContext`]: caller metadata handed to the id conversions
//! - [`OfcConfig`]: driver selection and controller settings (TOML)
//! - [`DriverRegistry`]: builds the configured driver as `Arc<dyn OfcDriver>`
//! - [`MemoryDriver`]: in-process controller model
//!
//! # Example
//!
//! ```
//! use ofc_driver::{DriverRegistry, OfcConfig, OfcDriver};
//!
//! let config = OfcConfig::from_toml_str(r#"driver = "memory""#).unwrap();
//! let driver = DriverRegistry::new().load(&config).unwrap();
//!
//! let tenant = driver.create_tenant("acme", None).unwrap();
//! assert!(tenant.as_str().starts_with("/tenants/"));
//! ```

pub mod config;
pub mod context;
pub mod driver;
pub mod error;
pub mod id_style;
pub mod memory;
pub mod registry;

pub use config::OfcConfig;
pub use context::{IdMapping, RequestContext};
pub use driver::OfcDriver;
pub use error::{OfcError, OfcResult, ResourceKind};
pub use id_style::IdStyle;
pub use memory::{MemoryDriver, MemoryDriverStats};
pub use registry::{DriverFactory, DriverRegistry, MEMORY_DRIVER};

// Re-export the value types so drivers need only this crate.
pub use ofc_types::{
    DatapathId, MacAddress, NetworkId, ParseError, PortId, PortInfo, TenantId, VlanId, OFPP_MAX,
};
