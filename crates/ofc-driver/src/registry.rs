//! Driver lookup by configured name.
//!
//! The plugin never names a concrete driver type: it asks the registry to
//! build whatever [`OfcConfig::driver`] selects and holds the result as
//! `Arc<dyn OfcDriver>`. Backends living in other crates register a factory
//! under their name before the config is loaded.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::config::OfcConfig;
use crate::driver::OfcDriver;
use crate::error::{OfcError, OfcResult};
use crate::memory::MemoryDriver;

/// Builds a driver from configuration.
pub type DriverFactory =
    Arc<dyn Fn(&OfcConfig) -> OfcResult<Arc<dyn OfcDriver>> + Send + Sync>;

/// Name of the built-in in-process driver.
pub const MEMORY_DRIVER: &str = "memory";

/// Registered driver factories, keyed by name.
#[derive(Clone)]
pub struct DriverRegistry {
    factories: BTreeMap<String, DriverFactory>,
}

impl DriverRegistry {
    /// Creates a registry holding the built-in drivers.
    pub fn new() -> Self {
        let mut factories: BTreeMap<String, DriverFactory> = BTreeMap::new();
        factories.insert(
            MEMORY_DRIVER.to_string(),
            Arc::new(|config: &OfcConfig| {
                Ok(Arc::new(MemoryDriver::from_config(config)) as Arc<dyn OfcDriver>)
            }),
        );
        Self { factories }
    }

    /// Creates a registry with no drivers at all.
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Registers a driver factory under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`OfcError::DuplicateDriver`] if the name is taken.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> OfcResult<()>
    where
        F: Fn(&OfcConfig) -> OfcResult<Arc<dyn OfcDriver>> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.factories.contains_key(&name) {
            return Err(OfcError::DuplicateDriver { name });
        }
        info!("Registered OFC driver '{}'", name);
        self.factories.insert(name, Arc::new(factory));
        Ok(())
    }

    /// Returns true if a driver is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered driver names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Validates `config` and builds the driver it selects.
    #[instrument(skip(self, config), fields(driver = %config.driver))]
    pub fn load(&self, config: &OfcConfig) -> OfcResult<Arc<dyn OfcDriver>> {
        config.validate()?;

        let factory = self
            .factories
            .get(&config.driver)
            .ok_or_else(|| OfcError::UnknownDriver {
                name: config.driver.clone(),
            })?;

        let driver = factory(config)?;
        info!(
            "Loaded OFC driver '{}' for controller {}",
            driver.name(),
            config.base_url()
        );
        Ok(driver)
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("drivers", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_memory_driver() {
        let registry = DriverRegistry::new();
        assert_eq!(registry.names(), vec!["memory"]);

        let driver = registry.load(&OfcConfig::default()).unwrap();
        assert_eq!(driver.name(), "memory");
    }

    #[test]
    fn test_unknown_driver() {
        let registry = DriverRegistry::new();
        let config = OfcConfig {
            driver: "pfc_v5".to_string(),
            ..OfcConfig::default()
        };
        let err = registry.load(&config).err().unwrap();
        assert!(matches!(err, OfcError::UnknownDriver { ref name } if name == "pfc_v5"));
    }

    #[test]
    fn test_register_external_driver() {
        let mut registry = DriverRegistry::new();
        registry
            .register("trema", |config: &OfcConfig| {
                Ok(Arc::new(MemoryDriver::named("trema", config.id_style)) as Arc<dyn OfcDriver>)
            })
            .unwrap();

        assert_eq!(registry.names(), vec!["memory", "trema"]);
        assert!(registry.contains("trema"));

        let config = OfcConfig {
            driver: "trema".to_string(),
            ..OfcConfig::default()
        };
        assert_eq!(registry.load(&config).unwrap().name(), "trema");
    }

    #[test]
    fn test_duplicate_registration() {
        let mut registry = DriverRegistry::new();
        let err = registry
            .register(MEMORY_DRIVER, |config: &OfcConfig| {
                Ok(Arc::new(MemoryDriver::from_config(config)) as Arc<dyn OfcDriver>)
            })
            .unwrap_err();
        assert!(matches!(err, OfcError::DuplicateDriver { .. }));
    }

    #[test]
    fn test_load_validates_config() {
        let registry = DriverRegistry::new();
        let config = OfcConfig {
            api_max_attempts: 0,
            ..OfcConfig::default()
        };
        assert!(matches!(
            registry.load(&config).err().unwrap(),
            OfcError::InvalidConfig { .. }
        ));
    }

    #[test]
    fn test_memory_driver_ignores_transport_settings() {
        let config = OfcConfig::from_toml_str(
            r#"
            driver = "memory"
            use_ssl = true
            key_file = "/etc/ofc/client.key"
            cert_file = "/etc/ofc/client.crt"
            api_max_attempts = 5
            id_style = "flat"
            "#,
        )
        .unwrap();

        let driver = DriverRegistry::new().load(&config).unwrap();
        let tenant = driver
            .create_tenant("acme", Some(&ofc_types::TenantId::from("t1")))
            .unwrap();
        assert_eq!(tenant.as_str(), "t1");
        driver.delete_tenant(&tenant).unwrap();
    }

    #[test]
    fn test_empty_registry() {
        let registry = DriverRegistry::empty();
        assert!(registry.names().is_empty());
        assert!(registry.load(&OfcConfig::default()).is_err());
    }
}
