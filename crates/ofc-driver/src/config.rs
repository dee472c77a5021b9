//! Driver selection and controller connection settings.
//!
//! Loaded from a TOML file. Every field has a default, so an empty file (or
//! none at all, via [`OfcConfig::load_or_default`]) yields a usable config
//! selecting the in-process `memory` driver.
//!
//! ```toml
//! driver = "memory"
//! host = "10.0.0.5"
//! port = 8888
//! use_ssl = true
//! key_file = "/etc/ofc/client.key"
//! cert_file = "/etc/ofc/client.crt"
//! api_max_attempts = 3
//! id_style = "path"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{OfcError, OfcResult};
use crate::id_style::IdStyle;

/// Controller driver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OfcConfig {
    /// Registry name of the driver to load.
    #[serde(default = "default_driver")]
    pub driver: String,

    /// Controller host. Network-backed drivers connect here; the memory
    /// driver only logs it.
    #[serde(default = "default_host")]
    pub host: String,

    /// Controller port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Talk to the controller over TLS.
    ///
    /// Reserved for network-backed drivers registered through
    /// [`DriverRegistry`](crate::DriverRegistry), as are `key_file`,
    /// `cert_file` and `api_max_attempts`. The memory driver ignores all four;
    /// [`OfcConfig::validate`] still checks them.
    #[serde(default)]
    pub use_ssl: bool,

    /// Client private key for TLS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_file: Option<PathBuf>,

    /// Client certificate for TLS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_file: Option<PathBuf>,

    /// Attempts a driver may make for one request.
    #[serde(default = "default_api_max_attempts")]
    pub api_max_attempts: u32,

    /// Id encoding issued by drivers that support more than one.
    #[serde(default)]
    pub id_style: IdStyle,
}

fn default_driver() -> String {
    "memory".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8888
}

fn default_api_max_attempts() -> u32 {
    3
}

impl Default for OfcConfig {
    fn default() -> Self {
        Self {
            driver: default_driver(),
            host: default_host(),
            port: default_port(),
            use_ssl: false,
            key_file: None,
            cert_file: None,
            api_max_attempts: default_api_max_attempts(),
            id_style: IdStyle::default(),
        }
    }
}

impl OfcConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(content: &str) -> OfcResult<Self> {
        toml::from_str(content).map_err(|e| OfcError::ConfigParse {
            message: e.to_string(),
        })
    }

    /// Loads configuration from a file.
    pub fn load(path: impl AsRef<Path>) -> OfcResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| OfcError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Loads configuration from a file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> OfcResult<Self> {
        let path = path.as_ref();
        match Self::load(path) {
            Err(OfcError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                info!("Config file {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Saves configuration to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> OfcResult<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| OfcError::ConfigParse {
            message: format!("Failed to serialize config: {}", e),
        })?;
        fs::write(path, content).map_err(|source| OfcError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Base URL of the controller API.
    pub fn base_url(&self) -> String {
        let scheme = if self.use_ssl { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }

    /// Validates configuration.
    pub fn validate(&self) -> OfcResult<()> {
        if self.driver.trim().is_empty() {
            return Err(OfcError::invalid_config("driver", "must not be empty"));
        }

        if self.host.trim().is_empty() {
            return Err(OfcError::invalid_config("host", "must not be empty"));
        }

        if self.port == 0 {
            return Err(OfcError::invalid_config("port", "must be > 0"));
        }

        if self.api_max_attempts == 0 {
            return Err(OfcError::invalid_config("api_max_attempts", "must be >= 1"));
        }

        match (&self.key_file, &self.cert_file) {
            (Some(_), None) => Err(OfcError::invalid_config(
                "cert_file",
                "required when key_file is set",
            )),
            (None, Some(_)) => Err(OfcError::invalid_config(
                "key_file",
                "required when cert_file is set",
            )),
            _ => Ok(()),
        }
    }
}
