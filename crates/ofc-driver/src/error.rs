//! Error types for OpenFlow controller driver operations.
//!
//! Every failure a controller reports is a *controller error*: the caller
//! cannot tell from the contract alone whether the backend was unreachable,
//! refused a duplicate, or had no such resource. The variants below refine
//! that for callers who care; [`OfcError::is_controller_error`] collapses them
//! back into the single contract-level kind.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for driver operations.
pub type OfcResult<T> = Result<T, OfcError>;

/// The three levels of the controller resource hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Tenant,
    Network,
    Port,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Tenant => "tenant",
            ResourceKind::Network => "network",
            ResourceKind::Port => "port",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by drivers, the registry and configuration loading.
#[derive(Debug, Error)]
pub enum OfcError {
    /// The controller rejected or failed the request.
    #[error("OpenFlow controller error: {reason}")]
    Controller {
        reason: String,
        /// HTTP-like status reported by the controller, if any.
        status: Option<u16>,
        /// Controller-specific error code, if any.
        err_code: Option<String>,
    },

    /// The addressed resource (or the parent of one being created) does not
    /// exist at the controller.
    #[error("OFC {resource} '{id}' not found")]
    NotFound { resource: ResourceKind, id: String },

    /// The controller refused because of existing state: a duplicate id, or
    /// a resource that still has children.
    #[error("OFC {resource} '{id}' conflict: {reason}")]
    Conflict {
        resource: ResourceKind,
        id: String,
        reason: String,
    },

    /// The controller could not be reached or asked the caller to back off.
    #[error("OpenFlow controller unavailable{}", retry_hint(.retry_after))]
    ServiceUnavailable {
        /// Seconds the controller asked the caller to wait.
        retry_after: Option<u64>,
    },

    /// An id conversion could not find the OFC id the caller holds for its
    /// own resource.
    #[error("no OFC {resource} id mapped for '{id}'")]
    MappingNotFound { resource: ResourceKind, id: String },

    /// An id given to a conversion is not in any recognized format.
    #[error("invalid OFC id '{id}': {reason}")]
    InvalidId { id: String, reason: String },

    /// Configuration validation error.
    #[error("Invalid configuration for {field}: {message}")]
    InvalidConfig { field: String, message: String },

    /// No driver is registered under the configured name.
    #[error("unknown OFC driver '{name}'")]
    UnknownDriver { name: String },

    /// A driver factory was registered twice under one name.
    #[error("OFC driver '{name}' is already registered")]
    DuplicateDriver { name: String },

    /// Failed to read or write a configuration file.
    #[error("Failed to access config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration file is not valid TOML for [`crate::OfcConfig`].
    #[error("Failed to parse config: {message}")]
    ConfigParse { message: String },
}

fn retry_hint(retry_after: &Option<u64>) -> String {
    match retry_after {
        Some(secs) => format!(" (retry after {}s)", secs),
        None => String::new(),
    }
}

impl OfcError {
    /// Creates a generic controller error.
    pub fn controller(reason: impl Into<String>) -> Self {
        Self::Controller {
            reason: reason.into(),
            status: None,
            err_code: None,
        }
    }

    /// Creates a not-found error.
    pub fn not_found(resource: ResourceKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Creates a conflict error.
    pub fn conflict(
        resource: ResourceKind,
        id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Conflict {
            resource,
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Creates a mapping-not-found error.
    pub fn mapping_not_found(resource: ResourceKind, id: impl Into<String>) -> Self {
        Self::MappingNotFound {
            resource,
            id: id.into(),
        }
    }

    /// Creates an invalid-id error.
    pub fn invalid_id(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidId {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns true for failures the controller itself reported.
    ///
    /// Conversion and configuration failures are raised locally and are
    /// not controller errors.
    pub fn is_controller_error(&self) -> bool {
        matches!(
            self,
            OfcError::Controller { .. }
                | OfcError::NotFound { .. }
                | OfcError::Conflict { .. }
                | OfcError::ServiceUnavailable { .. }
        )
    }

    /// Returns true if this error indicates a transient condition
    /// that may succeed on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, OfcError::ServiceUnavailable { .. })
    }

    /// Returns the controller status code carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            OfcError::Controller { status, .. } => *status,
            OfcError::NotFound { .. } => Some(404),
            OfcError::Conflict { .. } => Some(409),
            OfcError::ServiceUnavailable { .. } => Some(503),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_display() {
        let err = OfcError::not_found(ResourceKind::Network, "/tenants/t/networks/n");
        assert_eq!(err.to_string(), "OFC network '/tenants/t/networks/n' not found");

        let err = OfcError::ServiceUnavailable {
            retry_after: Some(10),
        };
        assert_eq!(
            err.to_string(),
            "OpenFlow controller unavailable (retry after 10s)"
        );

        let err = OfcError::ServiceUnavailable { retry_after: None };
        assert_eq!(err.to_string(), "OpenFlow controller unavailable");
    }

    #[test]
    fn test_controller_error_classification() {
        assert!(OfcError::controller("refused").is_controller_error());
        assert!(OfcError::not_found(ResourceKind::Tenant, "t").is_controller_error());
        assert!(OfcError::conflict(ResourceKind::Tenant, "t", "busy").is_controller_error());
        assert!(!OfcError::mapping_not_found(ResourceKind::Tenant, "t").is_controller_error());
        assert!(!OfcError::invalid_id("", "empty").is_controller_error());
        assert!(!OfcError::invalid_config("port", "must be > 0").is_controller_error());
    }

    #[test]
    fn test_is_retryable() {
        assert!(OfcError::ServiceUnavailable { retry_after: None }.is_retryable());
        assert!(!OfcError::controller("bad request").is_retryable());
        assert!(!OfcError::not_found(ResourceKind::Port, "p").is_retryable());
    }

    #[test]
    fn test_status() {
        let err = OfcError::Controller {
            reason: "bad request".to_string(),
            status: Some(400),
            err_code: Some("E0001".to_string()),
        };
        assert_eq!(err.status(), Some(400));
        assert_eq!(OfcError::not_found(ResourceKind::Port, "p").status(), Some(404));
        assert_eq!(OfcError::invalid_id("x", "y").status(), None);
    }
}
