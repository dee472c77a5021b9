//! Controller-scoped resource identifiers.
//!
//! The ids are opaque to callers: whatever string the driver hands back from
//! a create call must be passed unchanged to the matching delete call. A
//! driver whose controller addresses networks or ports relative to a parent
//! embeds the parent in the id so each one is self-describing.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! ofc_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps a controller-issued id.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

ofc_id!(
    /// Id of a tenant at the OpenFlow controller.
    TenantId
);

ofc_id!(
    /// Id of a network at the OpenFlow controller. Unique controller-wide.
    NetworkId
);

ofc_id!(
    /// Id of a port at the OpenFlow controller. Unique controller-wide.
    PortId
);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ids_are_transparent_strings() {
        let id = NetworkId::new("/tenants/t1/networks/n1");
        assert_eq!(id.as_str(), "/tenants/t1/networks/n1");
        assert_eq!(id.to_string(), "/tenants/t1/networks/n1");
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"/tenants/t1/networks/n1\""
        );
    }

    #[test]
    fn test_conversions() {
        let a: TenantId = "acme".into();
        let b = TenantId::from("acme".to_string());
        assert_eq!(a, b);
        assert_eq!(a.into_inner(), "acme");
        assert!(PortId::new("").is_empty());
    }
}
