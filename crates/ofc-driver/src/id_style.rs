//! OFC id encodings.
//!
//! Controllers that address networks and ports relative to their tenant need
//! compound ids. The current encoding is a resource path:
//!
//! | Resource | Path style | Flat style |
//! |----------|------------|------------|
//! | tenant   | `/tenants/{t}` | `{t}` |
//! | network  | `/tenants/{t}/networks/{n}` | `{n}` |
//! | port     | `/tenants/{t}/networks/{n}/ports/{p}` | `{p}` |
//!
//! Flat style is the legacy encoding; the conversion operations of
//! [`crate::OfcDriver`] upgrade flat ids to path ids.

use ofc_types::{NetworkId, PortId, TenantId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const TENANTS: &str = "tenants";
const NETWORKS: &str = "networks";
const PORTS: &str = "ports";

/// Which id encoding a driver issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStyle {
    /// Self-describing resource paths.
    #[default]
    Path,
    /// Bare segments (legacy).
    Flat,
}

impl IdStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdStyle::Path => "path",
            IdStyle::Flat => "flat",
        }
    }

    /// Builds a tenant id from its segment.
    pub fn tenant_id(&self, segment: &str) -> TenantId {
        match self {
            IdStyle::Path => TenantId::new(format!("/{}/{}", TENANTS, segment)),
            IdStyle::Flat => TenantId::new(segment),
        }
    }

    /// Builds a network id from its owning tenant id and its segment.
    pub fn network_id(&self, tenant: &TenantId, segment: &str) -> NetworkId {
        match self {
            IdStyle::Path => NetworkId::new(format!("{}/{}/{}", tenant, NETWORKS, segment)),
            IdStyle::Flat => NetworkId::new(segment),
        }
    }

    /// Builds a port id from its owning network id and its segment.
    pub fn port_id(&self, network: &NetworkId, segment: &str) -> PortId {
        match self {
            IdStyle::Path => PortId::new(format!("{}/{}/{}", network, PORTS, segment)),
            IdStyle::Flat => PortId::new(segment),
        }
    }
}

impl fmt::Display for IdStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "path" => Ok(IdStyle::Path),
            "flat" => Ok(IdStyle::Flat),
            other => Err(format!("unknown id style '{}'", other)),
        }
    }
}

/// Returns true if `segment` can stand alone as one path component.
pub fn is_segment(segment: &str) -> bool {
    !segment.is_empty() && !segment.contains('/')
}

/// Splits a path id into its `(collection, segment)` pairs.
///
/// Returns `None` unless the id is `/`-rooted and every collection name is
/// followed by a non-empty segment.
fn path_pairs(id: &str) -> Option<Vec<(&str, &str)>> {
    let parts: Vec<&str> = id.strip_prefix('/')?.split('/').collect();
    if parts.len() % 2 != 0 {
        return None;
    }
    let pairs: Vec<(&str, &str)> = parts.chunks(2).map(|c| (c[0], c[1])).collect();
    if pairs.iter().any(|(_, segment)| segment.is_empty()) {
        return None;
    }
    Some(pairs)
}

fn matches_collections(id: &str, expected: &[&str]) -> bool {
    match path_pairs(id) {
        Some(pairs) => {
            pairs.len() == expected.len()
                && pairs
                    .iter()
                    .zip(expected)
                    .all(|((collection, _), want)| collection == want)
        }
        None => false,
    }
}

/// `/tenants/{t}`
pub fn is_path_tenant(id: &str) -> bool {
    matches_collections(id, &[TENANTS])
}

/// `/tenants/{t}/networks/{n}`
pub fn is_path_network(id: &str) -> bool {
    matches_collections(id, &[TENANTS, NETWORKS])
}

/// `/tenants/{t}/networks/{n}/ports/{p}`
pub fn is_path_port(id: &str) -> bool {
    matches_collections(id, &[TENANTS, NETWORKS, PORTS])
}

/// Returns the trailing segment of a path id, or the id itself if flat.
pub fn last_segment(id: &str) -> &str {
    id.rsplit('/').next().unwrap_or(id)
}
