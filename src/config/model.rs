//! Serde data structures for the region-nearby configuration file.
//!
//! [`Config`] is the root. Region names stay plain strings here and are
//! checked by [`validate`](super::validation::validate), which reports
//! every bad entry at once instead of failing on the first.

use serde::{Deserialize, Serialize};

use crate::region::{AwsRegion, EdgeRegion};

pub const fn default_timeout() -> u64 {
    5000
}

fn is_default_timeout(v: &u64) -> bool {
    *v == default_timeout()
}

fn is_default_downstream(v: &Downstream) -> bool {
    matches!(v, Downstream::Resolver)
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Edge region this instance is deployed in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_region: Option<String>,

    /// AWS regions holding a replica. Empty means every region.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replica_regions: Vec<String>,

    #[serde(default, skip_serializing_if = "is_default_downstream")]
    pub downstream: Downstream,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Downstream {
    /// Resolve the nearest region in-process.
    #[default]
    Resolver,

    /// Relay the forwarded request to a remote HTTP service.
    Upstream {
        url: String,

        #[serde(
            default = "default_timeout",
            skip_serializing_if = "is_default_timeout"
        )]
        timeout: u64,
    },
}

impl Downstream {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Resolver => "resolver",
            Self::Upstream { .. } => "upstream",
        }
    }
}

impl Config {
    /// Parsed edge region. Call after validation; unknown names yield `None`.
    #[must_use]
    pub fn edge_region(&self) -> Option<EdgeRegion> {
        self.edge_region.as_deref().and_then(|r| r.parse().ok())
    }

    /// Parsed replica regions, falling back to the full catalogue when
    /// none are configured. Call after validation; unknown names are skipped.
    #[must_use]
    pub fn replica_regions(&self) -> Vec<AwsRegion> {
        if self.replica_regions.is_empty() {
            return AwsRegion::iter().collect();
        }
        self.replica_regions
            .iter()
            .filter_map(|r| r.parse().ok())
            .collect()
    }
}
