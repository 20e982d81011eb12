//! Configuration loading, validation, and hot-reloading.
//!
//! Defines the [`ConfigSource`] trait for pluggable config backends, the
//! [`ConfigVersion`] enum for change detection, and [`Overrides`] for
//! values supplied on the command line or through the environment.
//! Submodules provide the data model, validation logic, and concrete
//! source implementations.

pub mod model;
pub mod sources;
pub mod validation;

use async_trait::async_trait;

use crate::error::RegionNearbyError;
use model::{Config, Downstream};

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigVersion {
    Hash(String),
}

impl ConfigVersion {
    /// First eight characters, for logs and the health report.
    #[must_use]
    pub fn short(&self) -> &str {
        match self {
            Self::Hash(h) => h.get(..8).unwrap_or(h),
        }
    }
}

// async_trait is required here because ConfigSource is used as Box<dyn ConfigSource>
// and native async fn in traits does not support dyn dispatch.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn load(&self) -> Result<(Config, ConfigVersion), RegionNearbyError>;
    async fn has_changed(&self, current: &ConfigVersion) -> Result<bool, RegionNearbyError>;
}

/// Values that take precedence over whatever the config source says.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub edge_region: Option<String>,
    pub replica_regions: Vec<String>,
    pub timeout: Option<u64>,
}

impl Overrides {
    /// Apply the overrides and re-validate the result.
    pub fn apply(&self, mut config: Config) -> Result<Config, RegionNearbyError> {
        if let Some(ref edge) = self.edge_region {
            config.edge_region = Some(edge.clone());
        }
        if !self.replica_regions.is_empty() {
            config.replica_regions.clone_from(&self.replica_regions);
        }
        match (self.timeout, &mut config.downstream) {
            (Some(ms), Downstream::Upstream { timeout, .. }) => *timeout = ms,
            (Some(ms), Downstream::Resolver) => {
                tracing::debug!(
                    timeout_ms = ms,
                    "timeout override ignored, the resolver downstream has no timeout"
                );
            }
            (None, _) => {}
        }

        validation::validate(&config)
            .map_err(|errors| RegionNearbyError::ConfigValidation { errors })?;
        Ok(config)
    }
}
