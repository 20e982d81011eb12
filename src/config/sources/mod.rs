//! Concrete [`ConfigSource`](super::ConfigSource) implementations.
//!
//! Provides file-based sources (YAML, JSON, TOML) gated by feature flags,
//! the [`parse_config_str`] helper for format-specific deserialization,
//! and [`create_file_source`] for picking a source from a file extension.

pub mod file_source;

use std::path::Path;

use sha2::{Digest, Sha256};

use crate::config::model::Config;
use crate::config::ConfigSource;
use crate::error::RegionNearbyError;
use file_source::FileSource;

#[cfg(any(feature = "yaml", feature = "json", feature = "toml"))]
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[cfg(any(feature = "yaml", feature = "json", feature = "toml"))]
fn boxed<E: std::error::Error + Send + Sync + 'static>(e: E) -> BoxError {
    Box::new(e)
}

/// File names tried in the working directory when no config is given.
pub const CANDIDATES: [&str; 4] = [
    "region-nearby.yaml",
    "region-nearby.yml",
    "region-nearby.json",
    "region-nearby.toml",
];

/// Parse a config string based on file extension.
pub fn parse_config_str(
    ext: &str,
    content: &str,
    path_display: &str,
) -> Result<Config, RegionNearbyError> {
    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => serde_yml::from_str(content).map_err(|e| RegionNearbyError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "json")]
        "json" => serde_json::from_str(content).map_err(|e| RegionNearbyError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "toml")]
        "toml" => toml::from_str(content).map_err(|e| RegionNearbyError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        other => Err(RegionNearbyError::UnsupportedFormat(other.to_string())),
    }
}

/// Compute a lowercase hex-encoded SHA-256 digest.
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

pub fn create_file_source(path: &Path) -> Result<Box<dyn ConfigSource>, RegionNearbyError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => Ok(Box::new(FileSource::new(
            path.to_path_buf(),
            "yaml",
            |content| serde_yml::from_str::<Config>(content).map_err(boxed),
        ))),

        #[cfg(feature = "json")]
        "json" => Ok(Box::new(FileSource::new(
            path.to_path_buf(),
            "json",
            |content| serde_json::from_str::<Config>(content).map_err(boxed),
        ))),

        #[cfg(feature = "toml")]
        "toml" => Ok(Box::new(FileSource::new(
            path.to_path_buf(),
            "toml",
            |content| toml::from_str::<Config>(content).map_err(boxed),
        ))),

        other => Err(RegionNearbyError::UnsupportedFormat(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_is_lowercase_hex() {
        let digest = sha256_hex(b"region-nearby");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(digest, sha256_hex(b"region-nearby"));
        assert_ne!(digest, sha256_hex(b"region-nearby\n"));
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let err = parse_config_str("ini", "", "config.ini").unwrap_err();
        assert!(matches!(err, RegionNearbyError::UnsupportedFormat(ref e) if e == "ini"));
        assert!(create_file_source(Path::new("config.ini")).is_err());
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn parses_yaml() {
        let content = "edge_region: europe-west3\nreplica_regions:\n  - eu-central-1\n  - us-east-1\n";
        let config = parse_config_str("yaml", content, "test.yaml").unwrap();
        assert_eq!(config.edge_region.as_deref(), Some("europe-west3"));
        assert_eq!(config.replica_regions.len(), 2);
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn yaml_parse_error_names_the_file() {
        let err = parse_config_str("yaml", "replica_regions: [", "broken.yaml").unwrap_err();
        assert!(err.to_string().contains("broken.yaml"));
    }
}
