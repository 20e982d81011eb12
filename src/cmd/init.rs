//! `region-nearby init`: generate a starter configuration file.
//!
//! Writes a YAML, JSON, or TOML config with either a minimal or a fully
//! documented template. An existing file is never overwritten.

use std::path::PathBuf;

use crate::cli::{ConfigFormat, InitArgs};
use crate::error::RegionNearbyError;

pub fn execute(args: &InitArgs) -> Result<(), RegionNearbyError> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("region-nearby.{}", args.format.extension())));

    if output.exists() {
        return Err(RegionNearbyError::FileExists { path: output });
    }

    std::fs::write(&output, template(&args.format, args.full))?;
    println!("Created {}", output.display());
    Ok(())
}

#[must_use]
pub const fn template(format: &ConfigFormat, full: bool) -> &'static str {
    match (format, full) {
        (ConfigFormat::Yaml, false) => YAML_MINIMAL,
        (ConfigFormat::Yaml, true) => YAML_FULL,
        (ConfigFormat::Json, false) => JSON_MINIMAL,
        (ConfigFormat::Json, true) => JSON_FULL,
        (ConfigFormat::Toml, false) => TOML_MINIMAL,
        (ConfigFormat::Toml, true) => TOML_FULL,
    }
}

const YAML_MINIMAL: &str = r#"# region-nearby config

edge_region: "europe-west3"
replica_regions:
  - "eu-central-1"
  - "us-east-1"
  - "ap-northeast-1"
"#;

const YAML_FULL: &str = r#"# region-nearby config
#
# Every key is optional. Values can also be set with --edge-region,
# --replica-regions and --timeout (or EDGE_REGION, REPLICA_REGIONS,
# REQUEST_TIMEOUT_MS), which take precedence over this file.

# Edge region this instance runs in, e.g. "europe-west3" or "us-east4".
# Used as the caller's location when a request has no coordinates.
edge_region: "europe-west3"

# AWS regions holding a replica. Leave empty to consider every region.
replica_regions:
  - "eu-central-1"
  - "us-east-1"
  - "ap-northeast-1"

# What handles a forwarded request.
#   resolver: answer with the nearest replica region as JSON (default)
#   upstream: relay to another HTTP service with X-Forwarded-For attached
downstream:
  kind: resolver
  # kind: upstream
  # url: "http://localhost:8080"
  # timeout: 5000              # ms
"#;

const JSON_MINIMAL: &str = r#"{
  "edge_region": "europe-west3",
  "replica_regions": ["eu-central-1", "us-east-1", "ap-northeast-1"]
}
"#;

const JSON_FULL: &str = r#"{
  "edge_region": "europe-west3",
  "replica_regions": ["eu-central-1", "us-east-1", "ap-northeast-1"],
  "downstream": {
    "kind": "resolver"
  }
}
"#;

const TOML_MINIMAL: &str = r#"# region-nearby config

edge_region = "europe-west3"
replica_regions = ["eu-central-1", "us-east-1", "ap-northeast-1"]
"#;

const TOML_FULL: &str = r#"# region-nearby config
#
# Every key is optional. --edge-region, --replica-regions and --timeout
# take precedence over this file.

# Edge region this instance runs in.
edge_region = "europe-west3"

# AWS regions holding a replica. Leave empty to consider every region.
replica_regions = ["eu-central-1", "us-east-1", "ap-northeast-1"]

# resolver (default) or upstream
[downstream]
kind = "resolver"
# kind = "upstream"
# url = "http://localhost:8080"
# timeout = 5000
"#;
