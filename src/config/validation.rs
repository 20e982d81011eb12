//! Configuration validation with detailed error reporting.
//!
//! The [`validate`] function checks a parsed [`Config`] for unknown or
//! duplicate region names and a malformed upstream downstream. Returns a
//! list of [`ValidationError`] values with per-field suggestions.

use std::collections::HashSet;

use url::Url;

use super::model::{Config, Downstream};
use crate::error::ValidationError;
use crate::region::{AwsRegion, EdgeRegion};

/// Validate an upstream URL. Returns `Ok(())` or a human-readable error.
pub fn validate_upstream_url(url: &str) -> Result<(), String> {
    match Url::parse(url) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            if scheme != "http" && scheme != "https" {
                Err(format!(
                    "unsupported scheme '{scheme}' (expected http or https)"
                ))
            } else if parsed.host_str().is_none() {
                Err(format!("'{url}' has no host"))
            } else {
                Ok(())
            }
        }
        Err(_) => Err(format!("'{url}' is not a valid URL")),
    }
}

fn common_prefix_len(a: &str, b: &str) -> usize {
    a.bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x.eq_ignore_ascii_case(y))
        .count()
}

/// Closest known name by shared prefix, if any shares more than its family.
fn suggest<'a>(input: &str, names: impl Iterator<Item = &'a str>) -> Option<String> {
    names
        .map(|name| (common_prefix_len(input, name), name))
        .filter(|(len, _)| *len >= 3)
        .max_by_key(|(len, _)| *len)
        .map(|(_, name)| format!("did you mean '{name}'?"))
}

pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(ref edge) = config.edge_region {
        if edge.parse::<EdgeRegion>().is_err() {
            errors.push(ValidationError {
                section: "(root)".into(),
                field: "edge_region".into(),
                message: format!("'{edge}' is not a known edge region"),
                suggestion: suggest(edge, EdgeRegion::iter().map(|r| r.name())),
            });
        }
    }

    let mut seen = HashSet::new();
    for (i, name) in config.replica_regions.iter().enumerate() {
        let section = format!("replica_regions[{i}]");
        match name.parse::<AwsRegion>() {
            Ok(region) => {
                if !seen.insert(region) {
                    errors.push(ValidationError {
                        section,
                        field: "name".into(),
                        message: format!("duplicate replica region '{region}'"),
                        suggestion: None,
                    });
                }
            }
            Err(_) => errors.push(ValidationError {
                section,
                field: "name".into(),
                message: format!("'{name}' is not a known AWS region"),
                suggestion: suggest(name, AwsRegion::iter().map(|r| r.name())),
            }),
        }
    }

    if let Downstream::Upstream { ref url, timeout } = config.downstream {
        if let Err(msg) = validate_upstream_url(url) {
            errors.push(ValidationError {
                section: "downstream".into(),
                field: "url".into(),
                message: msg,
                suggestion: None,
            });
        }
        if timeout == 0 {
            errors.push(ValidationError {
                section: "downstream".into(),
                field: "timeout".into(),
                message: "timeout must be greater than 0".into(),
                suggestion: Some("omit it to use the 5000ms default".into()),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[must_use]
pub fn format_validation_report(path: &str, config: &Config) -> String {
    let edge = config.edge_region.as_deref().unwrap_or("none");
    let replicas = if config.replica_regions.is_empty() {
        "all regions".to_string()
    } else {
        config.replica_regions.join(", ")
    };
    let downstream = match &config.downstream {
        Downstream::Resolver => "resolver (in-process)".to_string(),
        Downstream::Upstream { url, timeout } => format!("upstream {url} ({timeout}ms)"),
    };

    let mut lines = vec![format!("{path} is valid\n")];
    lines.push(format!("  edge region:  {edge}"));
    lines.push(format!("  replicas:     {replicas}"));
    lines.push(format!("  downstream:   {downstream}"));
    if let Some(edge) = config.edge_region() {
        if let Some(nearest) = edge.find_region_from_list(&config.replica_regions()) {
            lines.push(format!("  nearest:      {nearest} ({})", nearest.label()));
        }
    }
    lines.join("\n")
}
