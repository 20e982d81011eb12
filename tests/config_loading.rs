//! Integration tests for config loading across all file formats.

use region_nearby::cli::ConfigFormat;
use region_nearby::cmd::init::template;
use region_nearby::config::model::{Config, Downstream};
use region_nearby::config::sources::{create_file_source, parse_config_str};
use region_nearby::config::validation::validate;
use region_nearby::config::{ConfigSource, Overrides};
use region_nearby::error::RegionNearbyError;
use region_nearby::region::{AwsRegion, EdgeRegion};

#[cfg(feature = "yaml")]
#[test]
fn yaml_template_loads_and_validates() {
    let config = parse_config_str("yaml", template(&ConfigFormat::Yaml, false), "region-nearby.yaml").unwrap();
    validate(&config).unwrap();
    assert_eq!(config.edge_region(), Some(EdgeRegion::EuropeWest3));
    assert_eq!(
        config.replica_regions(),
        vec![AwsRegion::EuCentral1, AwsRegion::UsEast1, AwsRegion::ApNortheast1]
    );
}

#[cfg(feature = "yaml")]
#[test]
fn yaml_upstream_downstream_parses() {
    let content = r#"
edge_region: us-east4
downstream:
  kind: upstream
  url: "http://backend:8080/api"
"#;
    let config = parse_config_str("yml", content, "region-nearby.yml").unwrap();
    validate(&config).unwrap();
    assert_eq!(
        config.downstream,
        Downstream::Upstream {
            url: "http://backend:8080/api".into(),
            timeout: 5000,
        }
    );
}

#[cfg(all(feature = "yaml", feature = "json", feature = "toml"))]
#[test]
fn all_formats_produce_equivalent_configs() {
    for full in [false, true] {
        let yaml = parse_config_str("yaml", template(&ConfigFormat::Yaml, full), "yaml").unwrap();
        let json = parse_config_str("json", template(&ConfigFormat::Json, full), "json").unwrap();
        let toml = parse_config_str("toml", template(&ConfigFormat::Toml, full), "toml").unwrap();

        assert_eq!(yaml.edge_region, json.edge_region);
        assert_eq!(yaml.edge_region, toml.edge_region);
        assert_eq!(yaml.replica_regions, json.replica_regions);
        assert_eq!(yaml.replica_regions, toml.replica_regions);
        assert_eq!(yaml.downstream, json.downstream);
        assert_eq!(yaml.downstream, toml.downstream);
    }
}

#[test]
fn unsupported_format_returns_error() {
    let result = parse_config_str("xml", "{}", "test.xml");
    assert!(matches!(result, Err(RegionNearbyError::UnsupportedFormat(_))));

    let result = create_file_source(std::path::Path::new("region-nearby.ini"));
    assert!(result.is_err());
}

#[test]
fn unknown_fields_are_rejected() {
    let result: Result<Config, _> = serde_json::from_str(r#"{"edge": "europe-west3"}"#);
    assert!(result.is_err());
}

#[test]
fn every_problem_is_reported() {
    let config: Config = serde_json::from_str(
        r#"{
            "edge_region": "mars-north1",
            "replica_regions": ["us-east-1", "us-east-1", "nowhere"],
            "downstream": {"kind": "upstream", "url": "ftp://backend", "timeout": 0}
        }"#,
    )
    .unwrap();
    let errors = validate(&config).unwrap_err();
    assert_eq!(errors.len(), 5);
}

#[test]
fn overrides_win_over_file_values() {
    let config: Config = serde_json::from_str(
        r#"{"edge_region": "europe-west3", "replica_regions": ["eu-central-1"]}"#,
    )
    .unwrap();
    let overrides = Overrides {
        edge_region: Some("asia-northeast1".into()),
        replica_regions: vec!["ap-northeast-1".into(), "us-west-2".into()],
        timeout: None,
    };

    let config = overrides.apply(config).unwrap();
    assert_eq!(config.edge_region(), Some(EdgeRegion::AsiaNortheast1));
    assert_eq!(
        config
            .edge_region()
            .and_then(|edge| edge.find_region_from_list(&config.replica_regions())),
        Some(AwsRegion::ApNortheast1)
    );

    let bad = Overrides {
        replica_regions: vec!["nowhere-1".into()],
        ..Overrides::default()
    };
    assert!(matches!(
        bad.apply(Config::default()),
        Err(RegionNearbyError::ConfigValidation { .. })
    ));
}

#[cfg(feature = "yaml")]
#[tokio::test]
async fn file_source_reloads_after_edit() {
    let path = std::env::temp_dir().join(format!("region-nearby-{}.yaml", uuid::Uuid::new_v4()));
    tokio::fs::write(&path, template(&ConfigFormat::Yaml, true))
        .await
        .unwrap();

    let source = create_file_source(&path).unwrap();
    assert_eq!(source.name(), "yaml");
    let (config, version) = source.load().await.unwrap();
    assert_eq!(config.edge_region.as_deref(), Some("europe-west3"));
    assert!(!source.has_changed(&version).await.unwrap());

    tokio::fs::write(&path, "edge_region: us-west1\n").await.unwrap();
    assert!(source.has_changed(&version).await.unwrap());
    let (config, next) = source.load().await.unwrap();
    assert_ne!(version, next);
    assert_eq!(config.edge_region(), Some(EdgeRegion::UsWest1));
    assert!(config.replica_regions.is_empty());

    let _ = tokio::fs::remove_file(&path).await;
}
