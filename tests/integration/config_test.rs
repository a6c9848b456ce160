//! Integration tests for configuration

use odds_engine::config::Config;
use odds_engine::telemetry::LogFormat;
use rust_decimal_macros::dec;

#[test]
fn test_example_config_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml.example");
    let config = Config::load(path).unwrap();

    assert_eq!(config.sports.enabled, vec!["soccer_epl"]);
    assert_eq!(config.analysis.value_threshold, dec!(0.07));
    assert_eq!(config.freshness.cache_ttl_secs, 300);
    assert_eq!(config.alert.min_margin, dec!(3.0));
    assert_eq!(config.telemetry.log_format, LogFormat::Pretty);
    assert!(config.cache.snapshot_dir.is_none());
    assert!(config.alert.webhook_url.is_none());
}

#[test]
fn test_invalid_file_is_rejected_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[freshness]\nttl_min_secs = 900\nttl_max_secs = 600\n").unwrap();

    assert!(Config::load(&path).is_err());
}

#[test]
fn test_effective_config_prints_as_toml() {
    let printed = toml::to_string_pretty(&Config::default().redacted()).unwrap();
    let reparsed: Config = toml::from_str(&printed).unwrap();

    assert_eq!(reparsed.sports.enabled, vec!["soccer_epl"]);
    assert_eq!(reparsed.analysis.arb_gap, dec!(0.02));
}
