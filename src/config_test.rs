//! Tests for environment configuration parsing

use super::*;
use std::collections::HashMap;
use std::sync::Mutex;

static ENV_GUARD: Mutex<()> = Mutex::new(());

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| vars.get(key).cloned()
}

#[test]
fn test_defaults_when_nothing_is_set() {
    let config = ServiceConfig::from_lookup(lookup_from(&[])).unwrap();

    assert_eq!(config.log_level(), LogLevel::Info);
    assert_eq!(config.api_port(), 8000);
    assert_eq!(config.metrics_prefix(), "defi_api_");
    assert_eq!(config, ServiceConfig::default());
}

#[test]
fn test_every_recognized_log_level_loads() {
    for name in ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"] {
        let config = ServiceConfig::from_lookup(lookup_from(&[("LOG_LEVEL", name)]))
            .unwrap_or_else(|e| panic!("{} should be accepted: {}", name, e));
        assert_eq!(config.log_level().as_str(), name);
    }
}

#[test]
fn test_unrecognized_log_level_is_rejected() {
    for name in ["TRACE", "info", "Warning", "WARN", "FATAL", "42"] {
        let err = ServiceConfig::from_lookup(lookup_from(&[("LOG_LEVEL", name)])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidLogLevel(name.to_string()));
    }
}

#[test]
fn test_critical_maps_to_error_filter() {
    assert_eq!(LogLevel::Critical.filter_directive(), "error");
    assert_eq!(LogLevel::Warning.filter_directive(), "warn");
}

#[test]
fn test_port_range_boundaries_load() {
    for port in ["1", "80", "8000", "9100", "65535"] {
        let config = ServiceConfig::from_lookup(lookup_from(&[("API_PORT", port)])).unwrap();
        assert_eq!(config.api_port().to_string(), port);
    }
}

#[test]
fn test_non_integer_port_is_rejected() {
    for raw in ["abc", "80.5", "8000x", "0x1F90"] {
        let err = ServiceConfig::from_lookup(lookup_from(&[("API_PORT", raw)])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidPort(raw.to_string()));
    }
}

#[test]
fn test_out_of_range_port_is_rejected() {
    let cases = [("0", 0), ("65536", 65536), ("-1", -1)];
    for (raw, value) in cases {
        let err = ServiceConfig::from_lookup(lookup_from(&[("API_PORT", raw)])).unwrap_err();
        assert_eq!(err, ConfigError::PortOutOfRange(value));
    }
}

#[test]
fn test_empty_or_padded_log_level_is_rejected() {
    for name in ["", " DEBUG", "INFO ", "info"] {
        let err = ServiceConfig::from_lookup(lookup_from(&[("LOG_LEVEL", name)])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidLogLevel(name.to_string()));
    }
}

#[test]
fn test_empty_port_is_rejected() {
    for raw in ["", "   "] {
        let err = ServiceConfig::from_lookup(lookup_from(&[("API_PORT", raw)])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidPort(raw.to_string()));
    }
}

#[test]
fn test_port_tolerates_surrounding_whitespace() {
    let config = ServiceConfig::from_lookup(lookup_from(&[("API_PORT", " 9100 ")])).unwrap();
    assert_eq!(config.api_port(), 9100);
}

#[test]
fn test_empty_metrics_prefix_is_rejected() {
    let err = ServiceConfig::from_lookup(lookup_from(&[("PROMETHEUS_METRICS_PREFIX", "")]))
        .unwrap_err();
    assert_eq!(err, ConfigError::InvalidMetricsPrefix(String::new()));
}

#[test]
fn test_custom_metrics_prefix() {
    let config =
        ServiceConfig::from_lookup(lookup_from(&[("PROMETHEUS_METRICS_PREFIX", "yield_")]))
            .unwrap();
    assert_eq!(config.metrics_prefix(), "yield_");
}

#[test]
fn test_invalid_metrics_prefix_is_rejected() {
    for prefix in ["1defi", "defi-api", "defi api", " defi_"] {
        let err =
            ServiceConfig::from_lookup(lookup_from(&[("PROMETHEUS_METRICS_PREFIX", prefix)]))
                .unwrap_err();
        assert_eq!(err, ConfigError::InvalidMetricsPrefix(prefix.to_string()));
    }
}

#[test]
fn test_load_reads_process_environment() {
    let _guard = ENV_GUARD.lock().unwrap();
    std::env::set_var("LOG_LEVEL", "WARNING");
    std::env::set_var("API_PORT", "9100");
    std::env::set_var("PROMETHEUS_METRICS_PREFIX", "env_test_");

    let config = ServiceConfig::load().expect("config loads");
    assert_eq!(config.log_level(), LogLevel::Warning);
    assert_eq!(config.api_port(), 9100);
    assert_eq!(config.metrics_prefix(), "env_test_");

    std::env::set_var("LOG_LEVEL", "VERBOSE");
    let err = ServiceConfig::load().unwrap_err();
    assert_eq!(err, ConfigError::InvalidLogLevel("VERBOSE".to_string()));

    std::env::remove_var("LOG_LEVEL");
    std::env::remove_var("API_PORT");
    std::env::remove_var("PROMETHEUS_METRICS_PREFIX");
}
