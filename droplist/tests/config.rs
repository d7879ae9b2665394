//! Tests for select configuration.

use droplist::config::{DEFAULT_PLACEHOLDER, DEFAULT_SEPARATOR};
use droplist::{ConfigError, SelectConfig, SelectDefaults, SelectMode, SelectValue};

#[test]
fn test_default_config() {
    let config = SelectConfig::<u32>::default();

    assert_eq!(config.mode, SelectMode::Single);
    assert_eq!(config.value, None);
    assert_eq!(config.placeholder, DEFAULT_PLACEHOLDER);
    assert_eq!(config.separator, DEFAULT_SEPARATOR);
    assert!(!config.disabled);
}

#[test]
fn test_defaults_apply_before_explicit_settings() {
    let defaults = SelectDefaults {
        placeholder: Some("Pick one".to_string()),
        mode: Some(SelectMode::Multi),
    };

    let config = SelectConfig::<u32>::new().with_defaults(&defaults);
    assert_eq!(config.placeholder, "Pick one");
    assert_eq!(config.mode, SelectMode::Multi);

    let config = SelectConfig::<u32>::new()
        .with_defaults(&defaults)
        .with_placeholder("Explicit")
        .with_mode(SelectMode::Single);
    assert_eq!(config.placeholder, "Explicit");
    assert_eq!(config.mode, SelectMode::Single);
}

#[test]
fn test_empty_defaults_change_nothing() {
    let config = SelectConfig::<u32>::new().with_defaults(&SelectDefaults::default());
    assert_eq!(config, SelectConfig::new());
}

#[test]
fn test_from_json_fills_missing_fields() {
    let config = SelectConfig::<u32>::from_json(r#"{ "mode": "multi", "value": [1, 3] }"#).unwrap();

    assert_eq!(config.mode, SelectMode::Multi);
    assert_eq!(config.value, Some(SelectValue::Multi(vec![1, 3])));
    assert_eq!(config.placeholder, DEFAULT_PLACEHOLDER);
}

#[test]
fn test_from_json_scalar_and_null_values() {
    let scalar = SelectConfig::<String>::from_json(r#"{ "value": "b" }"#).unwrap();
    assert_eq!(scalar.value, Some(SelectValue::Single(Some("b".to_string()))));

    let null = SelectConfig::<String>::from_json(r#"{ "value": null }"#).unwrap();
    assert_eq!(null.value, None);
}

#[test]
fn test_from_json_rejects_bad_input() {
    let err = SelectConfig::<u32>::from_json(r#"{ "mode": "several" }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));

    let err = SelectConfig::<u32>::from_json(r#"{ "placeholder": "   " }"#).unwrap_err();
    assert!(matches!(err, ConfigError::EmptyPlaceholder));
    assert_eq!(err.to_string(), "Placeholder must not be empty");
}

#[test]
fn test_defaults_deserialize_partially() {
    let defaults: SelectDefaults = serde_json::from_str(r#"{ "placeholder": "Choose" }"#).unwrap();
    assert_eq!(defaults.placeholder.as_deref(), Some("Choose"));
    assert_eq!(defaults.mode, None);
}
