//! Tests for engine configuration loading.

use agenda_engine::config::{DEFAULT_HORIZON_MONTHS, DEFAULT_MAX_OCCURRENCES};
use agenda_engine::{AgendaError, EngineConfig};

#[test]
fn empty_object_yields_defaults() {
    let config = EngineConfig::from_json_str("{}").unwrap();
    assert_eq!(config, EngineConfig::default());
    assert_eq!(config.default_horizon_months, DEFAULT_HORIZON_MONTHS);
    assert_eq!(config.max_occurrences, DEFAULT_MAX_OCCURRENCES);
}

#[test]
fn fields_override_defaults() {
    let config = EngineConfig::from_json_str(r#"{"maxOccurrences": 10}"#).unwrap();
    assert_eq!(config.max_occurrences, 10);
    assert_eq!(config.default_horizon_months, DEFAULT_HORIZON_MONTHS);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = EngineConfig::from_json_str(r#"{"horizon": 3}"#).unwrap_err();
    assert!(matches!(err, AgendaError::Config(_)));
}

#[test]
fn zero_limits_are_rejected() {
    assert!(matches!(
        EngineConfig::from_json_str(r#"{"maxOccurrences": 0}"#),
        Err(AgendaError::Config(_))
    ));
    assert!(matches!(
        EngineConfig::from_json_str(r#"{"defaultHorizonMonths": 0}"#),
        Err(AgendaError::Config(_))
    ));
}
