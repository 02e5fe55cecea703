//! Config environment variable tests
//!
//! These tests verify that Config::from_env() correctly reads and applies
//! environment variable overrides. Note that Config::from_env() also loads
//! from a .env file via dotenvy, so these tests focus on override behavior.
//!
//! Tests use #[serial] to prevent race conditions with shared env vars.

use std::env;
use std::time::Duration;

use reasoning_store::config::{Config, LogFormat};
use serial_test::serial;

#[test]
#[serial]
fn test_config_from_env_loads_successfully() {
    // Every variable has a default, so loading succeeds in a bare
    // environment.
    let result = Config::from_env();
    assert!(result.is_ok(), "Config::from_env() should succeed");
}

#[test]
#[serial]
fn test_config_from_env_custom_session() {
    env::set_var("MAX_THOUGHTS_PER_SESSION", "25");
    env::set_var("SESSION_TIMEOUT_SECS", "120");

    let config = Config::from_env().unwrap();
    assert_eq!(config.session.max_thoughts_per_session, 25);
    assert_eq!(config.session.session_timeout, Duration::from_secs(120));

    env::remove_var("MAX_THOUGHTS_PER_SESSION");
    env::remove_var("SESSION_TIMEOUT_SECS");
}

#[test]
#[serial]
fn test_config_from_env_keyword_indexing_off() {
    env::set_var("KEYWORD_INDEXING", "false");

    let config = Config::from_env().unwrap();
    assert!(!config.session.keyword_indexing);

    env::remove_var("KEYWORD_INDEXING");
}

#[test]
#[serial]
fn test_config_invalid_number_uses_default() {
    env::set_var("MAX_THOUGHTS_PER_SESSION", "not-a-number");
    env::set_var("SESSION_TIMEOUT_SECS", "soon");

    let config = Config::from_env().unwrap();
    // Both fall back to their defaults.
    assert_eq!(config.session.max_thoughts_per_session, 100);
    assert_eq!(config.session.session_timeout, Duration::from_secs(3600));

    env::remove_var("MAX_THOUGHTS_PER_SESSION");
    env::remove_var("SESSION_TIMEOUT_SECS");
}

#[test]
#[serial]
fn test_config_zero_thought_cap_is_rejected() {
    env::set_var("MAX_THOUGHTS_PER_SESSION", "0");

    let result = Config::from_env();
    assert!(result.is_err(), "a zero thought cap should be refused");

    env::remove_var("MAX_THOUGHTS_PER_SESSION");
}

#[test]
#[serial]
fn test_config_from_env_json_log_format() {
    env::set_var("LOG_FORMAT", "json");

    let config = Config::from_env().unwrap();
    assert_eq!(config.logging.format, LogFormat::Json);

    env::remove_var("LOG_FORMAT");
}

#[test]
#[serial]
fn test_config_unknown_log_format_falls_back_to_pretty() {
    env::set_var("LOG_FORMAT", "xml");

    let config = Config::from_env().unwrap();
    assert_eq!(config.logging.format, LogFormat::Pretty);

    env::remove_var("LOG_FORMAT");
}

#[test]
#[serial]
fn test_config_from_env_log_level() {
    env::set_var("LOG_LEVEL", "debug");

    let config = Config::from_env().unwrap();
    assert_eq!(config.logging.level, "debug");

    env::remove_var("LOG_LEVEL");
}
