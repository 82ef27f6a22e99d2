// ABOUTME: Tests for environment-based configuration loading
// ABOUTME: Validates the required signing secret, defaults, and list parsing
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use info_class_api::config::environment::{ProviderMode, ServerConfig};
use serial_test::serial;
use std::env;

const CONFIG_VARS: &[&str] = &[
    "SECRET_KEY",
    "ACCESS_TOKEN_EXPIRE_HOURS",
    "REFRESH_THRESHOLD_HOURS",
    "ALLOWED_EMAIL_DOMAIN",
    "ADMIN_EMAILS",
    "IDENTITY_PROVIDER",
    "FIREBASE_PROJECT_ID",
    "STATIC_IDENTITY_UID",
    "STATIC_IDENTITY_EMAIL",
    "STATIC_IDENTITY_NAME",
];

fn clear_config_env() {
    for var in CONFIG_VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_secret_key_is_required() {
    clear_config_env();

    let result = ServerConfig::from_env();
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("SECRET_KEY"));
}

#[test]
#[serial]
fn test_empty_secret_key_is_rejected() {
    clear_config_env();
    env::set_var("SECRET_KEY", "");

    assert!(ServerConfig::from_env().is_err());
    clear_config_env();
}

#[test]
#[serial]
fn test_defaults_applied() {
    clear_config_env();
    env::set_var("SECRET_KEY", "a-sufficiently-long-test-secret");

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.auth.token_expiry_hours, 24);
    assert_eq!(config.auth.refresh_threshold_hours, 2);
    assert_eq!(config.policy.allowed_email_domain, "@pocheonil.hs.kr");
    assert_eq!(config.policy.admin_emails, vec!["admin@pocheonil.hs.kr"]);
    assert_eq!(config.provider.mode, ProviderMode::Firebase);
    assert_eq!(config.provider.firebase_project_id, "info-class-7398a");

    clear_config_env();
}

#[test]
#[serial]
fn test_custom_values_parsed() {
    clear_config_env();
    env::set_var("SECRET_KEY", "a-sufficiently-long-test-secret");
    env::set_var("ACCESS_TOKEN_EXPIRE_HOURS", "48");
    env::set_var("ADMIN_EMAILS", "one@school.kr, two@school.kr");
    env::set_var("ALLOWED_EMAIL_DOMAIN", "@school.kr");
    env::set_var("IDENTITY_PROVIDER", "static");
    env::set_var("STATIC_IDENTITY_NAME", "Dev Account");

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.auth.token_expiry_hours, 48);
    assert_eq!(config.policy.admin_emails.len(), 2);
    assert_eq!(config.policy.allowed_email_domain, "@school.kr");
    assert_eq!(config.provider.mode, ProviderMode::Static);
    // Static identity defaults to an admin address within the allowed domain
    assert_eq!(config.provider.static_email, "admin@school.kr");
    assert_eq!(config.provider.static_name.as_deref(), Some("Dev Account"));

    clear_config_env();
}

#[test]
#[serial]
fn test_invalid_expiry_hours_rejected() {
    clear_config_env();
    env::set_var("SECRET_KEY", "a-sufficiently-long-test-secret");
    env::set_var("ACCESS_TOKEN_EXPIRE_HOURS", "not-a-number");

    let result = ServerConfig::from_env();
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("ACCESS_TOKEN_EXPIRE_HOURS"));

    clear_config_env();
}
