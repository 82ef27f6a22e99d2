// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Loads the signing secret, token lifetime, domain policy, and provider selection
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Environment-based configuration management.
//!
//! The signing secret is required; the process fails to start without it.
//! Everything else carries a default. All values are read once at startup
//! and are immutable afterwards, except the admin allow-list which is
//! seeded from here into a synchronized registry.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::{info, warn};

use crate::constants::defaults;

/// Identity provider selection for deployment configuration.
///
/// The static provider is only ever selected explicitly; an unconfigured
/// Firebase deployment fails at verification time rather than silently
/// falling back to a fake.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderMode {
    /// Verify real Firebase ID tokens against Google's published keys
    #[default]
    Firebase,
    /// Return a fixed configured identity; development and tests only
    Static,
}

impl ProviderMode {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "static" | "mock" | "dev" => Self::Static,
            _ => Self::Firebase,
        }
    }
}

impl std::fmt::Display for ProviderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Firebase => write!(f, "firebase"),
            Self::Static => write!(f, "static"),
        }
    }
}

/// Session token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Symmetric signing secret; required
    pub secret_key: String,
    /// Session token lifetime in hours
    pub token_expiry_hours: i64,
    /// Threshold for conditional refresh, in hours
    pub refresh_threshold_hours: i64,
}

/// Identity policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Allowed organizational email domain, e.g. `@pocheonil.hs.kr`
    pub allowed_email_domain: String,
    /// Admin allow-list seeded at startup, order preserved
    pub admin_emails: Vec<String>,
}

/// Identity provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Which provider implementation to construct
    pub mode: ProviderMode,
    /// Firebase project whose tokens are accepted
    pub firebase_project_id: String,
    /// Fixed identity returned by the static provider
    pub static_uid: String,
    /// Email of the fixed static identity
    pub static_email: String,
    /// Display name of the fixed static identity
    pub static_name: Option<String>,
}

/// Complete server configuration loaded from the environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Session token configuration
    pub auth: AuthConfig,
    /// Identity policy configuration
    pub policy: PolicyConfig,
    /// Identity provider configuration
    pub provider: ProviderConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `SECRET_KEY` is unset or empty, or if a numeric
    /// variable fails to parse.
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        // Load .env file if it exists
        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {}", e);
        }

        let secret_key =
            env::var("SECRET_KEY").context("SECRET_KEY environment variable is required")?;
        if secret_key.is_empty() {
            anyhow::bail!("SECRET_KEY environment variable must not be empty");
        }

        let policy = PolicyConfig {
            allowed_email_domain: env_var_or("ALLOWED_EMAIL_DOMAIN", defaults::ALLOWED_EMAIL_DOMAIN),
            admin_emails: parse_email_list(&env_var_or("ADMIN_EMAILS", defaults::ADMIN_EMAILS)),
        };

        let config = Self {
            auth: AuthConfig {
                secret_key,
                token_expiry_hours: env_var_or(
                    "ACCESS_TOKEN_EXPIRE_HOURS",
                    &defaults::TOKEN_EXPIRY_HOURS.to_string(),
                )
                .parse()
                .context("Invalid ACCESS_TOKEN_EXPIRE_HOURS value")?,
                refresh_threshold_hours: env_var_or(
                    "REFRESH_THRESHOLD_HOURS",
                    &defaults::REFRESH_THRESHOLD_HOURS.to_string(),
                )
                .parse()
                .context("Invalid REFRESH_THRESHOLD_HOURS value")?,
            },
            provider: ProviderConfig {
                mode: ProviderMode::from_str_or_default(&env_var_or(
                    "IDENTITY_PROVIDER",
                    "firebase",
                )),
                firebase_project_id: env_var_or(
                    "FIREBASE_PROJECT_ID",
                    defaults::FIREBASE_PROJECT_ID,
                ),
                static_uid: env_var_or("STATIC_IDENTITY_UID", "dev_user_123"),
                static_email: env_var_or(
                    "STATIC_IDENTITY_EMAIL",
                    &format!("admin{}", policy.allowed_email_domain),
                ),
                static_name: env::var("STATIC_IDENTITY_NAME").ok(),
            },
            policy,
        };

        if config.provider.mode == ProviderMode::Static {
            warn!("Static identity provider selected; tokens will not be verified");
        }

        info!(
            provider = %config.provider.mode,
            token_expiry_hours = config.auth.token_expiry_hours,
            allowed_domain = %config.policy.allowed_email_domain,
            admin_count = config.policy.admin_emails.len(),
            "Configuration loaded"
        );

        Ok(config)
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a comma-separated email list
fn parse_email_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_email_list() {
        let emails = parse_email_list("a@x.kr, b@x.kr,,  c@x.kr ");
        assert_eq!(emails, vec!["a@x.kr", "b@x.kr", "c@x.kr"]);
        assert!(parse_email_list("").is_empty());
    }

    #[test]
    fn test_provider_mode_parsing() {
        assert_eq!(ProviderMode::from_str_or_default("static"), ProviderMode::Static);
        assert_eq!(ProviderMode::from_str_or_default("MOCK"), ProviderMode::Static);
        assert_eq!(ProviderMode::from_str_or_default("firebase"), ProviderMode::Firebase);
        assert_eq!(ProviderMode::from_str_or_default("anything"), ProviderMode::Firebase);
    }
}
