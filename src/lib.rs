// ABOUTME: Main library entry point for the Info Class identity federation gateway
// ABOUTME: Validates Firebase ID tokens and issues role-scoped session JWTs
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

#![deny(unsafe_code)]

//! # Info Class API
//!
//! A thin identity-federation gateway. It accepts a third-party identity
//! token (a Firebase ID token), validates it against domain policy, maps the
//! verified identity to an internal role and permission set, and issues a
//! self-contained signed session token (JWT) for downstream API calls.
//!
//! The whole pipeline is stateless: every decision is derived fresh from the
//! presented token, and the server holds no session state. The only mutable
//! shared state is the runtime admin allow-list.
//!
//! ## Architecture
//!
//! - **Providers**: trait-based identity provider clients (Firebase, static)
//! - **Auth**: validation policy, role resolution, session token lifecycle,
//!   and the exchange orchestrator that ties them together
//! - **Config**: environment-based configuration management
//! - **Errors**: closed error taxonomy with wire codes and status mapping
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use info_class_api::auth::AuthGateway;
//! use info_class_api::config::environment::ServerConfig;
//! use info_class_api::providers;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     let provider = providers::create_provider(&config.provider)?;
//!     let gateway = AuthGateway::from_config(&config, provider);
//!
//!     let exchanged = gateway.exchange("firebase-id-token").await?;
//!     println!("session token for {}: {}", exchanged.user.email, exchanged.jwt_token);
//!     Ok(())
//! }
//! ```

/// Token exchange pipeline: validator, role resolver, session tokens, orchestrator
pub mod auth;

/// Environment-based configuration management
pub mod config;

/// Shared constants: issuer string, defaults, Firebase endpoints
pub mod constants;

/// Closed error taxonomy, wire error codes, and `HTTP` status mapping
pub mod errors;

/// Structured logging configuration built on tracing
pub mod logging;

/// Core data model: identity claims, roles, session claims, wire shapes
pub mod models;

/// Identity provider clients (Firebase and the config-selected static fake)
pub mod providers;
