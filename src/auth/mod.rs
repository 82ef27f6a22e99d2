// ABOUTME: Token exchange pipeline: validation, role resolution, session tokens, orchestration
// ABOUTME: Composes the trust boundary of the identity federation gateway
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! # Authentication Pipeline
//!
//! The trust boundary of the gateway, composed leaf-first:
//!
//! 1. [`validator::IdentityValidator`] applies domain policy to decoded
//!    provider claims
//! 2. [`roles::RoleResolver`] attaches a role and its fixed permission set
//! 3. [`session::SessionTokenManager`] issues and verifies the gateway's
//!    own signed session tokens
//! 4. [`exchange::AuthGateway`] composes the above into the boundary
//!    operations: exchange, who-am-i, refresh

pub mod exchange;
pub mod roles;
pub mod session;
pub mod validator;

pub use exchange::AuthGateway;
pub use roles::{AdminRegistry, RoleResolver};
pub use session::SessionTokenManager;
pub use validator::IdentityValidator;
