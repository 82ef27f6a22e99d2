// ABOUTME: Identity provider abstraction and config-driven provider construction
// ABOUTME: Defines the verification trait implemented by Firebase and static providers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Identity provider clients.
//!
//! The external identity provider is a trusted oracle: it authenticates end
//! users and issues short-lived identity tokens. This module only verifies
//! those tokens and extracts claims; account management is out of scope.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{ProviderConfig, ProviderMode};
use crate::errors::AuthResult;
use crate::models::IdentityClaims;

pub mod firebase;
pub mod static_provider;

pub use firebase::FirebaseProvider;
pub use static_provider::StaticProvider;

/// Verifies opaque bearer tokens against an identity service
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Provider name for logging and diagnostics
    fn name(&self) -> &'static str;

    /// Verify an identity token and return its decoded claims
    ///
    /// # Errors
    ///
    /// Returns `MalformedToken`, `ExpiredToken`, `RevokedToken`, or
    /// `InvalidSignature` when the token fails verification, and
    /// `ProviderUnavailable` when the provider cannot be reached.
    async fn verify_id_token(&self, token: &str) -> AuthResult<IdentityClaims>;
}

/// Construct the provider selected by deployment configuration
///
/// # Errors
///
/// Returns an error if the underlying HTTP client cannot be built.
pub fn create_provider(config: &ProviderConfig) -> AuthResult<Arc<dyn IdentityProvider>> {
    match config.mode {
        ProviderMode::Firebase => Ok(Arc::new(FirebaseProvider::new(
            config.firebase_project_id.clone(),
        )?)),
        ProviderMode::Static => Ok(Arc::new(StaticProvider::new(IdentityClaims {
            uid: config.static_uid.clone(),
            email: config.static_email.clone(),
            name: config.static_name.clone(),
            picture: None,
            email_verified: true,
        }))),
    }
}
