// ABOUTME: Config-selected static identity provider for development and tests
// ABOUTME: Returns a fixed identity without contacting any external service
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Static identity provider.
//!
//! Selected only by explicit deployment configuration
//! (`IDENTITY_PROVIDER=static`), never by runtime detection of missing
//! Firebase credentials. Presented tokens are not verified; the configured
//! identity is returned for any non-empty token.

use async_trait::async_trait;
use tracing::warn;

use super::IdentityProvider;
use crate::errors::{AuthError, AuthResult};
use crate::models::IdentityClaims;

/// Identity provider returning a fixed configured identity
pub struct StaticProvider {
    identity: IdentityClaims,
}

impl StaticProvider {
    /// Create a provider that answers every verification with `identity`
    #[must_use]
    pub fn new(identity: IdentityClaims) -> Self {
        warn!(
            email = %identity.email,
            "Static identity provider constructed; tokens will not be verified"
        );
        Self { identity }
    }
}

#[async_trait]
impl IdentityProvider for StaticProvider {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn verify_id_token(&self, token: &str) -> AuthResult<IdentityClaims> {
        if token.is_empty() {
            return Err(AuthError::MalformedToken {
                details: "empty identity token".into(),
            });
        }
        Ok(self.identity.clone())
    }
}
