// ABOUTME: Identity validation policy applied atop decoded provider claims
// ABOUTME: Required fields, verified-email requirement, and allowed email domain
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Identity validator.
//!
//! Checks run in a fixed order so failures are deterministic: field
//! presence, then verification state, then domain. An identity that fails
//! any gate never reaches role resolution.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::errors::{AuthError, AuthResult};
use crate::models::ValidatedIdentity;
use crate::providers::IdentityProvider;

/// Applies domain policy to provider-verified identity claims
pub struct IdentityValidator {
    provider: Arc<dyn IdentityProvider>,
    allowed_domain: String,
}

impl IdentityValidator {
    /// Create a validator gated on the given email domain suffix
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>, allowed_domain: impl Into<String>) -> Self {
        Self {
            provider,
            allowed_domain: allowed_domain.into(),
        }
    }

    /// Validate a raw identity token and return the canonical identity
    ///
    /// # Errors
    ///
    /// Propagates provider verification failures unchanged; returns
    /// `IncompleteIdentity` when the subject id or email is absent,
    /// `UnverifiedEmail` when the provider has not verified the address,
    /// and `DomainNotAllowed` when the email is outside the allowed domain.
    pub async fn validate(&self, raw_token: &str) -> AuthResult<ValidatedIdentity> {
        let claims = self.provider.verify_id_token(raw_token).await?;

        if claims.uid.is_empty() {
            return Err(AuthError::IncompleteIdentity { field: "user ID" });
        }
        if claims.email.is_empty() {
            return Err(AuthError::IncompleteIdentity { field: "email" });
        }
        if !claims.email_verified {
            warn!(email = %claims.email, "Rejected identity with unverified email");
            return Err(AuthError::UnverifiedEmail);
        }
        if !email_matches_domain(&claims.email, &self.allowed_domain) {
            warn!(email = %claims.email, "Rejected identity outside allowed domain");
            return Err(AuthError::DomainNotAllowed {
                domain: self.allowed_domain.clone(),
            });
        }

        debug!(
            provider = self.provider.name(),
            uid = %claims.uid,
            "Identity validated"
        );
        Ok(ValidatedIdentity::new(claims))
    }
}

/// Case-insensitive suffix match of an email against a domain string
pub(crate) fn email_matches_domain(email: &str, domain: &str) -> bool {
    email.to_lowercase().ends_with(&domain.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_match_is_case_insensitive() {
        assert!(email_matches_domain("USER@Pocheonil.HS.KR", "@pocheonil.hs.kr"));
        assert!(email_matches_domain("user@pocheonil.hs.kr", "@POCHEONIL.hs.kr"));
        assert!(!email_matches_domain("user@other.hs.kr", "@pocheonil.hs.kr"));
    }
}
