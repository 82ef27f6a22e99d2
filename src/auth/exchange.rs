// ABOUTME: Exchange orchestrator composing validation, role resolution, and token issuance
// ABOUTME: Boundary operations: exchange, who-am-i, and refresh
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Exchange orchestrator.
//!
//! Composes the validator, role resolver, and session token manager into
//! the three boundary operations. Any failure aborts the whole operation
//! and is surfaced verbatim; nothing downgrades a hard failure (an
//! unverified email never falls through to a Guest token).

use std::sync::Arc;
use tracing::{info, warn};

use super::roles::{AdminRegistry, RoleResolver};
use super::session::SessionTokenManager;
use super::validator::IdentityValidator;
use crate::config::environment::ServerConfig;
use crate::errors::AuthResult;
use crate::models::{IdentifiedUser, TokenData, WhoAmI};
use crate::providers::IdentityProvider;

/// Composes the token exchange pipeline behind the boundary operations
pub struct AuthGateway {
    validator: IdentityValidator,
    resolver: RoleResolver,
    sessions: SessionTokenManager,
}

impl AuthGateway {
    /// Create a gateway from already-constructed components
    #[must_use]
    pub fn new(
        validator: IdentityValidator,
        resolver: RoleResolver,
        sessions: SessionTokenManager,
    ) -> Self {
        Self {
            validator,
            resolver,
            sessions,
        }
    }

    /// Create a gateway from configuration and an identity provider
    #[must_use]
    pub fn from_config(config: &ServerConfig, provider: Arc<dyn IdentityProvider>) -> Self {
        let admins = Arc::new(AdminRegistry::new(&config.policy.admin_emails));
        Self {
            validator: IdentityValidator::new(provider, &config.policy.allowed_email_domain),
            resolver: RoleResolver::new(admins, &config.policy.allowed_email_domain),
            sessions: SessionTokenManager::new(
                config.auth.secret_key.as_bytes(),
                config.auth.token_expiry_hours,
            ),
        }
    }

    /// The admin registry backing role resolution, for runtime mutation
    #[must_use]
    pub fn admin_registry(&self) -> Arc<AdminRegistry> {
        self.resolver.admin_registry()
    }

    /// The session token manager, for conditional-refresh helpers
    #[must_use]
    pub fn sessions(&self) -> &SessionTokenManager {
        &self.sessions
    }

    /// Exchange a provider identity token for a session token.
    ///
    /// Runs validation, role resolution, and issuance in strict sequence;
    /// a validation failure short-circuits with no role resolved and no
    /// token issued.
    ///
    /// # Errors
    ///
    /// Propagates validator and issuer failures unchanged.
    pub async fn exchange(&self, firebase_token: &str) -> AuthResult<TokenData> {
        let identity = self.validator.validate(firebase_token).await.map_err(|e| {
            warn!("Token exchange failed: {}", e);
            e
        })?;

        let user = self.resolver.identify(identity);
        let (jwt_token, expires_at) = self.sessions.issue(&user)?;

        info!(email = %user.email, role = %user.role, "Token exchange successful");

        Ok(TokenData {
            jwt_token,
            user,
            expires_at,
        })
    }

    /// Return the principal described by a verified session token.
    ///
    /// Delegates to full verification and projects the claims; no
    /// additional policy is applied.
    ///
    /// # Errors
    ///
    /// Propagates verification failures unchanged.
    pub fn who_am_i(&self, session_token: &str) -> AuthResult<WhoAmI> {
        let claims = self.sessions.verify(session_token)?;
        let expires_at = claims.expires_at();

        Ok(WhoAmI {
            uid: claims.sub,
            email: claims.email,
            name: claims.name,
            role: claims.role,
            permissions: claims.permissions,
            expires_at,
        })
    }

    /// Verify a session token and unconditionally issue a replacement.
    ///
    /// The presented token must pass full verification; an expired or
    /// otherwise invalid token fails rather than silently re-issuing. The
    /// principal is reconstructed from the verified claims without
    /// re-contacting the identity provider. Unlike
    /// [`SessionTokenManager::refresh_if_needed`], no staleness threshold
    /// applies. The prior token remains valid until its own expiry.
    ///
    /// # Errors
    ///
    /// Propagates verification and issuance failures unchanged.
    pub fn refresh(&self, session_token: &str) -> AuthResult<TokenData> {
        let claims = self.sessions.verify(session_token).map_err(|e| {
            warn!("Token refresh rejected: {}", e);
            e
        })?;

        let user = IdentifiedUser::from_session_claims(&claims);
        let (jwt_token, expires_at) = self.sessions.issue(&user)?;

        info!(email = %user.email, "Session token refreshed");

        Ok(TokenData {
            jwt_token,
            user,
            expires_at,
        })
    }
}
