// ABOUTME: Session token issuance and verification with the gateway's own signing key
// ABOUTME: HS256 JWT lifecycle: issue, verify, unsafe expiry inspection, threshold refresh
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Session token manager.
//!
//! Issues and verifies the gateway's own signed session tokens,
//! independently of the identity provider. A token moves through exactly
//! two states: valid while `now < exp` and the signature, issuer, and
//! required claims check out; expired afterwards. There is no revocation
//! mechanism: refreshing does not invalidate the prior token, and both
//! remain valid until their own expiries.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::constants::TOKEN_ISSUER;
use crate::errors::{AuthError, AuthResult};
use crate::models::{IdentifiedUser, SessionClaims, UserRole};

/// Fixed signing algorithm for session tokens
const ALGORITHM: Algorithm = Algorithm::HS256;

/// Claims decoded before schema enforcement; every field optional so that
/// absence is reported as `MissingClaims` rather than a deserialization error
#[derive(Debug, Deserialize)]
struct RawSessionClaims {
    sub: Option<String>,
    email: Option<String>,
    name: Option<String>,
    role: Option<String>,
    permissions: Option<Vec<String>>,
    iat: Option<i64>,
    exp: Option<i64>,
    iss: Option<String>,
}

/// Issues and verifies session tokens with a single symmetric secret
pub struct SessionTokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_hours: i64,
}

impl SessionTokenManager {
    /// Create a manager with the given secret and token lifetime
    #[must_use]
    pub fn new(secret: &[u8], token_expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            token_expiry_hours,
        }
    }

    /// Issue a session token for a principal
    ///
    /// Returns the signed token and its expiration time.
    ///
    /// # Errors
    ///
    /// Returns `SigningFailure` only on an underlying cryptographic failure;
    /// treat as internal and fatal.
    pub fn issue(&self, user: &IdentifiedUser) -> AuthResult<(String, DateTime<Utc>)> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.token_expiry_hours);

        let claims = SessionClaims {
            sub: user.uid.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            permissions: user.permissions.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: TOKEN_ISSUER.to_owned(),
        };

        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding_key).map_err(|e| {
            AuthError::SigningFailure {
                details: e.to_string(),
            }
        })?;

        debug!(sub = %user.uid, role = %user.role, %expires_at, "Issued session token");
        Ok((token, expires_at))
    }

    /// Verify a session token and return its claims.
    ///
    /// Checks the signature, expiry, and issuer, and requires the presence
    /// of `sub`, `email`, `role`, `exp`, and `iat`. A token missing any of
    /// them is invalid even when the signature is valid; this guards
    /// against schema drift between issuer versions.
    ///
    /// # Errors
    ///
    /// `ExpiredToken` when past expiry, `InvalidSignature` or
    /// `MalformedToken` when the token fails structural or signature
    /// checks, `MissingClaims` when a required claim is absent, and
    /// `InvalidIssuer` when the issuer claim does not match.
    pub fn verify(&self, token: &str) -> AuthResult<SessionClaims> {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        let data = decode::<RawSessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| Self::convert_jwt_error(&e))?;
        let raw = data.claims;

        let sub = require_claim(raw.sub, "sub")?;
        let email = require_claim(raw.email, "email")?;
        let role_name = require_claim(raw.role, "role")?;
        let exp = require_claim(raw.exp, "exp")?;
        let iat = require_claim(raw.iat, "iat")?;

        if raw.iss.as_deref() != Some(TOKEN_ISSUER) {
            warn!(issuer = ?raw.iss, "Rejected session token with wrong issuer");
            return Err(AuthError::InvalidIssuer);
        }

        let role = UserRole::parse(&role_name).ok_or_else(|| AuthError::MalformedToken {
            details: format!("unknown role in token: {role_name}"),
        })?;

        Ok(SessionClaims {
            sub,
            email,
            name: raw.name,
            role,
            permissions: raw.permissions.unwrap_or_default(),
            iat,
            exp,
            iss: TOKEN_ISSUER.to_owned(),
        })
    }

    /// Extract the expiry from a token without checking its signature.
    ///
    /// Unsuitable for authorization decisions; usable only for telemetry
    /// and refresh-eligibility heuristics.
    #[must_use]
    pub fn peek_expiry(&self, token: &str) -> Option<DateTime<Utc>> {
        let mut validation = Validation::new(ALGORITHM);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims::<&str>(&[]);

        let data = decode::<RawSessionClaims>(token, &DecodingKey::from_secret(&[]), &validation)
            .ok()?;
        DateTime::from_timestamp(data.claims.exp?, 0)
    }

    /// Check whether a token is past its expiry without full verification.
    ///
    /// Tokens whose expiry cannot be read count as expired.
    #[must_use]
    pub fn is_expired(&self, token: &str) -> bool {
        self.peek_expiry(token)
            .is_none_or(|expires_at| Utc::now() > expires_at)
    }

    /// Issue a fresh token when the presented one is close to expiry.
    ///
    /// Remaining lifetime is read via unsafe inspection; when it is at or
    /// below `threshold_hours` a brand-new token is issued for `user`.
    /// Returns `None` when no refresh is needed or the expiry is unreadable.
    /// The old token is not invalidated.
    ///
    /// # Errors
    ///
    /// Returns `SigningFailure` if issuing the replacement token fails.
    pub fn refresh_if_needed(
        &self,
        token: &str,
        user: &IdentifiedUser,
        threshold_hours: i64,
    ) -> AuthResult<Option<(String, DateTime<Utc>)>> {
        let Some(expires_at) = self.peek_expiry(token) else {
            return Ok(None);
        };

        let threshold = Utc::now() + Duration::hours(threshold_hours);
        if expires_at <= threshold {
            debug!(sub = %user.uid, %expires_at, "Session token within refresh threshold");
            return self.issue(user).map(Some);
        }
        Ok(None)
    }

    /// Convert JWT library errors to the closed taxonomy
    fn convert_jwt_error(e: &jsonwebtoken::errors::Error) -> AuthError {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            ErrorKind::InvalidSignature => AuthError::InvalidSignature {
                reason: "signature verification failed".into(),
            },
            ErrorKind::MissingRequiredClaim(claim) => AuthError::MissingClaims {
                claim: claim.clone(),
            },
            ErrorKind::InvalidToken => AuthError::MalformedToken {
                details: "token format is invalid".into(),
            },
            ErrorKind::Base64(err) => AuthError::MalformedToken {
                details: format!("token contains invalid base64: {err}"),
            },
            ErrorKind::Json(err) => AuthError::MalformedToken {
                details: format!("token contains invalid JSON: {err}"),
            },
            ErrorKind::Utf8(err) => AuthError::MalformedToken {
                details: format!("token contains invalid UTF-8: {err}"),
            },
            _ => AuthError::InvalidSignature {
                reason: format!("token validation failed: {e}"),
            },
        }
    }
}

fn require_claim<T>(value: Option<T>, claim: &str) -> AuthResult<T> {
    value.ok_or_else(|| AuthError::MissingClaims {
        claim: claim.to_owned(),
    })
}
