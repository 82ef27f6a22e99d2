// ABOUTME: Core data model for the identity federation pipeline
// ABOUTME: Identity claims, roles, the identified principal, session claims, and wire shapes
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Data structures flowing through the exchange pipeline.
//!
//! Everything here is transient: identities and principals are constructed
//! per request from a fresh verification and are never cached or persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::TOKEN_ISSUER;

/// Identity claims decoded from a provider-issued token.
///
/// Transient; never persisted. Subject id and email are guaranteed non-empty
/// only after the identity validator has accepted the claims.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentityClaims {
    /// Provider-issued unique subject id
    pub uid: String,
    /// User email address
    pub email: String,
    /// Optional display name
    pub name: Option<String>,
    /// Optional profile picture URL
    pub picture: Option<String>,
    /// Whether the provider has verified the email address
    pub email_verified: bool,
}

/// Identity claims that have passed policy checks.
///
/// Constructed only by the identity validator; immutable; consumed once by
/// the role resolver.
#[derive(Debug, Clone)]
pub struct ValidatedIdentity(IdentityClaims);

impl ValidatedIdentity {
    pub(crate) fn new(claims: IdentityClaims) -> Self {
        Self(claims)
    }

    /// Borrow the underlying claims
    #[must_use]
    pub fn claims(&self) -> &IdentityClaims {
        &self.0
    }

    pub(crate) fn into_claims(self) -> IdentityClaims {
        self.0
    }
}

/// Closed set of internal roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full administrative access
    Admin,
    /// Organization member
    Student,
    /// Outside the organization; minimal access
    Guest,
}

impl UserRole {
    /// Parse a role name; `None` for anything outside the closed set
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "student" => Some(Self::Student),
            "guest" => Some(Self::Guest),
            _ => None,
        }
    }

    /// Role name as written into token claims
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Student => "student",
            Self::Guest => "guest",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The complete principal: validated identity plus role and permissions.
///
/// Constructed per request; exists only for the duration of one exchange,
/// refresh, or authenticated call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentifiedUser {
    /// Provider-issued unique subject id
    pub uid: String,
    /// User email address
    pub email: String,
    /// Optional display name
    pub name: Option<String>,
    /// Optional profile picture URL
    pub picture: Option<String>,
    /// Whether the email is verified
    pub email_verified: bool,
    /// Resolved role
    pub role: UserRole,
    /// Fixed permission set for the role
    pub permissions: Vec<String>,
}

impl IdentifiedUser {
    /// Reconstruct a principal from verified session claims.
    ///
    /// Used by the refresh path: the identity provider is not re-contacted,
    /// so the picture is not available and the email is taken as verified
    /// (a session token is only ever issued for a verified identity).
    #[must_use]
    pub fn from_session_claims(claims: &SessionClaims) -> Self {
        Self {
            uid: claims.sub.clone(),
            email: claims.email.clone(),
            name: claims.name.clone(),
            picture: None,
            email_verified: true,
            role: claims.role,
            permissions: claims.permissions.clone(),
        }
    }
}

/// Claims carried inside a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (provider-issued user id)
    pub sub: String,
    /// User email
    pub email: String,
    /// Optional display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Resolved role
    pub role: UserRole,
    /// Permission set frozen at issuance
    pub permissions: Vec<String>,
    /// Issued-at timestamp (seconds since epoch)
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch)
    pub exp: i64,
    /// Issuer
    pub iss: String,
}

impl SessionClaims {
    /// Expiration as a timezone-aware timestamp
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// Session token and principal returned by exchange and refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenData {
    /// Signed session token
    pub jwt_token: String,
    /// The principal the token was issued for
    pub user: IdentifiedUser,
    /// Token expiration time
    pub expires_at: DateTime<Utc>,
}

/// Success envelope returned at the boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenExchangeResponse {
    /// Success indicator, always true
    pub ok: bool,
    /// Token and user data
    pub data: TokenData,
}

impl From<TokenData> for TokenExchangeResponse {
    fn from(data: TokenData) -> Self {
        Self { ok: true, data }
    }
}

/// Projection of verified session claims for the "who am I" operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhoAmI {
    /// Subject id
    pub uid: String,
    /// User email
    pub email: String,
    /// Optional display name
    pub name: Option<String>,
    /// Role carried by the token
    pub role: UserRole,
    /// Permission set carried by the token
    pub permissions: Vec<String>,
    /// Token expiration time
    pub expires_at: DateTime<Utc>,
}

impl Default for SessionClaims {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            sub: String::new(),
            email: String::new(),
            name: None,
            role: UserRole::Guest,
            permissions: Vec::new(),
            iat: now.timestamp(),
            exp: now.timestamp(),
            iss: TOKEN_ISSUER.to_owned(),
        }
    }
}
