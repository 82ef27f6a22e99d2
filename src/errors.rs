// ABOUTME: Closed error taxonomy for the token exchange and verification pipeline
// ABOUTME: Defines error kinds, wire error codes, HTTP status mapping, and the error envelope
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! # Unified Error Handling
//!
//! Every failure in the pipeline is a variant of [`AuthError`]. Status and
//! wire-code selection is driven by the variant from the point of failure;
//! error message content is never inspected to pick a code.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire error codes returned to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Identity or session token is structurally invalid, revoked, or fails verification
    #[serde(rename = "INVALID_TOKEN")]
    InvalidToken,
    /// Session token expiry has passed
    #[serde(rename = "TOKEN_EXPIRED")]
    TokenExpired,
    /// Identity is authentic but fails policy (unverified email, wrong domain)
    #[serde(rename = "UNAUTHORIZED")]
    Unauthorized,
    /// Access denied for the authenticated principal
    #[serde(rename = "FORBIDDEN")]
    Forbidden,
    /// Request is malformed at the boundary
    #[serde(rename = "BAD_REQUEST")]
    BadRequest,
    /// Internal failure; not retryable by the pipeline itself
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidToken | Self::BadRequest => 400,
            Self::TokenExpired | Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::InternalError => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidToken => "The provided token is invalid",
            Self::TokenExpired => "The session token has expired",
            Self::Unauthorized => "The identity does not satisfy access policy",
            Self::Forbidden => "Access to this resource is denied",
            Self::BadRequest => "The request is malformed",
            Self::InternalError => "An internal server error occurred",
        }
    }
}

/// Error type for the token exchange and verification pipeline
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// Token is structurally invalid or the provider rejects it outright
    #[error("token is malformed: {details}")]
    MalformedToken {
        /// Details about malformation
        details: String,
    },

    /// Token expiry has passed
    #[error("token has expired")]
    ExpiredToken,

    /// Provider-side revocation, distinct from local expiry
    #[error("identity token has been revoked")]
    RevokedToken,

    /// Signature does not validate against the expected key
    #[error("token signature is invalid: {reason}")]
    InvalidSignature {
        /// Reason for invalidity
        reason: String,
    },

    /// Decoded identity lacks a required field (subject id or email)
    #[error("identity token does not contain {field}")]
    IncompleteIdentity {
        /// Missing identity field
        field: &'static str,
    },

    /// Identity email is not verified with the provider
    #[error("email address is not verified")]
    UnverifiedEmail,

    /// Identity email is outside the allowed organizational domain
    #[error("email domain not allowed, must be from {domain}")]
    DomainNotAllowed {
        /// The configured allowed domain
        domain: String,
    },

    /// Session token issuer claim does not match the expected constant
    #[error("invalid token issuer")]
    InvalidIssuer,

    /// Session token is missing a required claim despite a valid signature
    #[error("missing required claim: {claim}")]
    MissingClaims {
        /// Name of the absent claim
        claim: String,
    },

    /// Underlying cryptographic failure while signing; internal and fatal
    #[error("failed to sign session token: {details}")]
    SigningFailure {
        /// Details from the signing backend
        details: String,
    },

    /// Identity provider could not be reached or returned garbage
    #[error("identity provider unavailable: {details}")]
    ProviderUnavailable {
        /// Details about the provider failure
        details: String,
    },

    /// Invalid or missing configuration
    #[error("configuration error: {message}")]
    Config {
        /// What is misconfigured
        message: String,
    },
}

impl AuthError {
    /// Get the wire error code for this failure
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::MalformedToken { .. }
            | Self::RevokedToken
            | Self::InvalidSignature { .. }
            | Self::InvalidIssuer
            | Self::MissingClaims { .. } => ErrorCode::InvalidToken,
            Self::ExpiredToken => ErrorCode::TokenExpired,
            Self::IncompleteIdentity { .. } | Self::UnverifiedEmail | Self::DomainNotAllowed { .. } => {
                ErrorCode::Unauthorized
            }
            Self::SigningFailure { .. } | Self::ProviderUnavailable { .. } | Self::Config { .. } => {
                ErrorCode::InternalError
            }
        }
    }

    /// Get the HTTP status code for this failure
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code().http_status()
    }
}

/// Result type alias for the pipeline
pub type AuthResult<T> = Result<T, AuthError>;

/// Error envelope returned at the boundary
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Success indicator, always false
    pub ok: bool,
    /// Error information
    pub error: ErrorDetail,
}

/// Error detail carried inside the envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Wire error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
}

impl From<AuthError> for ErrorResponse {
    fn from(error: AuthError) -> Self {
        Self {
            ok: false,
            error: ErrorDetail {
                code: error.code(),
                message: error.to_string(),
            },
        }
    }
}
