// ABOUTME: Shared constants for the identity federation gateway
// ABOUTME: Token issuer string, configuration defaults, and Firebase endpoints
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Centralized constants to avoid magic values scattered through the codebase

/// Issuer claim written into every session token and required on verification.
pub const TOKEN_ISSUER: &str = "info-class-api";

/// Configuration defaults applied when environment variables are unset
pub mod defaults {
    /// Session token lifetime in hours
    pub const TOKEN_EXPIRY_HOURS: i64 = 24;

    /// Remaining lifetime at or below which `refresh_if_needed` re-issues
    pub const REFRESH_THRESHOLD_HOURS: i64 = 2;

    /// Allowed organizational email domain (case-insensitive suffix match)
    pub const ALLOWED_EMAIL_DOMAIN: &str = "@pocheonil.hs.kr";

    /// Admin allow-list seeded at startup
    pub const ADMIN_EMAILS: &str = "admin@pocheonil.hs.kr";

    /// Firebase project whose tokens are accepted
    pub const FIREBASE_PROJECT_ID: &str = "info-class-7398a";
}

/// Google/Firebase endpoints and verification parameters
pub mod firebase {
    /// JWK set used to verify Firebase ID token signatures
    pub const JWK_URL: &str =
        "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

    /// Expected issuer prefix; the project id is appended
    pub const ISSUER_PREFIX: &str = "https://securetoken.google.com/";

    /// Fallback certificate cache lifetime when no max-age header is present
    pub const DEFAULT_KEY_TTL_SECS: u64 = 3600;

    /// Timeout for certificate fetches
    pub const FETCH_TIMEOUT_SECS: u64 = 10;
}
