// ABOUTME: Firebase ID token verification against Google's published JWK set
// ABOUTME: RS256 signature, audience, and issuer checks with an in-process key cache
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Firebase identity provider client.
//!
//! Firebase ID tokens are RS256 JWTs signed by Google's secure-token
//! service. Verification needs no Firebase credentials: the public keys are
//! published as a JWK set and rotate regularly, so they are cached
//! in-process and refreshed per the `Cache-Control: max-age` response
//! header.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::IdentityProvider;
use crate::constants::firebase;
use crate::errors::{AuthError, AuthResult};
use crate::models::IdentityClaims;

/// A single RSA public key from Google's JWK set
#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

/// Cached key set with its refresh deadline
#[derive(Debug, Default)]
struct KeyCache {
    keys: HashMap<String, Jwk>,
    refresh_after: Option<DateTime<Utc>>,
}

impl KeyCache {
    fn is_fresh(&self) -> bool {
        self.refresh_after.is_some_and(|deadline| Utc::now() < deadline)
    }
}

/// Raw claims of a Firebase ID token
#[derive(Debug, Deserialize)]
struct FirebaseClaims {
    sub: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
    email_verified: Option<bool>,
}

/// Verifies Firebase ID tokens for a single project
pub struct FirebaseProvider {
    project_id: String,
    issuer: String,
    http: reqwest::Client,
    cache: RwLock<KeyCache>,
}

impl FirebaseProvider {
    /// Create a provider for the given Firebase project
    ///
    /// # Errors
    ///
    /// Returns `Config` if the HTTP client cannot be built.
    pub fn new(project_id: String) -> AuthResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(firebase::FETCH_TIMEOUT_SECS))
            .build()
            .map_err(|e| AuthError::Config {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        let issuer = format!("{}{project_id}", firebase::ISSUER_PREFIX);

        Ok(Self {
            project_id,
            issuer,
            http,
            cache: RwLock::new(KeyCache::default()),
        })
    }

    /// Fetch the key matching `kid`, refreshing the cached set if stale.
    async fn key_for(&self, kid: &str) -> AuthResult<Jwk> {
        {
            let cache = self.cache.read().await;
            if cache.is_fresh() {
                if let Some(key) = cache.keys.get(kid) {
                    return Ok(key.clone());
                }
            }
        }

        let mut cache = self.cache.write().await;
        // Another verification may have refreshed while we waited for the lock
        if !cache.is_fresh() || !cache.keys.contains_key(kid) {
            let (keys, ttl_secs) = self.fetch_keys().await?;
            debug!(key_count = keys.len(), ttl_secs, "Refreshed Firebase JWK set");
            cache.keys = keys;
            cache.refresh_after = Utc::now().checked_add_signed(Duration::seconds(
                i64::try_from(ttl_secs).unwrap_or(i64::MAX),
            ));
        }

        cache.keys.get(kid).cloned().ok_or_else(|| {
            warn!(kid, "Firebase token signed with unknown key");
            AuthError::InvalidSignature {
                reason: format!("unknown signing key: {kid}"),
            }
        })
    }

    async fn fetch_keys(&self) -> AuthResult<(HashMap<String, Jwk>, u64)> {
        let response = self
            .http
            .get(firebase::JWK_URL)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| AuthError::ProviderUnavailable {
                details: format!("failed to fetch Firebase JWK set: {e}"),
            })?;

        let ttl_secs = response
            .headers()
            .get(reqwest::header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_max_age)
            .unwrap_or(firebase::DEFAULT_KEY_TTL_SECS);

        let jwks: JwkSet = response
            .json()
            .await
            .map_err(|e| AuthError::ProviderUnavailable {
                details: format!("invalid JWK set response: {e}"),
            })?;

        let keys = jwks
            .keys
            .into_iter()
            .map(|key| (key.kid.clone(), key))
            .collect();

        Ok((keys, ttl_secs))
    }

    fn convert_jwt_error(e: &jsonwebtoken::errors::Error) -> AuthError {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            ErrorKind::InvalidSignature => AuthError::InvalidSignature {
                reason: "signature verification failed".into(),
            },
            ErrorKind::InvalidAudience => AuthError::MalformedToken {
                details: "token audience does not match the Firebase project".into(),
            },
            ErrorKind::InvalidIssuer => AuthError::MalformedToken {
                details: "token issuer does not match the Firebase project".into(),
            },
            ErrorKind::Base64(err) => AuthError::MalformedToken {
                details: format!("token contains invalid base64: {err}"),
            },
            ErrorKind::Json(err) => AuthError::MalformedToken {
                details: format!("token contains invalid JSON: {err}"),
            },
            _ => AuthError::MalformedToken {
                details: format!("token verification failed: {e}"),
            },
        }
    }
}

#[async_trait]
impl IdentityProvider for FirebaseProvider {
    fn name(&self) -> &'static str {
        "firebase"
    }

    async fn verify_id_token(&self, token: &str) -> AuthResult<IdentityClaims> {
        let header = decode_header(token).map_err(|e| AuthError::MalformedToken {
            details: format!("failed to decode token header: {e}"),
        })?;

        let kid = header.kid.ok_or_else(|| AuthError::MalformedToken {
            details: "token header missing kid (key ID)".into(),
        })?;

        debug!(%kid, "Verifying Firebase ID token");

        let jwk = self.key_for(&kid).await?;
        let decoding_key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e).map_err(|e| {
            AuthError::ProviderUnavailable {
                details: format!("invalid RSA key material from JWK set: {e}"),
            }
        })?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.project_id.as_str()]);
        validation.set_issuer(&[self.issuer.as_str()]);

        let data = decode::<FirebaseClaims>(token, &decoding_key, &validation).map_err(|e| {
            warn!("Firebase token verification failed: {:?}", e);
            Self::convert_jwt_error(&e)
        })?;

        let claims = data.claims;
        Ok(IdentityClaims {
            uid: claims.sub,
            email: claims.email.unwrap_or_default(),
            name: claims.name,
            picture: claims.picture,
            email_verified: claims.email_verified.unwrap_or(false),
        })
    }
}

/// Parse `max-age` out of a `Cache-Control` header value
fn parse_max_age(value: &str) -> Option<u64> {
    value.split(',').find_map(|directive| {
        directive
            .trim()
            .strip_prefix("max-age=")
            .and_then(|age| age.parse().ok())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_max_age() {
        assert_eq!(parse_max_age("public, max-age=19668, must-revalidate"), Some(19668));
        assert_eq!(parse_max_age("max-age=0"), Some(0));
        assert_eq!(parse_max_age("no-cache"), None);
        assert_eq!(parse_max_age("max-age=abc"), None);
    }

    #[test]
    fn test_stale_cache_is_not_fresh() {
        let cache = KeyCache::default();
        assert!(!cache.is_fresh());

        let cache = KeyCache {
            keys: HashMap::new(),
            refresh_after: Some(Utc::now() - Duration::seconds(1)),
        };
        assert!(!cache.is_fresh());
    }
}
