// ABOUTME: Unit tests for session token issuance and verification
// ABOUTME: Validates the token lifecycle, tamper detection, and claim schema enforcement
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use chrono::{Duration, Utc};
use info_class_api::{
    auth::{roles::permissions_for, SessionTokenManager},
    errors::AuthError,
    models::{IdentifiedUser, SessionClaims, UserRole},
};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

const SECRET: &[u8] = b"test-secret-key-0123456789abcdef";

fn manager() -> SessionTokenManager {
    SessionTokenManager::new(SECRET, 24)
}

fn sample_user(role: UserRole) -> IdentifiedUser {
    IdentifiedUser {
        uid: "firebase-uid-1".into(),
        email: "student@pocheonil.hs.kr".into(),
        name: Some("Test Student".into()),
        picture: None,
        email_verified: true,
        role,
        permissions: permissions_for(role).iter().map(ToString::to_string).collect(),
    }
}

fn sign(claims: &impl serde::Serialize, secret: &[u8]) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret),
    )
    .unwrap()
}

#[test]
fn test_issue_and_verify_round_trip() {
    let sessions = manager();
    let user = sample_user(UserRole::Student);

    let (token, expires_at) = sessions.issue(&user).unwrap();
    assert!(!token.is_empty());
    assert!(expires_at > Utc::now());

    let claims = sessions.verify(&token).unwrap();
    assert_eq!(claims.sub, user.uid);
    assert_eq!(claims.email, user.email);
    assert_eq!(claims.name, user.name);
    assert_eq!(claims.role, UserRole::Student);
    assert_eq!(claims.permissions, user.permissions);
    assert_eq!(claims.iss, "info-class-api");
}

#[test]
fn test_expiry_equals_issued_at_plus_lifetime() {
    let sessions = manager();
    let (token, expires_at) = sessions.issue(&sample_user(UserRole::Admin)).unwrap();

    let claims = sessions.verify(&token).unwrap();
    assert_eq!(claims.exp - claims.iat, 24 * 3600);
    assert_eq!(claims.exp, expires_at.timestamp());
}

#[test]
fn test_expired_token_is_rejected() {
    let sessions = manager();
    let now = Utc::now();
    let token = sign(
        &SessionClaims {
            sub: "firebase-uid-1".into(),
            email: "student@pocheonil.hs.kr".into(),
            role: UserRole::Student,
            iat: (now - Duration::hours(3)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
            ..SessionClaims::default()
        },
        SECRET,
    );

    let err = sessions.verify(&token).unwrap_err();
    assert!(matches!(err, AuthError::ExpiredToken));
}

#[test]
fn test_tampered_signature_is_rejected() {
    let sessions = manager();
    let (token, _) = sessions.issue(&sample_user(UserRole::Student)).unwrap();

    let (payload, signature) = token.rsplit_once('.').unwrap();
    let flipped = if signature.starts_with('A') { "B" } else { "A" };
    let tampered = format!("{payload}.{flipped}{}", &signature[1..]);

    let err = sessions.verify(&tampered).unwrap_err();
    assert!(matches!(err, AuthError::InvalidSignature { .. }));
}

#[test]
fn test_foreign_secret_is_rejected() {
    let sessions = manager();
    let (token, _) = SessionTokenManager::new(b"some-other-secret", 24)
        .issue(&sample_user(UserRole::Student))
        .unwrap();

    let err = sessions.verify(&token).unwrap_err();
    assert!(matches!(err, AuthError::InvalidSignature { .. }));
}

#[test]
fn test_missing_required_claim_fails_despite_valid_signature() {
    #[derive(serde::Serialize)]
    struct NoEmailClaims {
        sub: String,
        role: String,
        permissions: Vec<String>,
        iat: i64,
        exp: i64,
        iss: String,
    }

    let sessions = manager();
    let now = Utc::now();
    let token = sign(
        &NoEmailClaims {
            sub: "firebase-uid-1".into(),
            role: "student".into(),
            permissions: vec![],
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
            iss: "info-class-api".into(),
        },
        SECRET,
    );

    let err = sessions.verify(&token).unwrap_err();
    assert!(matches!(err, AuthError::MissingClaims { claim } if claim == "email"));
}

#[test]
fn test_wrong_issuer_is_rejected() {
    let sessions = manager();
    let now = Utc::now();
    let token = sign(
        &SessionClaims {
            sub: "firebase-uid-1".into(),
            email: "student@pocheonil.hs.kr".into(),
            role: UserRole::Student,
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
            iss: "some-other-api".into(),
            ..SessionClaims::default()
        },
        SECRET,
    );

    let err = sessions.verify(&token).unwrap_err();
    assert!(matches!(err, AuthError::InvalidIssuer));
}

#[test]
fn test_garbage_token_is_malformed() {
    let sessions = manager();
    let err = sessions.verify("not.a.jwt").unwrap_err();
    assert!(matches!(
        err,
        AuthError::MalformedToken { .. } | AuthError::InvalidSignature { .. }
    ));
}

#[test]
fn test_peek_expiry_ignores_signature() {
    let sessions = manager();
    // Signed with a secret this manager does not know
    let (token, expires_at) = SessionTokenManager::new(b"some-other-secret", 24)
        .issue(&sample_user(UserRole::Guest))
        .unwrap();

    let peeked = sessions.peek_expiry(&token).unwrap();
    assert_eq!(peeked.timestamp(), expires_at.timestamp());
    assert!(sessions.verify(&token).is_err());

    assert!(sessions.peek_expiry("garbage").is_none());
}

#[test]
fn test_is_expired() {
    let sessions = manager();
    let (fresh, _) = sessions.issue(&sample_user(UserRole::Student)).unwrap();

    assert!(!sessions.is_expired(&fresh));
    assert!(sessions.is_expired("unreadable-token"));
}

#[test]
fn test_refresh_if_needed_within_threshold() {
    // One-hour lifetime sits inside a two-hour refresh threshold
    let sessions = SessionTokenManager::new(SECRET, 1);
    let user = sample_user(UserRole::Student);
    let (token, _) = sessions.issue(&user).unwrap();

    let refreshed = sessions.refresh_if_needed(&token, &user, 2).unwrap();
    let (new_token, new_expires_at) = refreshed.expect("token should refresh within threshold");

    assert!(new_expires_at > Utc::now());
    let claims = sessions.verify(&new_token).unwrap();
    assert_eq!(claims.sub, user.uid);
}

#[test]
fn test_refresh_if_needed_outside_threshold() {
    let sessions = manager();
    let user = sample_user(UserRole::Student);
    let (token, _) = sessions.issue(&user).unwrap();

    // 24 hours remaining, threshold 2 hours: nothing to do
    let refreshed = sessions.refresh_if_needed(&token, &user, 2).unwrap();
    assert!(refreshed.is_none());
}

#[test]
fn test_refresh_if_needed_unreadable_token() {
    let sessions = manager();
    let user = sample_user(UserRole::Student);

    let refreshed = sessions.refresh_if_needed("garbage", &user, 2).unwrap();
    assert!(refreshed.is_none());
}
