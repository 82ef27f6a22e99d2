// ABOUTME: Unit tests for identity validation policy
// ABOUTME: Validates required fields, the verified-email gate, and domain enforcement
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::sync::Arc;

use info_class_api::{
    auth::IdentityValidator,
    errors::AuthError,
    models::IdentityClaims,
    providers::StaticProvider,
};

const DOMAIN: &str = "@pocheonil.hs.kr";

fn claims(email: &str, verified: bool) -> IdentityClaims {
    IdentityClaims {
        uid: "firebase-uid-1".into(),
        email: email.into(),
        name: Some("Test User".into()),
        picture: Some("https://example.com/avatar.png".into()),
        email_verified: verified,
    }
}

fn validator(identity: IdentityClaims) -> IdentityValidator {
    IdentityValidator::new(Arc::new(StaticProvider::new(identity)), DOMAIN)
}

#[tokio::test]
async fn test_valid_identity_passes_with_fields_unchanged() {
    let input = claims("Student@Pocheonil.hs.kr", true);
    let validated = validator(input.clone())
        .validate("id-token")
        .await
        .unwrap();

    // Fields come back exactly as the provider returned them; only the
    // domain comparison is case-insensitive
    assert_eq!(*validated.claims(), input);
}

#[tokio::test]
async fn test_unverified_email_is_rejected() {
    let err = validator(claims("student@pocheonil.hs.kr", false))
        .validate("id-token")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::UnverifiedEmail));
}

#[tokio::test]
async fn test_unverified_email_rejected_even_for_admin_address() {
    // Verification state is checked before any role considerations
    let err = validator(claims("admin@pocheonil.hs.kr", false))
        .validate("id-token")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::UnverifiedEmail));
}

#[tokio::test]
async fn test_outside_domain_is_rejected() {
    let err = validator(claims("outsider@other.example", true))
        .validate("id-token")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::DomainNotAllowed { domain } if domain == DOMAIN));
}

#[tokio::test]
async fn test_missing_uid_is_rejected_before_verification_state() {
    let mut identity = claims("student@pocheonil.hs.kr", false);
    identity.uid = String::new();

    // Presence checks run first, so the missing uid wins over the
    // unverified email
    let err = validator(identity).validate("id-token").await.unwrap_err();
    assert!(matches!(err, AuthError::IncompleteIdentity { field } if field == "user ID"));
}

#[tokio::test]
async fn test_missing_email_is_rejected() {
    let mut identity = claims("", true);
    identity.name = None;

    let err = validator(identity).validate("id-token").await.unwrap_err();
    assert!(matches!(err, AuthError::IncompleteIdentity { field } if field == "email"));
}

#[tokio::test]
async fn test_provider_rejection_propagates() {
    // The static provider rejects empty tokens outright
    let err = validator(claims("student@pocheonil.hs.kr", true))
        .validate("")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::MalformedToken { .. }));
}
