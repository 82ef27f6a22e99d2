// ABOUTME: Role resolution and table-driven permission assignment
// ABOUTME: Admin allow-list registry with synchronized runtime mutation
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Role resolver.
//!
//! Role derivation is a total function: admin allow-list membership wins,
//! then organizational domain membership, then guest. Each role maps to a
//! fixed permission list defined once as static data, so adding a role is a
//! data change, not a code change.

use std::sync::{Arc, RwLock};
use tracing::debug;

use super::validator::email_matches_domain;
use crate::models::{IdentifiedUser, IdentityClaims, UserRole, ValidatedIdentity};

/// Role to permission mapping, ordered Admin, Student, Guest
const ROLE_PERMISSIONS: &[(UserRole, &[&str])] = &[
    (
        UserRole::Admin,
        &[
            "read_all_files",
            "upload_files",
            "delete_files",
            "manage_users",
            "view_submissions",
            "manage_subjects",
            "system_admin",
        ],
    ),
    (
        UserRole::Student,
        &[
            "read_assigned_files",
            "download_files",
            "upload_submissions",
            "view_own_submissions",
        ],
    ),
    (UserRole::Guest, &["read_public_info"]),
];

/// Get the fixed permission list for a role
#[must_use]
pub fn permissions_for(role: UserRole) -> &'static [&'static str] {
    ROLE_PERMISSIONS
        .iter()
        .find(|(r, _)| *r == role)
        .map_or(&[], |(_, perms)| *perms)
}

/// Get the permission list for a role name; empty for unknown roles
#[must_use]
pub fn permissions_for_name(name: &str) -> &'static [&'static str] {
    UserRole::parse(name).map_or(&[], permissions_for)
}

/// Check whether a role name carries a specific permission
#[must_use]
pub fn has_permission(role_name: &str, permission: &str) -> bool {
    permissions_for_name(role_name).contains(&permission)
}

/// Check whether a role name can access admin features
#[must_use]
pub fn can_access_admin_features(role_name: &str) -> bool {
    has_permission(role_name, "system_admin")
}

/// Check whether a role name can manage (upload and delete) files
#[must_use]
pub fn can_manage_files(role_name: &str) -> bool {
    has_permission(role_name, "upload_files")
}

/// Check whether a role name can view submissions
#[must_use]
pub fn can_view_submissions(role_name: &str) -> bool {
    has_permission(role_name, "view_submissions")
}

/// Synchronized admin email allow-list.
///
/// The one piece of mutable shared state in the gateway. Entries are stored
/// lower-cased with insertion order preserved; all operations are
/// case-insensitive.
#[derive(Debug, Default)]
pub struct AdminRegistry {
    emails: RwLock<Vec<String>>,
}

impl AdminRegistry {
    /// Create a registry seeded with the given emails
    #[must_use]
    pub fn new<I, S>(initial: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let registry = Self::default();
        for email in initial {
            registry.add(email.as_ref());
        }
        registry
    }

    /// Add an email to the allow-list; idempotent
    ///
    /// Returns false when the email was already present.
    pub fn add(&self, email: &str) -> bool {
        let email = email.to_lowercase();
        let mut emails = self.emails.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        if emails.contains(&email) {
            return false;
        }
        emails.push(email);
        true
    }

    /// Remove an email from the allow-list
    ///
    /// Returns false when the email was not present.
    pub fn remove(&self, email: &str) -> bool {
        let email = email.to_lowercase();
        let mut emails = self.emails.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        let before = emails.len();
        emails.retain(|entry| *entry != email);
        emails.len() != before
    }

    /// Check allow-list membership, case-insensitively
    #[must_use]
    pub fn contains(&self, email: &str) -> bool {
        let email = email.to_lowercase();
        self.emails
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .contains(&email)
    }

    /// Current allow-list contents in insertion order
    #[must_use]
    pub fn snapshot(&self) -> Vec<String> {
        self.emails
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

/// Maps validated identities to roles and permission sets
pub struct RoleResolver {
    admins: Arc<AdminRegistry>,
    allowed_domain: String,
}

impl RoleResolver {
    /// Create a resolver over the given admin registry and domain
    #[must_use]
    pub fn new(admins: Arc<AdminRegistry>, allowed_domain: impl Into<String>) -> Self {
        Self {
            admins,
            allowed_domain: allowed_domain.into(),
        }
    }

    /// The admin registry backing this resolver
    #[must_use]
    pub fn admin_registry(&self) -> Arc<AdminRegistry> {
        Arc::clone(&self.admins)
    }

    /// Determine the role for an identity; total, never fails
    #[must_use]
    pub fn resolve_role(&self, claims: &IdentityClaims) -> UserRole {
        let email = claims.email.to_lowercase();

        if self.admins.contains(&email) {
            return UserRole::Admin;
        }
        if email_matches_domain(&email, &self.allowed_domain) {
            return UserRole::Student;
        }
        UserRole::Guest
    }

    /// Attach role and permissions to a validated identity
    #[must_use]
    pub fn identify(&self, identity: ValidatedIdentity) -> IdentifiedUser {
        let role = self.resolve_role(identity.claims());
        let claims = identity.into_claims();

        debug!(email = %claims.email, %role, "Resolved role");

        IdentifiedUser {
            uid: claims.uid,
            email: claims.email,
            name: claims.name,
            picture: claims.picture,
            email_verified: claims.email_verified,
            role,
            permissions: permissions_for(role).iter().map(ToString::to_string).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_table_is_fixed() {
        assert_eq!(permissions_for(UserRole::Admin).len(), 7);
        assert_eq!(permissions_for(UserRole::Student).len(), 4);
        assert_eq!(permissions_for(UserRole::Guest).len(), 1);
    }

    #[test]
    fn test_unknown_role_has_no_permissions() {
        assert!(permissions_for_name("superuser").is_empty());
        assert!(permissions_for_name("").is_empty());
    }
}
