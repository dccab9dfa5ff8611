//! Authenticated caller context

use shared::models::Role;

use crate::auth::Claims;

/// Authenticated caller, built from verified token claims
///
/// Created by the auth middleware and injected into request extensions.
/// Handlers never see unverified claims; if a [`Principal`] exists, the
/// token behind it passed signature, expiry, issuer and audience checks
/// and resolved to an active account.
#[derive(Debug, Clone)]
pub struct Principal {
    /// User ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Platform role
    pub role: Role,
    /// Region scope, `None` for org-wide admins
    pub region: Option<String>,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name,
            email: claims.email,
            role: claims.role,
            region: claims.region,
        }
    }
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Whether the caller's region scope covers `region`
    ///
    /// Admins carry no region and cover everything. A scoped caller with
    /// no region on record covers nothing.
    pub fn covers_region(&self, region: &str) -> bool {
        if self.is_admin() {
            return true;
        }
        self.region.as_deref() == Some(region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn principal(role: Role, region: Option<&str>) -> Principal {
        Principal {
            id: "user-9".to_string(),
            name: "Test User".to_string(),
            email: "test@slloze.com".to_string(),
            role,
            region: region.map(|r| r.to_string()),
        }
    }

    #[test]
    fn test_admin_covers_every_region() {
        let admin = principal(Role::Admin, None);
        assert!(admin.covers_region("North"));
        assert!(admin.covers_region("West"));
    }

    #[test]
    fn test_scoped_caller_covers_own_region_only() {
        let manager = principal(Role::Manager, Some("North"));
        assert!(manager.covers_region("North"));
        assert!(!manager.covers_region("South"));
    }

    #[test]
    fn test_scoped_caller_without_region_covers_nothing() {
        let member = principal(Role::Member, None);
        assert!(!member.covers_region("North"));
    }
}
