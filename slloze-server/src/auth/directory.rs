//! User directory
//!
//! Identity records behind login and token verification. The directory is
//! the only place that knows password hashes; everything downstream works
//! with the verified [`Principal`](crate::auth::Principal).

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};

use shared::client::UserInfo;
use shared::models::Role;
use shared::{AppError, ErrorCode};

/// Demo password shared by the seeded accounts
const SEED_PASSWORD: &str = "slloze123!";

/// Identity record
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub region: Option<String>,
    pub avatar_url: Option<String>,
    pub password_hash: String,
    pub is_active: bool,
}

impl UserRecord {
    /// Verify a password against the stored Argon2 hash
    pub fn verify_password(&self, password: &str) -> Result<bool, AppError> {
        let parsed = PasswordHash::new(&self.password_hash).map_err(|e| {
            AppError::internal(format!("Stored password hash is invalid: {}", e))
        })?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Public projection, safe to return to clients
    pub fn to_user_info(&self) -> UserInfo {
        UserInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            region: self.region.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }
}

/// In-process user directory
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Vec<UserRecord>,
}

impl UserDirectory {
    pub fn new(users: Vec<UserRecord>) -> Self {
        Self { users }
    }

    /// Directory seeded with the demo accounts
    ///
    /// Passwords are hashed at startup so no plaintext or precomputed
    /// hash ships in the binary data.
    pub fn seeded() -> Result<Self, AppError> {
        let hash = hash_password(SEED_PASSWORD)?;

        let seed = |id: &str, name: &str, email: &str, role: Role, region: Option<&str>| {
            UserRecord {
                id: id.to_string(),
                name: name.to_string(),
                email: email.to_string(),
                role,
                region: region.map(|r| r.to_string()),
                avatar_url: Some("https://placehold.co/100x100.png".to_string()),
                password_hash: hash.clone(),
                is_active: true,
            }
        };

        Ok(Self::new(vec![
            seed("user-admin", "Admin User", "admin@slloze.com", Role::Admin, None),
            seed(
                "user-manager-north",
                "Manager North",
                "manager.north@slloze.com",
                Role::Manager,
                Some("North"),
            ),
            seed(
                "user-manager-south",
                "Manager South",
                "manager.south@slloze.com",
                Role::Manager,
                Some("South"),
            ),
            seed(
                "user-member-north",
                "Member North",
                "member.north@slloze.com",
                Role::Member,
                Some("North"),
            ),
            seed(
                "user-member-south",
                "Member South",
                "member.south@slloze.com",
                Role::Member,
                Some("South"),
            ),
        ]))
    }

    /// Look up by email, case-insensitive
    pub fn find_by_email(&self, email: &str) -> Option<&UserRecord> {
        self.users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
    }

    /// Look up by user ID
    ///
    /// Used when resolving token subjects; a missing or disabled record
    /// means the token does not map to a usable identity.
    pub fn find_by_id(&self, id: &str) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Resolve a token subject to an active record
    pub fn resolve_subject(&self, id: &str) -> Result<&UserRecord, AppError> {
        let record = self
            .find_by_id(id)
            .ok_or_else(|| AppError::new(ErrorCode::UnknownSubject))?;
        if !record.is_active {
            return Err(AppError::new(ErrorCode::AccountDisabled));
        }
        Ok(record)
    }
}

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::internal(format!("Password hashing failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_directory_lookup() {
        let directory = UserDirectory::seeded().unwrap();

        let admin = directory.find_by_email("admin@slloze.com").unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert!(admin.region.is_none());

        let manager = directory.find_by_email("MANAGER.NORTH@slloze.com").unwrap();
        assert_eq!(manager.id, "user-manager-north");
        assert_eq!(manager.region.as_deref(), Some("North"));

        assert!(directory.find_by_email("nobody@slloze.com").is_none());
    }

    #[test]
    fn test_password_verification() {
        let directory = UserDirectory::seeded().unwrap();
        let member = directory.find_by_id("user-member-north").unwrap();

        assert!(member.verify_password(SEED_PASSWORD).unwrap());
        assert!(!member.verify_password("wrong-password").unwrap());
    }

    #[test]
    fn test_resolve_subject_fails_closed() {
        let mut directory = UserDirectory::seeded().unwrap();

        assert!(directory.resolve_subject("user-admin").is_ok());
        assert_eq!(
            directory.resolve_subject("user-ghost").unwrap_err().code,
            ErrorCode::UnknownSubject
        );

        directory.users[0].is_active = false;
        assert_eq!(
            directory.resolve_subject("user-admin").unwrap_err().code,
            ErrorCode::AccountDisabled
        );
    }
}
