//! System user record.
//!
//! Users are global (not tenant-scoped): the same operator may administer
//! several companies. The bootstrap binary provisions a default admin when the
//! table is empty.

use serde::{Deserialize, Serialize};

use contaerp_core::{AuditContext, AuditStamp, DomainError, DomainResult, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: Option<String>,
    /// Password hash; never the plaintext. See [`crate::password`] for
    /// the hashing side.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub admin: bool,
    pub audit: AuditStamp,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        email: Option<String>,
        password_hash: impl Into<String>,
        admin: bool,
        ctx: &AuditContext,
    ) -> DomainResult<Self> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(DomainError::validation("username cannot be empty"));
        }
        let password_hash = password_hash.into();
        if password_hash.is_empty() {
            return Err(DomainError::validation("password hash cannot be empty"));
        }
        Ok(Self {
            id: UserId::new(),
            username,
            email,
            password_hash,
            admin,
            audit: AuditStamp::new(ctx),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_is_active() {
        let ctx = AuditContext::now(UserId::new());
        let user = User::new("admin", None, "argon2-hash", true, &ctx).unwrap();
        assert!(user.audit.active);
        assert!(user.admin);
    }

    #[test]
    fn rejects_blank_username() {
        let ctx = AuditContext::now(UserId::new());
        let err = User::new("  ", None, "h", false, &ctx).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
