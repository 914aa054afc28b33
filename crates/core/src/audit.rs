//! Audit stamping shared by every persisted entity.
//!
//! The acting user is an explicit parameter (`AuditContext`) threaded into
//! every create/update, never an implicit request global. This keeps the
//! domain layer callable without any web request in scope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// Who is performing the current operation, and when.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AuditContext {
    pub user: UserId,
    pub at: DateTime<Utc>,
}

impl AuditContext {
    pub fn new(user: UserId, at: DateTime<Utc>) -> Self {
        Self { user, at }
    }

    /// Context stamped with the current wall-clock time.
    pub fn now(user: UserId) -> Self {
        Self {
            user,
            at: Utc::now(),
        }
    }
}

/// Creation/update metadata embedded in every persisted entity.
///
/// `active` is the soft-delete marker: rows are deactivated, never physically
/// deleted (stock movements excepted — they are append-only and carry no
/// deactivation path). Read queries must filter on `active` explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStamp {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<UserId>,
    pub updated_by: Option<UserId>,
    pub active: bool,
}

impl AuditStamp {
    /// Fresh stamp for a newly created entity.
    pub fn new(ctx: &AuditContext) -> Self {
        Self {
            created_at: ctx.at,
            updated_at: ctx.at,
            created_by: Some(ctx.user),
            updated_by: Some(ctx.user),
            active: true,
        }
    }

    /// Record an update by the acting user.
    pub fn touch(&mut self, ctx: &AuditContext) {
        self.updated_at = ctx.at;
        self.updated_by = Some(ctx.user);
    }

    /// Soft delete: flip the active flag, keep the row.
    pub fn deactivate(&mut self, ctx: &AuditContext) {
        self.active = false;
        self.touch(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_stamp_is_active_and_attributed() {
        let ctx = AuditContext::now(UserId::new());
        let stamp = AuditStamp::new(&ctx);
        assert!(stamp.active);
        assert_eq!(stamp.created_by, Some(ctx.user));
        assert_eq!(stamp.updated_by, Some(ctx.user));
        assert_eq!(stamp.created_at, stamp.updated_at);
    }

    #[test]
    fn touch_updates_only_update_fields() {
        let creator = AuditContext::now(UserId::new());
        let mut stamp = AuditStamp::new(&creator);

        let editor = AuditContext::now(UserId::new());
        stamp.touch(&editor);

        assert_eq!(stamp.created_by, Some(creator.user));
        assert_eq!(stamp.updated_by, Some(editor.user));
        assert_eq!(stamp.created_at, creator.at);
        assert_eq!(stamp.updated_at, editor.at);
    }

    #[test]
    fn deactivate_is_soft() {
        let ctx = AuditContext::now(UserId::new());
        let mut stamp = AuditStamp::new(&ctx);
        stamp.deactivate(&ctx);
        assert!(!stamp.active);
    }
}
