use serde::{Deserialize, Serialize};

use contaerp_core::{
    AuditContext, AuditStamp, DomainError, DomainResult, EntityId, ensure_acyclic,
};

/// Product category node. Categories form a forest (optional parent).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<EntityId>,
    pub audit: AuditStamp,
}

impl Category {
    pub fn new(
        name: impl Into<String>,
        parent_id: Option<EntityId>,
        ctx: &AuditContext,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("category name cannot be empty"));
        }
        Ok(Self {
            id: EntityId::new(),
            name,
            description: None,
            parent_id,
            audit: AuditStamp::new(ctx),
        })
    }

    /// Move this category under a new parent (None makes it a root).
    ///
    /// `parent_of` resolves the current parent of any category so the walk can
    /// reject cycles before anything is persisted.
    pub fn reparent<F>(
        &mut self,
        new_parent: Option<EntityId>,
        parent_of: F,
        ctx: &AuditContext,
    ) -> DomainResult<()>
    where
        F: Fn(EntityId) -> Option<EntityId>,
    {
        ensure_acyclic(self.id, new_parent, parent_of)?;
        self.parent_id = new_parent;
        self.audit.touch(ctx);
        Ok(())
    }

    pub fn deactivate(&mut self, ctx: &AuditContext) {
        self.audit.deactivate(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contaerp_core::UserId;
    use std::collections::HashMap;

    fn ctx() -> AuditContext {
        AuditContext::now(UserId::new())
    }

    #[test]
    fn reparent_rejects_descendant() {
        let mut root = Category::new("Bebidas", None, &ctx()).unwrap();
        let child = Category::new("Refrigerantes", Some(root.id), &ctx()).unwrap();

        let parents = HashMap::from([(child.id, root.id)]);
        let err = root
            .reparent(Some(child.id), |id| parents.get(&id).copied(), &ctx())
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        // The failed move must leave the node untouched.
        assert_eq!(root.parent_id, None);
    }

    #[test]
    fn reparent_to_root_always_allowed() {
        let parent = Category::new("Bebidas", None, &ctx()).unwrap();
        let mut child = Category::new("Sucos", Some(parent.id), &ctx()).unwrap();
        child.reparent(None, |_| None, &ctx()).unwrap();
        assert_eq!(child.parent_id, None);
    }
}
