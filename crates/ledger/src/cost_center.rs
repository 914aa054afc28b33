use serde::{Deserialize, Serialize};

use contaerp_core::{
    AuditContext, AuditStamp, DomainError, DomainResult, EntityId, TenantId, ensure_acyclic,
};

/// Cost-allocation node. Like chart accounts, cost centers form a per-tenant
/// forest, but carry no kind or postable flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostCenter {
    pub id: EntityId,
    pub tenant_id: TenantId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<EntityId>,
    pub audit: AuditStamp,
}

impl CostCenter {
    pub fn new(
        tenant_id: TenantId,
        code: impl Into<String>,
        name: impl Into<String>,
        parent_id: Option<EntityId>,
        ctx: &AuditContext,
    ) -> DomainResult<Self> {
        let code = code.into();
        let name = name.into();
        if code.trim().is_empty() {
            return Err(DomainError::validation("cost center code cannot be empty"));
        }
        if name.trim().is_empty() {
            return Err(DomainError::validation("cost center name cannot be empty"));
        }
        Ok(Self {
            id: EntityId::new(),
            tenant_id,
            code,
            name,
            description: None,
            parent_id,
            audit: AuditStamp::new(ctx),
        })
    }

    /// Move this cost center under a new parent (None makes it a root).
    pub fn reparent<F>(
        &mut self,
        new_parent: Option<&CostCenter>,
        parent_of: F,
        ctx: &AuditContext,
    ) -> DomainResult<()>
    where
        F: Fn(EntityId) -> Option<EntityId>,
    {
        if let Some(parent) = new_parent {
            if parent.tenant_id != self.tenant_id {
                return Err(DomainError::invariant("parent belongs to another tenant"));
            }
        }
        ensure_acyclic(self.id, new_parent.map(|p| p.id), parent_of)?;
        self.parent_id = new_parent.map(|p| p.id);
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
    fn create_and_reparent() {
        let tenant = TenantId::new();
        let adm = CostCenter::new(tenant, "ADM", "Administrativo", None, &ctx()).unwrap();
        let mut rh = CostCenter::new(tenant, "RH", "Recursos Humanos", None, &ctx()).unwrap();

        rh.reparent(Some(&adm), |_| None, &ctx()).unwrap();
        assert_eq!(rh.parent_id, Some(adm.id));
    }

    #[test]
    fn reparent_rejects_cycle() {
        let tenant = TenantId::new();
        let mut adm = CostCenter::new(tenant, "ADM", "Administrativo", None, &ctx()).unwrap();
        let rh = CostCenter::new(tenant, "RH", "RH", Some(adm.id), &ctx()).unwrap();

        let parents = HashMap::from([(rh.id, adm.id)]);
        let err = adm
            .reparent(Some(&rh), |id| parents.get(&id).copied(), &ctx())
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn reparent_rejects_cross_tenant() {
        let other = CostCenter::new(TenantId::new(), "X", "X", None, &ctx()).unwrap();
        let mut cc = CostCenter::new(TenantId::new(), "ADM", "Adm", None, &ctx()).unwrap();
        assert!(cc.reparent(Some(&other), |_| None, &ctx()).is_err());
    }
}
