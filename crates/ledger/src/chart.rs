use serde::{Deserialize, Serialize};

use contaerp_core::{
    AuditContext, AuditStamp, DomainError, DomainResult, EntityId, TenantId, ensure_acyclic,
};

/// Account classification. Wire tokens match the stored values
/// (`"ativo"`, `"passivo"`, `"receita"`, `"despesa"`, `"patrimonio"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Ativo,
    Passivo,
    Receita,
    Despesa,
    Patrimonio,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Ativo => "ativo",
            AccountKind::Passivo => "passivo",
            AccountKind::Receita => "receita",
            AccountKind::Despesa => "despesa",
            AccountKind::Patrimonio => "patrimonio",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "ativo" => Ok(AccountKind::Ativo),
            "passivo" => Ok(AccountKind::Passivo),
            "receita" => Ok(AccountKind::Receita),
            "despesa" => Ok(AccountKind::Despesa),
            "patrimonio" => Ok(AccountKind::Patrimonio),
            other => Err(DomainError::validation(format!(
                "unknown account kind: {other}"
            ))),
        }
    }
}

/// A chart-of-accounts node. `code` is unique; `level` is a denormalized
/// depth hint kept consistent with the parent chain by this type's methods.
///
/// `postable` marks whether financial documents and cash movements may target
/// this node directly. Aggregator (non-postable) nodes reject postings at
/// write time; see [`ChartAccount::ensure_postable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartAccount {
    pub id: EntityId,
    pub tenant_id: TenantId,
    pub code: String,
    pub name: String,
    pub kind: AccountKind,
    pub level: u32,
    pub postable: bool,
    pub parent_id: Option<EntityId>,
    pub audit: AuditStamp,
}

impl ChartAccount {
    /// Create a root account (level 1).
    pub fn new_root(
        tenant_id: TenantId,
        code: impl Into<String>,
        name: impl Into<String>,
        kind: AccountKind,
        postable: bool,
        ctx: &AuditContext,
    ) -> DomainResult<Self> {
        Self::build(tenant_id, code, name, kind, postable, None, 1, ctx)
    }

    /// Create a child account under `parent`. The child inherits the parent's
    /// kind and sits one level below it.
    pub fn new_child(
        parent: &ChartAccount,
        code: impl Into<String>,
        name: impl Into<String>,
        postable: bool,
        ctx: &AuditContext,
    ) -> DomainResult<Self> {
        Self::build(
            parent.tenant_id,
            code,
            name,
            parent.kind,
            postable,
            Some(parent.id),
            parent.level + 1,
            ctx,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        tenant_id: TenantId,
        code: impl Into<String>,
        name: impl Into<String>,
        kind: AccountKind,
        postable: bool,
        parent_id: Option<EntityId>,
        level: u32,
        ctx: &AuditContext,
    ) -> DomainResult<Self> {
        let code = code.into();
        let name = name.into();
        if code.trim().is_empty() {
            return Err(DomainError::validation("account code cannot be empty"));
        }
        if name.trim().is_empty() {
            return Err(DomainError::validation("account name cannot be empty"));
        }
        Ok(Self {
            id: EntityId::new(),
            tenant_id,
            code,
            name,
            kind,
            level,
            postable,
            parent_id,
            audit: AuditStamp::new(ctx),
        })
    }

    /// Move this account under a new parent (None makes it a root).
    ///
    /// The proposed parent must belong to the same tenant and carry the same
    /// kind; the parent chain is walked to reject cycles. `level` is
    /// recomputed from the new parent.
    pub fn reparent<F>(
        &mut self,
        new_parent: Option<&ChartAccount>,
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
            if parent.kind != self.kind {
                return Err(DomainError::invariant(
                    "parent account has a different kind",
                ));
            }
        }
        ensure_acyclic(self.id, new_parent.map(|p| p.id), parent_of)?;

        self.parent_id = new_parent.map(|p| p.id);
        self.level = new_parent.map_or(1, |p| p.level + 1);
        self.audit.touch(ctx);
        Ok(())
    }

    /// Write-time guard used by every posting path (documents, movements).
    pub fn ensure_postable(&self) -> DomainResult<()> {
        if !self.postable {
            return Err(DomainError::invariant(format!(
                "account {} does not accept direct postings",
                self.code
            )));
        }
        if !self.audit.active {
            return Err(DomainError::invariant(format!(
                "account {} is inactive",
                self.code
            )));
        }
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

    fn root(tenant: TenantId, code: &str, postable: bool) -> ChartAccount {
        ChartAccount::new_root(tenant, code, code, AccountKind::Receita, postable, &ctx()).unwrap()
    }

    #[test]
    fn child_inherits_kind_and_level() {
        let tenant = TenantId::new();
        let parent = root(tenant, "1", false);
        let child = ChartAccount::new_child(&parent, "1.1", "Vendas", true, &ctx()).unwrap();
        assert_eq!(child.kind, parent.kind);
        assert_eq!(child.level, 2);
        assert_eq!(child.parent_id, Some(parent.id));
    }

    #[test]
    fn non_postable_account_rejects_postings() {
        let agg = root(TenantId::new(), "1", false);
        let err = agg.ensure_postable().unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));

        let leaf = root(TenantId::new(), "1.1.01", true);
        assert!(leaf.ensure_postable().is_ok());
    }

    #[test]
    fn inactive_account_rejects_postings() {
        let mut leaf = root(TenantId::new(), "1.1.01", true);
        leaf.deactivate(&ctx());
        assert!(leaf.ensure_postable().is_err());
    }

    #[test]
    fn reparent_recomputes_level() {
        let tenant = TenantId::new();
        let parent = root(tenant, "1", false);
        let mut acc = root(tenant, "2", true);

        acc.reparent(Some(&parent), |_| None, &ctx()).unwrap();
        assert_eq!(acc.level, 2);

        acc.reparent(None, |_| None, &ctx()).unwrap();
        assert_eq!(acc.level, 1);
    }

    #[test]
    fn reparent_rejects_cross_tenant_parent() {
        let parent = root(TenantId::new(), "1", false);
        let mut acc = root(TenantId::new(), "2", true);
        let err = acc.reparent(Some(&parent), |_| None, &ctx()).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn reparent_rejects_kind_mismatch() {
        let tenant = TenantId::new();
        let parent =
            ChartAccount::new_root(tenant, "1", "Ativo", AccountKind::Ativo, false, &ctx())
                .unwrap();
        let mut acc = root(tenant, "3", true);
        let err = acc.reparent(Some(&parent), |_| None, &ctx()).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn reparent_rejects_cycle() {
        let tenant = TenantId::new();
        let mut a = root(tenant, "1", false);
        let b = ChartAccount::new_child(&a, "1.1", "Meio", false, &ctx()).unwrap();

        // b's parent is a; moving a under b would close the loop.
        let parents = HashMap::from([(b.id, a.id)]);
        let err = a
            .reparent(Some(&b), |id| parents.get(&id).copied(), &ctx())
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }
}
