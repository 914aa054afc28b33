use serde::{Deserialize, Serialize};

use contaerp_core::{AuditContext, AuditStamp, DomainError, DomainResult, TenantId};

/// A company or branch. The root of the multi-tenant scoping graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: TenantId,
    pub name: String,
    /// CNPJ; globally unique (enforced by the store).
    pub tax_id: String,
    pub legal_name: String,
    pub state_registration: Option<String>,
    pub municipal_registration: Option<String>,
    pub address: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    /// Whether this is the headquarters (matriz) rather than a branch.
    pub headquarters: bool,
    pub audit: AuditStamp,
}

impl Company {
    pub fn new(
        name: impl Into<String>,
        tax_id: impl Into<String>,
        legal_name: impl Into<String>,
        address: impl Into<String>,
        headquarters: bool,
        ctx: &AuditContext,
    ) -> DomainResult<Self> {
        let name = name.into();
        let tax_id = tax_id.into();
        let legal_name = legal_name.into();

        if name.trim().is_empty() {
            return Err(DomainError::validation("company name cannot be empty"));
        }
        if tax_id.trim().is_empty() {
            return Err(DomainError::validation("tax id cannot be empty"));
        }
        if legal_name.trim().is_empty() {
            return Err(DomainError::validation("legal name cannot be empty"));
        }

        Ok(Self {
            id: TenantId::new(),
            name,
            tax_id,
            legal_name,
            state_registration: None,
            municipal_registration: None,
            address: address.into(),
            phone: None,
            email: None,
            website: None,
            headquarters,
            audit: AuditStamp::new(ctx),
        })
    }

    /// Update mutable details, stamping the acting user.
    pub fn update_details(
        &mut self,
        name: Option<String>,
        legal_name: Option<String>,
        address: Option<String>,
        ctx: &AuditContext,
    ) -> DomainResult<()> {
        if let Some(name) = name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("company name cannot be empty"));
            }
            self.name = name;
        }
        if let Some(legal_name) = legal_name {
            if legal_name.trim().is_empty() {
                return Err(DomainError::validation("legal name cannot be empty"));
            }
            self.legal_name = legal_name;
        }
        if let Some(address) = address {
            self.address = address;
        }
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

    fn ctx() -> AuditContext {
        AuditContext::now(UserId::new())
    }

    #[test]
    fn create_company() {
        let c = Company::new(
            "Acme Ltda",
            "12.345.678/0001-99",
            "Acme Comércio Ltda",
            "Rua A, 1",
            true,
            &ctx(),
        )
        .unwrap();
        assert!(c.headquarters);
        assert!(c.audit.active);
        assert_eq!(c.tax_id, "12.345.678/0001-99");
    }

    #[test]
    fn rejects_blank_tax_id() {
        let err = Company::new("Acme", " ", "Acme Ltda", "", false, &ctx()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn update_stamps_acting_user() {
        let creator = ctx();
        let mut c =
            Company::new("Acme", "1", "Acme Ltda", "", false, &creator).unwrap();
        let editor = ctx();
        c.update_details(Some("Acme SA".into()), None, None, &editor)
            .unwrap();
        assert_eq!(c.name, "Acme SA");
        assert_eq!(c.audit.updated_by, Some(editor.user));
        assert_eq!(c.audit.created_by, Some(creator.user));
    }
}
