use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use contaerp_core::{AuditContext, AuditStamp, DomainError, DomainResult, EntityId, TenantId};

/// Natural vs. legal person. Wire tokens match the stored values
/// (`"fisica"` / `"juridica"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonKind {
    Fisica,
    Juridica,
}

impl PersonKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonKind::Fisica => "fisica",
            PersonKind::Juridica => "juridica",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "fisica" => Ok(PersonKind::Fisica),
            "juridica" => Ok(PersonKind::Juridica),
            other => Err(DomainError::validation(format!(
                "unknown person kind: {other}"
            ))),
        }
    }
}

/// Base party record. `tax_id` (CPF/CNPJ) is globally unique across all
/// parties regardless of tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: EntityId,
    pub tenant_id: TenantId,
    pub name: String,
    pub kind: PersonKind,
    pub tax_id: String,
    pub state_id: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub audit: AuditStamp,
}

impl Person {
    pub fn new(
        tenant_id: TenantId,
        name: impl Into<String>,
        kind: PersonKind,
        tax_id: impl Into<String>,
        ctx: &AuditContext,
    ) -> DomainResult<Self> {
        let name = name.into();
        let tax_id = tax_id.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("person name cannot be empty"));
        }
        if tax_id.trim().is_empty() {
            return Err(DomainError::validation("tax id cannot be empty"));
        }
        Ok(Self {
            id: EntityId::new(),
            tenant_id,
            name,
            kind,
            tax_id,
            state_id: None,
            address: None,
            phone: None,
            mobile: None,
            email: None,
            birth_date: None,
            notes: None,
            audit: AuditStamp::new(ctx),
        })
    }

    pub fn update_contact(
        &mut self,
        address: Option<String>,
        phone: Option<String>,
        mobile: Option<String>,
        email: Option<String>,
        ctx: &AuditContext,
    ) {
        if address.is_some() {
            self.address = address;
        }
        if phone.is_some() {
            self.phone = phone;
        }
        if mobile.is_some() {
            self.mobile = mobile;
        }
        if email.is_some() {
            self.email = email;
        }
        self.audit.touch(ctx);
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
    fn create_legal_person() {
        let p = Person::new(
            TenantId::new(),
            "Acme Ltda",
            PersonKind::Juridica,
            "12.345.678/0001-99",
            &ctx(),
        )
        .unwrap();
        assert_eq!(p.kind, PersonKind::Juridica);
        assert!(p.audit.active);
    }

    #[test]
    fn rejects_blank_name() {
        let err = Person::new(TenantId::new(), "", PersonKind::Fisica, "123", &ctx()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn kind_tokens_match_stored_values() {
        assert_eq!(PersonKind::Fisica.as_str(), "fisica");
        assert_eq!(PersonKind::parse("juridica").unwrap(), PersonKind::Juridica);
        assert!(PersonKind::parse("corporation").is_err());
    }
}
