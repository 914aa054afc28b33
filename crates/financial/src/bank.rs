use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use contaerp_core::{AuditContext, AuditStamp, DomainError, DomainResult, EntityId, TenantId};

/// Bank registry entry. `code` (the clearing code, e.g. "341") is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    pub id: EntityId,
    pub code: String,
    pub name: String,
    pub audit: AuditStamp,
}

impl Bank {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        ctx: &AuditContext,
    ) -> DomainResult<Self> {
        let code = code.into();
        let name = name.into();
        if code.trim().is_empty() {
            return Err(DomainError::validation("bank code cannot be empty"));
        }
        if name.trim().is_empty() {
            return Err(DomainError::validation("bank name cannot be empty"));
        }
        Ok(Self {
            id: EntityId::new(),
            code,
            name,
            audit: AuditStamp::new(ctx),
        })
    }
}

/// Bank account flavor. Wire tokens match the stored values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BankAccountKind {
    Corrente,
    Poupanca,
    Aplicacao,
}

impl BankAccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BankAccountKind::Corrente => "corrente",
            BankAccountKind::Poupanca => "poupanca",
            BankAccountKind::Aplicacao => "aplicacao",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "corrente" => Ok(BankAccountKind::Corrente),
            "poupanca" => Ok(BankAccountKind::Poupanca),
            "aplicacao" => Ok(BankAccountKind::Aplicacao),
            other => Err(DomainError::validation(format!(
                "unknown bank account kind: {other}"
            ))),
        }
    }
}

/// Tenant-scoped bank account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    pub id: EntityId,
    pub tenant_id: TenantId,
    pub bank_id: EntityId,
    pub branch: String,
    pub number: String,
    pub check_digit: String,
    pub kind: BankAccountKind,
    pub opening_balance: Decimal,
    pub audit: AuditStamp,
}

impl BankAccount {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tenant_id: TenantId,
        bank_id: EntityId,
        branch: impl Into<String>,
        number: impl Into<String>,
        check_digit: impl Into<String>,
        kind: BankAccountKind,
        opening_balance: Decimal,
        ctx: &AuditContext,
    ) -> DomainResult<Self> {
        let branch = branch.into();
        let number = number.into();
        if branch.trim().is_empty() {
            return Err(DomainError::validation("branch cannot be empty"));
        }
        if number.trim().is_empty() {
            return Err(DomainError::validation("account number cannot be empty"));
        }
        Ok(Self {
            id: EntityId::new(),
            tenant_id,
            bank_id,
            branch,
            number,
            check_digit: check_digit.into(),
            kind,
            opening_balance,
            audit: AuditStamp::new(ctx),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contaerp_core::UserId;
    use rust_decimal_macros::dec;

    fn ctx() -> AuditContext {
        AuditContext::now(UserId::new())
    }

    #[test]
    fn create_account() {
        let bank = Bank::new("341", "Itaú", &ctx()).unwrap();
        let account = BankAccount::new(
            TenantId::new(),
            bank.id,
            "0123",
            "45678",
            "9",
            BankAccountKind::Corrente,
            dec!(1500.00),
            &ctx(),
        )
        .unwrap();
        assert_eq!(account.opening_balance, dec!(1500.00));
    }

    #[test]
    fn rejects_blank_branch() {
        let err = BankAccount::new(
            TenantId::new(),
            EntityId::new(),
            " ",
            "45678",
            "9",
            BankAccountKind::Poupanca,
            Decimal::ZERO,
            &ctx(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
