//! One-to-one role extensions of [`crate::Person`].
//!
//! Each role carries its own unique `code`. A person can hold several roles,
//! but at most one of each — the store enforces the one-to-one with a unique
//! constraint on `person_id`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use contaerp_core::{AuditContext, AuditStamp, DomainError, DomainResult, EntityId};

/// Customer role: someone the tenant sells to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: EntityId,
    pub person_id: EntityId,
    pub code: String,
    pub credit_limit: Decimal,
    /// Payment term granted to this customer, in days.
    pub payment_term_days: u32,
    pub salesperson: Option<String>,
    pub registered_on: NaiveDate,
    pub audit: AuditStamp,
}

impl Customer {
    pub fn new(
        person_id: EntityId,
        code: impl Into<String>,
        registered_on: NaiveDate,
        ctx: &AuditContext,
    ) -> DomainResult<Self> {
        Ok(Self {
            id: EntityId::new(),
            person_id,
            code: validated_code(code)?,
            credit_limit: Decimal::ZERO,
            payment_term_days: 30,
            salesperson: None,
            registered_on,
            audit: AuditStamp::new(ctx),
        })
    }

    pub fn set_credit_limit(&mut self, limit: Decimal, ctx: &AuditContext) -> DomainResult<()> {
        if limit < Decimal::ZERO {
            return Err(DomainError::validation("credit limit cannot be negative"));
        }
        self.credit_limit = limit;
        self.audit.touch(ctx);
        Ok(())
    }
}

/// Supplier role: someone the tenant buys from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: EntityId,
    pub person_id: EntityId,
    pub code: String,
    /// Typical delivery lead time, in days.
    pub lead_time_days: u32,
    pub payment_conditions: Option<String>,
    pub registered_on: NaiveDate,
    pub audit: AuditStamp,
}

impl Supplier {
    pub fn new(
        person_id: EntityId,
        code: impl Into<String>,
        registered_on: NaiveDate,
        ctx: &AuditContext,
    ) -> DomainResult<Self> {
        Ok(Self {
            id: EntityId::new(),
            person_id,
            code: validated_code(code)?,
            lead_time_days: 0,
            payment_conditions: None,
            registered_on,
            audit: AuditStamp::new(ctx),
        })
    }
}

/// Employment lifecycle. Wire tokens match the stored values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmploymentStatus {
    Ativo,
    Inativo,
    Demitido,
    Afastado,
}

impl EmploymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentStatus::Ativo => "ativo",
            EmploymentStatus::Inativo => "inativo",
            EmploymentStatus::Demitido => "demitido",
            EmploymentStatus::Afastado => "afastado",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "ativo" => Ok(EmploymentStatus::Ativo),
            "inativo" => Ok(EmploymentStatus::Inativo),
            "demitido" => Ok(EmploymentStatus::Demitido),
            "afastado" => Ok(EmploymentStatus::Afastado),
            other => Err(DomainError::validation(format!(
                "unknown employment status: {other}"
            ))),
        }
    }
}

/// Employee role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EntityId,
    pub person_id: EntityId,
    pub code: String,
    pub position: String,
    pub department: String,
    pub salary: Decimal,
    pub hired_on: NaiveDate,
    pub terminated_on: Option<NaiveDate>,
    pub status: EmploymentStatus,
    pub audit: AuditStamp,
}

impl Employee {
    pub fn new(
        person_id: EntityId,
        code: impl Into<String>,
        position: impl Into<String>,
        department: impl Into<String>,
        salary: Decimal,
        hired_on: NaiveDate,
        ctx: &AuditContext,
    ) -> DomainResult<Self> {
        if salary < Decimal::ZERO {
            return Err(DomainError::validation("salary cannot be negative"));
        }
        Ok(Self {
            id: EntityId::new(),
            person_id,
            code: validated_code(code)?,
            position: position.into(),
            department: department.into(),
            salary,
            hired_on,
            terminated_on: None,
            status: EmploymentStatus::Ativo,
            audit: AuditStamp::new(ctx),
        })
    }

    /// Terminate employment. Terminal: a terminated employee stays terminated.
    pub fn terminate(&mut self, on: NaiveDate, ctx: &AuditContext) -> DomainResult<()> {
        if self.status == EmploymentStatus::Demitido {
            return Err(DomainError::conflict("employee is already terminated"));
        }
        if on < self.hired_on {
            return Err(DomainError::validation(
                "termination date cannot precede hire date",
            ));
        }
        self.status = EmploymentStatus::Demitido;
        self.terminated_on = Some(on);
        self.audit.touch(ctx);
        Ok(())
    }
}

fn validated_code(code: impl Into<String>) -> DomainResult<String> {
    let code = code.into();
    if code.trim().is_empty() {
        return Err(DomainError::validation("code cannot be empty"));
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contaerp_core::UserId;
    use rust_decimal_macros::dec;

    fn ctx() -> AuditContext {
        AuditContext::now(UserId::new())
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 30).unwrap()
    }

    #[test]
    fn customer_defaults() {
        let c = Customer::new(EntityId::new(), "C001", today(), &ctx()).unwrap();
        assert_eq!(c.credit_limit, Decimal::ZERO);
        assert_eq!(c.payment_term_days, 30);
    }

    #[test]
    fn customer_rejects_negative_credit_limit() {
        let mut c = Customer::new(EntityId::new(), "C001", today(), &ctx()).unwrap();
        let err = c.set_credit_limit(dec!(-1), &ctx()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn role_code_cannot_be_blank() {
        let err = Supplier::new(EntityId::new(), "  ", today(), &ctx()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn employee_termination_is_terminal() {
        let mut e = Employee::new(
            EntityId::new(),
            "F001",
            "Analista",
            "Financeiro",
            dec!(4200.00),
            today(),
            &ctx(),
        )
        .unwrap();

        e.terminate(today(), &ctx()).unwrap();
        assert_eq!(e.status, EmploymentStatus::Demitido);
        assert_eq!(e.terminated_on, Some(today()));

        let err = e.terminate(today(), &ctx()).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn employee_cannot_terminate_before_hire() {
        let mut e = Employee::new(
            EntityId::new(),
            "F002",
            "Vendedor",
            "Comercial",
            dec!(3000.00),
            today(),
            &ctx(),
        )
        .unwrap();
        let before = today().pred_opt().unwrap();
        assert!(e.terminate(before, &ctx()).is_err());
    }
}
