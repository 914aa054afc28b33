//! Receivable and payable documents.
//!
//! The two shapes mirror each other: a receivable is owed *to* the tenant by
//! a customer, a payable is owed *by* the tenant to a supplier. The total is
//! always derived (`original + interest + penalty − discount`) and never
//! persisted, so it cannot drift from its components.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use contaerp_core::{AuditContext, AuditStamp, DomainError, DomainResult, EntityId, TenantId};

/// Component amounts shared by receivables and payables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentAmounts {
    pub original: Decimal,
    pub discount: Decimal,
    pub interest: Decimal,
    pub penalty: Decimal,
}

impl DocumentAmounts {
    pub fn new(original: Decimal) -> DomainResult<Self> {
        if original < Decimal::ZERO {
            return Err(DomainError::validation("original amount cannot be negative"));
        }
        Ok(Self {
            original,
            discount: Decimal::ZERO,
            interest: Decimal::ZERO,
            penalty: Decimal::ZERO,
        })
    }

    /// Derived total: original + interest + penalty − discount.
    pub fn total(&self) -> Decimal {
        self.original + self.interest + self.penalty - self.discount
    }

    fn adjust(
        &mut self,
        discount: Option<Decimal>,
        interest: Option<Decimal>,
        penalty: Option<Decimal>,
    ) -> DomainResult<()> {
        for (label, value) in [
            ("discount", discount),
            ("interest", interest),
            ("penalty", penalty),
        ] {
            if let Some(v) = value
                && v < Decimal::ZERO
            {
                return Err(DomainError::validation(format!(
                    "{label} cannot be negative"
                )));
            }
        }
        if let Some(d) = discount {
            self.discount = d;
        }
        if let Some(i) = interest {
            self.interest = i;
        }
        if let Some(p) = penalty {
            self.penalty = p;
        }
        Ok(())
    }
}

/// Amount and date recorded together when a document is settled.
///
/// Settlement is deliberately a single value: a document can never be marked
/// settled with a missing date or amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub amount: Decimal,
    pub date: NaiveDate,
}

impl Settlement {
    pub fn new(amount: Decimal, date: NaiveDate) -> DomainResult<Self> {
        if amount <= Decimal::ZERO {
            return Err(DomainError::validation(
                "settlement amount must be positive",
            ));
        }
        Ok(Self { amount, date })
    }
}

/// Receivable lifecycle. Wire tokens match the stored values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceivableStatus {
    Aberto,
    Recebido,
    Cancelado,
}

impl ReceivableStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceivableStatus::Aberto => "aberto",
            ReceivableStatus::Recebido => "recebido",
            ReceivableStatus::Cancelado => "cancelado",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "aberto" => Ok(ReceivableStatus::Aberto),
            "recebido" => Ok(ReceivableStatus::Recebido),
            "cancelado" => Ok(ReceivableStatus::Cancelado),
            other => Err(DomainError::validation(format!(
                "unknown receivable status: {other}"
            ))),
        }
    }
}

/// Payable lifecycle. Wire tokens match the stored values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayableStatus {
    Aberto,
    Pago,
    Cancelado,
}

impl PayableStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayableStatus::Aberto => "aberto",
            PayableStatus::Pago => "pago",
            PayableStatus::Cancelado => "cancelado",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "aberto" => Ok(PayableStatus::Aberto),
            "pago" => Ok(PayableStatus::Pago),
            "cancelado" => Ok(PayableStatus::Cancelado),
            other => Err(DomainError::validation(format!(
                "unknown payable status: {other}"
            ))),
        }
    }
}

/// A document owed to the tenant by a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receivable {
    pub id: EntityId,
    pub tenant_id: TenantId,
    pub document_number: String,
    pub customer_id: EntityId,
    pub due_date: NaiveDate,
    pub issue_date: NaiveDate,
    pub amounts: DocumentAmounts,
    pub settlement: Option<Settlement>,
    pub status: ReceivableStatus,
    pub account_id: EntityId,
    pub cost_center_id: EntityId,
    pub payment_method_id: EntityId,
    pub bank_account_id: Option<EntityId>,
    pub audit: AuditStamp,
}

impl Receivable {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tenant_id: TenantId,
        document_number: impl Into<String>,
        customer_id: EntityId,
        issue_date: NaiveDate,
        due_date: NaiveDate,
        original_amount: Decimal,
        account_id: EntityId,
        cost_center_id: EntityId,
        payment_method_id: EntityId,
        ctx: &AuditContext,
    ) -> DomainResult<Self> {
        let document_number = document_number.into();
        if document_number.trim().is_empty() {
            return Err(DomainError::validation("document number cannot be empty"));
        }
        if due_date < issue_date {
            return Err(DomainError::validation(
                "due date cannot precede issue date",
            ));
        }
        Ok(Self {
            id: EntityId::new(),
            tenant_id,
            document_number,
            customer_id,
            due_date,
            issue_date,
            amounts: DocumentAmounts::new(original_amount)?,
            settlement: None,
            status: ReceivableStatus::Aberto,
            account_id,
            cost_center_id,
            payment_method_id,
            bank_account_id: None,
            audit: AuditStamp::new(ctx),
        })
    }

    /// Derived total; never persisted.
    pub fn total(&self) -> Decimal {
        self.amounts.total()
    }

    pub fn is_open(&self) -> bool {
        self.status == ReceivableStatus::Aberto
    }

    /// A document is overdue while still open past its due date.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.is_open() && self.due_date < today
    }

    /// Adjust discount/interest/penalty. Only open documents may change.
    pub fn adjust(
        &mut self,
        discount: Option<Decimal>,
        interest: Option<Decimal>,
        penalty: Option<Decimal>,
        ctx: &AuditContext,
    ) -> DomainResult<()> {
        self.ensure_open()?;
        self.amounts.adjust(discount, interest, penalty)?;
        self.audit.touch(ctx);
        Ok(())
    }

    /// Settle the document: amount, date, and status transition happen
    /// together. Terminal.
    pub fn settle(&mut self, settlement: Settlement, ctx: &AuditContext) -> DomainResult<()> {
        self.ensure_open()?;
        self.settlement = Some(settlement);
        self.status = ReceivableStatus::Recebido;
        self.audit.touch(ctx);
        Ok(())
    }

    /// Cancel the document. Terminal; only open documents may be cancelled.
    pub fn cancel(&mut self, ctx: &AuditContext) -> DomainResult<()> {
        self.ensure_open()?;
        self.status = ReceivableStatus::Cancelado;
        self.audit.touch(ctx);
        Ok(())
    }

    fn ensure_open(&self) -> DomainResult<()> {
        if !self.is_open() {
            return Err(DomainError::conflict(format!(
                "receivable is {}, not aberto",
                self.status.as_str()
            )));
        }
        Ok(())
    }
}

/// A document owed by the tenant to a supplier. Mirrors [`Receivable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payable {
    pub id: EntityId,
    pub tenant_id: TenantId,
    pub document_number: String,
    pub supplier_id: EntityId,
    pub due_date: NaiveDate,
    pub issue_date: NaiveDate,
    pub amounts: DocumentAmounts,
    pub settlement: Option<Settlement>,
    pub status: PayableStatus,
    pub account_id: EntityId,
    pub cost_center_id: EntityId,
    pub payment_method_id: EntityId,
    pub bank_account_id: Option<EntityId>,
    pub audit: AuditStamp,
}

impl Payable {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tenant_id: TenantId,
        document_number: impl Into<String>,
        supplier_id: EntityId,
        issue_date: NaiveDate,
        due_date: NaiveDate,
        original_amount: Decimal,
        account_id: EntityId,
        cost_center_id: EntityId,
        payment_method_id: EntityId,
        ctx: &AuditContext,
    ) -> DomainResult<Self> {
        let document_number = document_number.into();
        if document_number.trim().is_empty() {
            return Err(DomainError::validation("document number cannot be empty"));
        }
        if due_date < issue_date {
            return Err(DomainError::validation(
                "due date cannot precede issue date",
            ));
        }
        Ok(Self {
            id: EntityId::new(),
            tenant_id,
            document_number,
            supplier_id,
            due_date,
            issue_date,
            amounts: DocumentAmounts::new(original_amount)?,
            settlement: None,
            status: PayableStatus::Aberto,
            account_id,
            cost_center_id,
            payment_method_id,
            bank_account_id: None,
            audit: AuditStamp::new(ctx),
        })
    }

    pub fn total(&self) -> Decimal {
        self.amounts.total()
    }

    pub fn is_open(&self) -> bool {
        self.status == PayableStatus::Aberto
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.is_open() && self.due_date < today
    }

    pub fn adjust(
        &mut self,
        discount: Option<Decimal>,
        interest: Option<Decimal>,
        penalty: Option<Decimal>,
        ctx: &AuditContext,
    ) -> DomainResult<()> {
        self.ensure_open()?;
        self.amounts.adjust(discount, interest, penalty)?;
        self.audit.touch(ctx);
        Ok(())
    }

    pub fn settle(&mut self, settlement: Settlement, ctx: &AuditContext) -> DomainResult<()> {
        self.ensure_open()?;
        self.settlement = Some(settlement);
        self.status = PayableStatus::Pago;
        self.audit.touch(ctx);
        Ok(())
    }

    pub fn cancel(&mut self, ctx: &AuditContext) -> DomainResult<()> {
        self.ensure_open()?;
        self.status = PayableStatus::Cancelado;
        self.audit.touch(ctx);
        Ok(())
    }

    fn ensure_open(&self) -> DomainResult<()> {
        if !self.is_open() {
            return Err(DomainError::conflict(format!(
                "payable is {}, not aberto",
                self.status.as_str()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contaerp_core::UserId;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn ctx() -> AuditContext {
        AuditContext::now(UserId::new())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn receivable(original: Decimal) -> Receivable {
        Receivable::new(
            TenantId::new(),
            "NF-0001",
            EntityId::new(),
            date(2026, 8, 1),
            date(2026, 8, 31),
            original,
            EntityId::new(),
            EntityId::new(),
            EntityId::new(),
            &ctx(),
        )
        .unwrap()
    }

    #[test]
    fn new_receivable_is_open_with_total_equal_to_original() {
        let r = receivable(dec!(1000.00));
        assert_eq!(r.status, ReceivableStatus::Aberto);
        assert_eq!(r.total(), dec!(1000.00));
        assert!(r.settlement.is_none());
    }

    #[test]
    fn total_reflects_adjustments() {
        let mut r = receivable(dec!(1000.00));
        r.adjust(Some(dec!(50.00)), Some(dec!(10.00)), None, &ctx())
            .unwrap();
        assert_eq!(r.total(), dec!(960.00));
    }

    #[test]
    fn settlement_sets_amount_date_and_status_together() {
        let mut r = receivable(dec!(1000.00));
        let s = Settlement::new(dec!(1000.00), date(2026, 8, 20)).unwrap();
        r.settle(s, &ctx()).unwrap();

        assert_eq!(r.status, ReceivableStatus::Recebido);
        let settlement = r.settlement.unwrap();
        assert_eq!(settlement.amount, dec!(1000.00));
        assert_eq!(settlement.date, date(2026, 8, 20));
    }

    #[test]
    fn settled_document_cannot_be_settled_again_or_cancelled() {
        let mut r = receivable(dec!(100.00));
        let s = Settlement::new(dec!(100.00), date(2026, 8, 20)).unwrap();
        r.settle(s, &ctx()).unwrap();

        assert!(matches!(
            r.settle(s, &ctx()).unwrap_err(),
            DomainError::Conflict(_)
        ));
        assert!(matches!(r.cancel(&ctx()).unwrap_err(), DomainError::Conflict(_)));
    }

    #[test]
    fn cancelled_document_cannot_be_settled() {
        let mut r = receivable(dec!(100.00));
        r.cancel(&ctx()).unwrap();
        let s = Settlement::new(dec!(100.00), date(2026, 8, 20)).unwrap();
        assert!(matches!(
            r.settle(s, &ctx()).unwrap_err(),
            DomainError::Conflict(_)
        ));
    }

    #[test]
    fn settlement_requires_positive_amount() {
        assert!(Settlement::new(Decimal::ZERO, date(2026, 8, 20)).is_err());
        assert!(Settlement::new(dec!(-1), date(2026, 8, 20)).is_err());
    }

    #[test]
    fn adjustments_cannot_be_negative() {
        let mut r = receivable(dec!(100.00));
        assert!(r.adjust(Some(dec!(-1)), None, None, &ctx()).is_err());
    }

    #[test]
    fn due_date_cannot_precede_issue_date() {
        let err = Receivable::new(
            TenantId::new(),
            "NF-0002",
            EntityId::new(),
            date(2026, 8, 31),
            date(2026, 8, 1),
            dec!(10.00),
            EntityId::new(),
            EntityId::new(),
            EntityId::new(),
            &ctx(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn overdue_only_while_open() {
        let mut r = receivable(dec!(100.00));
        let after_due = date(2026, 9, 10);
        assert!(r.is_overdue(after_due));
        assert!(!r.is_overdue(date(2026, 8, 15)));

        r.cancel(&ctx()).unwrap();
        assert!(!r.is_overdue(after_due));
    }

    #[test]
    fn payable_mirrors_receivable_lifecycle() {
        let mut p = Payable::new(
            TenantId::new(),
            "FORN-01",
            EntityId::new(),
            date(2026, 8, 1),
            date(2026, 8, 31),
            dec!(500.00),
            EntityId::new(),
            EntityId::new(),
            EntityId::new(),
            &ctx(),
        )
        .unwrap();

        assert_eq!(p.status, PayableStatus::Aberto);
        p.adjust(None, None, Some(dec!(25.00)), &ctx()).unwrap();
        assert_eq!(p.total(), dec!(525.00));

        let s = Settlement::new(dec!(525.00), date(2026, 9, 2)).unwrap();
        p.settle(s, &ctx()).unwrap();
        assert_eq!(p.status, PayableStatus::Pago);
        assert!(matches!(p.cancel(&ctx()).unwrap_err(), DomainError::Conflict(_)));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: for any non-negative component amounts (cents),
        /// total == original + interest + penalty - discount.
        #[test]
        fn total_formula_holds(
            original in 0i64..10_000_000i64,
            discount in 0i64..1_000_000i64,
            interest in 0i64..1_000_000i64,
            penalty in 0i64..1_000_000i64,
        ) {
            let mut amounts = DocumentAmounts::new(Decimal::new(original, 2)).unwrap();
            amounts.adjust(
                Some(Decimal::new(discount, 2)),
                Some(Decimal::new(interest, 2)),
                Some(Decimal::new(penalty, 2)),
            ).unwrap();

            let expected = Decimal::new(original + interest + penalty - discount, 2);
            prop_assert_eq!(amounts.total(), expected);
        }

        /// Zero adjustments leave the total equal to the original.
        #[test]
        fn zero_adjustments_are_identity(original in 0i64..10_000_000i64) {
            let amounts = DocumentAmounts::new(Decimal::new(original, 2)).unwrap();
            prop_assert_eq!(amounts.total(), Decimal::new(original, 2));
        }
    }
}
