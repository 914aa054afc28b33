use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use contaerp_core::{AuditContext, AuditStamp, DomainError, DomainResult, EntityId, TenantId};

/// Cash flow direction. The amount is always positive; direction encodes the
/// sign. Wire tokens match the stored values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Entrada,
    Saida,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Entrada => "entrada",
            Direction::Saida => "saida",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "entrada" => Ok(Direction::Entrada),
            "saida" => Ok(Direction::Saida),
            other => Err(DomainError::validation(format!(
                "unknown movement direction: {other}"
            ))),
        }
    }
}

/// Optional link from a cash movement back to the document it settles.
///
/// Modeled as an enum so a movement can never reference a receivable and a
/// payable at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "id")]
pub enum SettlementLink {
    Receivable(EntityId),
    Payable(EntityId),
}

/// A recorded cash inflow/outflow against a bank account.
///
/// Movements are the append-style record cash-position aggregates are
/// computed from (sum of `amount` filtered by direction and date range).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashMovement {
    pub id: EntityId,
    pub tenant_id: TenantId,
    pub date: NaiveDate,
    pub direction: Direction,
    pub amount: Decimal,
    pub description: String,
    pub account_id: EntityId,
    pub cost_center_id: EntityId,
    pub bank_account_id: EntityId,
    pub settles: Option<SettlementLink>,
    pub audit: AuditStamp,
}

impl CashMovement {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tenant_id: TenantId,
        date: NaiveDate,
        direction: Direction,
        amount: Decimal,
        description: impl Into<String>,
        account_id: EntityId,
        cost_center_id: EntityId,
        bank_account_id: EntityId,
        settles: Option<SettlementLink>,
        ctx: &AuditContext,
    ) -> DomainResult<Self> {
        if amount <= Decimal::ZERO {
            return Err(DomainError::validation(
                "movement amount must be positive; direction encodes the sign",
            ));
        }
        let description = description.into();
        if description.trim().is_empty() {
            return Err(DomainError::validation("description cannot be empty"));
        }
        // A settlement inflow must come from a receivable, an outflow from a
        // payable.
        match (direction, settles) {
            (Direction::Entrada, Some(SettlementLink::Payable(_))) => {
                return Err(DomainError::invariant(
                    "an inflow cannot settle a payable",
                ));
            }
            (Direction::Saida, Some(SettlementLink::Receivable(_))) => {
                return Err(DomainError::invariant(
                    "an outflow cannot settle a receivable",
                ));
            }
            _ => {}
        }
        Ok(Self {
            id: EntityId::new(),
            tenant_id,
            date,
            direction,
            amount,
            description,
            account_id,
            cost_center_id,
            bank_account_id,
            settles,
            audit: AuditStamp::new(ctx),
        })
    }

    /// Signed amount: positive for inflows, negative for outflows.
    pub fn signed_amount(&self) -> Decimal {
        match self.direction {
            Direction::Entrada => self.amount,
            Direction::Saida => -self.amount,
        }
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

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 30).unwrap()
    }

    fn movement(
        direction: Direction,
        amount: Decimal,
        settles: Option<SettlementLink>,
    ) -> DomainResult<CashMovement> {
        CashMovement::new(
            TenantId::new(),
            date(),
            direction,
            amount,
            "Recebimento NF-0001",
            EntityId::new(),
            EntityId::new(),
            EntityId::new(),
            settles,
            &ctx(),
        )
    }

    #[test]
    fn amount_must_be_positive() {
        assert!(movement(Direction::Entrada, Decimal::ZERO, None).is_err());
        assert!(movement(Direction::Saida, dec!(-5.00), None).is_err());
        assert!(movement(Direction::Entrada, dec!(5.00), None).is_ok());
    }

    #[test]
    fn signed_amount_follows_direction() {
        let inflow = movement(Direction::Entrada, dec!(100.00), None).unwrap();
        let outflow = movement(Direction::Saida, dec!(40.00), None).unwrap();
        assert_eq!(inflow.signed_amount(), dec!(100.00));
        assert_eq!(outflow.signed_amount(), dec!(-40.00));
    }

    #[test]
    fn settlement_link_direction_must_agree() {
        let r = SettlementLink::Receivable(EntityId::new());
        let p = SettlementLink::Payable(EntityId::new());

        assert!(movement(Direction::Entrada, dec!(10.00), Some(r)).is_ok());
        assert!(movement(Direction::Saida, dec!(10.00), Some(p)).is_ok());

        assert!(matches!(
            movement(Direction::Entrada, dec!(10.00), Some(p)).unwrap_err(),
            DomainError::InvariantViolation(_)
        ));
        assert!(matches!(
            movement(Direction::Saida, dec!(10.00), Some(r)).unwrap_err(),
            DomainError::InvariantViolation(_)
        ));
    }
}
