use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use contaerp_core::{AuditContext, DomainError, DomainResult, EntityId, TenantId, UserId};

/// Movement classification. Wire tokens match the stored values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockMovementKind {
    Entrada,
    Saida,
    Ajuste,
    Transferencia,
}

impl StockMovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockMovementKind::Entrada => "entrada",
            StockMovementKind::Saida => "saida",
            StockMovementKind::Ajuste => "ajuste",
            StockMovementKind::Transferencia => "transferencia",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "entrada" => Ok(StockMovementKind::Entrada),
            "saida" => Ok(StockMovementKind::Saida),
            "ajuste" => Ok(StockMovementKind::Ajuste),
            "transferencia" => Ok(StockMovementKind::Transferencia),
            other => Err(DomainError::validation(format!(
                "unknown stock movement kind: {other}"
            ))),
        }
    }

    /// How this movement changes the on-hand balance.
    ///
    /// A transfer records the outgoing side; the receiving location books its
    /// own `entrada`.
    pub fn effect(&self) -> StockEffect {
        match self {
            StockMovementKind::Entrada => StockEffect::Increase,
            StockMovementKind::Saida | StockMovementKind::Transferencia => StockEffect::Decrease,
            StockMovementKind::Ajuste => StockEffect::Set,
        }
    }
}

/// Effect of a movement on the stock balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockEffect {
    Increase,
    Decrease,
    /// Adjustment: the movement quantity becomes the new balance.
    Set,
}

/// Append-only log entry of a quantity change.
///
/// Immutable once recorded: there is no update, deactivate, or delete path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: EntityId,
    pub tenant_id: TenantId,
    pub product_id: EntityId,
    pub kind: StockMovementKind,
    pub quantity: Decimal,
    pub unit_value: Decimal,
    pub reason: String,
    pub notes: Option<String>,
    pub document_number: Option<String>,
    pub lot: String,
    pub moved_at: DateTime<Utc>,
    pub recorded_by: Option<UserId>,
}

impl StockMovement {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tenant_id: TenantId,
        product_id: EntityId,
        kind: StockMovementKind,
        quantity: Decimal,
        unit_value: Decimal,
        reason: impl Into<String>,
        lot: impl Into<String>,
        ctx: &AuditContext,
    ) -> DomainResult<Self> {
        if quantity < Decimal::ZERO {
            return Err(DomainError::validation("quantity cannot be negative"));
        }
        if quantity.is_zero() && kind != StockMovementKind::Ajuste {
            return Err(DomainError::validation(
                "only adjustments may have zero quantity",
            ));
        }
        if unit_value < Decimal::ZERO {
            return Err(DomainError::validation("unit value cannot be negative"));
        }
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(DomainError::validation("reason cannot be empty"));
        }
        Ok(Self {
            id: EntityId::new(),
            tenant_id,
            product_id,
            kind,
            quantity,
            unit_value,
            reason,
            notes: None,
            document_number: None,
            lot: lot.into(),
            moved_at: ctx.at,
            recorded_by: Some(ctx.user),
        })
    }

    /// Derived total: quantity × unit value. Never persisted.
    pub fn total_value(&self) -> Decimal {
        self.quantity * self.unit_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn ctx() -> AuditContext {
        AuditContext::now(UserId::new())
    }

    fn movement(kind: StockMovementKind, qty: Decimal, unit: Decimal) -> DomainResult<StockMovement> {
        StockMovement::new(
            TenantId::new(),
            EntityId::new(),
            kind,
            qty,
            unit,
            "Compra NF-123",
            "",
            &ctx(),
        )
    }

    #[test]
    fn entrada_total_value() {
        let m = movement(StockMovementKind::Entrada, dec!(100.000), dec!(5.00)).unwrap();
        assert_eq!(m.total_value(), dec!(500.00000));
    }

    #[test]
    fn fractional_quantities_are_exact() {
        let m = movement(StockMovementKind::Saida, dec!(2.500), dec!(3.20)).unwrap();
        assert_eq!(m.total_value(), dec!(8.00000));
    }

    #[test]
    fn zero_quantity_only_for_adjustments() {
        assert!(movement(StockMovementKind::Entrada, Decimal::ZERO, dec!(1.00)).is_err());
        assert!(movement(StockMovementKind::Ajuste, Decimal::ZERO, dec!(1.00)).is_ok());
    }

    #[test]
    fn negative_inputs_rejected() {
        assert!(movement(StockMovementKind::Entrada, dec!(-1.000), dec!(1.00)).is_err());
        assert!(movement(StockMovementKind::Entrada, dec!(1.000), dec!(-1.00)).is_err());
    }

    #[test]
    fn effects() {
        assert_eq!(StockMovementKind::Entrada.effect(), StockEffect::Increase);
        assert_eq!(StockMovementKind::Saida.effect(), StockEffect::Decrease);
        assert_eq!(
            StockMovementKind::Transferencia.effect(),
            StockEffect::Decrease
        );
        assert_eq!(StockMovementKind::Ajuste.effect(), StockEffect::Set);
    }

    proptest! {
        /// Property: total value is exactly quantity × unit value for any
        /// milli-quantity and cent unit value.
        #[test]
        fn total_value_formula(
            qty_millis in 0i64..1_000_000_000i64,
            unit_cents in 0i64..100_000_000i64,
        ) {
            let qty = Decimal::new(qty_millis, 3);
            let unit = Decimal::new(unit_cents, 2);
            let m = StockMovement::new(
                TenantId::new(),
                EntityId::new(),
                StockMovementKind::Ajuste,
                qty,
                unit,
                "ajuste de inventário",
                "",
                &ctx(),
            ).unwrap();
            prop_assert_eq!(m.total_value(), qty * unit);
        }
    }
}
