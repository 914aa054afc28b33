use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use contaerp_core::{AuditContext, AuditStamp, DomainError, DomainResult, EntityId, TenantId};

use crate::movement::{StockEffect, StockMovement};

/// Current on-hand quantity/value snapshot. Unique per
/// (product, tenant, lot); the store enforces the key and serializes
/// concurrent balance updates with a row lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub id: EntityId,
    pub tenant_id: TenantId,
    pub product_id: EntityId,
    pub quantity: Decimal,
    pub unit_value: Decimal,
    pub location: Option<String>,
    /// Lot identifier; empty string for un-lotted stock (part of the unique
    /// key either way).
    pub lot: String,
    pub expiry_date: Option<NaiveDate>,
    pub audit: AuditStamp,
}

impl StockRecord {
    pub fn new(
        tenant_id: TenantId,
        product_id: EntityId,
        lot: impl Into<String>,
        ctx: &AuditContext,
    ) -> Self {
        Self {
            id: EntityId::new(),
            tenant_id,
            product_id,
            quantity: Decimal::ZERO,
            unit_value: Decimal::ZERO,
            location: None,
            lot: lot.into(),
            expiry_date: None,
            audit: AuditStamp::new(ctx),
        }
    }

    /// Open a stock row from the first movement against this
    /// (product, tenant, lot). The row takes the movement's unit value.
    pub fn from_movement(movement: &StockMovement, ctx: &AuditContext) -> DomainResult<Self> {
        let mut record = Self::new(movement.tenant_id, movement.product_id, movement.lot.clone(), ctx);
        record.unit_value = movement.unit_value;
        record.apply_movement(movement, ctx)?;
        Ok(record)
    }

    /// Derived total: quantity × unit value. Never persisted.
    pub fn total_value(&self) -> Decimal {
        self.quantity * self.unit_value
    }

    /// Apply a movement's balance effect.
    ///
    /// The caller (store layer) is responsible for running this under the
    /// same transaction that inserts the movement row, holding the row lock.
    pub fn apply_movement(
        &mut self,
        movement: &StockMovement,
        ctx: &AuditContext,
    ) -> DomainResult<()> {
        if movement.tenant_id != self.tenant_id || movement.product_id != self.product_id {
            return Err(DomainError::invariant(
                "movement targets a different stock record",
            ));
        }
        if movement.lot != self.lot {
            return Err(DomainError::invariant("movement targets a different lot"));
        }

        let new_quantity = match movement.kind.effect() {
            StockEffect::Increase => self.quantity + movement.quantity,
            StockEffect::Decrease => {
                let remaining = self.quantity - movement.quantity;
                if remaining < Decimal::ZERO {
                    return Err(DomainError::invariant(format!(
                        "insufficient stock: {} on hand, {} requested",
                        self.quantity, movement.quantity
                    )));
                }
                remaining
            }
            StockEffect::Set => movement.quantity,
        };

        self.quantity = new_quantity;
        self.audit.touch(ctx);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::StockMovementKind;
    use contaerp_core::UserId;
    use rust_decimal_macros::dec;

    fn ctx() -> AuditContext {
        AuditContext::now(UserId::new())
    }

    fn movement(
        tenant: TenantId,
        product: EntityId,
        kind: StockMovementKind,
        qty: Decimal,
    ) -> StockMovement {
        StockMovement::new(tenant, product, kind, qty, dec!(5.00), "teste", "", &ctx()).unwrap()
    }

    #[test]
    fn first_entrada_opens_the_row() {
        let tenant = TenantId::new();
        let product = EntityId::new();
        let m = movement(tenant, product, StockMovementKind::Entrada, dec!(100.000));

        let record = StockRecord::from_movement(&m, &ctx()).unwrap();
        assert_eq!(record.quantity, dec!(100.000));
        assert_eq!(record.unit_value, dec!(5.00));
        assert_eq!(m.total_value(), dec!(500.00000));
    }

    #[test]
    fn saida_decreases_and_cannot_go_negative() {
        let tenant = TenantId::new();
        let product = EntityId::new();
        let mut record = StockRecord::from_movement(
            &movement(tenant, product, StockMovementKind::Entrada, dec!(10.000)),
            &ctx(),
        )
        .unwrap();

        record
            .apply_movement(
                &movement(tenant, product, StockMovementKind::Saida, dec!(4.000)),
                &ctx(),
            )
            .unwrap();
        assert_eq!(record.quantity, dec!(6.000));

        let err = record
            .apply_movement(
                &movement(tenant, product, StockMovementKind::Saida, dec!(7.000)),
                &ctx(),
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        // Balance unchanged after the rejected movement.
        assert_eq!(record.quantity, dec!(6.000));
    }

    #[test]
    fn ajuste_sets_the_balance() {
        let tenant = TenantId::new();
        let product = EntityId::new();
        let mut record = StockRecord::from_movement(
            &movement(tenant, product, StockMovementKind::Entrada, dec!(10.000)),
            &ctx(),
        )
        .unwrap();

        record
            .apply_movement(
                &movement(tenant, product, StockMovementKind::Ajuste, dec!(42.000)),
                &ctx(),
            )
            .unwrap();
        assert_eq!(record.quantity, dec!(42.000));
    }

    #[test]
    fn rejects_movement_for_another_product_or_lot() {
        let tenant = TenantId::new();
        let product = EntityId::new();
        let mut record = StockRecord::from_movement(
            &movement(tenant, product, StockMovementKind::Entrada, dec!(1.000)),
            &ctx(),
        )
        .unwrap();

        let other_product = movement(tenant, EntityId::new(), StockMovementKind::Entrada, dec!(1.000));
        assert!(record.apply_movement(&other_product, &ctx()).is_err());

        let other_lot =
            StockMovement::new(tenant, product, StockMovementKind::Entrada, dec!(1.000), dec!(1.00), "x", "L2", &ctx())
                .unwrap();
        assert!(record.apply_movement(&other_lot, &ctx()).is_err());
    }

    #[test]
    fn total_value_tracks_quantity() {
        let tenant = TenantId::new();
        let product = EntityId::new();
        let record = StockRecord::from_movement(
            &movement(tenant, product, StockMovementKind::Entrada, dec!(2.500)),
            &ctx(),
        )
        .unwrap();
        assert_eq!(record.total_value(), dec!(12.50000));
    }
}
