use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use contaerp_core::{AuditContext, AuditStamp, DomainError, DomainResult, EntityId};

/// Product classification. Wire tokens match the stored values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    Produto,
    Servico,
    MateriaPrima,
    ProdutoAcabado,
}

impl ProductKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductKind::Produto => "produto",
            ProductKind::Servico => "servico",
            ProductKind::MateriaPrima => "materia_prima",
            ProductKind::ProdutoAcabado => "produto_acabado",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "produto" => Ok(ProductKind::Produto),
            "servico" => Ok(ProductKind::Servico),
            "materia_prima" => Ok(ProductKind::MateriaPrima),
            "produto_acabado" => Ok(ProductKind::ProdutoAcabado),
            other => Err(DomainError::validation(format!(
                "unknown product kind: {other}"
            ))),
        }
    }
}

/// Catalog product. `code` is globally unique; category and unit are shared
/// references protected from deletion while referenced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: EntityId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub category_id: EntityId,
    pub unit_id: EntityId,
    /// Weight in kilograms, three decimal places.
    pub weight: Option<Decimal>,
    pub dimensions: Option<String>,
    pub barcode: Option<String>,
    pub cost_price: Decimal,
    pub sale_price: Decimal,
    /// Profit margin percent.
    pub margin: Decimal,
    pub min_stock: Decimal,
    pub max_stock: Decimal,
    /// Services and some goods skip stock tracking entirely.
    pub tracks_stock: bool,
    pub kind: ProductKind,
    pub audit: AuditStamp,
}

impl Product {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        category_id: EntityId,
        unit_id: EntityId,
        kind: ProductKind,
        ctx: &AuditContext,
    ) -> DomainResult<Self> {
        let code = code.into();
        let name = name.into();
        if code.trim().is_empty() {
            return Err(DomainError::validation("product code cannot be empty"));
        }
        if name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        Ok(Self {
            id: EntityId::new(),
            code,
            name,
            description: None,
            category_id,
            unit_id,
            weight: None,
            dimensions: None,
            barcode: None,
            cost_price: Decimal::ZERO,
            sale_price: Decimal::ZERO,
            margin: Decimal::ZERO,
            min_stock: Decimal::ZERO,
            max_stock: Decimal::ZERO,
            tracks_stock: !matches!(kind, ProductKind::Servico),
            kind,
            audit: AuditStamp::new(ctx),
        })
    }

    pub fn set_prices(
        &mut self,
        cost_price: Decimal,
        sale_price: Decimal,
        ctx: &AuditContext,
    ) -> DomainResult<()> {
        if cost_price < Decimal::ZERO || sale_price < Decimal::ZERO {
            return Err(DomainError::validation("prices cannot be negative"));
        }
        self.cost_price = cost_price;
        self.sale_price = sale_price;
        self.margin = Self::margin_percent(cost_price, sale_price);
        self.audit.touch(ctx);
        Ok(())
    }

    pub fn set_stock_thresholds(
        &mut self,
        min_stock: Decimal,
        max_stock: Decimal,
        ctx: &AuditContext,
    ) -> DomainResult<()> {
        if min_stock < Decimal::ZERO || max_stock < Decimal::ZERO {
            return Err(DomainError::validation("stock thresholds cannot be negative"));
        }
        if max_stock > Decimal::ZERO && min_stock > max_stock {
            return Err(DomainError::validation(
                "minimum stock cannot exceed maximum stock",
            ));
        }
        self.min_stock = min_stock;
        self.max_stock = max_stock;
        self.audit.touch(ctx);
        Ok(())
    }

    pub fn deactivate(&mut self, ctx: &AuditContext) {
        self.audit.deactivate(ctx);
    }

    fn margin_percent(cost: Decimal, sale: Decimal) -> Decimal {
        if cost.is_zero() {
            return Decimal::ZERO;
        }
        ((sale - cost) / cost * Decimal::ONE_HUNDRED).round_dp(2)
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

    fn product(kind: ProductKind) -> Product {
        Product::new("P001", "Parafuso", EntityId::new(), EntityId::new(), kind, &ctx()).unwrap()
    }

    #[test]
    fn services_do_not_track_stock_by_default() {
        assert!(!product(ProductKind::Servico).tracks_stock);
        assert!(product(ProductKind::Produto).tracks_stock);
    }

    #[test]
    fn margin_is_derived_from_prices() {
        let mut p = product(ProductKind::Produto);
        p.set_prices(dec!(10.00), dec!(15.00), &ctx()).unwrap();
        assert_eq!(p.margin, dec!(50.00));
    }

    #[test]
    fn margin_with_zero_cost_is_zero() {
        let mut p = product(ProductKind::Produto);
        p.set_prices(dec!(0.00), dec!(15.00), &ctx()).unwrap();
        assert_eq!(p.margin, Decimal::ZERO);
    }

    #[test]
    fn thresholds_must_be_ordered() {
        let mut p = product(ProductKind::Produto);
        let err = p
            .set_stock_thresholds(dec!(10.000), dec!(5.000), &ctx())
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn kind_tokens_match_stored_values() {
        assert_eq!(ProductKind::MateriaPrima.as_str(), "materia_prima");
        assert_eq!(
            ProductKind::parse("produto_acabado").unwrap(),
            ProductKind::ProdutoAcabado
        );
    }
}
