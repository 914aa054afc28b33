use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use contaerp_core::{AuditContext, AuditStamp, DomainError, DomainResult, EntityId};

/// Payment instrument. Wire tokens match the stored values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodKind {
    Dinheiro,
    CartaoCredito,
    CartaoDebito,
    Transferencia,
    Cheque,
    Pix,
    Boleto,
}

impl PaymentMethodKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethodKind::Dinheiro => "dinheiro",
            PaymentMethodKind::CartaoCredito => "cartao_credito",
            PaymentMethodKind::CartaoDebito => "cartao_debito",
            PaymentMethodKind::Transferencia => "transferencia",
            PaymentMethodKind::Cheque => "cheque",
            PaymentMethodKind::Pix => "pix",
            PaymentMethodKind::Boleto => "boleto",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "dinheiro" => Ok(PaymentMethodKind::Dinheiro),
            "cartao_credito" => Ok(PaymentMethodKind::CartaoCredito),
            "cartao_debito" => Ok(PaymentMethodKind::CartaoDebito),
            "transferencia" => Ok(PaymentMethodKind::Transferencia),
            "cheque" => Ok(PaymentMethodKind::Cheque),
            "pix" => Ok(PaymentMethodKind::Pix),
            "boleto" => Ok(PaymentMethodKind::Boleto),
            other => Err(DomainError::validation(format!(
                "unknown payment method kind: {other}"
            ))),
        }
    }
}

/// Payment method referenced by receivables and payables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: EntityId,
    pub name: String,
    pub kind: PaymentMethodKind,
    /// Days until funds actually settle (e.g. credit card D+30).
    pub settlement_term_days: u32,
    /// Fee percent charged by the instrument.
    pub fee_percent: Decimal,
    pub audit: AuditStamp,
}

impl PaymentMethod {
    pub fn new(
        name: impl Into<String>,
        kind: PaymentMethodKind,
        ctx: &AuditContext,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("payment method name cannot be empty"));
        }
        Ok(Self {
            id: EntityId::new(),
            name,
            kind,
            settlement_term_days: 0,
            fee_percent: Decimal::ZERO,
            audit: AuditStamp::new(ctx),
        })
    }

    pub fn set_fee(&mut self, fee_percent: Decimal, ctx: &AuditContext) -> DomainResult<()> {
        if fee_percent < Decimal::ZERO {
            return Err(DomainError::validation("fee percent cannot be negative"));
        }
        self.fee_percent = fee_percent;
        self.audit.touch(ctx);
        Ok(())
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
    fn kind_tokens_match_stored_values() {
        assert_eq!(PaymentMethodKind::CartaoCredito.as_str(), "cartao_credito");
        assert_eq!(
            PaymentMethodKind::parse("pix").unwrap(),
            PaymentMethodKind::Pix
        );
        assert!(PaymentMethodKind::parse("bitcoin").is_err());
    }

    #[test]
    fn fee_cannot_be_negative() {
        let mut pm = PaymentMethod::new("Cartão", PaymentMethodKind::CartaoCredito, &ctx()).unwrap();
        assert!(pm.set_fee(dec!(-0.5), &ctx()).is_err());
        pm.set_fee(dec!(2.49), &ctx()).unwrap();
        assert_eq!(pm.fee_percent, dec!(2.49));
    }
}
