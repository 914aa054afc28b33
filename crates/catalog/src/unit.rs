use serde::{Deserialize, Serialize};

use contaerp_core::{AuditContext, AuditStamp, DomainError, DomainResult, EntityId};

/// Unit of measure. `abbreviation` (sigla) is globally unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementUnit {
    pub id: EntityId,
    pub name: String,
    pub abbreviation: String,
    pub description: Option<String>,
    pub audit: AuditStamp,
}

impl MeasurementUnit {
    pub fn new(
        name: impl Into<String>,
        abbreviation: impl Into<String>,
        ctx: &AuditContext,
    ) -> DomainResult<Self> {
        let name = name.into();
        let abbreviation = abbreviation.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("unit name cannot be empty"));
        }
        if abbreviation.trim().is_empty() {
            return Err(DomainError::validation("unit abbreviation cannot be empty"));
        }
        Ok(Self {
            id: EntityId::new(),
            name,
            abbreviation,
            description: None,
            audit: AuditStamp::new(ctx),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contaerp_core::UserId;

    #[test]
    fn rejects_blank_abbreviation() {
        let ctx = AuditContext::now(UserId::new());
        let err = MeasurementUnit::new("Quilograma", " ", &ctx).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
