//! Store-level error model and Postgres error translation.

use contaerp_core::DomainError;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A domain rule rejected the operation. Includes constraint violations
    /// the database surfaced (duplicate keys, restricted references).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Infrastructure failure talking to Postgres.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Embedded migrations failed to apply.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Translate a sqlx error into the domain taxonomy where the database is
/// enforcing a domain rule.
///
/// `23505` (unique_violation) and `23503` (foreign_key_violation) are
/// conflicts: a duplicate key, or a delete/insert blocked by a reference.
/// Everything else stays an infrastructure error.
pub(crate) fn map_sqlx_error(err: sqlx::Error, what: &str) -> StoreError {
    match &err {
        sqlx::Error::RowNotFound => StoreError::Domain(DomainError::not_found()),
        sqlx::Error::Database(db) => match db.code().as_deref() {
            Some("23505") => StoreError::Domain(DomainError::conflict(format!(
                "{what} violates a uniqueness constraint"
            ))),
            Some("23503") => StoreError::Domain(DomainError::conflict(format!(
                "{what} references or is referenced by another record"
            ))),
            Some("23514") => StoreError::Domain(DomainError::invariant(format!(
                "{what} violates a check constraint"
            ))),
            _ => StoreError::Database(err),
        },
        _ => StoreError::Database(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_becomes_domain_not_found() {
        let mapped = map_sqlx_error(sqlx::Error::RowNotFound, "receivable");
        assert!(matches!(
            mapped,
            StoreError::Domain(DomainError::NotFound)
        ));
    }

    #[test]
    fn infrastructure_errors_stay_infrastructure() {
        let mapped = map_sqlx_error(sqlx::Error::PoolTimedOut, "receivable");
        assert!(matches!(mapped, StoreError::Database(_)));
    }
}
