//! Repositories: one per domain area, all sharing the pool.
//!
//! Queries are written as plain `sqlx::query` with explicit binds and
//! `try_get` row mapping. Reads filter on `active` unless the caller asks
//! for deactivated rows explicitly.

pub mod catalog;
pub mod dashboard;
pub mod financial;
pub mod inventory;
pub mod ledger;
pub mod parties;
pub mod tenancy;
pub mod users;

use contaerp_core::{AuditStamp, DomainError, EntityId, UserId};
use sqlx::Row;
use sqlx::postgres::{PgPool, PgRow};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

/// Count rows in `table` whose `column` points at `id`.
///
/// Soft-delete never fires the schema's `ON DELETE RESTRICT` constraints
/// (those guard physical deletes only), so repositories count references
/// themselves before flipping the active flag.
pub(crate) async fn count_references(
    pool: &PgPool,
    table: &str,
    column: &str,
    id: EntityId,
) -> StoreResult<i64> {
    let sql = format!("SELECT COUNT(*) AS n FROM {table} WHERE {column} = $1");
    let n = sqlx::query(&sql)
        .bind(Uuid::from(id))
        .fetch_one(pool)
        .await?
        .try_get("n")?;
    Ok(n)
}

/// Like [`count_references`], but only counts rows that are themselves
/// still active. Used where the referrer is soft-deletable too.
pub(crate) async fn count_active_references(
    pool: &PgPool,
    table: &str,
    column: &str,
    id: EntityId,
) -> StoreResult<i64> {
    let sql = format!("SELECT COUNT(*) AS n FROM {table} WHERE {column} = $1 AND active");
    let n = sqlx::query(&sql)
        .bind(Uuid::from(id))
        .fetch_one(pool)
        .await?
        .try_get("n")?;
    Ok(n)
}

/// Reject deactivation while rows still point at the entity.
pub(crate) fn ensure_unreferenced(references: i64, message: &'static str) -> StoreResult<()> {
    if references > 0 {
        return Err(StoreError::Domain(DomainError::conflict(message)));
    }
    Ok(())
}

/// Read the shared audit columns off a row.
pub(crate) fn read_stamp(row: &PgRow) -> Result<AuditStamp, sqlx::Error> {
    Ok(AuditStamp {
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        created_by: row
            .try_get::<Option<Uuid>, _>("created_by")?
            .map(UserId::from),
        updated_by: row
            .try_get::<Option<Uuid>, _>("updated_by")?
            .map(UserId::from),
        active: row.try_get("active")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreferenced_rows_may_deactivate() {
        assert!(ensure_unreferenced(0, "account is referenced").is_ok());
    }

    #[test]
    fn referenced_rows_are_a_conflict() {
        let err = ensure_unreferenced(3, "account is referenced by financial documents")
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Domain(DomainError::Conflict(msg))
                if msg == "account is referenced by financial documents"
        ));
    }
}
