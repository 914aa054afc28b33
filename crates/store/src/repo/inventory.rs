//! Stock persistence.
//!
//! Recording a movement and updating the balance row is one transaction:
//! the balance row is locked with `FOR UPDATE`, the domain delta is applied,
//! and both writes commit or neither does. Concurrent movements against the
//! same (product, tenant, lot) serialize on the row lock.

use contaerp_core::{AuditContext, DomainError, EntityId, TenantId, UserId};
use contaerp_inventory::{StockMovement, StockMovementKind, StockRecord};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::{PgConnection, Row};
use uuid::Uuid;

use crate::database::Database;
use crate::error::{StoreError, StoreResult, map_sqlx_error};
use crate::repo::read_stamp;

#[derive(Debug, Clone)]
pub struct StockRepo {
    pool: PgPool,
}

impl StockRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    /// Append a movement and apply its effect to the balance row.
    ///
    /// Opens the balance row if this is the first movement against the
    /// (product, tenant, lot). Returns the updated record.
    pub async fn record_movement(
        &self,
        movement: &StockMovement,
        ctx: &AuditContext,
    ) -> StoreResult<StockRecord> {
        let mut tx = self.pool.begin().await?;

        let tracked: Option<bool> =
            sqlx::query("SELECT tracks_stock FROM products WHERE id = $1 AND active")
                .bind(Uuid::from(movement.product_id))
                .fetch_optional(&mut *tx)
                .await?
                .map(|r| r.try_get("tracks_stock"))
                .transpose()?;
        match tracked {
            None => {
                return Err(StoreError::Domain(DomainError::validation(
                    "product does not exist",
                )));
            }
            Some(false) => {
                return Err(StoreError::Domain(DomainError::invariant(
                    "product does not track stock",
                )));
            }
            Some(true) => {}
        }

        insert_movement_row(&mut tx, movement).await?;

        let existing = sqlx::query(
            "SELECT * FROM stock_records \
             WHERE product_id = $1 AND tenant_id = $2 AND lot = $3 AND active \
             FOR UPDATE",
        )
        .bind(Uuid::from(movement.product_id))
        .bind(Uuid::from(movement.tenant_id))
        .bind(&movement.lot)
        .fetch_optional(&mut *tx)
        .await?;

        let record = match existing {
            Some(row) => {
                let mut record = map_record(&row)?;
                record.apply_movement(movement, ctx)?;
                update_record_row(&mut tx, &record).await?;
                record
            }
            None => {
                let record = StockRecord::from_movement(movement, ctx)?;
                insert_record_row(&mut tx, &record).await?;
                record
            }
        };

        tx.commit().await?;
        Ok(record)
    }

    pub async fn find_record(
        &self,
        tenant: TenantId,
        product: EntityId,
        lot: &str,
    ) -> StoreResult<Option<StockRecord>> {
        let row = sqlx::query(
            "SELECT * FROM stock_records \
             WHERE product_id = $1 AND tenant_id = $2 AND lot = $3 AND active",
        )
        .bind(Uuid::from(product))
        .bind(Uuid::from(tenant))
        .bind(lot)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| map_record(&r)).transpose().map_err(Into::into)
    }

    pub async fn list_records(&self, tenant: TenantId) -> StoreResult<Vec<StockRecord>> {
        let rows = sqlx::query(
            "SELECT * FROM stock_records WHERE tenant_id = $1 AND active \
             ORDER BY product_id, lot",
        )
        .bind(Uuid::from(tenant))
        .fetch_all(&self.pool)
        .await?;
        rows.iter()
            .map(map_record)
            .collect::<Result<_, _>>()
            .map_err(Into::into)
    }

    /// Movement history for one product, newest first.
    pub async fn list_movements(
        &self,
        tenant: TenantId,
        product: EntityId,
    ) -> StoreResult<Vec<StockMovement>> {
        let rows = sqlx::query(
            "SELECT * FROM stock_movements \
             WHERE tenant_id = $1 AND product_id = $2 \
             ORDER BY moved_at DESC, id DESC",
        )
        .bind(Uuid::from(tenant))
        .bind(Uuid::from(product))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(map_movement).collect()
    }
}

async fn insert_movement_row(
    conn: &mut PgConnection,
    movement: &StockMovement,
) -> StoreResult<()> {
    sqlx::query(
        "INSERT INTO stock_movements \
         (id, tenant_id, product_id, kind, quantity, unit_value, reason, notes, \
          document_number, lot, moved_at, recorded_by) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
    )
    .bind(Uuid::from(movement.id))
    .bind(Uuid::from(movement.tenant_id))
    .bind(Uuid::from(movement.product_id))
    .bind(movement.kind.as_str())
    .bind(movement.quantity)
    .bind(movement.unit_value)
    .bind(&movement.reason)
    .bind(&movement.notes)
    .bind(&movement.document_number)
    .bind(&movement.lot)
    .bind(movement.moved_at)
    .bind(movement.recorded_by.map(Uuid::from))
    .execute(conn)
    .await
    .map_err(|e| map_sqlx_error(e, "stock movement"))?;
    Ok(())
}

async fn insert_record_row(conn: &mut PgConnection, record: &StockRecord) -> StoreResult<()> {
    sqlx::query(
        "INSERT INTO stock_records \
         (id, tenant_id, product_id, quantity, unit_value, location, lot, expiry_date, \
          created_at, updated_at, created_by, updated_by, active) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
    )
    .bind(Uuid::from(record.id))
    .bind(Uuid::from(record.tenant_id))
    .bind(Uuid::from(record.product_id))
    .bind(record.quantity)
    .bind(record.unit_value)
    .bind(&record.location)
    .bind(&record.lot)
    .bind(record.expiry_date)
    .bind(record.audit.created_at)
    .bind(record.audit.updated_at)
    .bind(record.audit.created_by.map(Uuid::from))
    .bind(record.audit.updated_by.map(Uuid::from))
    .bind(record.audit.active)
    .execute(conn)
    .await
    .map_err(|e| map_sqlx_error(e, "stock record"))?;
    Ok(())
}

async fn update_record_row(conn: &mut PgConnection, record: &StockRecord) -> StoreResult<()> {
    sqlx::query(
        "UPDATE stock_records SET \
         quantity = $2, unit_value = $3, location = $4, expiry_date = $5, \
         updated_at = $6, updated_by = $7, active = $8 \
         WHERE id = $1",
    )
    .bind(Uuid::from(record.id))
    .bind(record.quantity)
    .bind(record.unit_value)
    .bind(&record.location)
    .bind(record.expiry_date)
    .bind(record.audit.updated_at)
    .bind(record.audit.updated_by.map(Uuid::from))
    .bind(record.audit.active)
    .execute(conn)
    .await
    .map_err(|e| map_sqlx_error(e, "stock record"))?;
    Ok(())
}

fn map_record(row: &PgRow) -> Result<StockRecord, sqlx::Error> {
    Ok(StockRecord {
        id: EntityId::from(row.try_get::<Uuid, _>("id")?),
        tenant_id: TenantId::from(row.try_get::<Uuid, _>("tenant_id")?),
        product_id: EntityId::from(row.try_get::<Uuid, _>("product_id")?),
        quantity: row.try_get("quantity")?,
        unit_value: row.try_get("unit_value")?,
        location: row.try_get("location")?,
        lot: row.try_get("lot")?,
        expiry_date: row.try_get("expiry_date")?,
        audit: read_stamp(row)?,
    })
}

fn map_movement(row: &PgRow) -> StoreResult<StockMovement> {
    Ok(StockMovement {
        id: EntityId::from(row.try_get::<Uuid, _>("id")?),
        tenant_id: TenantId::from(row.try_get::<Uuid, _>("tenant_id")?),
        product_id: EntityId::from(row.try_get::<Uuid, _>("product_id")?),
        kind: StockMovementKind::parse(row.try_get::<&str, _>("kind")?)?,
        quantity: row.try_get("quantity")?,
        unit_value: row.try_get("unit_value")?,
        reason: row.try_get("reason")?,
        notes: row.try_get("notes")?,
        document_number: row.try_get("document_number")?,
        lot: row.try_get("lot")?,
        moved_at: row.try_get("moved_at")?,
        recorded_by: row
            .try_get::<Option<Uuid>, _>("recorded_by")?
            .map(UserId::from),
    })
}
