use std::collections::HashMap;

use contaerp_core::{AuditContext, EntityId, TenantId};
use contaerp_ledger::{AccountKind, ChartAccount, CostCenter};
use sqlx::Row;
use sqlx::postgres::{PgPool, PgRow};
use uuid::Uuid;

use crate::database::Database;
use crate::error::{StoreResult, map_sqlx_error};
use crate::repo::{count_references, ensure_unreferenced, read_stamp};

#[derive(Debug, Clone)]
pub struct ChartAccountRepo {
    pool: PgPool,
}

impl ChartAccountRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    pub async fn insert(&self, account: &ChartAccount) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO chart_accounts \
             (id, tenant_id, code, name, kind, level, postable, parent_id, \
              created_at, updated_at, created_by, updated_by, active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(Uuid::from(account.id))
        .bind(Uuid::from(account.tenant_id))
        .bind(&account.code)
        .bind(&account.name)
        .bind(account.kind.as_str())
        .bind(account.level as i32)
        .bind(account.postable)
        .bind(account.parent_id.map(Uuid::from))
        .bind(account.audit.created_at)
        .bind(account.audit.updated_at)
        .bind(account.audit.created_by.map(Uuid::from))
        .bind(account.audit.updated_by.map(Uuid::from))
        .bind(account.audit.active)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "chart account"))?;
        Ok(())
    }

    pub async fn update(&self, account: &ChartAccount) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE chart_accounts SET \
             code = $2, name = $3, kind = $4, level = $5, postable = $6, \
             parent_id = $7, updated_at = $8, updated_by = $9, active = $10 \
             WHERE id = $1",
        )
        .bind(Uuid::from(account.id))
        .bind(&account.code)
        .bind(&account.name)
        .bind(account.kind.as_str())
        .bind(account.level as i32)
        .bind(account.postable)
        .bind(account.parent_id.map(Uuid::from))
        .bind(account.audit.updated_at)
        .bind(account.audit.updated_by.map(Uuid::from))
        .bind(account.audit.active)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "chart account"))?;
        if result.rows_affected() == 0 {
            return Err(map_sqlx_error(sqlx::Error::RowNotFound, "chart account"));
        }
        Ok(())
    }

    pub async fn find(&self, tenant: TenantId, id: EntityId) -> StoreResult<Option<ChartAccount>> {
        let row = sqlx::query(
            "SELECT * FROM chart_accounts WHERE id = $1 AND tenant_id = $2 AND active",
        )
        .bind(Uuid::from(id))
        .bind(Uuid::from(tenant))
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| map_account(&r)).transpose()
    }

    pub async fn list(&self, tenant: TenantId) -> StoreResult<Vec<ChartAccount>> {
        let rows = sqlx::query(
            "SELECT * FROM chart_accounts WHERE tenant_id = $1 AND active ORDER BY code",
        )
        .bind(Uuid::from(tenant))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(map_account).collect()
    }

    /// Child → parent map of the tenant's active accounts, for ancestry
    /// checks before a reparent.
    pub async fn parent_map(
        &self,
        tenant: TenantId,
    ) -> StoreResult<HashMap<EntityId, Option<EntityId>>> {
        parent_map(&self.pool, "chart_accounts", tenant).await
    }

    /// Deactivation is blocked while active children exist or while any
    /// financial document still references the account. The schema's
    /// RESTRICT constraints only guard physical deletes, so the reference
    /// counts happen here.
    pub async fn deactivate(
        &self,
        tenant: TenantId,
        id: EntityId,
        ctx: &AuditContext,
    ) -> StoreResult<()> {
        let children: i64 = sqlx::query(
            "SELECT COUNT(*) AS n FROM chart_accounts WHERE parent_id = $1 AND active",
        )
        .bind(Uuid::from(id))
        .fetch_one(&self.pool)
        .await?
        .try_get("n")?;
        ensure_unreferenced(children, "account has active child accounts")?;

        let postings = count_references(&self.pool, "receivables", "account_id", id).await?
            + count_references(&self.pool, "payables", "account_id", id).await?
            + count_references(&self.pool, "cash_movements", "account_id", id).await?;
        ensure_unreferenced(postings, "account is referenced by financial documents")?;

        deactivate_tenant_row(&self.pool, "chart_accounts", tenant, id, ctx, "chart account").await
    }
}

fn map_account(row: &PgRow) -> StoreResult<ChartAccount> {
    Ok(ChartAccount {
        id: EntityId::from(row.try_get::<Uuid, _>("id")?),
        tenant_id: TenantId::from(row.try_get::<Uuid, _>("tenant_id")?),
        code: row.try_get("code")?,
        name: row.try_get("name")?,
        kind: AccountKind::parse(row.try_get::<&str, _>("kind")?)?,
        level: row.try_get::<i32, _>("level")? as u32,
        postable: row.try_get("postable")?,
        parent_id: row
            .try_get::<Option<Uuid>, _>("parent_id")?
            .map(EntityId::from),
        audit: read_stamp(row)?,
    })
}

async fn parent_map(
    pool: &PgPool,
    table: &str,
    tenant: TenantId,
) -> StoreResult<HashMap<EntityId, Option<EntityId>>> {
    let sql = format!("SELECT id, parent_id FROM {table} WHERE tenant_id = $1 AND active");
    let rows = sqlx::query(&sql)
        .bind(Uuid::from(tenant))
        .fetch_all(pool)
        .await?;
    let mut map = HashMap::with_capacity(rows.len());
    for row in &rows {
        let id = EntityId::from(row.try_get::<Uuid, _>("id")?);
        let parent = row
            .try_get::<Option<Uuid>, _>("parent_id")?
            .map(EntityId::from);
        map.insert(id, parent);
    }
    Ok(map)
}

async fn deactivate_tenant_row(
    pool: &PgPool,
    table: &str,
    tenant: TenantId,
    id: EntityId,
    ctx: &AuditContext,
    what: &str,
) -> StoreResult<()> {
    let sql = format!(
        "UPDATE {table} SET active = FALSE, updated_at = $3, updated_by = $4 \
         WHERE id = $1 AND tenant_id = $2 AND active"
    );
    let result = sqlx::query(&sql)
        .bind(Uuid::from(id))
        .bind(Uuid::from(tenant))
        .bind(ctx.at)
        .bind(Uuid::from(ctx.user))
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(map_sqlx_error(sqlx::Error::RowNotFound, what));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct CostCenterRepo {
    pool: PgPool,
}

impl CostCenterRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    pub async fn insert(&self, center: &CostCenter) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO cost_centers \
             (id, tenant_id, code, name, description, parent_id, \
              created_at, updated_at, created_by, updated_by, active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(Uuid::from(center.id))
        .bind(Uuid::from(center.tenant_id))
        .bind(&center.code)
        .bind(&center.name)
        .bind(&center.description)
        .bind(center.parent_id.map(Uuid::from))
        .bind(center.audit.created_at)
        .bind(center.audit.updated_at)
        .bind(center.audit.created_by.map(Uuid::from))
        .bind(center.audit.updated_by.map(Uuid::from))
        .bind(center.audit.active)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "cost center"))?;
        Ok(())
    }

    pub async fn update(&self, center: &CostCenter) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE cost_centers SET \
             code = $2, name = $3, description = $4, parent_id = $5, \
             updated_at = $6, updated_by = $7, active = $8 \
             WHERE id = $1",
        )
        .bind(Uuid::from(center.id))
        .bind(&center.code)
        .bind(&center.name)
        .bind(&center.description)
        .bind(center.parent_id.map(Uuid::from))
        .bind(center.audit.updated_at)
        .bind(center.audit.updated_by.map(Uuid::from))
        .bind(center.audit.active)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "cost center"))?;
        if result.rows_affected() == 0 {
            return Err(map_sqlx_error(sqlx::Error::RowNotFound, "cost center"));
        }
        Ok(())
    }

    pub async fn find(&self, tenant: TenantId, id: EntityId) -> StoreResult<Option<CostCenter>> {
        let row =
            sqlx::query("SELECT * FROM cost_centers WHERE id = $1 AND tenant_id = $2 AND active")
                .bind(Uuid::from(id))
                .bind(Uuid::from(tenant))
                .fetch_optional(&self.pool)
                .await?;
        row.map(|r| map_center(&r)).transpose().map_err(Into::into)
    }

    pub async fn list(&self, tenant: TenantId) -> StoreResult<Vec<CostCenter>> {
        let rows =
            sqlx::query("SELECT * FROM cost_centers WHERE tenant_id = $1 AND active ORDER BY code")
                .bind(Uuid::from(tenant))
                .fetch_all(&self.pool)
                .await?;
        rows.iter()
            .map(map_center)
            .collect::<Result<_, _>>()
            .map_err(Into::into)
    }

    pub async fn parent_map(
        &self,
        tenant: TenantId,
    ) -> StoreResult<HashMap<EntityId, Option<EntityId>>> {
        parent_map(&self.pool, "cost_centers", tenant).await
    }

    pub async fn deactivate(
        &self,
        tenant: TenantId,
        id: EntityId,
        ctx: &AuditContext,
    ) -> StoreResult<()> {
        let children: i64 =
            sqlx::query("SELECT COUNT(*) AS n FROM cost_centers WHERE parent_id = $1 AND active")
                .bind(Uuid::from(id))
                .fetch_one(&self.pool)
                .await?
                .try_get("n")?;
        ensure_unreferenced(children, "cost center has active children")?;

        let postings = count_references(&self.pool, "receivables", "cost_center_id", id).await?
            + count_references(&self.pool, "payables", "cost_center_id", id).await?
            + count_references(&self.pool, "cash_movements", "cost_center_id", id).await?;
        ensure_unreferenced(postings, "cost center is referenced by financial documents")?;

        deactivate_tenant_row(&self.pool, "cost_centers", tenant, id, ctx, "cost center").await
    }
}

fn map_center(row: &PgRow) -> Result<CostCenter, sqlx::Error> {
    Ok(CostCenter {
        id: EntityId::from(row.try_get::<Uuid, _>("id")?),
        tenant_id: TenantId::from(row.try_get::<Uuid, _>("tenant_id")?),
        code: row.try_get("code")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        parent_id: row
            .try_get::<Option<Uuid>, _>("parent_id")?
            .map(EntityId::from),
        audit: read_stamp(row)?,
    })
}
