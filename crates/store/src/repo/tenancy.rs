use contaerp_core::{AuditContext, EntityId, TenantId};
use contaerp_tenancy::{Company, Setting, SettingKind};
use sqlx::Row;
use sqlx::postgres::{PgPool, PgRow};
use uuid::Uuid;

use crate::database::Database;
use crate::error::{StoreResult, map_sqlx_error};
use crate::repo::read_stamp;

#[derive(Debug, Clone)]
pub struct CompanyRepo {
    pool: PgPool,
}

impl CompanyRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    pub async fn insert(&self, company: &Company) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO companies \
             (id, name, tax_id, legal_name, state_registration, municipal_registration, \
              address, phone, email, website, headquarters, \
              created_at, updated_at, created_by, updated_by, active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)",
        )
        .bind(Uuid::from(company.id))
        .bind(&company.name)
        .bind(&company.tax_id)
        .bind(&company.legal_name)
        .bind(&company.state_registration)
        .bind(&company.municipal_registration)
        .bind(&company.address)
        .bind(&company.phone)
        .bind(&company.email)
        .bind(&company.website)
        .bind(company.headquarters)
        .bind(company.audit.created_at)
        .bind(company.audit.updated_at)
        .bind(company.audit.created_by.map(Uuid::from))
        .bind(company.audit.updated_by.map(Uuid::from))
        .bind(company.audit.active)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "company"))?;
        Ok(())
    }

    pub async fn update(&self, company: &Company) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE companies SET \
             name = $2, tax_id = $3, legal_name = $4, state_registration = $5, \
             municipal_registration = $6, address = $7, phone = $8, email = $9, \
             website = $10, headquarters = $11, \
             updated_at = $12, updated_by = $13, active = $14 \
             WHERE id = $1",
        )
        .bind(Uuid::from(company.id))
        .bind(&company.name)
        .bind(&company.tax_id)
        .bind(&company.legal_name)
        .bind(&company.state_registration)
        .bind(&company.municipal_registration)
        .bind(&company.address)
        .bind(&company.phone)
        .bind(&company.email)
        .bind(&company.website)
        .bind(company.headquarters)
        .bind(company.audit.updated_at)
        .bind(company.audit.updated_by.map(Uuid::from))
        .bind(company.audit.active)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "company"))?;
        if result.rows_affected() == 0 {
            return Err(map_sqlx_error(sqlx::Error::RowNotFound, "company"));
        }
        Ok(())
    }

    pub async fn find(&self, id: TenantId) -> StoreResult<Option<Company>> {
        let row = sqlx::query("SELECT * FROM companies WHERE id = $1 AND active")
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| map_company(&r)).transpose().map_err(Into::into)
    }

    pub async fn list(&self) -> StoreResult<Vec<Company>> {
        let rows = sqlx::query("SELECT * FROM companies WHERE active ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_company).collect::<Result<_, _>>().map_err(Into::into)
    }
}

fn map_company(row: &PgRow) -> Result<Company, sqlx::Error> {
    Ok(Company {
        id: TenantId::from(row.try_get::<Uuid, _>("id")?),
        name: row.try_get("name")?,
        tax_id: row.try_get("tax_id")?,
        legal_name: row.try_get("legal_name")?,
        state_registration: row.try_get("state_registration")?,
        municipal_registration: row.try_get("municipal_registration")?,
        address: row.try_get("address")?,
        phone: row.try_get("phone")?,
        email: row.try_get("email")?,
        website: row.try_get("website")?,
        headquarters: row.try_get("headquarters")?,
        audit: read_stamp(row)?,
    })
}

#[derive(Debug, Clone)]
pub struct SettingRepo {
    pool: PgPool,
}

impl SettingRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    pub async fn insert(&self, setting: &Setting) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO settings \
             (id, key, value, description, kind, \
              created_at, updated_at, created_by, updated_by, active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(Uuid::from(setting.id))
        .bind(&setting.key)
        .bind(&setting.value)
        .bind(&setting.description)
        .bind(setting.kind.as_str())
        .bind(setting.audit.created_at)
        .bind(setting.audit.updated_at)
        .bind(setting.audit.created_by.map(Uuid::from))
        .bind(setting.audit.updated_by.map(Uuid::from))
        .bind(setting.audit.active)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "setting"))?;
        Ok(())
    }

    pub async fn update_value(
        &self,
        key: &str,
        value: &str,
        ctx: &AuditContext,
    ) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE settings SET value = $2, updated_at = $3, updated_by = $4 \
             WHERE key = $1 AND active",
        )
        .bind(key)
        .bind(value)
        .bind(ctx.at)
        .bind(Uuid::from(ctx.user))
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(map_sqlx_error(sqlx::Error::RowNotFound, "setting"));
        }
        Ok(())
    }

    pub async fn find_by_key(&self, key: &str) -> StoreResult<Option<Setting>> {
        let row = sqlx::query("SELECT * FROM settings WHERE key = $1 AND active")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| map_setting(&r)).transpose()
    }

    pub async fn list(&self) -> StoreResult<Vec<Setting>> {
        let rows = sqlx::query("SELECT * FROM settings WHERE active ORDER BY key")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_setting).collect()
    }
}

fn map_setting(row: &PgRow) -> StoreResult<Setting> {
    Ok(Setting {
        id: EntityId::from(row.try_get::<Uuid, _>("id")?),
        key: row.try_get("key")?,
        value: row.try_get("value")?,
        description: row.try_get("description")?,
        kind: SettingKind::parse(row.try_get::<&str, _>("kind")?)?,
        audit: read_stamp(row)?,
    })
}
