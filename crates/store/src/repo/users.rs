use contaerp_auth::User;
use contaerp_core::{AuditContext, UserId};
use sqlx::Row;
use sqlx::postgres::{PgPool, PgRow};
use uuid::Uuid;

use crate::database::Database;
use crate::error::{StoreResult, map_sqlx_error};
use crate::repo::read_stamp;

#[derive(Debug, Clone)]
pub struct UserRepo {
    pool: PgPool,
}

impl UserRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    pub async fn insert(&self, user: &User) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO users \
             (id, username, email, password_hash, admin, \
              created_at, updated_at, created_by, updated_by, active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(Uuid::from(user.id))
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.admin)
        .bind(user.audit.created_at)
        .bind(user.audit.updated_at)
        .bind(user.audit.created_by.map(Uuid::from))
        .bind(user.audit.updated_by.map(Uuid::from))
        .bind(user.audit.active)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "user"))?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = $1 AND active")
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| map_user(&r)).transpose().map_err(Into::into)
    }

    pub async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE username = $1 AND active")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| map_user(&r)).transpose().map_err(Into::into)
    }

    pub async fn list(&self) -> StoreResult<Vec<User>> {
        let rows = sqlx::query("SELECT * FROM users WHERE active ORDER BY username")
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|r| map_user(r).map_err(Into::into))
            .collect()
    }

    pub async fn count(&self) -> StoreResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("n")?)
    }

    pub async fn deactivate(&self, id: UserId, ctx: &AuditContext) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE users SET active = FALSE, updated_at = $2, updated_by = $3 \
             WHERE id = $1 AND active",
        )
        .bind(Uuid::from(id))
        .bind(ctx.at)
        .bind(Uuid::from(ctx.user))
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(map_sqlx_error(sqlx::Error::RowNotFound, "user"));
        }
        Ok(())
    }
}

fn map_user(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: UserId::from(row.try_get::<Uuid, _>("id")?),
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        admin: row.try_get("admin")?,
        audit: read_stamp(row)?,
    })
}
