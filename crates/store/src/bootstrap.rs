//! First-run provisioning: create the database if it is missing, apply
//! migrations, and seed the default admin user. Every step is idempotent, so
//! the binary can run on every deploy.

use anyhow::{Context, bail};
use contaerp_auth::{User, hash_password};
use contaerp_core::{AuditContext, UserId};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::database::Database;
use crate::repo::users::UserRepo;

/// Credentials for the seeded admin account.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
}

impl AdminSeed {
    pub fn from_env() -> Self {
        Self {
            username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
            password: std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".into()),
            email: std::env::var("ADMIN_EMAIL").ok(),
        }
    }
}

/// Create the target database if it does not exist. Returns whether it was
/// created.
pub async fn ensure_database(config: &DatabaseConfig) -> anyhow::Result<bool> {
    // CREATE DATABASE cannot take a bind parameter; restrict the name instead.
    if !config
        .database
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
        || config.database.is_empty()
    {
        bail!("database name {:?} is not a simple identifier", config.database);
    }

    let maintenance = PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.maintenance_url())
        .await
        .context("connecting to the maintenance database")?;

    let exists = sqlx::query("SELECT 1 FROM pg_database WHERE datname = $1")
        .bind(&config.database)
        .fetch_optional(&maintenance)
        .await?
        .is_some();
    if exists {
        info!(database = %config.database, "database already exists");
        return Ok(false);
    }

    sqlx::query(&format!("CREATE DATABASE \"{}\"", config.database))
        .execute(&maintenance)
        .await
        .context("creating the database")?;
    info!(database = %config.database, "database created");
    Ok(true)
}

/// Seed the admin account when the users table is empty. Returns whether a
/// user was created.
pub async fn provision_admin(db: &Database, seed: &AdminSeed) -> anyhow::Result<bool> {
    let users = UserRepo::new(db);
    if users.count().await? > 0 {
        info!("users already provisioned, skipping admin seed");
        return Ok(false);
    }

    let hash = hash_password(&seed.password)?;
    // The first user has no predecessor to attribute creation to.
    let ctx = AuditContext::now(UserId::new());
    let admin = User::new(seed.username.clone(), seed.email.clone(), hash, true, &ctx)?;
    users.insert(&admin).await?;
    info!(username = %seed.username, "admin user provisioned");
    Ok(true)
}

/// Full bootstrap: database, migrations, admin seed.
pub async fn run(config: &DatabaseConfig, seed: &AdminSeed) -> anyhow::Result<()> {
    ensure_database(config).await?;
    let db = Database::connect(config).await?;
    db.migrate().await?;
    info!("migrations applied");
    provision_admin(&db, seed).await?;
    Ok(())
}
