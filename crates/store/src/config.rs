//! Database configuration, read from the conventional `PG*` environment
//! variables.

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("PGHOST").unwrap_or_else(|_| "localhost".into());
        let port = std::env::var("PGPORT")
            .unwrap_or_else(|_| "5432".into())
            .parse::<u16>()
            .context("PGPORT must be a port number")?;
        let user = std::env::var("PGUSER").unwrap_or_else(|_| "postgres".into());
        let password = std::env::var("PGPASSWORD").unwrap_or_default();
        let database = std::env::var("PGDATABASE").unwrap_or_else(|_| "contaerp".into());
        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".into())
            .parse::<u32>()
            .context("DATABASE_MAX_CONNECTIONS must be a number")?;
        Ok(Self {
            host,
            port,
            user,
            password,
            database,
            max_connections,
        })
    }

    /// Connection URL for the configured database.
    pub fn url(&self) -> String {
        self.url_for(&self.database)
    }

    /// Connection URL for the maintenance database, used by bootstrap before
    /// the target database exists.
    pub fn maintenance_url(&self) -> String {
        self.url_for("postgres")
    }

    fn url_for(&self, database: &str) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, database
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_target_the_right_database() {
        let cfg = DatabaseConfig {
            host: "db".into(),
            port: 5433,
            user: "erp".into(),
            password: "s3cret".into(),
            database: "contaerp".into(),
            max_connections: 5,
        };
        assert_eq!(cfg.url(), "postgres://erp:s3cret@db:5433/contaerp");
        assert_eq!(
            cfg.maintenance_url(),
            "postgres://erp:s3cret@db:5433/postgres"
        );
    }
}
