//! `contaerp-bootstrap` — create the database, migrate, seed the admin.

use contaerp_store::bootstrap::{self, AdminSeed};
use contaerp_store::config::DatabaseConfig;
use tracing::error;

#[tokio::main]
async fn main() {
    contaerp_observability::init();

    let config = match DatabaseConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid database configuration");
            std::process::exit(1);
        }
    };
    let seed = AdminSeed::from_env();

    if let Err(e) = bootstrap::run(&config, &seed).await {
        error!(error = %e, "bootstrap failed");
        std::process::exit(1);
    }
}
