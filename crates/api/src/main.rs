//! `contaerp-api` server binary.

use std::sync::Arc;

use anyhow::Context;
use contaerp_api::app::{AppServices, AppState, build_app};
use contaerp_auth::{Hs256JwtIssuer, Hs256JwtValidator};
use contaerp_store::{Database, DatabaseConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    contaerp_observability::init();

    let config = DatabaseConfig::from_env()?;
    let secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
    let bind = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());

    let db = Database::connect(&config).await?;
    db.migrate().await?;

    let state = AppState {
        services: AppServices::new(db),
        validator: Arc::new(Hs256JwtValidator::new(secret.clone().into_bytes())),
        issuer: Arc::new(Hs256JwtIssuer::new(secret.as_bytes())),
    };
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("binding {bind}"))?;
    info!(%bind, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install shutdown handler");
    }
}
