//! `contaerp-store` — Postgres persistence.
//!
//! Repositories translate between the domain types and the relational
//! schema. Multi-step invariants (settlement, stock balance updates) run in
//! transactions here; single-row invariants are enforced by the schema and
//! surfaced through [`error::map_sqlx_error`].

pub mod bootstrap;
pub mod config;
pub mod database;
pub mod error;
pub mod repo;

pub use config::DatabaseConfig;
pub use database::Database;
pub use error::{StoreError, StoreResult};
