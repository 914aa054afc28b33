//! `contaerp-api` — HTTP surface.
//!
//! All routes except `/health` require a bearer token; the authenticated
//! principal and tenant ride along as a request extension and become the
//! audit context for every write.

pub mod app;
pub mod context;
pub mod middleware;
