//! `contaerp-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod audit;
pub mod error;
pub mod hierarchy;
pub mod id;

pub use audit::{AuditContext, AuditStamp};
pub use hierarchy::ensure_acyclic;
pub use error::{DomainError, DomainResult};
pub use id::{EntityId, TenantId, UserId};
