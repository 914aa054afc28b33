//! `contaerp-ledger` — ledger configuration: chart of accounts and cost
//! centers.
//!
//! Both are tenant-scoped forests (multiple roots per tenant). Nodes with
//! children or with financial postings against them are protected from
//! deletion; the store enforces the referential side, the domain enforces the
//! tree shape.

pub mod chart;
pub mod cost_center;

pub use chart::{AccountKind, ChartAccount};
pub use cost_center::CostCenter;
