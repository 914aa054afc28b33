//! `contaerp-inventory` — stock snapshots and the append-only movement log.
//!
//! A [`StockRecord`] is the current on-hand quantity per
//! (product, tenant, lot), mutated in place. A [`StockMovement`] is the
//! append-only audit trail of each change. Recording a movement and updating
//! the balance is a single transaction in the store layer; the domain types
//! here define the delta semantics and derived totals.

pub mod movement;
pub mod stock;

pub use movement::{StockEffect, StockMovement, StockMovementKind};
pub use stock::StockRecord;
