//! `contaerp-catalog` — products, category tree, and units of measure.
//!
//! Catalog definitions are shared references (not tenant-scoped); the
//! tenant-scoped inventory ledger points at them.

pub mod category;
pub mod product;
pub mod unit;

pub use category::Category;
pub use product::{Product, ProductKind};
pub use unit::MeasurementUnit;
