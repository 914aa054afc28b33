//! `contaerp-tenancy` — company (tenant) registry and system settings.
//!
//! Every other tenant-scoped entity in the system hangs off a [`Company`];
//! deleting a company cascades at the schema level.

pub mod company;
pub mod setting;

pub use company::Company;
pub use setting::{Setting, SettingKind};
