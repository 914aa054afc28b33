//! `contaerp-parties` — the person registry.
//!
//! A [`Person`] is the base record (natural or legal person, globally unique
//! tax id). Customers, suppliers, and employees are one-to-one role
//! extensions, each with its own unique code.

pub mod person;
pub mod roles;

pub use person::{Person, PersonKind};
pub use roles::{Customer, Employee, EmploymentStatus, Supplier};
