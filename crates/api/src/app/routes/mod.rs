pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod financial;
pub mod inventory;
pub mod ledger;
pub mod parties;
pub mod system;
pub mod tenancy;
