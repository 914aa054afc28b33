//! `contaerp-financial` — receivables, payables, bank accounts, payment
//! methods, and cash movements.
//!
//! Receivables and payables are mirrored document shapes with an
//! `aberto → recebido|pago | cancelado` lifecycle; their total is always
//! derived from the component amounts, never persisted. Cash movements are
//! the append-style record cash-position aggregates are computed from.

pub mod bank;
pub mod document;
pub mod movement;
pub mod payment;

pub use bank::{Bank, BankAccount, BankAccountKind};
pub use document::{
    DocumentAmounts, Payable, PayableStatus, Receivable, ReceivableStatus, Settlement,
};
pub use movement::{CashMovement, Direction, SettlementLink};
pub use payment::{PaymentMethod, PaymentMethodKind};
