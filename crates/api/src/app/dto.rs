//! Request payloads. Responses serialize the domain types directly.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// Company the issued token will be scoped to.
    pub company_id: Uuid,
}

#[derive(Debug, serde::Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCompany {
    pub name: String,
    pub tax_id: String,
    pub legal_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub headquarters: bool,
    pub state_registration: Option<String>,
    pub municipal_registration: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCompany {
    pub name: Option<String>,
    pub legal_name: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSetting {
    pub key: String,
    pub value: String,
    pub kind: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSetting {
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePerson {
    pub name: String,
    pub kind: String,
    pub tax_id: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePersonContact {
    pub address: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCustomer {
    pub person_id: Uuid,
    pub code: String,
    pub registered_on: NaiveDate,
    pub credit_limit: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct SetCreditLimit {
    pub credit_limit: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct CreateSupplier {
    pub person_id: Uuid,
    pub code: String,
    pub registered_on: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct CreateEmployee {
    pub person_id: Uuid,
    pub code: String,
    pub position: String,
    pub department: String,
    pub salary: Decimal,
    pub hired_on: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct TerminateEmployee {
    pub on: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Reparent {
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUnit {
    pub name: String,
    pub abbreviation: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProduct {
    pub code: String,
    pub name: String,
    pub category_id: Uuid,
    pub unit_id: Uuid,
    pub kind: String,
    pub description: Option<String>,
    pub barcode: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetPrices {
    pub cost_price: Decimal,
    pub sale_price: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct SetThresholds {
    pub min_stock: Decimal,
    pub max_stock: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct CreateAccount {
    pub code: String,
    pub name: String,
    /// Account kind; required for roots, inherited from the parent otherwise.
    pub kind: Option<String>,
    pub postable: bool,
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCostCenter {
    pub code: String,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBank {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateBankAccount {
    pub bank_id: Uuid,
    pub branch: String,
    pub number: String,
    #[serde(default)]
    pub check_digit: String,
    pub kind: String,
    #[serde(default)]
    pub opening_balance: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct SetPaymentMethodFee {
    pub fee_percent: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct CreatePaymentMethod {
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub settlement_term_days: u32,
    pub fee_percent: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct CreateDocument {
    pub document_number: String,
    /// Customer for receivables, supplier for payables.
    pub party_id: Uuid,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub original_amount: Decimal,
    pub account_id: Uuid,
    pub cost_center_id: Uuid,
    pub payment_method_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct AdjustDocument {
    pub discount: Option<Decimal>,
    pub interest: Option<Decimal>,
    pub penalty: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct SettleDocument {
    pub amount: Decimal,
    pub date: NaiveDate,
    /// When present, the matching cash movement is recorded in the same
    /// transaction.
    pub cash_movement: Option<SettlementCash>,
}

#[derive(Debug, Deserialize)]
pub struct SettlementCash {
    pub description: String,
    pub account_id: Uuid,
    pub cost_center_id: Uuid,
    pub bank_account_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct CreateCashMovement {
    pub date: NaiveDate,
    pub direction: String,
    pub amount: Decimal,
    pub description: String,
    pub account_id: Uuid,
    pub cost_center_id: Uuid,
    pub bank_account_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct DocumentFilter {
    /// Restrict the listing to documents still open for settlement.
    #[serde(default)]
    pub open: bool,
}

#[derive(Debug, Deserialize)]
pub struct CashMovementWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct RecordStockMovement {
    pub product_id: Uuid,
    pub kind: String,
    pub quantity: Decimal,
    pub unit_value: Decimal,
    pub reason: String,
    #[serde(default)]
    pub lot: String,
    pub document_number: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LotQuery {
    #[serde(default)]
    pub lot: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn settle_payload_with_cash_movement() {
        let body: SettleDocument = serde_json::from_str(
            r#"{
                "amount": "960.00",
                "date": "2026-08-20",
                "cash_movement": {
                    "description": "Recebimento NF-0001",
                    "account_id": "0198c5a0-0000-7000-8000-000000000001",
                    "cost_center_id": "0198c5a0-0000-7000-8000-000000000002",
                    "bank_account_id": "0198c5a0-0000-7000-8000-000000000003"
                }
            }"#,
        )
        .unwrap();
        assert_eq!(body.amount, dec!(960.00));
        assert!(body.cash_movement.is_some());
    }

    #[test]
    fn stock_movement_defaults_to_empty_lot() {
        let body: RecordStockMovement = serde_json::from_str(
            r#"{
                "product_id": "0198c5a0-0000-7000-8000-000000000004",
                "kind": "entrada",
                "quantity": "10.000",
                "unit_value": "5.00",
                "reason": "Compra NF-123"
            }"#,
        )
        .unwrap();
        assert_eq!(body.lot, "");
        assert!(body.notes.is_none());
    }
}
