//! Financial repositories.
//!
//! Settlement is transactional: the document row is locked, the domain
//! transition runs, and the optional cash movement lands in the same
//! transaction, so a settled document can never exist without its amount,
//! date, and status agreeing.

use chrono::NaiveDate;
use contaerp_core::{AuditContext, DomainError, EntityId, TenantId};
use contaerp_financial::{
    Bank, BankAccount, BankAccountKind, CashMovement, Direction, DocumentAmounts, Payable,
    PayableStatus, PaymentMethod, PaymentMethodKind, Receivable, ReceivableStatus, Settlement,
    SettlementLink,
};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::{PgConnection, Row};
use uuid::Uuid;

use crate::database::Database;
use crate::error::{StoreError, StoreResult, map_sqlx_error};
use crate::repo::read_stamp;

#[derive(Debug, Clone)]
pub struct BankRepo {
    pool: PgPool,
}

impl BankRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    pub async fn insert(&self, bank: &Bank) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO banks \
             (id, code, name, created_at, updated_at, created_by, updated_by, active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(Uuid::from(bank.id))
        .bind(&bank.code)
        .bind(&bank.name)
        .bind(bank.audit.created_at)
        .bind(bank.audit.updated_at)
        .bind(bank.audit.created_by.map(Uuid::from))
        .bind(bank.audit.updated_by.map(Uuid::from))
        .bind(bank.audit.active)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "bank"))?;
        Ok(())
    }

    pub async fn find(&self, id: EntityId) -> StoreResult<Option<Bank>> {
        let row = sqlx::query("SELECT * FROM banks WHERE id = $1 AND active")
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| map_bank(&r)).transpose().map_err(Into::into)
    }

    pub async fn list(&self) -> StoreResult<Vec<Bank>> {
        let rows = sqlx::query("SELECT * FROM banks WHERE active ORDER BY code")
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(map_bank)
            .collect::<Result<_, _>>()
            .map_err(Into::into)
    }
}

fn map_bank(row: &PgRow) -> Result<Bank, sqlx::Error> {
    Ok(Bank {
        id: EntityId::from(row.try_get::<Uuid, _>("id")?),
        code: row.try_get("code")?,
        name: row.try_get("name")?,
        audit: read_stamp(row)?,
    })
}

#[derive(Debug, Clone)]
pub struct BankAccountRepo {
    pool: PgPool,
}

impl BankAccountRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    pub async fn insert(&self, account: &BankAccount) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO bank_accounts \
             (id, tenant_id, bank_id, branch, number, check_digit, kind, opening_balance, \
              created_at, updated_at, created_by, updated_by, active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(Uuid::from(account.id))
        .bind(Uuid::from(account.tenant_id))
        .bind(Uuid::from(account.bank_id))
        .bind(&account.branch)
        .bind(&account.number)
        .bind(&account.check_digit)
        .bind(account.kind.as_str())
        .bind(account.opening_balance)
        .bind(account.audit.created_at)
        .bind(account.audit.updated_at)
        .bind(account.audit.created_by.map(Uuid::from))
        .bind(account.audit.updated_by.map(Uuid::from))
        .bind(account.audit.active)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "bank account"))?;
        Ok(())
    }

    pub async fn find(&self, tenant: TenantId, id: EntityId) -> StoreResult<Option<BankAccount>> {
        let row =
            sqlx::query("SELECT * FROM bank_accounts WHERE id = $1 AND tenant_id = $2 AND active")
                .bind(Uuid::from(id))
                .bind(Uuid::from(tenant))
                .fetch_optional(&self.pool)
                .await?;
        row.map(|r| map_bank_account(&r)).transpose()
    }

    pub async fn list(&self, tenant: TenantId) -> StoreResult<Vec<BankAccount>> {
        let rows = sqlx::query(
            "SELECT * FROM bank_accounts WHERE tenant_id = $1 AND active ORDER BY branch, number",
        )
        .bind(Uuid::from(tenant))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(map_bank_account).collect()
    }
}

fn map_bank_account(row: &PgRow) -> StoreResult<BankAccount> {
    Ok(BankAccount {
        id: EntityId::from(row.try_get::<Uuid, _>("id")?),
        tenant_id: TenantId::from(row.try_get::<Uuid, _>("tenant_id")?),
        bank_id: EntityId::from(row.try_get::<Uuid, _>("bank_id")?),
        branch: row.try_get("branch")?,
        number: row.try_get("number")?,
        check_digit: row.try_get("check_digit")?,
        kind: BankAccountKind::parse(row.try_get::<&str, _>("kind")?)?,
        opening_balance: row.try_get("opening_balance")?,
        audit: read_stamp(row)?,
    })
}

#[derive(Debug, Clone)]
pub struct PaymentMethodRepo {
    pool: PgPool,
}

impl PaymentMethodRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    pub async fn insert(&self, method: &PaymentMethod) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO payment_methods \
             (id, name, kind, settlement_term_days, fee_percent, \
              created_at, updated_at, created_by, updated_by, active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(Uuid::from(method.id))
        .bind(&method.name)
        .bind(method.kind.as_str())
        .bind(method.settlement_term_days as i32)
        .bind(method.fee_percent)
        .bind(method.audit.created_at)
        .bind(method.audit.updated_at)
        .bind(method.audit.created_by.map(Uuid::from))
        .bind(method.audit.updated_by.map(Uuid::from))
        .bind(method.audit.active)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "payment method"))?;
        Ok(())
    }

    pub async fn update(&self, method: &PaymentMethod) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE payment_methods SET \
             name = $2, kind = $3, settlement_term_days = $4, fee_percent = $5, \
             updated_at = $6, updated_by = $7, active = $8 \
             WHERE id = $1",
        )
        .bind(Uuid::from(method.id))
        .bind(&method.name)
        .bind(method.kind.as_str())
        .bind(method.settlement_term_days as i32)
        .bind(method.fee_percent)
        .bind(method.audit.updated_at)
        .bind(method.audit.updated_by.map(Uuid::from))
        .bind(method.audit.active)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "payment method"))?;
        if result.rows_affected() == 0 {
            return Err(map_sqlx_error(sqlx::Error::RowNotFound, "payment method"));
        }
        Ok(())
    }

    pub async fn find(&self, id: EntityId) -> StoreResult<Option<PaymentMethod>> {
        let row = sqlx::query("SELECT * FROM payment_methods WHERE id = $1 AND active")
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| map_payment_method(&r)).transpose()
    }

    pub async fn list(&self) -> StoreResult<Vec<PaymentMethod>> {
        let rows = sqlx::query("SELECT * FROM payment_methods WHERE active ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_payment_method).collect()
    }
}

fn map_payment_method(row: &PgRow) -> StoreResult<PaymentMethod> {
    Ok(PaymentMethod {
        id: EntityId::from(row.try_get::<Uuid, _>("id")?),
        name: row.try_get("name")?,
        kind: PaymentMethodKind::parse(row.try_get::<&str, _>("kind")?)?,
        settlement_term_days: row.try_get::<i32, _>("settlement_term_days")? as u32,
        fee_percent: row.try_get("fee_percent")?,
        audit: read_stamp(row)?,
    })
}

/// Postable enforcement shared by document inserts and standalone cash
/// movements: the referenced ledger account must exist in the tenant, be
/// active, and accept direct postings.
async fn ensure_postable_account(
    conn: &mut PgConnection,
    tenant: TenantId,
    account_id: EntityId,
) -> StoreResult<()> {
    let row = sqlx::query(
        "SELECT postable, active FROM chart_accounts WHERE id = $1 AND tenant_id = $2",
    )
    .bind(Uuid::from(account_id))
    .bind(Uuid::from(tenant))
    .fetch_optional(&mut *conn)
    .await?;
    let Some(row) = row else {
        return Err(StoreError::Domain(DomainError::validation(
            "ledger account does not exist in this tenant",
        )));
    };
    let postable: bool = row.try_get("postable")?;
    let active: bool = row.try_get("active")?;
    if !postable || !active {
        return Err(StoreError::Domain(DomainError::invariant(
            "ledger account does not accept direct postings",
        )));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct ReceivableRepo {
    pool: PgPool,
}

impl ReceivableRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    pub async fn insert(&self, receivable: &Receivable) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        ensure_postable_account(&mut tx, receivable.tenant_id, receivable.account_id).await?;
        insert_receivable_row(&mut tx, receivable).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn find(&self, tenant: TenantId, id: EntityId) -> StoreResult<Option<Receivable>> {
        let row =
            sqlx::query("SELECT * FROM receivables WHERE id = $1 AND tenant_id = $2 AND active")
                .bind(Uuid::from(id))
                .bind(Uuid::from(tenant))
                .fetch_optional(&self.pool)
                .await?;
        row.map(|r| map_receivable(&r)).transpose()
    }

    pub async fn list(&self, tenant: TenantId) -> StoreResult<Vec<Receivable>> {
        let rows = sqlx::query(
            "SELECT * FROM receivables WHERE tenant_id = $1 AND active \
             ORDER BY due_date, document_number",
        )
        .bind(Uuid::from(tenant))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(map_receivable).collect()
    }

    pub async fn list_open(&self, tenant: TenantId) -> StoreResult<Vec<Receivable>> {
        let rows = sqlx::query(
            "SELECT * FROM receivables \
             WHERE tenant_id = $1 AND status = 'aberto' AND active \
             ORDER BY due_date, document_number",
        )
        .bind(Uuid::from(tenant))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(map_receivable).collect()
    }

    pub async fn adjust(
        &self,
        tenant: TenantId,
        id: EntityId,
        discount: Option<rust_decimal::Decimal>,
        interest: Option<rust_decimal::Decimal>,
        penalty: Option<rust_decimal::Decimal>,
        ctx: &AuditContext,
    ) -> StoreResult<Receivable> {
        let mut tx = self.pool.begin().await?;
        let mut receivable = lock_receivable(&mut tx, tenant, id).await?;
        receivable.adjust(discount, interest, penalty, ctx)?;
        update_receivable_row(&mut tx, &receivable).await?;
        tx.commit().await?;
        Ok(receivable)
    }

    /// Settle the document, optionally recording the matching cash inflow in
    /// the same transaction.
    pub async fn settle(
        &self,
        tenant: TenantId,
        id: EntityId,
        settlement: Settlement,
        cash: Option<CashMovement>,
        ctx: &AuditContext,
    ) -> StoreResult<Receivable> {
        if let Some(movement) = &cash {
            match movement.settles {
                Some(SettlementLink::Receivable(linked)) if linked == id => {}
                _ => {
                    return Err(StoreError::Domain(DomainError::invariant(
                        "cash movement must settle the receivable it accompanies",
                    )));
                }
            }
        }
        let mut tx = self.pool.begin().await?;
        let mut receivable = lock_receivable(&mut tx, tenant, id).await?;
        receivable.settle(settlement, ctx)?;
        update_receivable_row(&mut tx, &receivable).await?;
        if let Some(movement) = &cash {
            ensure_postable_account(&mut tx, movement.tenant_id, movement.account_id).await?;
            insert_cash_movement_row(&mut tx, movement).await?;
        }
        tx.commit().await?;
        Ok(receivable)
    }

    pub async fn cancel(
        &self,
        tenant: TenantId,
        id: EntityId,
        ctx: &AuditContext,
    ) -> StoreResult<Receivable> {
        let mut tx = self.pool.begin().await?;
        let mut receivable = lock_receivable(&mut tx, tenant, id).await?;
        receivable.cancel(ctx)?;
        update_receivable_row(&mut tx, &receivable).await?;
        tx.commit().await?;
        Ok(receivable)
    }
}

async fn lock_receivable(
    conn: &mut PgConnection,
    tenant: TenantId,
    id: EntityId,
) -> StoreResult<Receivable> {
    let row = sqlx::query(
        "SELECT * FROM receivables WHERE id = $1 AND tenant_id = $2 AND active FOR UPDATE",
    )
    .bind(Uuid::from(id))
    .bind(Uuid::from(tenant))
    .fetch_optional(&mut *conn)
    .await?;
    match row {
        Some(row) => map_receivable(&row),
        None => Err(StoreError::Domain(DomainError::not_found())),
    }
}

async fn insert_receivable_row(
    conn: &mut PgConnection,
    receivable: &Receivable,
) -> StoreResult<()> {
    sqlx::query(
        "INSERT INTO receivables \
         (id, tenant_id, document_number, customer_id, due_date, issue_date, \
          original_amount, discount_amount, interest_amount, penalty_amount, \
          settled_amount, settled_date, status, \
          account_id, cost_center_id, payment_method_id, bank_account_id, \
          created_at, updated_at, created_by, updated_by, active) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, \
                 $14, $15, $16, $17, $18, $19, $20, $21, $22)",
    )
    .bind(Uuid::from(receivable.id))
    .bind(Uuid::from(receivable.tenant_id))
    .bind(&receivable.document_number)
    .bind(Uuid::from(receivable.customer_id))
    .bind(receivable.due_date)
    .bind(receivable.issue_date)
    .bind(receivable.amounts.original)
    .bind(receivable.amounts.discount)
    .bind(receivable.amounts.interest)
    .bind(receivable.amounts.penalty)
    .bind(receivable.settlement.map(|s| s.amount))
    .bind(receivable.settlement.map(|s| s.date))
    .bind(receivable.status.as_str())
    .bind(Uuid::from(receivable.account_id))
    .bind(Uuid::from(receivable.cost_center_id))
    .bind(Uuid::from(receivable.payment_method_id))
    .bind(receivable.bank_account_id.map(Uuid::from))
    .bind(receivable.audit.created_at)
    .bind(receivable.audit.updated_at)
    .bind(receivable.audit.created_by.map(Uuid::from))
    .bind(receivable.audit.updated_by.map(Uuid::from))
    .bind(receivable.audit.active)
    .execute(conn)
    .await
    .map_err(|e| map_sqlx_error(e, "receivable"))?;
    Ok(())
}

async fn update_receivable_row(
    conn: &mut PgConnection,
    receivable: &Receivable,
) -> StoreResult<()> {
    sqlx::query(
        "UPDATE receivables SET \
         discount_amount = $2, interest_amount = $3, penalty_amount = $4, \
         settled_amount = $5, settled_date = $6, status = $7, \
         updated_at = $8, updated_by = $9, active = $10 \
         WHERE id = $1",
    )
    .bind(Uuid::from(receivable.id))
    .bind(receivable.amounts.discount)
    .bind(receivable.amounts.interest)
    .bind(receivable.amounts.penalty)
    .bind(receivable.settlement.map(|s| s.amount))
    .bind(receivable.settlement.map(|s| s.date))
    .bind(receivable.status.as_str())
    .bind(receivable.audit.updated_at)
    .bind(receivable.audit.updated_by.map(Uuid::from))
    .bind(receivable.audit.active)
    .execute(conn)
    .await
    .map_err(|e| map_sqlx_error(e, "receivable"))?;
    Ok(())
}

fn map_receivable(row: &PgRow) -> StoreResult<Receivable> {
    Ok(Receivable {
        id: EntityId::from(row.try_get::<Uuid, _>("id")?),
        tenant_id: TenantId::from(row.try_get::<Uuid, _>("tenant_id")?),
        document_number: row.try_get("document_number")?,
        customer_id: EntityId::from(row.try_get::<Uuid, _>("customer_id")?),
        due_date: row.try_get("due_date")?,
        issue_date: row.try_get("issue_date")?,
        amounts: DocumentAmounts {
            original: row.try_get("original_amount")?,
            discount: row.try_get("discount_amount")?,
            interest: row.try_get("interest_amount")?,
            penalty: row.try_get("penalty_amount")?,
        },
        settlement: read_settlement(row)?,
        status: ReceivableStatus::parse(row.try_get::<&str, _>("status")?)?,
        account_id: EntityId::from(row.try_get::<Uuid, _>("account_id")?),
        cost_center_id: EntityId::from(row.try_get::<Uuid, _>("cost_center_id")?),
        payment_method_id: EntityId::from(row.try_get::<Uuid, _>("payment_method_id")?),
        bank_account_id: row
            .try_get::<Option<Uuid>, _>("bank_account_id")?
            .map(EntityId::from),
        audit: read_stamp(row)?,
    })
}

fn read_settlement(row: &PgRow) -> StoreResult<Option<Settlement>> {
    let amount: Option<rust_decimal::Decimal> = row.try_get("settled_amount")?;
    let date: Option<NaiveDate> = row.try_get("settled_date")?;
    match (amount, date) {
        (Some(amount), Some(date)) => Ok(Some(Settlement { amount, date })),
        (None, None) => Ok(None),
        _ => Err(StoreError::Domain(DomainError::invariant(
            "settlement amount and date must be stored together",
        ))),
    }
}

#[derive(Debug, Clone)]
pub struct PayableRepo {
    pool: PgPool,
}

impl PayableRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    pub async fn insert(&self, payable: &Payable) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        ensure_postable_account(&mut tx, payable.tenant_id, payable.account_id).await?;
        insert_payable_row(&mut tx, payable).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn find(&self, tenant: TenantId, id: EntityId) -> StoreResult<Option<Payable>> {
        let row =
            sqlx::query("SELECT * FROM payables WHERE id = $1 AND tenant_id = $2 AND active")
                .bind(Uuid::from(id))
                .bind(Uuid::from(tenant))
                .fetch_optional(&self.pool)
                .await?;
        row.map(|r| map_payable(&r)).transpose()
    }

    pub async fn list(&self, tenant: TenantId) -> StoreResult<Vec<Payable>> {
        let rows = sqlx::query(
            "SELECT * FROM payables WHERE tenant_id = $1 AND active \
             ORDER BY due_date, document_number",
        )
        .bind(Uuid::from(tenant))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(map_payable).collect()
    }

    pub async fn list_open(&self, tenant: TenantId) -> StoreResult<Vec<Payable>> {
        let rows = sqlx::query(
            "SELECT * FROM payables \
             WHERE tenant_id = $1 AND status = 'aberto' AND active \
             ORDER BY due_date, document_number",
        )
        .bind(Uuid::from(tenant))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(map_payable).collect()
    }

    pub async fn adjust(
        &self,
        tenant: TenantId,
        id: EntityId,
        discount: Option<rust_decimal::Decimal>,
        interest: Option<rust_decimal::Decimal>,
        penalty: Option<rust_decimal::Decimal>,
        ctx: &AuditContext,
    ) -> StoreResult<Payable> {
        let mut tx = self.pool.begin().await?;
        let mut payable = lock_payable(&mut tx, tenant, id).await?;
        payable.adjust(discount, interest, penalty, ctx)?;
        update_payable_row(&mut tx, &payable).await?;
        tx.commit().await?;
        Ok(payable)
    }

    /// Settle the document, optionally recording the matching cash outflow
    /// in the same transaction.
    pub async fn settle(
        &self,
        tenant: TenantId,
        id: EntityId,
        settlement: Settlement,
        cash: Option<CashMovement>,
        ctx: &AuditContext,
    ) -> StoreResult<Payable> {
        if let Some(movement) = &cash {
            match movement.settles {
                Some(SettlementLink::Payable(linked)) if linked == id => {}
                _ => {
                    return Err(StoreError::Domain(DomainError::invariant(
                        "cash movement must settle the payable it accompanies",
                    )));
                }
            }
        }
        let mut tx = self.pool.begin().await?;
        let mut payable = lock_payable(&mut tx, tenant, id).await?;
        payable.settle(settlement, ctx)?;
        update_payable_row(&mut tx, &payable).await?;
        if let Some(movement) = &cash {
            ensure_postable_account(&mut tx, movement.tenant_id, movement.account_id).await?;
            insert_cash_movement_row(&mut tx, movement).await?;
        }
        tx.commit().await?;
        Ok(payable)
    }

    pub async fn cancel(
        &self,
        tenant: TenantId,
        id: EntityId,
        ctx: &AuditContext,
    ) -> StoreResult<Payable> {
        let mut tx = self.pool.begin().await?;
        let mut payable = lock_payable(&mut tx, tenant, id).await?;
        payable.cancel(ctx)?;
        update_payable_row(&mut tx, &payable).await?;
        tx.commit().await?;
        Ok(payable)
    }
}

async fn lock_payable(
    conn: &mut PgConnection,
    tenant: TenantId,
    id: EntityId,
) -> StoreResult<Payable> {
    let row = sqlx::query(
        "SELECT * FROM payables WHERE id = $1 AND tenant_id = $2 AND active FOR UPDATE",
    )
    .bind(Uuid::from(id))
    .bind(Uuid::from(tenant))
    .fetch_optional(&mut *conn)
    .await?;
    match row {
        Some(row) => map_payable(&row),
        None => Err(StoreError::Domain(DomainError::not_found())),
    }
}

async fn insert_payable_row(conn: &mut PgConnection, payable: &Payable) -> StoreResult<()> {
    sqlx::query(
        "INSERT INTO payables \
         (id, tenant_id, document_number, supplier_id, due_date, issue_date, \
          original_amount, discount_amount, interest_amount, penalty_amount, \
          settled_amount, settled_date, status, \
          account_id, cost_center_id, payment_method_id, bank_account_id, \
          created_at, updated_at, created_by, updated_by, active) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, \
                 $14, $15, $16, $17, $18, $19, $20, $21, $22)",
    )
    .bind(Uuid::from(payable.id))
    .bind(Uuid::from(payable.tenant_id))
    .bind(&payable.document_number)
    .bind(Uuid::from(payable.supplier_id))
    .bind(payable.due_date)
    .bind(payable.issue_date)
    .bind(payable.amounts.original)
    .bind(payable.amounts.discount)
    .bind(payable.amounts.interest)
    .bind(payable.amounts.penalty)
    .bind(payable.settlement.map(|s| s.amount))
    .bind(payable.settlement.map(|s| s.date))
    .bind(payable.status.as_str())
    .bind(Uuid::from(payable.account_id))
    .bind(Uuid::from(payable.cost_center_id))
    .bind(Uuid::from(payable.payment_method_id))
    .bind(payable.bank_account_id.map(Uuid::from))
    .bind(payable.audit.created_at)
    .bind(payable.audit.updated_at)
    .bind(payable.audit.created_by.map(Uuid::from))
    .bind(payable.audit.updated_by.map(Uuid::from))
    .bind(payable.audit.active)
    .execute(conn)
    .await
    .map_err(|e| map_sqlx_error(e, "payable"))?;
    Ok(())
}

async fn update_payable_row(conn: &mut PgConnection, payable: &Payable) -> StoreResult<()> {
    sqlx::query(
        "UPDATE payables SET \
         discount_amount = $2, interest_amount = $3, penalty_amount = $4, \
         settled_amount = $5, settled_date = $6, status = $7, \
         updated_at = $8, updated_by = $9, active = $10 \
         WHERE id = $1",
    )
    .bind(Uuid::from(payable.id))
    .bind(payable.amounts.discount)
    .bind(payable.amounts.interest)
    .bind(payable.amounts.penalty)
    .bind(payable.settlement.map(|s| s.amount))
    .bind(payable.settlement.map(|s| s.date))
    .bind(payable.status.as_str())
    .bind(payable.audit.updated_at)
    .bind(payable.audit.updated_by.map(Uuid::from))
    .bind(payable.audit.active)
    .execute(conn)
    .await
    .map_err(|e| map_sqlx_error(e, "payable"))?;
    Ok(())
}

fn map_payable(row: &PgRow) -> StoreResult<Payable> {
    Ok(Payable {
        id: EntityId::from(row.try_get::<Uuid, _>("id")?),
        tenant_id: TenantId::from(row.try_get::<Uuid, _>("tenant_id")?),
        document_number: row.try_get("document_number")?,
        supplier_id: EntityId::from(row.try_get::<Uuid, _>("supplier_id")?),
        due_date: row.try_get("due_date")?,
        issue_date: row.try_get("issue_date")?,
        amounts: DocumentAmounts {
            original: row.try_get("original_amount")?,
            discount: row.try_get("discount_amount")?,
            interest: row.try_get("interest_amount")?,
            penalty: row.try_get("penalty_amount")?,
        },
        settlement: read_settlement(row)?,
        status: PayableStatus::parse(row.try_get::<&str, _>("status")?)?,
        account_id: EntityId::from(row.try_get::<Uuid, _>("account_id")?),
        cost_center_id: EntityId::from(row.try_get::<Uuid, _>("cost_center_id")?),
        payment_method_id: EntityId::from(row.try_get::<Uuid, _>("payment_method_id")?),
        bank_account_id: row
            .try_get::<Option<Uuid>, _>("bank_account_id")?
            .map(EntityId::from),
        audit: read_stamp(row)?,
    })
}

#[derive(Debug, Clone)]
pub struct CashMovementRepo {
    pool: PgPool,
}

impl CashMovementRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    /// Record a standalone movement (not tied to a document settlement).
    pub async fn insert(&self, movement: &CashMovement) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        ensure_postable_account(&mut tx, movement.tenant_id, movement.account_id).await?;
        insert_cash_movement_row(&mut tx, movement).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn find(&self, tenant: TenantId, id: EntityId) -> StoreResult<Option<CashMovement>> {
        let row = sqlx::query(
            "SELECT * FROM cash_movements WHERE id = $1 AND tenant_id = $2 AND active",
        )
        .bind(Uuid::from(id))
        .bind(Uuid::from(tenant))
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| map_cash_movement(&r)).transpose()
    }

    pub async fn list_between(
        &self,
        tenant: TenantId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<CashMovement>> {
        let rows = sqlx::query(
            "SELECT * FROM cash_movements \
             WHERE tenant_id = $1 AND date BETWEEN $2 AND $3 AND active \
             ORDER BY date, id",
        )
        .bind(Uuid::from(tenant))
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(map_cash_movement).collect()
    }
}

async fn insert_cash_movement_row(
    conn: &mut PgConnection,
    movement: &CashMovement,
) -> StoreResult<()> {
    let (receivable_id, payable_id) = match movement.settles {
        Some(SettlementLink::Receivable(id)) => (Some(Uuid::from(id)), None),
        Some(SettlementLink::Payable(id)) => (None, Some(Uuid::from(id))),
        None => (None, None),
    };
    sqlx::query(
        "INSERT INTO cash_movements \
         (id, tenant_id, date, direction, amount, description, \
          account_id, cost_center_id, bank_account_id, receivable_id, payable_id, \
          created_at, updated_at, created_by, updated_by, active) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, \
                 $12, $13, $14, $15, $16)",
    )
    .bind(Uuid::from(movement.id))
    .bind(Uuid::from(movement.tenant_id))
    .bind(movement.date)
    .bind(movement.direction.as_str())
    .bind(movement.amount)
    .bind(&movement.description)
    .bind(Uuid::from(movement.account_id))
    .bind(Uuid::from(movement.cost_center_id))
    .bind(Uuid::from(movement.bank_account_id))
    .bind(receivable_id)
    .bind(payable_id)
    .bind(movement.audit.created_at)
    .bind(movement.audit.updated_at)
    .bind(movement.audit.created_by.map(Uuid::from))
    .bind(movement.audit.updated_by.map(Uuid::from))
    .bind(movement.audit.active)
    .execute(conn)
    .await
    .map_err(|e| map_sqlx_error(e, "cash movement"))?;
    Ok(())
}

fn map_cash_movement(row: &PgRow) -> StoreResult<CashMovement> {
    let receivable = row
        .try_get::<Option<Uuid>, _>("receivable_id")?
        .map(EntityId::from);
    let payable = row
        .try_get::<Option<Uuid>, _>("payable_id")?
        .map(EntityId::from);
    let settles = match (receivable, payable) {
        (Some(id), None) => Some(SettlementLink::Receivable(id)),
        (None, Some(id)) => Some(SettlementLink::Payable(id)),
        (None, None) => None,
        (Some(_), Some(_)) => {
            return Err(StoreError::Domain(DomainError::invariant(
                "cash movement links both a receivable and a payable",
            )));
        }
    };
    Ok(CashMovement {
        id: EntityId::from(row.try_get::<Uuid, _>("id")?),
        tenant_id: TenantId::from(row.try_get::<Uuid, _>("tenant_id")?),
        date: row.try_get("date")?,
        direction: Direction::parse(row.try_get::<&str, _>("direction")?)?,
        amount: row.try_get("amount")?,
        description: row.try_get("description")?,
        account_id: EntityId::from(row.try_get::<Uuid, _>("account_id")?),
        cost_center_id: EntityId::from(row.try_get::<Uuid, _>("cost_center_id")?),
        bank_account_id: EntityId::from(row.try_get::<Uuid, _>("bank_account_id")?),
        settles,
        audit: read_stamp(row)?,
    })
}
