use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use contaerp_core::{DomainError, EntityId};
use contaerp_financial::{
    Bank, BankAccount, BankAccountKind, CashMovement, Direction, Payable, PaymentMethod,
    PaymentMethodKind, Receivable, Settlement, SettlementLink,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::app::dto::{
    AdjustDocument, CashMovementWindow, CreateBank, CreateBankAccount, CreateCashMovement,
    CreateDocument, CreatePaymentMethod, DocumentFilter, SetPaymentMethodFee, SettleDocument,
    SettlementCash,
};
use crate::app::errors::{ApiError, not_found};
use crate::context::Identity;

pub async fn create_bank(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<CreateBank>,
) -> Result<(StatusCode, Json<Bank>), ApiError> {
    let ctx = identity.audit_ctx();
    let bank = Bank::new(body.code, body.name, &ctx)?;
    state.services.banks.insert(&bank).await?;
    Ok((StatusCode::CREATED, Json(bank)))
}

pub async fn list_banks(State(state): State<AppState>) -> Result<Json<Vec<Bank>>, ApiError> {
    Ok(Json(state.services.banks.list().await?))
}

pub async fn create_bank_account(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<CreateBankAccount>,
) -> Result<(StatusCode, Json<BankAccount>), ApiError> {
    let ctx = identity.audit_ctx();
    let bank_id = EntityId::from(body.bank_id);
    if state.services.banks.find(bank_id).await?.is_none() {
        return Err(DomainError::validation("bank does not exist").into());
    }
    let account = BankAccount::new(
        identity.tenant,
        bank_id,
        body.branch,
        body.number,
        body.check_digit,
        BankAccountKind::parse(&body.kind)?,
        body.opening_balance,
        &ctx,
    )?;
    state.services.bank_accounts.insert(&account).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

pub async fn list_bank_accounts(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<BankAccount>>, ApiError> {
    Ok(Json(
        state.services.bank_accounts.list(identity.tenant).await?,
    ))
}

pub async fn create_payment_method(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<CreatePaymentMethod>,
) -> Result<(StatusCode, Json<PaymentMethod>), ApiError> {
    let ctx = identity.audit_ctx();
    let mut method = PaymentMethod::new(body.name, PaymentMethodKind::parse(&body.kind)?, &ctx)?;
    method.settlement_term_days = body.settlement_term_days;
    if let Some(fee) = body.fee_percent {
        method.set_fee(fee, &ctx)?;
    }
    state.services.payment_methods.insert(&method).await?;
    Ok((StatusCode::CREATED, Json(method)))
}

pub async fn set_payment_method_fee(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(body): Json<SetPaymentMethodFee>,
) -> Result<Json<PaymentMethod>, ApiError> {
    let ctx = identity.audit_ctx();
    let Some(mut method) = state.services.payment_methods.find(EntityId::from(id)).await? else {
        return Err(not_found());
    };
    method.set_fee(body.fee_percent, &ctx)?;
    state.services.payment_methods.update(&method).await?;
    Ok(Json(method))
}

pub async fn list_payment_methods(
    State(state): State<AppState>,
) -> Result<Json<Vec<PaymentMethod>>, ApiError> {
    Ok(Json(state.services.payment_methods.list().await?))
}

pub async fn create_receivable(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<CreateDocument>,
) -> Result<(StatusCode, Json<Receivable>), ApiError> {
    let ctx = identity.audit_ctx();
    let customer_id = EntityId::from(body.party_id);
    if state
        .services
        .customers
        .find(identity.tenant, customer_id)
        .await?
        .is_none()
    {
        return Err(DomainError::validation("customer does not exist in this tenant").into());
    }
    let receivable = Receivable::new(
        identity.tenant,
        body.document_number,
        customer_id,
        body.issue_date,
        body.due_date,
        body.original_amount,
        EntityId::from(body.account_id),
        EntityId::from(body.cost_center_id),
        EntityId::from(body.payment_method_id),
        &ctx,
    )?;
    state.services.receivables.insert(&receivable).await?;
    Ok((StatusCode::CREATED, Json(receivable)))
}

pub async fn list_receivables(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(filter): Query<DocumentFilter>,
) -> Result<Json<Vec<Receivable>>, ApiError> {
    let rows = if filter.open {
        state.services.receivables.list_open(identity.tenant).await?
    } else {
        state.services.receivables.list(identity.tenant).await?
    };
    Ok(Json(rows))
}

pub async fn get_receivable(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<Json<Receivable>, ApiError> {
    state
        .services
        .receivables
        .find(identity.tenant, EntityId::from(id))
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

pub async fn adjust_receivable(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(body): Json<AdjustDocument>,
) -> Result<Json<Receivable>, ApiError> {
    let ctx = identity.audit_ctx();
    let receivable = state
        .services
        .receivables
        .adjust(
            identity.tenant,
            EntityId::from(id),
            body.discount,
            body.interest,
            body.penalty,
            &ctx,
        )
        .await?;
    Ok(Json(receivable))
}

pub async fn settle_receivable(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(body): Json<SettleDocument>,
) -> Result<Json<Receivable>, ApiError> {
    let ctx = identity.audit_ctx();
    let document_id = EntityId::from(id);
    let settlement = Settlement::new(body.amount, body.date)?;
    let cash = body
        .cash_movement
        .map(|draft| {
            settlement_movement(
                &identity,
                Direction::Entrada,
                settlement,
                SettlementLink::Receivable(document_id),
                draft,
                &ctx,
            )
        })
        .transpose()?;
    let receivable = state
        .services
        .receivables
        .settle(identity.tenant, document_id, settlement, cash, &ctx)
        .await?;
    Ok(Json(receivable))
}

pub async fn cancel_receivable(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<Json<Receivable>, ApiError> {
    let ctx = identity.audit_ctx();
    let receivable = state
        .services
        .receivables
        .cancel(identity.tenant, EntityId::from(id), &ctx)
        .await?;
    Ok(Json(receivable))
}

pub async fn create_payable(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<CreateDocument>,
) -> Result<(StatusCode, Json<Payable>), ApiError> {
    let ctx = identity.audit_ctx();
    let supplier_id = EntityId::from(body.party_id);
    if state
        .services
        .suppliers
        .find(identity.tenant, supplier_id)
        .await?
        .is_none()
    {
        return Err(DomainError::validation("supplier does not exist in this tenant").into());
    }
    let payable = Payable::new(
        identity.tenant,
        body.document_number,
        supplier_id,
        body.issue_date,
        body.due_date,
        body.original_amount,
        EntityId::from(body.account_id),
        EntityId::from(body.cost_center_id),
        EntityId::from(body.payment_method_id),
        &ctx,
    )?;
    state.services.payables.insert(&payable).await?;
    Ok((StatusCode::CREATED, Json(payable)))
}

pub async fn list_payables(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(filter): Query<DocumentFilter>,
) -> Result<Json<Vec<Payable>>, ApiError> {
    let rows = if filter.open {
        state.services.payables.list_open(identity.tenant).await?
    } else {
        state.services.payables.list(identity.tenant).await?
    };
    Ok(Json(rows))
}

pub async fn get_payable(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<Json<Payable>, ApiError> {
    state
        .services
        .payables
        .find(identity.tenant, EntityId::from(id))
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

pub async fn adjust_payable(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(body): Json<AdjustDocument>,
) -> Result<Json<Payable>, ApiError> {
    let ctx = identity.audit_ctx();
    let payable = state
        .services
        .payables
        .adjust(
            identity.tenant,
            EntityId::from(id),
            body.discount,
            body.interest,
            body.penalty,
            &ctx,
        )
        .await?;
    Ok(Json(payable))
}

pub async fn settle_payable(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(body): Json<SettleDocument>,
) -> Result<Json<Payable>, ApiError> {
    let ctx = identity.audit_ctx();
    let document_id = EntityId::from(id);
    let settlement = Settlement::new(body.amount, body.date)?;
    let cash = body
        .cash_movement
        .map(|draft| {
            settlement_movement(
                &identity,
                Direction::Saida,
                settlement,
                SettlementLink::Payable(document_id),
                draft,
                &ctx,
            )
        })
        .transpose()?;
    let payable = state
        .services
        .payables
        .settle(identity.tenant, document_id, settlement, cash, &ctx)
        .await?;
    Ok(Json(payable))
}

pub async fn cancel_payable(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<Json<Payable>, ApiError> {
    let ctx = identity.audit_ctx();
    let payable = state
        .services
        .payables
        .cancel(identity.tenant, EntityId::from(id), &ctx)
        .await?;
    Ok(Json(payable))
}

pub async fn create_cash_movement(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<CreateCashMovement>,
) -> Result<(StatusCode, Json<CashMovement>), ApiError> {
    let ctx = identity.audit_ctx();
    let bank_account_id = EntityId::from(body.bank_account_id);
    if state
        .services
        .bank_accounts
        .find(identity.tenant, bank_account_id)
        .await?
        .is_none()
    {
        return Err(DomainError::validation("bank account does not exist").into());
    }
    let movement = CashMovement::new(
        identity.tenant,
        body.date,
        Direction::parse(&body.direction)?,
        body.amount,
        body.description,
        EntityId::from(body.account_id),
        EntityId::from(body.cost_center_id),
        bank_account_id,
        None,
        &ctx,
    )?;
    state.services.cash_movements.insert(&movement).await?;
    Ok((StatusCode::CREATED, Json(movement)))
}

pub async fn list_cash_movements(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(window): Query<CashMovementWindow>,
) -> Result<Json<Vec<CashMovement>>, ApiError> {
    Ok(Json(
        state
            .services
            .cash_movements
            .list_between(identity.tenant, window.from, window.to)
            .await?,
    ))
}

pub async fn get_cash_movement(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<Json<CashMovement>, ApiError> {
    state
        .services
        .cash_movements
        .find(identity.tenant, EntityId::from(id))
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

/// Build the cash movement that accompanies a settlement: same amount and
/// date, direction matching the document side.
fn settlement_movement(
    identity: &Identity,
    direction: Direction,
    settlement: Settlement,
    link: SettlementLink,
    draft: SettlementCash,
    ctx: &contaerp_core::AuditContext,
) -> Result<CashMovement, ApiError> {
    CashMovement::new(
        identity.tenant,
        settlement.date,
        direction,
        settlement.amount,
        draft.description,
        EntityId::from(draft.account_id),
        EntityId::from(draft.cost_center_id),
        EntityId::from(draft.bank_account_id),
        Some(link),
        ctx,
    )
    .map_err(Into::into)
}
