use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use contaerp_core::{DomainError, EntityId};
use contaerp_ledger::{AccountKind, ChartAccount, CostCenter};
use uuid::Uuid;

use crate::app::AppState;
use crate::app::dto::{CreateAccount, CreateCostCenter, Reparent};
use crate::app::errors::{ApiError, not_found};
use crate::context::Identity;

pub async fn create_account(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<CreateAccount>,
) -> Result<(StatusCode, Json<ChartAccount>), ApiError> {
    let ctx = identity.audit_ctx();
    let account = match body.parent_id {
        Some(parent_id) => {
            let Some(parent) = state
                .services
                .accounts
                .find(identity.tenant, EntityId::from(parent_id))
                .await?
            else {
                return Err(DomainError::validation("parent account does not exist").into());
            };
            ChartAccount::new_child(&parent, body.code, body.name, body.postable, &ctx)?
        }
        None => {
            let Some(kind) = body.kind.as_deref() else {
                return Err(DomainError::validation("root accounts require a kind").into());
            };
            ChartAccount::new_root(
                identity.tenant,
                body.code,
                body.name,
                AccountKind::parse(kind)?,
                body.postable,
                &ctx,
            )?
        }
    };
    state.services.accounts.insert(&account).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

pub async fn list_accounts(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<ChartAccount>>, ApiError> {
    Ok(Json(state.services.accounts.list(identity.tenant).await?))
}

pub async fn get_account(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<Json<ChartAccount>, ApiError> {
    state
        .services
        .accounts
        .find(identity.tenant, EntityId::from(id))
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

pub async fn reparent_account(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(body): Json<Reparent>,
) -> Result<Json<ChartAccount>, ApiError> {
    let ctx = identity.audit_ctx();
    let Some(mut account) = state
        .services
        .accounts
        .find(identity.tenant, EntityId::from(id))
        .await?
    else {
        return Err(not_found());
    };
    let new_parent = match body.parent_id {
        Some(parent_id) => {
            let Some(parent) = state
                .services
                .accounts
                .find(identity.tenant, EntityId::from(parent_id))
                .await?
            else {
                return Err(DomainError::validation("parent account does not exist").into());
            };
            Some(parent)
        }
        None => None,
    };
    let parents = state.services.accounts.parent_map(identity.tenant).await?;
    account.reparent(
        new_parent.as_ref(),
        |node| parents.get(&node).copied().flatten(),
        &ctx,
    )?;
    state.services.accounts.update(&account).await?;
    Ok(Json(account))
}

pub async fn deactivate_account(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let ctx = identity.audit_ctx();
    state
        .services
        .accounts
        .deactivate(identity.tenant, EntityId::from(id), &ctx)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_cost_center(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<CreateCostCenter>,
) -> Result<(StatusCode, Json<CostCenter>), ApiError> {
    let ctx = identity.audit_ctx();
    let parent_id = body.parent_id.map(EntityId::from);
    if let Some(parent) = parent_id
        && state
            .services
            .cost_centers
            .find(identity.tenant, parent)
            .await?
            .is_none()
    {
        return Err(DomainError::validation("parent cost center does not exist").into());
    }
    let mut center = CostCenter::new(identity.tenant, body.code, body.name, parent_id, &ctx)?;
    center.description = body.description;
    state.services.cost_centers.insert(&center).await?;
    Ok((StatusCode::CREATED, Json(center)))
}

pub async fn list_cost_centers(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<CostCenter>>, ApiError> {
    Ok(Json(
        state.services.cost_centers.list(identity.tenant).await?,
    ))
}

pub async fn get_cost_center(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<Json<CostCenter>, ApiError> {
    state
        .services
        .cost_centers
        .find(identity.tenant, EntityId::from(id))
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

pub async fn reparent_cost_center(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(body): Json<Reparent>,
) -> Result<Json<CostCenter>, ApiError> {
    let ctx = identity.audit_ctx();
    let Some(mut center) = state
        .services
        .cost_centers
        .find(identity.tenant, EntityId::from(id))
        .await?
    else {
        return Err(not_found());
    };
    let new_parent = match body.parent_id {
        Some(parent_id) => {
            let Some(parent) = state
                .services
                .cost_centers
                .find(identity.tenant, EntityId::from(parent_id))
                .await?
            else {
                return Err(DomainError::validation("parent cost center does not exist").into());
            };
            Some(parent)
        }
        None => None,
    };
    let parents = state
        .services
        .cost_centers
        .parent_map(identity.tenant)
        .await?;
    center.reparent(
        new_parent.as_ref(),
        |node| parents.get(&node).copied().flatten(),
        &ctx,
    )?;
    state.services.cost_centers.update(&center).await?;
    Ok(Json(center))
}

pub async fn deactivate_cost_center(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let ctx = identity.audit_ctx();
    state
        .services
        .cost_centers
        .deactivate(identity.tenant, EntityId::from(id), &ctx)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
