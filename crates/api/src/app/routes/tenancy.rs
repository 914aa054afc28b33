use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use contaerp_auth::User;
use contaerp_core::{DomainError, TenantId, UserId};
use contaerp_tenancy::{Company, Setting, SettingKind};
use uuid::Uuid;

use crate::app::AppState;
use crate::app::dto::{CreateCompany, CreateSetting, UpdateCompany, UpdateSetting};
use crate::app::errors::{ApiError, not_found};
use crate::context::Identity;

pub async fn create_company(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<CreateCompany>,
) -> Result<(StatusCode, Json<Company>), ApiError> {
    if !identity.is_admin() {
        return Err(DomainError::Unauthorized.into());
    }
    let ctx = identity.audit_ctx();
    let mut company = Company::new(
        body.name,
        body.tax_id,
        body.legal_name,
        body.address,
        body.headquarters,
        &ctx,
    )?;
    company.state_registration = body.state_registration;
    company.municipal_registration = body.municipal_registration;
    company.phone = body.phone;
    company.email = body.email;
    company.website = body.website;
    state.services.companies.insert(&company).await?;
    Ok((StatusCode::CREATED, Json(company)))
}

pub async fn list_companies(
    State(state): State<AppState>,
) -> Result<Json<Vec<Company>>, ApiError> {
    Ok(Json(state.services.companies.list().await?))
}

pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Company>, ApiError> {
    state
        .services
        .companies
        .find(TenantId::from(id))
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

pub async fn update_company(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateCompany>,
) -> Result<Json<Company>, ApiError> {
    let ctx = identity.audit_ctx();
    let Some(mut company) = state.services.companies.find(TenantId::from(id)).await? else {
        return Err(not_found());
    };
    company.update_details(body.name, body.legal_name, body.address, &ctx)?;
    state.services.companies.update(&company).await?;
    Ok(Json(company))
}

pub async fn deactivate_company(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !identity.is_admin() {
        return Err(DomainError::Unauthorized.into());
    }
    let ctx = identity.audit_ctx();
    let Some(mut company) = state.services.companies.find(TenantId::from(id)).await? else {
        return Err(not_found());
    };
    company.deactivate(&ctx);
    state.services.companies.update(&company).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_users(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<User>>, ApiError> {
    if !identity.is_admin() {
        return Err(DomainError::Unauthorized.into());
    }
    Ok(Json(state.services.users.list().await?))
}

pub async fn get_user(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    if !identity.is_admin() {
        return Err(DomainError::Unauthorized.into());
    }
    state
        .services
        .users
        .find_by_id(UserId::from(id))
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

pub async fn deactivate_user(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !identity.is_admin() {
        return Err(DomainError::Unauthorized.into());
    }
    let target = UserId::from(id);
    if target == identity.principal.as_user_id() {
        return Err(DomainError::invariant("cannot deactivate your own account").into());
    }
    let ctx = identity.audit_ctx();
    state.services.users.deactivate(target, &ctx).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_setting(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<CreateSetting>,
) -> Result<(StatusCode, Json<Setting>), ApiError> {
    let ctx = identity.audit_ctx();
    let kind = SettingKind::parse(&body.kind)?;
    let mut setting = Setting::new(body.key, body.value, kind, &ctx)?;
    setting.description = body.description;
    state.services.settings.insert(&setting).await?;
    Ok((StatusCode::CREATED, Json(setting)))
}

pub async fn list_settings(State(state): State<AppState>) -> Result<Json<Vec<Setting>>, ApiError> {
    Ok(Json(state.services.settings.list().await?))
}

pub async fn update_setting(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(key): Path<String>,
    Json(body): Json<UpdateSetting>,
) -> Result<Json<Setting>, ApiError> {
    let ctx = identity.audit_ctx();
    state
        .services
        .settings
        .update_value(&key, &body.value, &ctx)
        .await?;
    state
        .services
        .settings
        .find_by_key(&key)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}
