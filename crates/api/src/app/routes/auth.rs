//! Login: credentials in, bearer token out.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{Duration, Utc};
use contaerp_auth::{JwtClaims, PrincipalId, Role, verify_password};
use contaerp_core::TenantId;
use tracing::error;
use uuid::Uuid;

use crate::app::AppState;
use crate::app::dto::{LoginRequest, LoginResponse};
use crate::app::errors::{ApiError, json_error, unauthorized};

const TOKEN_LIFETIME_HOURS: i64 = 8;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, Response> {
    let user = state
        .services
        .users
        .find_by_username(&body.username)
        .await
        .map_err(|e| ApiError::from(e).into_response())?;
    // One rejection message for unknown users and bad passwords.
    let Some(user) = user else {
        return Err(unauthorized("invalid credentials"));
    };
    if !verify_password(&body.password, &user.password_hash)
        .map_err(|_| unauthorized("invalid credentials"))?
    {
        return Err(unauthorized("invalid credentials"));
    }

    let tenant = TenantId::from(body.company_id);
    let company = state
        .services
        .companies
        .find(tenant)
        .await
        .map_err(|e| ApiError::from(e).into_response())?;
    if company.is_none() {
        return Err(unauthorized("company does not exist"));
    }

    let roles = if user.admin {
        vec![Role::admin()]
    } else {
        vec![Role::new("user")]
    };
    let now = Utc::now();
    let expires_at = now + Duration::hours(TOKEN_LIFETIME_HOURS);
    let claims = JwtClaims {
        sub: PrincipalId::from_uuid(Uuid::from(user.id)),
        tenant_id: tenant,
        roles,
        issued_at: now,
        expires_at,
    };
    let token = state.issuer.issue(&claims).map_err(|e| {
        error!(error = %e, "token signing failed");
        json_error(
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            "internal error",
        )
    })?;
    Ok(Json(LoginResponse { token, expires_at }))
}
