use axum::Extension;
use axum::Json;
use axum::extract::State;
use chrono::Utc;
use contaerp_store::repo::dashboard::DashboardSummary;

use crate::app::AppState;
use crate::app::errors::ApiError;
use crate::context::Identity;

pub async fn summary(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<DashboardSummary>, ApiError> {
    let today = Utc::now().date_naive();
    Ok(Json(
        state.services.dashboard.summary(identity.tenant, today).await?,
    ))
}
