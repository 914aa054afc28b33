use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use contaerp_core::EntityId;
use contaerp_inventory::{StockMovement, StockMovementKind, StockRecord};
use serde::Serialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::app::dto::{LotQuery, RecordStockMovement};
use crate::app::errors::{ApiError, not_found};
use crate::context::Identity;

/// Response for a recorded movement: the log entry plus the balance it left
/// behind.
#[derive(Debug, Serialize)]
pub struct MovementOutcome {
    pub movement: StockMovement,
    pub record: StockRecord,
}

pub async fn record_movement(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<RecordStockMovement>,
) -> Result<(StatusCode, Json<MovementOutcome>), ApiError> {
    let ctx = identity.audit_ctx();
    let mut movement = StockMovement::new(
        identity.tenant,
        EntityId::from(body.product_id),
        StockMovementKind::parse(&body.kind)?,
        body.quantity,
        body.unit_value,
        body.reason,
        body.lot,
        &ctx,
    )?;
    movement.document_number = body.document_number;
    movement.notes = body.notes;

    let record = state.services.stock.record_movement(&movement, &ctx).await?;
    Ok((StatusCode::CREATED, Json(MovementOutcome { movement, record })))
}

pub async fn list_records(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<StockRecord>>, ApiError> {
    Ok(Json(state.services.stock.list_records(identity.tenant).await?))
}

pub async fn get_record(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(product_id): Path<Uuid>,
    Query(query): Query<LotQuery>,
) -> Result<Json<StockRecord>, ApiError> {
    state
        .services
        .stock
        .find_record(identity.tenant, EntityId::from(product_id), &query.lot)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

pub async fn list_movements(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<Vec<StockMovement>>, ApiError> {
    Ok(Json(
        state
            .services
            .stock
            .list_movements(identity.tenant, EntityId::from(product_id))
            .await?,
    ))
}
