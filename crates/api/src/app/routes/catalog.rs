use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use contaerp_catalog::{Category, MeasurementUnit, Product, ProductKind};
use contaerp_core::{DomainError, EntityId};
use uuid::Uuid;

use crate::app::AppState;
use crate::app::dto::{
    CreateCategory, CreateProduct, CreateUnit, Reparent, SetPrices, SetThresholds,
};
use crate::app::errors::{ApiError, not_found};
use crate::context::Identity;

pub async fn create_category(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<CreateCategory>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let ctx = identity.audit_ctx();
    let parent_id = body.parent_id.map(EntityId::from);
    if let Some(parent) = parent_id
        && state.services.categories.find(parent).await?.is_none()
    {
        return Err(DomainError::validation("parent category does not exist").into());
    }
    let mut category = Category::new(body.name, parent_id, &ctx)?;
    category.description = body.description;
    state.services.categories.insert(&category).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.services.categories.list().await?))
}

pub async fn reparent_category(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(body): Json<Reparent>,
) -> Result<Json<Category>, ApiError> {
    let ctx = identity.audit_ctx();
    let Some(mut category) = state.services.categories.find(EntityId::from(id)).await? else {
        return Err(not_found());
    };
    let new_parent = body.parent_id.map(EntityId::from);
    if let Some(parent) = new_parent
        && state.services.categories.find(parent).await?.is_none()
    {
        return Err(DomainError::validation("parent category does not exist").into());
    }
    let parents = state.services.categories.parent_map().await?;
    category.reparent(new_parent, |node| parents.get(&node).copied().flatten(), &ctx)?;
    state.services.categories.update(&category).await?;
    Ok(Json(category))
}

pub async fn deactivate_category(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let ctx = identity.audit_ctx();
    state
        .services
        .categories
        .deactivate(EntityId::from(id), &ctx)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_unit(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<CreateUnit>,
) -> Result<(StatusCode, Json<MeasurementUnit>), ApiError> {
    let ctx = identity.audit_ctx();
    let mut unit = MeasurementUnit::new(body.name, body.abbreviation, &ctx)?;
    unit.description = body.description;
    state.services.units.insert(&unit).await?;
    Ok((StatusCode::CREATED, Json(unit)))
}

pub async fn list_units(
    State(state): State<AppState>,
) -> Result<Json<Vec<MeasurementUnit>>, ApiError> {
    Ok(Json(state.services.units.list().await?))
}

pub async fn deactivate_unit(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let ctx = identity.audit_ctx();
    state
        .services
        .units
        .deactivate(EntityId::from(id), &ctx)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_product(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<CreateProduct>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let ctx = identity.audit_ctx();
    let category_id = EntityId::from(body.category_id);
    let unit_id = EntityId::from(body.unit_id);
    if state.services.categories.find(category_id).await?.is_none() {
        return Err(DomainError::validation("category does not exist").into());
    }
    if state.services.units.find(unit_id).await?.is_none() {
        return Err(DomainError::validation("unit does not exist").into());
    }
    if state
        .services
        .products
        .find_by_code(&body.code)
        .await?
        .is_some()
    {
        return Err(DomainError::conflict("a product with this code already exists").into());
    }
    let kind = ProductKind::parse(&body.kind)?;
    let mut product = Product::new(body.code, body.name, category_id, unit_id, kind, &ctx)?;
    product.description = body.description;
    product.barcode = body.barcode;
    state.services.products.insert(&product).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.services.products.list().await?))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, ApiError> {
    state
        .services
        .products
        .find(EntityId::from(id))
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

pub async fn deactivate_product(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let ctx = identity.audit_ctx();
    state
        .services
        .products
        .deactivate(EntityId::from(id), &ctx)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_prices(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(body): Json<SetPrices>,
) -> Result<Json<Product>, ApiError> {
    let ctx = identity.audit_ctx();
    let Some(mut product) = state.services.products.find(EntityId::from(id)).await? else {
        return Err(not_found());
    };
    product.set_prices(body.cost_price, body.sale_price, &ctx)?;
    state.services.products.update(&product).await?;
    Ok(Json(product))
}

pub async fn set_thresholds(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(body): Json<SetThresholds>,
) -> Result<Json<Product>, ApiError> {
    let ctx = identity.audit_ctx();
    let Some(mut product) = state.services.products.find(EntityId::from(id)).await? else {
        return Err(not_found());
    };
    product.set_stock_thresholds(body.min_stock, body.max_stock, &ctx)?;
    state.services.products.update(&product).await?;
    Ok(Json(product))
}
