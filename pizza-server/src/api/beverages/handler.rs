//! Beverage API Handlers

use axum::extract::{Path, Query, State};
use shared::models::{Beverage, BeverageCreate, BeverageUpdate};
use shared::response::PaginatedResponse;

use crate::api::{ensure_item_exists, not_found_as};
use crate::core::ServerState;
use crate::db::repository::beverage;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_max_len, validate_optional_required_text,
    validate_optional_text, validate_price, validate_required_text,
};
use crate::utils::{ApiResult, AppError, AppJson, ErrorCode, PaginationParams, created, ok, parse_id};

/// GET /api/beverages
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<PaginatedResponse<Beverage>> {
    let page = params.resolve();
    let (beverages, total) = beverage::find_page(&state.pool, &page).await?;
    Ok(ok(
        "Beverages retrieved successfully",
        PaginatedResponse::new(beverages, page.page, page.limit, total),
    ))
}

/// GET /api/beverages/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> ApiResult<Beverage> {
    let id = parse_id(&id, "beverage")?;
    let b = beverage::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::BeverageNotFound))?;
    Ok(ok("Beverage retrieved successfully", b))
}

/// POST /api/beverages
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<BeverageCreate>,
) -> ApiResult<Beverage> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_max_len(&payload.size, "size", MAX_SHORT_TEXT_LEN)?;
    validate_price(payload.price, "price")?;
    ensure_item_exists(&state.pool, payload.item_id).await?;

    let b = beverage::create(&state.pool, &payload).await?;
    tracing::info!(beverage_id = b.id, item_id = b.item_id, "Beverage created");
    Ok(created("Beverage created successfully", b))
}

/// PUT /api/beverages/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<BeverageUpdate>,
) -> ApiResult<Beverage> {
    let id = parse_id(&id, "beverage")?;
    validate_optional_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.size, "size", MAX_SHORT_TEXT_LEN)?;
    if let Some(price) = payload.price {
        validate_price(price, "price")?;
    }
    if let Some(item_id) = payload.item_id {
        ensure_item_exists(&state.pool, item_id).await?;
    }

    let b = beverage::update(&state.pool, id, &payload)
        .await
        .map_err(not_found_as(ErrorCode::BeverageNotFound))?;
    Ok(ok("Beverage updated successfully", b))
}

/// DELETE /api/beverages/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> ApiResult<Option<()>> {
    let id = parse_id(&id, "beverage")?;
    if !beverage::delete(&state.pool, id).await? {
        return Err(AppError::new(ErrorCode::BeverageNotFound));
    }
    tracing::info!(beverage_id = id, "Beverage deleted");
    Ok(ok("Beverage deleted successfully", None))
}
