//! Topping API Handlers

use axum::extract::{Path, Query, State};
use shared::models::{Topping, ToppingCreate, ToppingUpdate};
use shared::response::PaginatedResponse;

use crate::api::{ensure_item_exists, not_found_as};
use crate::core::ServerState;
use crate::db::repository::topping;
use crate::utils::validation::{
    MAX_NAME_LEN, validate_optional_required_text, validate_price, validate_required_text,
};
use crate::utils::{ApiResult, AppError, AppJson, ErrorCode, PaginationParams, created, ok, parse_id};

/// GET /api/toppings
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<PaginatedResponse<Topping>> {
    let page = params.resolve();
    let (toppings, total) = topping::find_page(&state.pool, &page).await?;
    Ok(ok(
        "Toppings retrieved successfully",
        PaginatedResponse::new(toppings, page.page, page.limit, total),
    ))
}

/// GET /api/toppings/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> ApiResult<Topping> {
    let id = parse_id(&id, "topping")?;
    let t = topping::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ToppingNotFound))?;
    Ok(ok("Topping retrieved successfully", t))
}

/// POST /api/toppings
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<ToppingCreate>,
) -> ApiResult<Topping> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_price(payload.price, "price")?;
    ensure_item_exists(&state.pool, payload.item_id).await?;

    let t = topping::create(&state.pool, &payload).await?;
    tracing::info!(topping_id = t.id, item_id = t.item_id, "Topping created");
    Ok(created("Topping created successfully", t))
}

/// PUT /api/toppings/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<ToppingUpdate>,
) -> ApiResult<Topping> {
    let id = parse_id(&id, "topping")?;
    validate_optional_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    if let Some(price) = payload.price {
        validate_price(price, "price")?;
    }
    if let Some(item_id) = payload.item_id {
        ensure_item_exists(&state.pool, item_id).await?;
    }

    let t = topping::update(&state.pool, id, &payload)
        .await
        .map_err(not_found_as(ErrorCode::ToppingNotFound))?;
    Ok(ok("Topping updated successfully", t))
}

/// DELETE /api/toppings/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> ApiResult<Option<()>> {
    let id = parse_id(&id, "topping")?;
    if !topping::delete(&state.pool, id).await? {
        return Err(AppError::new(ErrorCode::ToppingNotFound));
    }
    tracing::info!(topping_id = id, "Topping deleted");
    Ok(ok("Topping deleted successfully", None))
}
