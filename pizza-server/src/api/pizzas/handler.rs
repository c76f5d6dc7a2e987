//! Pizza API Handlers

use axum::extract::{Path, Query, State};
use shared::models::{Pizza, PizzaCreate, PizzaUpdate};
use shared::response::PaginatedResponse;

use crate::api::{ensure_item_exists, not_found_as};
use crate::core::ServerState;
use crate::db::repository::pizza;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_max_len, validate_optional_required_text,
    validate_optional_text, validate_price, validate_required_text,
};
use crate::utils::{ApiResult, AppError, AppJson, ErrorCode, PaginationParams, created, ok, parse_id};

/// GET /api/pizzas
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<PaginatedResponse<Pizza>> {
    let page = params.resolve();
    let (pizzas, total) = pizza::find_page(&state.pool, &page).await?;
    Ok(ok(
        "Pizzas retrieved successfully",
        PaginatedResponse::new(pizzas, page.page, page.limit, total),
    ))
}

/// GET /api/pizzas/{id}
pub async fn get_by_id(State(state): State<ServerState>, Path(id): Path<String>) -> ApiResult<Pizza> {
    let id = parse_id(&id, "pizza")?;
    let p = pizza::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PizzaNotFound))?;
    Ok(ok("Pizza retrieved successfully", p))
}

/// POST /api/pizzas
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<PizzaCreate>,
) -> ApiResult<Pizza> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_max_len(&payload.size, "size", MAX_SHORT_TEXT_LEN)?;
    validate_max_len(&payload.base_type, "base_type", MAX_SHORT_TEXT_LEN)?;
    validate_price(payload.price, "price")?;
    ensure_item_exists(&state.pool, payload.item_id).await?;

    let p = pizza::create(&state.pool, &payload).await?;
    tracing::info!(pizza_id = p.id, item_id = p.item_id, "Pizza created");
    Ok(created("Pizza created successfully", p))
}

/// PUT /api/pizzas/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<PizzaUpdate>,
) -> ApiResult<Pizza> {
    let id = parse_id(&id, "pizza")?;
    validate_optional_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.size, "size", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.base_type, "base_type", MAX_SHORT_TEXT_LEN)?;
    if let Some(price) = payload.price {
        validate_price(price, "price")?;
    }
    if let Some(item_id) = payload.item_id {
        ensure_item_exists(&state.pool, item_id).await?;
    }

    let p = pizza::update(&state.pool, id, &payload)
        .await
        .map_err(not_found_as(ErrorCode::PizzaNotFound))?;
    Ok(ok("Pizza updated successfully", p))
}

/// DELETE /api/pizzas/{id} - 软删除
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> ApiResult<Option<()>> {
    let id = parse_id(&id, "pizza")?;
    if !pizza::delete(&state.pool, id).await? {
        return Err(AppError::new(ErrorCode::PizzaNotFound));
    }
    tracing::info!(pizza_id = id, "Pizza deleted");
    Ok(ok("Pizza deleted successfully", None))
}
