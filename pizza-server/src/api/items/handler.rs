//! Item API Handlers

use axum::extract::{Path, Query, State};
use shared::models::{Item, ItemCreate, ItemType, ItemUpdate};
use shared::response::PaginatedResponse;

use crate::api::not_found_as;
use crate::core::ServerState;
use crate::db::repository::item::{self, ItemChanges, NewItem};
use crate::utils::validation::{
    MAX_NAME_LEN, validate_optional_required_text, validate_price, validate_required_text,
};
use crate::utils::{ApiResult, AppError, AppJson, ErrorCode, PaginationParams, created, ok, parse_id};

fn parse_item_type(raw: &str) -> Result<ItemType, AppError> {
    raw.parse()
        .map_err(|_| AppError::new(ErrorCode::ItemTypeInvalid))
}

/// GET /api/items - 分页获取上架条目
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<PaginatedResponse<Item>> {
    let page = params.resolve();
    let (items, total) = item::find_page(&state.pool, &page).await?;
    Ok(ok(
        "Items retrieved successfully",
        PaginatedResponse::new(items, page.page, page.limit, total),
    ))
}

/// GET /api/items/type/{type} - 按类型分页获取 (不区分大小写)
pub async fn list_by_type(
    State(state): State<ServerState>,
    Path(raw): Path<String>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<PaginatedResponse<Item>> {
    let item_type = parse_item_type(&raw)?;
    let page = params.resolve();
    let (items, total) = item::find_by_type(&state.pool, item_type, &page).await?;
    Ok(ok(
        "Items retrieved successfully",
        PaginatedResponse::new(items, page.page, page.limit, total),
    ))
}

/// GET /api/items/{id}
pub async fn get_by_id(State(state): State<ServerState>, Path(id): Path<String>) -> ApiResult<Item> {
    let id = parse_id(&id, "item")?;
    let it = item::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ItemNotFound))?;
    Ok(ok("Item retrieved successfully", it))
}

/// POST /api/items
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<ItemCreate>,
) -> ApiResult<Item> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    let item_type = parse_item_type(&payload.item_type)?;
    validate_price(payload.unit_price, "unit_price")?;

    let it = item::create(
        &state.pool,
        NewItem {
            name: &payload.name,
            item_type,
            unit_price: payload.unit_price,
            is_active: payload.is_active.unwrap_or(true),
        },
    )
    .await?;
    tracing::info!(item_id = it.id, item_type = %it.item_type, "Item created");
    Ok(created("Item created successfully", it))
}

/// PUT /api/items/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<ItemUpdate>,
) -> ApiResult<Item> {
    let id = parse_id(&id, "item")?;
    validate_optional_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    let item_type = payload
        .item_type
        .as_deref()
        .map(parse_item_type)
        .transpose()?;
    if let Some(price) = payload.unit_price {
        validate_price(price, "unit_price")?;
    }

    let changes = ItemChanges {
        name: payload.name.as_deref(),
        item_type,
        unit_price: payload.unit_price,
        is_active: payload.is_active,
    };
    let it = item::update(&state.pool, id, changes)
        .await
        .map_err(not_found_as(ErrorCode::ItemNotFound))?;
    Ok(ok("Item updated successfully", it))
}

/// DELETE /api/items/{id} - 软删除并下架
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> ApiResult<Option<()>> {
    let id = parse_id(&id, "item")?;
    if !item::delete(&state.pool, id).await? {
        return Err(AppError::new(ErrorCode::ItemNotFound));
    }
    tracing::info!(item_id = id, "Item deleted");
    Ok(ok("Item deleted successfully", None))
}
