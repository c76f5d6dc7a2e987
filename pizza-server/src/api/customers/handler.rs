//! Customer API Handlers

use axum::extract::{Path, Query, State};
use shared::models::{Customer, CustomerCreate, CustomerUpdate};
use shared::response::PaginatedResponse;

use crate::api::not_found_as;
use crate::core::ServerState;
use crate::db::repository::customer;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_max_len, validate_optional_required_text,
};
use crate::utils::{ApiResult, AppError, AppJson, ErrorCode, PaginationParams, created, ok, parse_id};

/// GET /api/customers - 分页获取顾客
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<PaginatedResponse<Customer>> {
    let page = params.resolve();
    let (customers, total) = customer::find_page(&state.pool, &page).await?;
    Ok(ok(
        "Customers retrieved successfully",
        PaginatedResponse::new(customers, page.page, page.limit, total),
    ))
}

/// GET /api/customers/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> ApiResult<Customer> {
    let id = parse_id(&id, "customer")?;
    let c = customer::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CustomerNotFound))?;
    Ok(ok("Customer retrieved successfully", c))
}

/// GET /api/customers/telno/{telno} - 按电话精确查找
pub async fn get_by_tel_no(
    State(state): State<ServerState>,
    Path(tel_no): Path<String>,
) -> ApiResult<Customer> {
    let c = customer::find_by_tel_no(&state.pool, tel_no.trim())
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CustomerNotFound))?;
    Ok(ok("Customer retrieved successfully", c))
}

/// POST /api/customers
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<CustomerCreate>,
) -> ApiResult<Customer> {
    if payload.name.trim().is_empty() || payload.tel_no.trim().is_empty() {
        return Err(AppError::new(ErrorCode::CustomerFieldsRequired));
    }
    validate_max_len(&payload.name, "name", MAX_NAME_LEN)?;
    validate_max_len(&payload.tel_no, "tel_no", MAX_SHORT_TEXT_LEN)?;

    let c = customer::create(&state.pool, &payload).await?;
    tracing::info!(customer_id = c.id, "Customer created");
    Ok(created("Customer created successfully", c))
}

/// PUT /api/customers/{id} - 只更新提供的字段
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<CustomerUpdate>,
) -> ApiResult<Customer> {
    let id = parse_id(&id, "customer")?;
    validate_optional_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_required_text(&payload.tel_no, "tel_no", MAX_SHORT_TEXT_LEN)?;

    let c = customer::update(&state.pool, id, &payload)
        .await
        .map_err(not_found_as(ErrorCode::CustomerNotFound))?;
    Ok(ok("Customer updated successfully", c))
}

/// DELETE /api/customers/{id} - 软删除
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> ApiResult<Option<()>> {
    let id = parse_id(&id, "customer")?;
    if !customer::delete(&state.pool, id).await? {
        return Err(AppError::new(ErrorCode::CustomerNotFound));
    }
    tracing::info!(customer_id = id, "Customer deleted");
    Ok(ok("Customer deleted successfully", None))
}
