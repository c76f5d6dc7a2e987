//! Order API Handlers

use axum::extract::{Path, Query, State};
use serde::Serialize;
use shared::models::{Order, OrderCreate, OrderStatus, OrderStatusUpdate};
use shared::response::PaginatedResponse;

use crate::core::ServerState;
use crate::db::repository::order;
use crate::orders::{CreatedOrder, create_order};
use crate::utils::{ApiResult, AppError, AppJson, ErrorCode, PaginationParams, created, ok, parse_id};

/// Status change result; the bare id and status when the re-read fails
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum StatusUpdated {
    Full(Box<Order>),
    Brief { order_id: i64, status: OrderStatus },
}

/// GET /api/orders - 分页，最新在前
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<PaginatedResponse<Order>> {
    let page = params.resolve();
    let (orders, total) = order::find_page(&state.pool, &page).await?;
    Ok(ok(
        "Orders retrieved successfully",
        PaginatedResponse::new(orders, page.page, page.limit, total),
    ))
}

/// GET /api/orders/{id} - 含明细和商品
pub async fn get_by_id(State(state): State<ServerState>, Path(id): Path<String>) -> ApiResult<Order> {
    let id = parse_id(&id, "order")?;
    let o = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    Ok(ok("Order retrieved successfully", o))
}

/// POST /api/orders
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<OrderCreate>,
) -> ApiResult<CreatedOrder> {
    let result = create_order(&state.pool, &payload).await?;
    Ok(created("Order created successfully", result))
}

/// PUT /api/orders/{id}/status
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<OrderStatusUpdate>,
) -> ApiResult<StatusUpdated> {
    let id = parse_id(&id, "order")?;
    let status: OrderStatus = payload
        .status
        .parse()
        .map_err(|_| AppError::new(ErrorCode::OrderStatusInvalid))?;

    if !order::update_status(&state.pool, id, status).await? {
        return Err(AppError::new(ErrorCode::OrderNotFound));
    }
    tracing::info!(order_id = id, status = %status, "Order status updated");

    let data = match order::find_by_id(&state.pool, id).await {
        Ok(Some(o)) => StatusUpdated::Full(Box::new(o)),
        Ok(None) => StatusUpdated::Brief { order_id: id, status },
        Err(e) => {
            tracing::warn!(order_id = id, error = %e, "Failed to re-read order after status change");
            StatusUpdated::Brief { order_id: id, status }
        }
    };
    Ok(ok("Order status updated successfully", data))
}
