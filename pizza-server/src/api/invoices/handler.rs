//! Invoice API Handlers

use axum::extract::{Path, Query, State};
use serde::Deserialize;
use shared::models::{Invoice, InvoiceCreate, PaymentStatus, PaymentStatusUpdate};
use shared::response::PaginatedResponse;

use crate::billing;
use crate::core::ServerState;
use crate::db::repository::invoice;
use crate::utils::{ApiResult, AppError, AppJson, ErrorCode, PaginationParams, created, ok, parse_id};

/// `?page=&limit=&payment_status=`
#[derive(Debug, Default, Deserialize)]
pub struct InvoiceListQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub payment_status: Option<String>,
}

/// GET /api/invoices - 可按支付状态过滤
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<InvoiceListQuery>,
) -> ApiResult<PaginatedResponse<Invoice>> {
    let status = match query.payment_status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<PaymentStatus>()
                .map_err(|_| AppError::new(ErrorCode::PaymentStatusInvalid))?,
        ),
    };
    let page = query.pagination.resolve();
    let (invoices, total) = invoice::find_page(&state.pool, &page, status).await?;
    Ok(ok(
        "Invoices retrieved successfully",
        PaginatedResponse::new(invoices, page.page, page.limit, total),
    ))
}

/// GET /api/invoices/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> ApiResult<Invoice> {
    let id = parse_id(&id, "invoice")?;
    let inv = invoice::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::InvoiceNotFound))?;
    Ok(ok("Invoice retrieved successfully", inv))
}

/// GET /api/invoices/order/{order_id}
pub async fn get_by_order_id(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> ApiResult<Invoice> {
    let order_id = parse_id(&order_id, "order")?;
    let inv = invoice::find_by_order_id(&state.pool, order_id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::InvoiceNotFound, "Invoice not found for this order")
        })?;
    Ok(ok("Invoice retrieved successfully", inv))
}

/// POST /api/invoices
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<InvoiceCreate>,
) -> ApiResult<Invoice> {
    let inv = billing::issue_invoice(&state.pool, &payload, state.tax_rate()).await?;
    Ok(created("Invoice created successfully", inv))
}

/// PUT /api/invoices/{id}/payment-status
pub async fn update_payment_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<PaymentStatusUpdate>,
) -> ApiResult<Invoice> {
    let id = parse_id(&id, "invoice")?;
    let inv = billing::update_payment_status(&state.pool, id, &payload).await?;
    Ok(ok("Payment status updated successfully", inv))
}
