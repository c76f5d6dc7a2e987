//! Invoice API 模块

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/invoices", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/order/{order_id}", get(handler::get_by_order_id))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/payment-status", put(handler::update_payment_status))
}
