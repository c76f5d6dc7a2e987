//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`customers`] - 顾客管理接口
//! - [`items`] - 菜单条目接口
//! - [`pizzas`] - 披萨接口
//! - [`toppings`] - 配料接口
//! - [`beverages`] - 饮品接口
//! - [`orders`] - 订单接口
//! - [`invoices`] - 发票接口
//!
//! 所有 `/api/*` 响应都使用 `{success, message, data}` 信封。

pub mod health;

pub mod customers;

// Menu
pub mod beverages;
pub mod items;
pub mod pizzas;
pub mod toppings;

// Orders & billing
pub mod invoices;
pub mod orders;

use crate::db::repository::RepoError;
use crate::utils::{AppError, ErrorCode};

/// Turn a repository miss into the resource's own 404
pub(crate) fn not_found_as(code: ErrorCode) -> impl FnOnce(RepoError) -> AppError {
    move |err| match err {
        RepoError::NotFound(_) => AppError::new(code),
        other => other.into(),
    }
}

/// Referenced menu item must exist and not be deleted (400 otherwise)
pub(crate) async fn ensure_item_exists(pool: &sqlx::SqlitePool, item_id: i64) -> Result<(), AppError> {
    if item_id <= 0 {
        return Err(AppError::validation("item_id is required"));
    }
    if !crate::db::repository::item::exists(pool, item_id).await? {
        return Err(AppError::with_message(
            ErrorCode::ItemReferenceInvalid,
            format!("Item with ID {item_id} not found"),
        ));
    }
    Ok(())
}
