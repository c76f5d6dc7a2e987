//! Order creation
//!
//! 请求先做纯校验（不触碰数据库），然后在一个事务里写入订单和所有明细。
//! 任一明细引用的商品不存在时整个事务回滚，不会留下半个订单。

use serde::Serialize;
use shared::models::{Order, OrderCreate};
use sqlx::SqlitePool;

use super::money;
use crate::db::repository::{RepoError, item, order};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Result of a committed order creation
///
/// The write is committed before the re-read; when the re-read fails the
/// caller still gets the new id.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CreatedOrder {
    Full(Box<Order>),
    IdOnly { order_id: i64 },
}

impl CreatedOrder {
    pub fn order_id(&self) -> i64 {
        match self {
            CreatedOrder::Full(order) => order.id,
            CreatedOrder::IdOnly { order_id } => *order_id,
        }
    }
}

/// Fail-fast validation; item positions in messages are 1-based
pub fn validate_order(req: &OrderCreate) -> AppResult<()> {
    if req.customer_id <= 0 {
        return Err(AppError::new(ErrorCode::OrderCustomerRequired));
    }
    if req.items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }
    for (i, line) in req.items.iter().enumerate() {
        let n = i + 1;
        if line.item_id <= 0 {
            return Err(AppError::with_message(
                ErrorCode::OrderItemInvalid,
                format!("Item ID is required for item {n}"),
            ));
        }
        if line.quantity <= 0 {
            return Err(AppError::with_message(
                ErrorCode::OrderItemInvalid,
                format!("Quantity must be greater than 0 for item {n}"),
            ));
        }
        if line.quantity > money::MAX_QUANTITY {
            return Err(AppError::with_message(
                ErrorCode::OrderItemInvalid,
                format!(
                    "Quantity exceeds maximum allowed ({}) for item {n}",
                    money::MAX_QUANTITY
                ),
            ));
        }
        if !line.price.is_finite() {
            return Err(AppError::with_message(
                ErrorCode::OrderItemInvalid,
                format!("Price must be a finite number for item {n}"),
            ));
        }
        if line.price < 0.0 {
            return Err(AppError::with_message(
                ErrorCode::OrderItemInvalid,
                format!("Price cannot be negative for item {n}"),
            ));
        }
        if line.price > money::MAX_PRICE {
            return Err(AppError::with_message(
                ErrorCode::OrderItemInvalid,
                format!(
                    "Price exceeds maximum allowed ({}) for item {n}",
                    money::MAX_PRICE
                ),
            ));
        }
    }
    if !req.tax.is_finite() || req.tax < 0.0 || req.tax > money::MAX_TAX {
        return Err(AppError::with_message(
            ErrorCode::ValidationFailed,
            format!("Tax must be between 0 and {}", money::MAX_TAX),
        ));
    }
    Ok(())
}

/// Validate, then write the order and its line items atomically
pub async fn create_order(pool: &SqlitePool, req: &OrderCreate) -> AppResult<CreatedOrder> {
    validate_order(req)?;

    let total_amount = money::order_total(&req.items, req.tax)
        .map(money::to_f64)
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::OrderItemInvalid, "Order total is out of range")
        })?;
    let order_id = write_order(pool, req, total_amount).await?;

    tracing::info!(order_id, customer_id = req.customer_id, total_amount, "Order created");

    match order::find_by_id(pool, order_id).await {
        Ok(Some(order)) => Ok(CreatedOrder::Full(Box::new(order))),
        Ok(None) => {
            tracing::warn!(order_id, "Created order not found on re-read");
            Ok(CreatedOrder::IdOnly { order_id })
        }
        Err(e) => {
            tracing::warn!(order_id, error = %e, "Failed to re-read created order");
            Ok(CreatedOrder::IdOnly { order_id })
        }
    }
}

async fn write_order(pool: &SqlitePool, req: &OrderCreate, total_amount: f64) -> AppResult<i64> {
    let mut tx = pool.begin().await.map_err(RepoError::from)?;

    let inserted = order::insert(
        &mut *tx,
        order::NewOrder {
            customer_id: req.customer_id,
            order_date: shared::util::now_millis(),
            total_amount,
            tax: req.tax,
        },
    )
    .await;
    let order_id = match inserted {
        Ok(id) => id,
        Err(e) => {
            rollback(tx).await;
            return Err(e.into());
        }
    };

    for (i, line) in req.items.iter().enumerate() {
        let Some(line_total) = money::line_total(line) else {
            rollback(tx).await;
            return Err(AppError::with_message(
                ErrorCode::OrderItemInvalid,
                format!("Line total is out of range for item {}", i + 1),
            ));
        };

        let known = item::exists(&mut *tx, line.item_id).await;
        match known {
            Ok(true) => {}
            Ok(false) => {
                rollback(tx).await;
                return Err(AppError::with_message(
                    ErrorCode::OrderItemUnknown,
                    format!("Item with ID {} not found", line.item_id),
                ));
            }
            Err(e) => {
                rollback(tx).await;
                return Err(e.into());
            }
        }

        let inserted = order::insert_item(
            &mut *tx,
            order::NewOrderItem {
                order_id,
                item_id: line.item_id,
                quantity: line.quantity,
                total_price: money::to_f64(line_total),
            },
        )
        .await;
        if let Err(e) = inserted {
            rollback(tx).await;
            return Err(e.into());
        }
    }

    tx.commit().await.map_err(RepoError::from)?;
    Ok(order_id)
}

async fn rollback(tx: sqlx::Transaction<'_, sqlx::Sqlite>) {
    if let Err(e) = tx.rollback().await {
        tracing::error!(error = %e, "Failed to roll back order transaction");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::item::NewItem;
    use crate::db::repository::test_support::test_pool;
    use shared::models::{ItemType, OrderLineInput};

    async fn seed_item(pool: &SqlitePool, name: &str) -> i64 {
        item::create(
            pool,
            NewItem {
                name,
                item_type: ItemType::Pizza,
                unit_price: 9.5,
                is_active: true,
            },
        )
        .await
        .unwrap()
        .id
    }

    fn line(item_id: i64, quantity: i64, price: f64) -> OrderLineInput {
        OrderLineInput {
            item_id,
            quantity,
            price,
        }
    }

    async fn order_rows(pool: &SqlitePool) -> (i64, i64) {
        let orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(pool)
            .await
            .unwrap();
        let lines: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_item")
            .fetch_one(pool)
            .await
            .unwrap();
        (orders, lines)
    }

    #[test]
    fn test_validate_order_fails_fast_in_order() {
        let mut req = OrderCreate::default();
        assert_eq!(
            validate_order(&req).unwrap_err().code,
            ErrorCode::OrderCustomerRequired
        );

        req.customer_id = 1;
        assert_eq!(validate_order(&req).unwrap_err().code, ErrorCode::OrderEmpty);

        req.items = vec![line(1, 1, 1.0), line(0, 1, 1.0)];
        assert_eq!(
            validate_order(&req).unwrap_err().message,
            "Item ID is required for item 2"
        );

        req.items = vec![line(1, 0, 1.0)];
        assert_eq!(
            validate_order(&req).unwrap_err().message,
            "Quantity must be greater than 0 for item 1"
        );

        req.items = vec![line(1, 1, 1.0), line(2, 3, 2.0), line(3, 1, -0.5)];
        assert_eq!(
            validate_order(&req).unwrap_err().message,
            "Price cannot be negative for item 3"
        );

        req.items = vec![line(1, 1, 0.0)];
        assert!(validate_order(&req).is_ok());
    }

    #[test]
    fn test_validate_order_caps_amounts() {
        let mut req = OrderCreate {
            customer_id: 1,
            tax: 0.0,
            items: vec![line(1, 1, 1.0), line(2, i64::MAX, 1e12)],
        };
        let err = validate_order(&req).unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderItemInvalid);
        assert_eq!(
            err.message,
            "Quantity exceeds maximum allowed (9999) for item 2"
        );

        req.items = vec![line(1, 1, 1e30)];
        let err = validate_order(&req).unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderItemInvalid);
        assert_eq!(
            err.message,
            "Price exceeds maximum allowed (1000000) for item 1"
        );

        req.items = vec![line(1, 1, f64::NAN)];
        assert_eq!(
            validate_order(&req).unwrap_err().message,
            "Price must be a finite number for item 1"
        );

        req.items = vec![line(1, money::MAX_QUANTITY, money::MAX_PRICE)];
        assert!(validate_order(&req).is_ok());

        req.tax = 1e30;
        assert_eq!(
            validate_order(&req).unwrap_err().code,
            ErrorCode::ValidationFailed
        );
        req.tax = -1.0;
        assert!(validate_order(&req).is_err());
    }

    #[tokio::test]
    async fn test_create_order_computes_totals() {
        let pool = test_pool().await;
        let item_id = seed_item(&pool, "Margherita").await;

        let req = OrderCreate {
            customer_id: 1,
            tax: 1.0,
            items: vec![line(item_id, 2, 9.5)],
        };
        let created = create_order(&pool, &req).await.unwrap();
        let CreatedOrder::Full(order) = created else {
            panic!("expected full order");
        };

        assert_eq!(order.total_amount, 20.0);
        assert_eq!(order.tax, 1.0);
        assert_eq!(order.order_items.len(), 1);
        assert_eq!(order.order_items[0].total_price, 19.0);
        assert_eq!(order.order_items[0].quantity, 2);
        assert_eq!(
            order.order_items[0].item.as_ref().map(|i| i.name.as_str()),
            Some("Margherita")
        );
    }

    #[tokio::test]
    async fn test_create_order_line_count_and_sum() {
        let pool = test_pool().await;
        let a = seed_item(&pool, "A").await;
        let b = seed_item(&pool, "B").await;

        let lines = vec![line(a, 3, 0.1), line(b, 1, 2.35), line(a, 2, 4.0)];
        let req = OrderCreate {
            customer_id: 7,
            tax: 0.5,
            items: lines,
        };
        let created = create_order(&pool, &req).await.unwrap();

        let order = order::find_by_id(&pool, created.order_id())
            .await
            .unwrap()
            .unwrap();
        // 0.3 + 2.35 + 8.0 + 0.5
        assert_eq!(order.total_amount, 11.15);
        assert_eq!(order.order_items.len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_item_rolls_back_everything() {
        let pool = test_pool().await;
        let item_id = seed_item(&pool, "Known").await;

        let req = OrderCreate {
            customer_id: 1,
            tax: 0.0,
            items: vec![line(item_id, 1, 5.0), line(999, 1, 5.0)],
        };
        let err = create_order(&pool, &req).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderItemUnknown);
        assert_eq!(err.message, "Item with ID 999 not found");
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);

        assert_eq!(order_rows(&pool).await, (0, 0));
    }

    #[tokio::test]
    async fn test_deleted_item_is_rejected() {
        let pool = test_pool().await;
        let item_id = seed_item(&pool, "Retired").await;
        item::delete(&pool, item_id).await.unwrap();

        let req = OrderCreate {
            customer_id: 1,
            tax: 0.0,
            items: vec![line(item_id, 1, 5.0)],
        };
        let err = create_order(&pool, &req).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderItemUnknown);
        assert_eq!(order_rows(&pool).await, (0, 0));
    }

    #[tokio::test]
    async fn test_invalid_request_never_touches_storage() {
        let pool = test_pool().await;
        let req = OrderCreate {
            customer_id: 1,
            tax: 0.0,
            items: vec![line(1, -1, 5.0)],
        };
        let err = create_order(&pool, &req).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderItemInvalid);
        assert_eq!(order_rows(&pool).await, (0, 0));
    }

    #[tokio::test]
    async fn test_oversized_line_is_rejected_without_writes() {
        let pool = test_pool().await;
        let item_id = seed_item(&pool, "Huge").await;

        let req = OrderCreate {
            customer_id: 1,
            tax: 0.0,
            items: vec![line(item_id, i64::MAX, 1e12)],
        };
        let err = create_order(&pool, &req).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderItemInvalid);
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
        assert_eq!(order_rows(&pool).await, (0, 0));
    }

    #[test]
    fn test_created_order_id_only_shape() {
        let value = serde_json::to_value(CreatedOrder::IdOnly { order_id: 12 }).unwrap();
        assert_eq!(value, serde_json::json!({ "order_id": 12 }));
    }
}
