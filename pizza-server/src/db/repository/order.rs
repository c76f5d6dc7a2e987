//! Order Repository
//!
//! Orders are read together with their line items, and each line item with
//! its menu item. Line items keep pointing at soft-deleted menu items so an
//! old order still shows what was sold.

use std::collections::HashMap;

use super::{RepoResult, item};
use crate::utils::PageRequest;
use shared::models::{Order, OrderItem, OrderStatus};
use sqlx::SqlitePool;

const ORDER_SELECT: &str = "SELECT id, customer_id, order_date, total_amount, tax, order_status, created_at, updated_at, deleted_at FROM orders";

const ORDER_ITEM_SELECT: &str = "SELECT id, order_id, item_id, quantity, total_price, created_at, updated_at, deleted_at FROM order_item";

/// Row values for a new order
#[derive(Debug, Clone, Copy)]
pub struct NewOrder {
    pub customer_id: i64,
    pub order_date: i64,
    pub total_amount: f64,
    pub tax: f64,
}

/// Row values for a new line item
#[derive(Debug, Clone, Copy)]
pub struct NewOrderItem {
    pub order_id: i64,
    pub item_id: i64,
    pub quantity: i64,
    pub total_price: f64,
}

/// One page of orders, newest first, with line items, plus the total count
pub async fn find_page(pool: &SqlitePool, page: &PageRequest) -> RepoResult<(Vec<Order>, u64)> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE deleted_at IS NULL")
        .fetch_one(pool)
        .await?;

    let sql = format!(
        "{ORDER_SELECT} WHERE deleted_at IS NULL ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
    );
    let mut rows = sqlx::query_as::<_, Order>(&sql)
        .bind(i64::from(page.limit))
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

    attach_items(pool, &mut rows).await?;
    Ok((rows, total.max(0) as u64))
}

/// Order with line items
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let Some(order) = find_row(pool, id).await? else {
        return Ok(None);
    };
    let mut orders = [order];
    attach_items(pool, &mut orders).await?;
    let [order] = orders;
    Ok(Some(order))
}

/// Orders with line items for a set of ids, in no particular order
pub async fn find_by_ids(pool: &SqlitePool, ids: &[i64]) -> RepoResult<Vec<Order>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("{ORDER_SELECT} WHERE id IN ({placeholders}) AND deleted_at IS NULL");
    let mut query = sqlx::query_as::<_, Order>(&sql);
    for id in ids {
        query = query.bind(*id);
    }
    let mut rows = query.fetch_all(pool).await?;
    attach_items(pool, &mut rows).await?;
    Ok(rows)
}

/// Order row only (no line items); usable inside a transaction
pub async fn find_row(
    conn: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    id: i64,
) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ? AND deleted_at IS NULL");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

/// Fill `order_items` (and each line's `item`) for a batch of orders
pub async fn attach_items(pool: &SqlitePool, orders: &mut [Order]) -> RepoResult<()> {
    if orders.is_empty() {
        return Ok(());
    }

    let placeholders = vec!["?"; orders.len()].join(", ");
    let sql = format!(
        "{ORDER_ITEM_SELECT} WHERE order_id IN ({placeholders}) AND deleted_at IS NULL ORDER BY id"
    );
    let mut query = sqlx::query_as::<_, OrderItem>(&sql);
    for order in orders.iter() {
        query = query.bind(order.id);
    }
    let mut lines = query.fetch_all(pool).await?;

    let mut item_ids: Vec<i64> = lines.iter().map(|l| l.item_id).collect();
    item_ids.sort_unstable();
    item_ids.dedup();
    let items: HashMap<i64, _> = item::find_by_ids_any(pool, &item_ids)
        .await?
        .into_iter()
        .map(|i| (i.id, i))
        .collect();

    for line in lines.iter_mut() {
        line.item = items.get(&line.item_id).cloned();
    }

    let mut by_order: HashMap<i64, Vec<OrderItem>> = HashMap::new();
    for line in lines {
        by_order.entry(line.order_id).or_default().push(line);
    }
    for order in orders.iter_mut() {
        order.order_items = by_order.remove(&order.id).unwrap_or_default();
    }
    Ok(())
}

/// Insert the order row, status `pending`; returns the new id
pub async fn insert(
    conn: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    data: NewOrder,
) -> RepoResult<i64> {
    let now = shared::util::now_millis();
    let id = sqlx::query(
        "INSERT INTO orders (customer_id, order_date, total_amount, tax, order_status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
    )
    .bind(data.customer_id)
    .bind(data.order_date)
    .bind(data.total_amount)
    .bind(data.tax)
    .bind(OrderStatus::Pending)
    .bind(now)
    .execute(conn)
    .await?
    .last_insert_rowid();
    Ok(id)
}

/// Insert one line item; returns the new id
pub async fn insert_item(
    conn: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    data: NewOrderItem,
) -> RepoResult<i64> {
    let now = shared::util::now_millis();
    let id = sqlx::query(
        "INSERT INTO order_item (order_id, item_id, quantity, total_price, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
    )
    .bind(data.order_id)
    .bind(data.item_id)
    .bind(data.quantity)
    .bind(data.total_price)
    .bind(now)
    .execute(conn)
    .await?
    .last_insert_rowid();
    Ok(id)
}

/// Set the order status; false when the order is absent
pub async fn update_status(pool: &SqlitePool, id: i64, status: OrderStatus) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE orders SET order_status = ?1, updated_at = ?2 WHERE id = ?3 AND deleted_at IS NULL",
    )
    .bind(status)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::item::NewItem;
    use crate::db::repository::test_support::test_pool;
    use shared::models::ItemType;

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

    async fn seed_order(pool: &SqlitePool, item_ids: &[i64]) -> i64 {
        let order_id = insert(
            pool,
            NewOrder {
                customer_id: 1,
                order_date: shared::util::now_millis(),
                total_amount: 20.0,
                tax: 1.0,
            },
        )
        .await
        .unwrap();
        for item_id in item_ids {
            insert_item(
                pool,
                NewOrderItem {
                    order_id,
                    item_id: *item_id,
                    quantity: 1,
                    total_price: 9.5,
                },
            )
            .await
            .unwrap();
        }
        order_id
    }

    #[tokio::test]
    async fn test_find_by_id_loads_items() {
        let pool = test_pool().await;
        let a = seed_item(&pool, "Margherita").await;
        let b = seed_item(&pool, "Pepperoni").await;
        let order_id = seed_order(&pool, &[a, b]).await;

        let order = find_by_id(&pool, order_id).await.unwrap().unwrap();
        assert_eq!(order.order_status, OrderStatus::Pending);
        assert_eq!(order.order_items.len(), 2);
        assert_eq!(
            order.order_items[0].item.as_ref().map(|i| i.name.as_str()),
            Some("Margherita")
        );
    }

    #[tokio::test]
    async fn test_deleted_item_still_shown_on_order() {
        let pool = test_pool().await;
        let a = seed_item(&pool, "Seasonal").await;
        let order_id = seed_order(&pool, &[a]).await;
        item::delete(&pool, a).await.unwrap();

        let order = find_by_id(&pool, order_id).await.unwrap().unwrap();
        let line_item = order.order_items[0].item.as_ref().unwrap();
        assert_eq!(line_item.name, "Seasonal");
        assert!(line_item.deleted_at.is_some());
    }

    #[tokio::test]
    async fn test_find_page_newest_first() {
        let pool = test_pool().await;
        let a = seed_item(&pool, "Margherita").await;
        let first = seed_order(&pool, &[a]).await;
        let second = seed_order(&pool, &[a, a]).await;

        let (orders, total) = find_page(&pool, &PageRequest::default()).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(orders[0].id, second);
        assert_eq!(orders[1].id, first);
        assert_eq!(orders[0].order_items.len(), 2);
        assert_eq!(orders[1].order_items.len(), 1);
    }

    #[tokio::test]
    async fn test_update_status() {
        let pool = test_pool().await;
        let order_id = seed_order(&pool, &[]).await;

        assert!(update_status(&pool, order_id, OrderStatus::Preparing).await.unwrap());
        let order = find_by_id(&pool, order_id).await.unwrap().unwrap();
        assert_eq!(order.order_status, OrderStatus::Preparing);

        assert!(!update_status(&pool, 999, OrderStatus::Ready).await.unwrap());
    }
}
