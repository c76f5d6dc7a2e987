//! Pizza Repository

use super::{RepoError, RepoResult};
use crate::utils::PageRequest;
use shared::models::{Pizza, PizzaCreate, PizzaUpdate};
use sqlx::SqlitePool;

const PIZZA_SELECT: &str = "SELECT id, item_id, name, size, base_type, price, is_active, created_at, updated_at, deleted_at FROM pizza";

/// One page of active pizzas, newest first, plus the total count
pub async fn find_page(pool: &SqlitePool, page: &PageRequest) -> RepoResult<(Vec<Pizza>, u64)> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM pizza WHERE is_active = 1 AND deleted_at IS NULL",
    )
    .fetch_one(pool)
    .await?;

    let sql = format!(
        "{PIZZA_SELECT} WHERE is_active = 1 AND deleted_at IS NULL ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
    );
    let rows = sqlx::query_as::<_, Pizza>(&sql)
        .bind(i64::from(page.limit))
        .bind(page.offset())
        .fetch_all(pool)
        .await?;
    Ok((rows, total.max(0) as u64))
}

/// Active pizza by id
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Pizza>> {
    let sql = format!("{PIZZA_SELECT} WHERE id = ? AND is_active = 1 AND deleted_at IS NULL");
    let row = sqlx::query_as::<_, Pizza>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

async fn find_row(pool: &SqlitePool, id: i64) -> RepoResult<Option<Pizza>> {
    let sql = format!("{PIZZA_SELECT} WHERE id = ? AND deleted_at IS NULL");
    let row = sqlx::query_as::<_, Pizza>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: &PizzaCreate) -> RepoResult<Pizza> {
    let now = shared::util::now_millis();
    let id = sqlx::query(
        "INSERT INTO pizza (item_id, name, size, base_type, price, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
    )
    .bind(data.item_id)
    .bind(data.name.trim())
    .bind(data.size.trim())
    .bind(data.base_type.trim())
    .bind(data.price)
    .bind(data.is_active.unwrap_or(true))
    .bind(now)
    .execute(pool)
    .await?
    .last_insert_rowid();

    find_row(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create pizza".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: &PizzaUpdate) -> RepoResult<Pizza> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE pizza SET item_id = COALESCE(?1, item_id), name = COALESCE(?2, name), size = COALESCE(?3, size), base_type = COALESCE(?4, base_type), price = COALESCE(?5, price), is_active = COALESCE(?6, is_active), updated_at = ?7 WHERE id = ?8 AND deleted_at IS NULL",
    )
    .bind(data.item_id)
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.size.as_deref().map(str::trim))
    .bind(data.base_type.as_deref().map(str::trim))
    .bind(data.price)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Pizza {id} not found")));
    }
    find_row(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Pizza {id} not found")))
}

/// Soft delete; also clears `is_active`
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE pizza SET is_active = 0, deleted_at = ?1, updated_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::item::{self, NewItem};
    use crate::db::repository::test_support::test_pool;
    use shared::models::ItemType;

    async fn seed_item(pool: &SqlitePool) -> i64 {
        item::create(
            pool,
            NewItem {
                name: "Margherita",
                item_type: ItemType::Pizza,
                unit_price: 9.5,
                is_active: true,
            },
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn test_pizza_lifecycle() {
        let pool = test_pool().await;
        let item_id = seed_item(&pool).await;

        let pizza = create(
            &pool,
            &PizzaCreate {
                item_id,
                name: "Margherita Large".into(),
                size: "large".into(),
                base_type: "thin".into(),
                price: 12.0,
                is_active: None,
            },
        )
        .await
        .unwrap();
        assert!(pizza.is_active);
        assert_eq!(pizza.base_type, "thin");

        let updated = update(
            &pool,
            pizza.id,
            &PizzaUpdate {
                price: Some(13.5),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.price, 13.5);
        assert_eq!(updated.size, "large");

        let (rows, total) = find_page(&pool, &PageRequest::default()).await.unwrap();
        assert_eq!((rows.len(), total), (1, 1));

        let hidden = update(
            &pool,
            pizza.id,
            &PizzaUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(!hidden.is_active);
        assert!(find_by_id(&pool, pizza.id).await.unwrap().is_none());

        assert!(delete(&pool, pizza.id).await.unwrap());
        assert!(find_by_id(&pool, pizza.id).await.unwrap().is_none());
        assert!(matches!(
            update(&pool, pizza.id, &PizzaUpdate::default()).await,
            Err(RepoError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_item_reference_rejected_by_schema() {
        let pool = test_pool().await;
        let result = create(
            &pool,
            &PizzaCreate {
                item_id: 42,
                name: "Ghost".into(),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(RepoError::Validation(_))));
    }
}
