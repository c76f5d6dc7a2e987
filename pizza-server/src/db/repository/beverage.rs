//! Beverage Repository

use super::{RepoError, RepoResult};
use crate::utils::PageRequest;
use shared::models::{Beverage, BeverageCreate, BeverageUpdate};
use sqlx::SqlitePool;

const BEVERAGE_SELECT: &str = "SELECT id, item_id, name, size, price, is_active, created_at, updated_at, deleted_at FROM beverage";

/// One page of active beverages, newest first, plus the total count
pub async fn find_page(pool: &SqlitePool, page: &PageRequest) -> RepoResult<(Vec<Beverage>, u64)> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM beverage WHERE is_active = 1 AND deleted_at IS NULL",
    )
    .fetch_one(pool)
    .await?;

    let sql = format!(
        "{BEVERAGE_SELECT} WHERE is_active = 1 AND deleted_at IS NULL ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
    );
    let rows = sqlx::query_as::<_, Beverage>(&sql)
        .bind(i64::from(page.limit))
        .bind(page.offset())
        .fetch_all(pool)
        .await?;
    Ok((rows, total.max(0) as u64))
}

/// Active beverage by id
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Beverage>> {
    let sql = format!("{BEVERAGE_SELECT} WHERE id = ? AND is_active = 1 AND deleted_at IS NULL");
    let row = sqlx::query_as::<_, Beverage>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

async fn find_row(pool: &SqlitePool, id: i64) -> RepoResult<Option<Beverage>> {
    let sql = format!("{BEVERAGE_SELECT} WHERE id = ? AND deleted_at IS NULL");
    let row = sqlx::query_as::<_, Beverage>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: &BeverageCreate) -> RepoResult<Beverage> {
    let now = shared::util::now_millis();
    let id = sqlx::query(
        "INSERT INTO beverage (item_id, name, size, price, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
    )
    .bind(data.item_id)
    .bind(data.name.trim())
    .bind(data.size.trim())
    .bind(data.price)
    .bind(data.is_active.unwrap_or(true))
    .bind(now)
    .execute(pool)
    .await?
    .last_insert_rowid();

    find_row(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create beverage".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: &BeverageUpdate) -> RepoResult<Beverage> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE beverage SET item_id = COALESCE(?1, item_id), name = COALESCE(?2, name), size = COALESCE(?3, size), price = COALESCE(?4, price), is_active = COALESCE(?5, is_active), updated_at = ?6 WHERE id = ?7 AND deleted_at IS NULL",
    )
    .bind(data.item_id)
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.size.as_deref().map(str::trim))
    .bind(data.price)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Beverage {id} not found")));
    }
    find_row(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Beverage {id} not found")))
}

/// Soft delete; also clears `is_active`
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE beverage SET is_active = 0, deleted_at = ?1, updated_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
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

    #[tokio::test]
    async fn test_beverage_lifecycle() {
        let pool = test_pool().await;
        let item_id = item::create(
            &pool,
            NewItem {
                name: "Cola",
                item_type: ItemType::Beverage,
                unit_price: 2.0,
                is_active: true,
            },
        )
        .await
        .unwrap()
        .id;

        let beverage = create(
            &pool,
            &BeverageCreate {
                item_id,
                name: "Cola".into(),
                size: "330ml".into(),
                price: 2.0,
                is_active: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(beverage.size, "330ml");

        let updated = update(
            &pool,
            beverage.id,
            &BeverageUpdate {
                size: Some("500ml".into()),
                price: Some(2.5),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.size, "500ml");
        assert_eq!(updated.price, 2.5);
        assert_eq!(updated.name, "Cola");

        let hidden = update(
            &pool,
            beverage.id,
            &BeverageUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(!hidden.is_active);
        assert!(find_by_id(&pool, beverage.id).await.unwrap().is_none());

        assert!(delete(&pool, beverage.id).await.unwrap());
        let (rows, total) = find_page(&pool, &PageRequest::default()).await.unwrap();
        assert!(rows.is_empty());
        assert_eq!(total, 0);
    }
}
