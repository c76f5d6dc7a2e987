//! Item Repository

use super::{RepoError, RepoResult};
use crate::utils::PageRequest;
use shared::models::{Item, ItemType};
use sqlx::SqlitePool;

const ITEM_SELECT: &str = "SELECT id, name, item_type, unit_price, is_active, created_at, updated_at, deleted_at FROM item";

/// Validated fields for a new item
#[derive(Debug, Clone)]
pub struct NewItem<'a> {
    pub name: &'a str,
    pub item_type: ItemType,
    pub unit_price: f64,
    pub is_active: bool,
}

/// Validated partial update of an item
#[derive(Debug, Clone, Default)]
pub struct ItemChanges<'a> {
    pub name: Option<&'a str>,
    pub item_type: Option<ItemType>,
    pub unit_price: Option<f64>,
    pub is_active: Option<bool>,
}

/// One page of active items, newest first, plus the total count
pub async fn find_page(pool: &SqlitePool, page: &PageRequest) -> RepoResult<(Vec<Item>, u64)> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM item WHERE is_active = 1 AND deleted_at IS NULL",
    )
    .fetch_one(pool)
    .await?;

    let sql = format!(
        "{ITEM_SELECT} WHERE is_active = 1 AND deleted_at IS NULL ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
    );
    let rows = sqlx::query_as::<_, Item>(&sql)
        .bind(i64::from(page.limit))
        .bind(page.offset())
        .fetch_all(pool)
        .await?;
    Ok((rows, total.max(0) as u64))
}

/// One page of active items of one type, plus the total count for that type
pub async fn find_by_type(
    pool: &SqlitePool,
    item_type: ItemType,
    page: &PageRequest,
) -> RepoResult<(Vec<Item>, u64)> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM item WHERE item_type = ? AND is_active = 1 AND deleted_at IS NULL",
    )
    .bind(item_type)
    .fetch_one(pool)
    .await?;

    let sql = format!(
        "{ITEM_SELECT} WHERE item_type = ?1 AND is_active = 1 AND deleted_at IS NULL ORDER BY created_at DESC, id DESC LIMIT ?2 OFFSET ?3"
    );
    let rows = sqlx::query_as::<_, Item>(&sql)
        .bind(item_type)
        .bind(i64::from(page.limit))
        .bind(page.offset())
        .fetch_all(pool)
        .await?;
    Ok((rows, total.max(0) as u64))
}

/// Active item by id
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Item>> {
    let sql = format!("{ITEM_SELECT} WHERE id = ? AND is_active = 1 AND deleted_at IS NULL");
    let row = sqlx::query_as::<_, Item>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Non-deleted item by id regardless of `is_active`
async fn find_row(pool: &SqlitePool, id: i64) -> RepoResult<Option<Item>> {
    let sql = format!("{ITEM_SELECT} WHERE id = ? AND deleted_at IS NULL");
    let row = sqlx::query_as::<_, Item>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Items by id including soft-deleted rows (historical order lines)
pub async fn find_by_ids_any(pool: &SqlitePool, ids: &[i64]) -> RepoResult<Vec<Item>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("{ITEM_SELECT} WHERE id IN ({placeholders})");
    let mut query = sqlx::query_as::<_, Item>(&sql);
    for id in ids {
        query = query.bind(*id);
    }
    Ok(query.fetch_all(pool).await?)
}

/// Whether a non-deleted item exists; usable inside a transaction
pub async fn exists(
    conn: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    id: i64,
) -> RepoResult<bool> {
    let found: Option<i64> =
        sqlx::query_scalar("SELECT id FROM item WHERE id = ? AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(conn)
            .await?;
    Ok(found.is_some())
}

pub async fn create(pool: &SqlitePool, data: NewItem<'_>) -> RepoResult<Item> {
    let now = shared::util::now_millis();
    let id = sqlx::query(
        "INSERT INTO item (name, item_type, unit_price, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
    )
    .bind(data.name.trim())
    .bind(data.item_type)
    .bind(data.unit_price)
    .bind(data.is_active)
    .bind(now)
    .execute(pool)
    .await?
    .last_insert_rowid();

    find_row(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create item".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: ItemChanges<'_>) -> RepoResult<Item> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE item SET name = COALESCE(?1, name), item_type = COALESCE(?2, item_type), unit_price = COALESCE(?3, unit_price), is_active = COALESCE(?4, is_active), updated_at = ?5 WHERE id = ?6 AND deleted_at IS NULL",
    )
    .bind(data.name.map(str::trim))
    .bind(data.item_type)
    .bind(data.unit_price)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Item {id} not found")));
    }
    find_row(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Item {id} not found")))
}

/// Soft delete; also clears `is_active`
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE item SET is_active = 0, deleted_at = ?1, updated_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
