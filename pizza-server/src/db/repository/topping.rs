//! Topping Repository

use super::{RepoError, RepoResult};
use crate::utils::PageRequest;
use shared::models::{Topping, ToppingCreate, ToppingUpdate};
use sqlx::SqlitePool;

const TOPPING_SELECT: &str = "SELECT id, item_id, name, price, is_active, created_at, updated_at, deleted_at FROM topping";

/// One page of active toppings, newest first, plus the total count
pub async fn find_page(pool: &SqlitePool, page: &PageRequest) -> RepoResult<(Vec<Topping>, u64)> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM topping WHERE is_active = 1 AND deleted_at IS NULL",
    )
    .fetch_one(pool)
    .await?;

    let sql = format!(
        "{TOPPING_SELECT} WHERE is_active = 1 AND deleted_at IS NULL ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
    );
    let rows = sqlx::query_as::<_, Topping>(&sql)
        .bind(i64::from(page.limit))
        .bind(page.offset())
        .fetch_all(pool)
        .await?;
    Ok((rows, total.max(0) as u64))
}

/// Active topping by id
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Topping>> {
    let sql = format!("{TOPPING_SELECT} WHERE id = ? AND is_active = 1 AND deleted_at IS NULL");
    let row = sqlx::query_as::<_, Topping>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

async fn find_row(pool: &SqlitePool, id: i64) -> RepoResult<Option<Topping>> {
    let sql = format!("{TOPPING_SELECT} WHERE id = ? AND deleted_at IS NULL");
    let row = sqlx::query_as::<_, Topping>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: &ToppingCreate) -> RepoResult<Topping> {
    let now = shared::util::now_millis();
    let id = sqlx::query(
        "INSERT INTO topping (item_id, name, price, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
    )
    .bind(data.item_id)
    .bind(data.name.trim())
    .bind(data.price)
    .bind(data.is_active.unwrap_or(true))
    .bind(now)
    .execute(pool)
    .await?
    .last_insert_rowid();

    find_row(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create topping".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: &ToppingUpdate) -> RepoResult<Topping> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE topping SET item_id = COALESCE(?1, item_id), name = COALESCE(?2, name), price = COALESCE(?3, price), is_active = COALESCE(?4, is_active), updated_at = ?5 WHERE id = ?6 AND deleted_at IS NULL",
    )
    .bind(data.item_id)
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.price)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Topping {id} not found")));
    }
    find_row(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Topping {id} not found")))
}

/// Soft delete; also clears `is_active`
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE topping SET is_active = 0, deleted_at = ?1, updated_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
