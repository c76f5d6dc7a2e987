//! Customer Repository

use super::{RepoError, RepoResult};
use crate::utils::PageRequest;
use shared::models::{Customer, CustomerCreate, CustomerUpdate};
use sqlx::SqlitePool;

const CUSTOMER_SELECT: &str =
    "SELECT id, name, tel_no, created_at, updated_at, deleted_at FROM customer";

/// One page of customers, newest first, plus the total count
pub async fn find_page(pool: &SqlitePool, page: &PageRequest) -> RepoResult<(Vec<Customer>, u64)> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customer WHERE deleted_at IS NULL")
        .fetch_one(pool)
        .await?;

    let sql = format!(
        "{CUSTOMER_SELECT} WHERE deleted_at IS NULL ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
    );
    let rows = sqlx::query_as::<_, Customer>(&sql)
        .bind(i64::from(page.limit))
        .bind(page.offset())
        .fetch_all(pool)
        .await?;
    Ok((rows, total.max(0) as u64))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Customer>> {
    let sql = format!("{CUSTOMER_SELECT} WHERE id = ? AND deleted_at IS NULL");
    let row = sqlx::query_as::<_, Customer>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Exact phone match; the most recent customer wins if several share it
pub async fn find_by_tel_no(pool: &SqlitePool, tel_no: &str) -> RepoResult<Option<Customer>> {
    let sql = format!(
        "{CUSTOMER_SELECT} WHERE tel_no = ? AND deleted_at IS NULL ORDER BY created_at DESC, id DESC LIMIT 1"
    );
    let row = sqlx::query_as::<_, Customer>(&sql)
        .bind(tel_no)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: &CustomerCreate) -> RepoResult<Customer> {
    let now = shared::util::now_millis();
    let id = sqlx::query(
        "INSERT INTO customer (name, tel_no, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
    )
    .bind(data.name.trim())
    .bind(data.tel_no.trim())
    .bind(now)
    .execute(pool)
    .await?
    .last_insert_rowid();

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create customer".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: &CustomerUpdate) -> RepoResult<Customer> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE customer SET name = COALESCE(?1, name), tel_no = COALESCE(?2, tel_no), updated_at = ?3 WHERE id = ?4 AND deleted_at IS NULL",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.tel_no.as_deref().map(str::trim))
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Customer {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Customer {id} not found")))
}

/// Soft delete; false when the customer is absent or already deleted
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE customer SET deleted_at = ?1, updated_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
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
    use crate::db::repository::test_support::test_pool;

    fn alice() -> CustomerCreate {
        CustomerCreate {
            name: "Alice".into(),
            tel_no: "555-1111".into(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let pool = test_pool().await;
        let created = create(&pool, &alice()).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.name, "Alice");
        assert!(created.deleted_at.is_none());

        let found = find_by_id(&pool, created.id).await.unwrap().unwrap();
        assert_eq!(found.tel_no, "555-1111");

        let by_tel = find_by_tel_no(&pool, "555-1111").await.unwrap().unwrap();
        assert_eq!(by_tel.id, created.id);
        assert!(find_by_tel_no(&pool, "555-0000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_partial_update() {
        let pool = test_pool().await;
        let created = create(&pool, &alice()).await.unwrap();

        let updated = update(
            &pool,
            created.id,
            &CustomerUpdate {
                name: None,
                tel_no: Some("555-9999".into()),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Alice");
        assert_eq!(updated.tel_no, "555-9999");

        let missing = update(&pool, 999, &CustomerUpdate::default()).await;
        assert!(matches!(missing, Err(RepoError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_soft_delete_hides_customer() {
        let pool = test_pool().await;
        let created = create(&pool, &alice()).await.unwrap();

        assert!(delete(&pool, created.id).await.unwrap());
        assert!(!delete(&pool, created.id).await.unwrap());
        assert!(find_by_id(&pool, created.id).await.unwrap().is_none());

        let (rows, total) = find_page(&pool, &PageRequest::default()).await.unwrap();
        assert!(rows.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn test_find_page_limits_rows() {
        let pool = test_pool().await;
        for i in 0..15 {
            create(
                &pool,
                &CustomerCreate {
                    name: format!("Customer {i}"),
                    tel_no: format!("555-{i:04}"),
                },
            )
            .await
            .unwrap();
        }

        let (rows, total) = find_page(&pool, &PageRequest { page: 2, limit: 10 })
            .await
            .unwrap();
        assert_eq!(total, 15);
        assert_eq!(rows.len(), 5);
    }
}
