//! Invoice Repository
//!
//! Invoice numbers come from a per-year counter row bumped with an upsert.
//! Callers run [`next_sequence`] and [`insert`] in one transaction, so the
//! number is reserved under the same write lock as the invoice row.

use std::collections::HashMap;

use super::{RepoResult, order};
use crate::utils::PageRequest;
use shared::models::{Invoice, PaymentStatus};
use sqlx::SqlitePool;

const INVOICE_SELECT: &str = "SELECT id, order_id, invoice_number, invoice_date, subtotal_amount, tax_amount, total_amount, payment_status, payment_date, notes, created_at, updated_at, deleted_at FROM invoice";

/// Row values for a new invoice
#[derive(Debug, Clone)]
pub struct NewInvoice<'a> {
    pub order_id: i64,
    pub invoice_number: &'a str,
    pub invoice_date: i64,
    pub subtotal_amount: f64,
    pub tax_amount: f64,
    pub total_amount: f64,
    pub notes: &'a str,
}

/// Payment fields to write; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct PaymentChanges<'a> {
    pub payment_status: Option<PaymentStatus>,
    pub payment_date: Option<i64>,
    pub notes: Option<&'a str>,
}

/// One page of invoices, newest first, each with its order, plus the total count
pub async fn find_page(
    pool: &SqlitePool,
    page: &PageRequest,
    status: Option<PaymentStatus>,
) -> RepoResult<(Vec<Invoice>, u64)> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM invoice WHERE deleted_at IS NULL AND (?1 IS NULL OR payment_status = ?1)",
    )
    .bind(status)
    .fetch_one(pool)
    .await?;

    let sql = format!(
        "{INVOICE_SELECT} WHERE deleted_at IS NULL AND (?1 IS NULL OR payment_status = ?1) ORDER BY created_at DESC, id DESC LIMIT ?2 OFFSET ?3"
    );
    let mut rows = sqlx::query_as::<_, Invoice>(&sql)
        .bind(status)
        .bind(i64::from(page.limit))
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

    attach_orders(pool, &mut rows).await?;
    Ok((rows, total.max(0) as u64))
}

/// Invoice with its order
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Invoice>> {
    let sql = format!("{INVOICE_SELECT} WHERE id = ? AND deleted_at IS NULL");
    let row = sqlx::query_as::<_, Invoice>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    with_order(pool, row).await
}

/// Invoice of an order, with the order
pub async fn find_by_order_id(pool: &SqlitePool, order_id: i64) -> RepoResult<Option<Invoice>> {
    let row = find_row_by_order_id(pool, order_id).await?;
    with_order(pool, row).await
}

/// Invoice row of an order (no order attached)
pub async fn find_row_by_order_id(
    conn: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    order_id: i64,
) -> RepoResult<Option<Invoice>> {
    let sql = format!("{INVOICE_SELECT} WHERE order_id = ? AND deleted_at IS NULL");
    let row = sqlx::query_as::<_, Invoice>(&sql)
        .bind(order_id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

async fn with_order(pool: &SqlitePool, row: Option<Invoice>) -> RepoResult<Option<Invoice>> {
    let Some(invoice) = row else {
        return Ok(None);
    };
    let mut invoices = [invoice];
    attach_orders(pool, &mut invoices).await?;
    let [invoice] = invoices;
    Ok(Some(invoice))
}

/// Fill `order` for a batch of invoices
pub async fn attach_orders(pool: &SqlitePool, invoices: &mut [Invoice]) -> RepoResult<()> {
    let mut order_ids: Vec<i64> = invoices.iter().map(|i| i.order_id).collect();
    order_ids.sort_unstable();
    order_ids.dedup();

    let mut orders: HashMap<i64, _> = order::find_by_ids(pool, &order_ids)
        .await?
        .into_iter()
        .map(|o| (o.id, o))
        .collect();

    for invoice in invoices.iter_mut() {
        invoice.order = orders.remove(&invoice.order_id);
    }
    Ok(())
}

/// Reserve the next invoice sequence value for `year` (starts at 1)
pub async fn next_sequence(
    conn: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    year: i32,
) -> RepoResult<i64> {
    let value: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO invoice_sequence (year, last_value)
        VALUES (?1, 1)
        ON CONFLICT (year) DO UPDATE SET
            last_value = invoice_sequence.last_value + 1
        RETURNING last_value
        "#,
    )
    .bind(year)
    .fetch_one(conn)
    .await?;
    Ok(value)
}

/// Insert the invoice row, status `pending`; returns the new id
///
/// A second invoice for the same order fails with `RepoError::Duplicate`.
pub async fn insert(
    conn: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    data: &NewInvoice<'_>,
) -> RepoResult<i64> {
    let now = shared::util::now_millis();
    let id = sqlx::query(
        "INSERT INTO invoice (order_id, invoice_number, invoice_date, subtotal_amount, tax_amount, total_amount, payment_status, notes, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
    )
    .bind(data.order_id)
    .bind(data.invoice_number)
    .bind(data.invoice_date)
    .bind(data.subtotal_amount)
    .bind(data.tax_amount)
    .bind(data.total_amount)
    .bind(PaymentStatus::Pending)
    .bind(data.notes)
    .bind(now)
    .execute(conn)
    .await?
    .last_insert_rowid();
    Ok(id)
}

/// Write payment fields; false when the invoice is absent
pub async fn update_payment(
    pool: &SqlitePool,
    id: i64,
    changes: &PaymentChanges<'_>,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE invoice SET payment_status = COALESCE(?1, payment_status), payment_date = COALESCE(?2, payment_date), notes = COALESCE(?3, notes), updated_at = ?4 WHERE id = ?5 AND deleted_at IS NULL",
    )
    .bind(changes.payment_status)
    .bind(changes.payment_date)
    .bind(changes.notes)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
