//! Invoice issuance and payment updates
//!
//! 发票号按年度递增：计数行的 upsert 和发票插入在同一个事务里完成，
//! 同一订单的并发请求由 `invoice.order_id` 唯一约束兜底，转成 409。

use shared::models::{Invoice, InvoiceCreate, PaymentStatus, PaymentStatusUpdate};
use sqlx::SqlitePool;

use crate::db::repository::{RepoError, invoice, order};
use crate::orders::money;
use crate::utils::validation::{MAX_NOTE_LEN, validate_max_len, validate_optional_text};
use crate::utils::{AppError, AppResult, ErrorCode};

/// `INV-<year>-<6-digit sequence>`
pub fn format_invoice_number(year: i32, seq: i64) -> String {
    format!("INV-{year}-{seq:06}")
}

/// Issue the invoice of an order
///
/// Checks in order: order id supplied, order exists, no invoice yet.
pub async fn issue_invoice(
    pool: &SqlitePool,
    req: &InvoiceCreate,
    tax_rate: f64,
) -> AppResult<Invoice> {
    if req.order_id <= 0 {
        return Err(AppError::new(ErrorCode::InvoiceOrderRequired));
    }
    validate_max_len(&req.notes, "notes", MAX_NOTE_LEN)?;

    let order = order::find_row(pool, req.order_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    if let Some(existing) = invoice::find_by_order_id(pool, order.id).await? {
        return Err(already_invoiced(&existing));
    }

    let amounts = money::invoice_amounts(order.total_amount, tax_rate);
    let now = shared::util::now_millis();
    let year = shared::util::year_of_millis(now);

    let mut tx = pool.begin().await.map_err(RepoError::from)?;

    let seq = match invoice::next_sequence(&mut *tx, year).await {
        Ok(seq) => seq,
        Err(e) => {
            rollback(tx).await;
            return Err(e.into());
        }
    };
    let invoice_number = format_invoice_number(year, seq);

    let inserted = invoice::insert(
        &mut *tx,
        &invoice::NewInvoice {
            order_id: order.id,
            invoice_number: &invoice_number,
            invoice_date: now,
            subtotal_amount: amounts.subtotal,
            tax_amount: amounts.tax,
            total_amount: amounts.total,
            notes: &req.notes,
        },
    )
    .await;

    match inserted {
        Ok(_) => {}
        Err(RepoError::Duplicate(msg)) => {
            rollback(tx).await;
            tracing::warn!(order_id = order.id, %msg, "Concurrent invoice for the same order");
            return match invoice::find_by_order_id(pool, order.id).await? {
                Some(existing) => Err(already_invoiced(&existing)),
                None => Err(AppError::new(ErrorCode::InvoiceAlreadyExists)),
            };
        }
        Err(e) => {
            rollback(tx).await;
            return Err(e.into());
        }
    }

    let row = invoice::find_row_by_order_id(&mut *tx, order.id).await;
    let mut created = match row {
        Ok(Some(row)) => row,
        Ok(None) => {
            rollback(tx).await;
            return Err(AppError::internal("Invoice row missing after insert"));
        }
        Err(e) => {
            rollback(tx).await;
            return Err(e.into());
        }
    };

    tx.commit().await.map_err(RepoError::from)?;

    tracing::info!(
        order_id = order.id,
        invoice_number = %created.invoice_number,
        total = created.total_amount,
        "Invoice issued"
    );

    if let Err(e) = invoice::attach_orders(pool, std::slice::from_mut(&mut created)).await {
        tracing::warn!(invoice_id = created.id, error = %e, "Failed to load order for invoice");
    }
    Ok(created)
}

fn already_invoiced(existing: &Invoice) -> AppError {
    AppError::new(ErrorCode::InvoiceAlreadyExists).with_data(existing)
}

/// Change the payment status of an invoice
///
/// A supplied payment date is stored as is. Without one, the first switch
/// to `paid` stamps the current time. Empty notes leave the stored notes.
pub async fn update_payment_status(
    pool: &SqlitePool,
    id: i64,
    req: &PaymentStatusUpdate,
) -> AppResult<Invoice> {
    let status: PaymentStatus = req
        .payment_status
        .parse()
        .map_err(|_| AppError::new(ErrorCode::PaymentStatusInvalid))?;
    validate_optional_text(&req.notes, "notes", MAX_NOTE_LEN)?;

    let existing = invoice::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::InvoiceNotFound))?;

    let payment_date = req.payment_date.or_else(|| {
        (status == PaymentStatus::Paid && existing.payment_date.is_none())
            .then(shared::util::now_millis)
    });
    let notes = req.notes.as_deref().filter(|n| !n.is_empty());

    let changes = invoice::PaymentChanges {
        payment_status: Some(status),
        payment_date,
        notes,
    };
    if !invoice::update_payment(pool, id, &changes).await? {
        return Err(AppError::new(ErrorCode::InvoiceNotFound));
    }

    tracing::info!(invoice_id = id, status = %status, "Invoice payment status updated");

    invoice::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::InvoiceNotFound))
}

async fn rollback(tx: sqlx::Transaction<'_, sqlx::Sqlite>) {
    if let Err(e) = tx.rollback().await {
        tracing::error!(error = %e, "Failed to roll back invoice transaction");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::order::NewOrder;
    use crate::db::repository::test_support::test_pool;
    use std::collections::HashSet;

    async fn seed_order(pool: &SqlitePool, total_amount: f64) -> i64 {
        order::insert(
            pool,
            NewOrder {
                customer_id: 1,
                order_date: shared::util::now_millis(),
                total_amount,
                tax: 0.0,
            },
        )
        .await
        .unwrap()
    }

    fn request(order_id: i64) -> InvoiceCreate {
        InvoiceCreate {
            order_id,
            notes: String::new(),
        }
    }

    fn payment(status: &str, payment_date: Option<i64>, notes: Option<&str>) -> PaymentStatusUpdate {
        PaymentStatusUpdate {
            payment_status: status.to_string(),
            payment_date,
            notes: notes.map(str::to_string),
        }
    }

    #[test]
    fn test_format_invoice_number() {
        assert_eq!(format_invoice_number(2024, 1), "INV-2024-000001");
        assert_eq!(format_invoice_number(2025, 123456), "INV-2025-123456");
    }

    #[tokio::test]
    async fn test_issue_invoice_amounts() {
        let pool = test_pool().await;
        let order_id = seed_order(&pool, 20.0).await;

        let inv = issue_invoice(&pool, &request(order_id), 0.10).await.unwrap();
        assert_eq!(inv.subtotal_amount, 20.0);
        assert_eq!(inv.tax_amount, 2.0);
        assert_eq!(inv.total_amount, 22.0);
        assert_eq!(inv.payment_status, PaymentStatus::Pending);
        assert_eq!(inv.payment_date, None);
        assert_eq!(inv.order.as_ref().map(|o| o.id), Some(order_id));

        let year = shared::util::year_of_millis(inv.invoice_date);
        assert_eq!(inv.invoice_number, format_invoice_number(year, 1));
    }

    #[tokio::test]
    async fn test_issue_invoice_preconditions() {
        let pool = test_pool().await;

        let err = issue_invoice(&pool, &request(0), 0.10).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvoiceOrderRequired);

        let err = issue_invoice(&pool, &request(42), 0.10).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderNotFound);
        assert_eq!(err.http_status(), http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_second_invoice_conflicts_with_existing_data() {
        let pool = test_pool().await;
        let order_id = seed_order(&pool, 10.0).await;

        let first = issue_invoice(&pool, &request(order_id), 0.10).await.unwrap();
        let err = issue_invoice(&pool, &request(order_id), 0.10).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::InvoiceAlreadyExists);
        assert_eq!(err.http_status(), http::StatusCode::CONFLICT);
        assert_eq!(err.message, "Invoice already exists for this order");
        let data = err.data.unwrap();
        assert_eq!(data["id"], first.id);
        assert_eq!(data["invoice_number"], first.invoice_number.as_str());
    }

    #[tokio::test]
    async fn test_invoice_numbers_increase() {
        let pool = test_pool().await;
        let mut numbers = Vec::new();
        for _ in 0..3 {
            let order_id = seed_order(&pool, 5.0).await;
            let inv = issue_invoice(&pool, &request(order_id), 0.10).await.unwrap();
            numbers.push(inv.invoice_number);
        }
        let mut sorted = numbers.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted, numbers);
        assert!(numbers[2].ends_with("-000003"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_issuance_yields_unique_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("billing.db").display());
        let pool = DbService::new(&url, 5).await.unwrap().pool;

        let mut order_ids = Vec::new();
        for _ in 0..8 {
            order_ids.push(seed_order(&pool, 12.5).await);
        }

        let mut handles = Vec::new();
        for order_id in order_ids {
            let pool = pool.clone();
            handles.push(tokio::spawn(async move {
                issue_invoice(&pool, &request(order_id), 0.10).await
            }));
        }

        let mut numbers = HashSet::new();
        for handle in handles {
            let inv = handle.await.unwrap().unwrap();
            assert!(numbers.insert(inv.invoice_number));
        }
        assert_eq!(numbers.len(), 8);
        pool.close().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_issuance_for_one_order() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("billing.db").display());
        let pool = DbService::new(&url, 5).await.unwrap().pool;
        let order_id = seed_order(&pool, 12.5).await;

        let mut handles = Vec::new();
        for _ in 0..4 {
            let pool = pool.clone();
            handles.push(tokio::spawn(async move {
                issue_invoice(&pool, &request(order_id), 0.10).await
            }));
        }

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(e) => assert_eq!(e.code, ErrorCode::InvoiceAlreadyExists),
            }
        }
        assert_eq!(created, 1);
        pool.close().await;
    }

    #[tokio::test]
    async fn test_paid_stamps_date_once() {
        let pool = test_pool().await;
        let order_id = seed_order(&pool, 10.0).await;
        let inv = issue_invoice(&pool, &request(order_id), 0.10).await.unwrap();

        let before = shared::util::now_millis();
        let paid = update_payment_status(&pool, inv.id, &payment("paid", None, None))
            .await
            .unwrap();
        assert_eq!(paid.payment_status, PaymentStatus::Paid);
        let stamped = paid.payment_date.unwrap();
        assert!(stamped >= before);

        // second "paid" keeps the first stamp
        let again = update_payment_status(&pool, inv.id, &payment("paid", None, None))
            .await
            .unwrap();
        assert_eq!(again.payment_date, Some(stamped));
    }

    #[tokio::test]
    async fn test_explicit_payment_date_and_notes() {
        let pool = test_pool().await;
        let order_id = seed_order(&pool, 10.0).await;
        let inv = issue_invoice(
            &pool,
            &InvoiceCreate {
                order_id,
                notes: "deliver to back door".into(),
            },
            0.10,
        )
        .await
        .unwrap();

        let updated = update_payment_status(
            &pool,
            inv.id,
            &payment("overdue", Some(1_700_000_000_000), Some("")),
        )
        .await
        .unwrap();
        assert_eq!(updated.payment_status, PaymentStatus::Overdue);
        assert_eq!(updated.payment_date, Some(1_700_000_000_000));
        assert_eq!(updated.notes, "deliver to back door");

        let updated = update_payment_status(&pool, inv.id, &payment("pending", None, Some("called")))
            .await
            .unwrap();
        assert_eq!(updated.notes, "called");
        assert_eq!(updated.payment_date, Some(1_700_000_000_000));
    }

    #[tokio::test]
    async fn test_payment_status_errors() {
        let pool = test_pool().await;

        let err = update_payment_status(&pool, 1, &payment("refunded", None, None))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentStatusInvalid);
        assert_eq!(
            err.message,
            "Invalid payment status. Must be one of: pending, paid, overdue, cancelled"
        );

        let err = update_payment_status(&pool, 99, &payment("paid", None, None))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvoiceNotFound);
        assert_eq!(err.message, "Invoice not found");
    }
}
