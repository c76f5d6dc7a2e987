//! Billing workflows
//!
//! Invoice issuance (one invoice per order, atomic yearly numbering) and
//! payment status changes.

pub mod invoice;

pub use invoice::{format_invoice_number, issue_invoice, update_payment_status};
