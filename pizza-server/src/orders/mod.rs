//! Order workflows
//!
//! - [`create`]: validation and the atomic order + line item write
//! - [`money`]: decimal arithmetic for totals and invoice amounts

pub mod create;
pub mod money;

pub use create::{CreatedOrder, create_order, validate_order};
