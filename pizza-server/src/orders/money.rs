//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to
//! `f64` (rounded to 2 decimal places) for storage and serialization.

use rust_decimal::prelude::*;
use shared::models::OrderLineInput;

/// Rounding strategy for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price
pub const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line
pub const MAX_QUANTITY: i64 = 9999;
/// Maximum allowed order tax
pub const MAX_TAX: f64 = 1_000_000.0;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Convert f64 to Decimal, `None` for values Decimal cannot represent
#[inline]
pub fn try_to_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value)
}

/// price × quantity for one line, `None` on overflow
pub fn line_total(line: &OrderLineInput) -> Option<Decimal> {
    try_to_decimal(line.price)?.checked_mul(Decimal::from(line.quantity))
}

/// Σ(price × quantity) + tax, `None` on overflow
pub fn order_total(lines: &[OrderLineInput], tax: f64) -> Option<Decimal> {
    let mut total = try_to_decimal(tax)?;
    for line in lines {
        total = total.checked_add(line_total(line)?)?;
    }
    Some(total)
}

/// Invoice amounts derived from an order total
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvoiceAmounts {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

/// subtotal = order total, tax = subtotal × rate, total = subtotal + tax
pub fn invoice_amounts(order_total: f64, tax_rate: f64) -> InvoiceAmounts {
    let subtotal = to_decimal(order_total);
    let tax = (subtotal * to_decimal(tax_rate))
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    InvoiceAmounts {
        subtotal: to_f64(subtotal),
        tax: to_f64(tax),
        total: to_f64(subtotal + tax),
    }
}
