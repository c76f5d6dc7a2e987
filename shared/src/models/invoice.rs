//! Invoice Model

use super::order::Order;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Invoice payment status
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Overdue => "overdue",
            PaymentStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            "overdue" => Ok(PaymentStatus::Overdue),
            "cancelled" => Ok(PaymentStatus::Cancelled),
            other => Err(format!("unknown payment status: {other}")),
        }
    }
}

/// Invoice entity (one per order)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Invoice {
    pub id: i64,
    pub order_id: i64,
    /// `INV-<year>-<6-digit sequence>`
    pub invoice_number: String,
    pub invoice_date: i64,
    pub subtotal_amount: f64,
    pub tax_amount: f64,
    pub total_amount: f64,
    pub payment_status: PaymentStatus,
    pub payment_date: Option<i64>,
    pub notes: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
}

/// Create invoice payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceCreate {
    #[serde(default)]
    pub order_id: i64,
    #[serde(default)]
    pub notes: String,
}

/// Update payment status payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentStatusUpdate {
    #[serde(default)]
    pub payment_status: String,
    /// Unix millis; recorded verbatim when supplied
    pub payment_date: Option<i64>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_status_parse() {
        assert_eq!("paid".parse::<PaymentStatus>(), Ok(PaymentStatus::Paid));
        assert_eq!("overdue".parse::<PaymentStatus>(), Ok(PaymentStatus::Overdue));
        assert!("refunded".parse::<PaymentStatus>().is_err());
    }

    #[test]
    fn test_payment_status_serialize() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
    }
}
