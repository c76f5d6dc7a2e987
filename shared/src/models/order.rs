//! Order Model
//!
//! An order and its line items are always written together in one
//! transaction; `order_items` and `item` are filled by the repository
//! after the row is read.

use super::item::Item;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order status
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "preparing" => Ok(OrderStatus::Preparing),
            "ready" => Ok(OrderStatus::Ready),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    pub order_date: i64,
    pub total_amount: f64,
    pub tax: f64,
    pub order_status: OrderStatus,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub order_items: Vec<OrderItem>,
}

/// Order line item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub item_id: i64,
    pub quantity: i64,
    pub total_price: f64,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub item: Option<Item>,
}

/// Create order payload
///
/// Zero ids and quantities stand for "missing" and are rejected by
/// validation with the offending line index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderCreate {
    #[serde(default)]
    pub customer_id: i64,
    #[serde(default)]
    pub tax: f64,
    #[serde(default)]
    pub items: Vec<OrderLineInput>,
}

/// One requested line of an order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderLineInput {
    #[serde(default)]
    pub item_id: i64,
    #[serde(default)]
    pub quantity: i64,
    /// Unit price
    #[serde(default)]
    pub price: f64,
}

/// Update order status payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    #[serde(default)]
    pub status: String,
}
