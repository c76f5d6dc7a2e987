//! Unified error codes for the pizza ordering service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Customer errors
//! - 4xxx: Order errors
//! - 5xxx: Invoice errors
//! - 6xxx: Menu errors (items, pizzas, toppings, beverages)
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so they serialize as plain
/// numbers in logs and in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Request body could not be parsed
    InvalidBody = 6,
    /// Path identifier is not a valid id
    InvalidId = 7,

    // ==================== 1xxx: Customer ====================
    /// Customer not found
    CustomerNotFound = 1001,
    /// Customer name or phone missing
    CustomerFieldsRequired = 1002,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no line items
    OrderEmpty = 4002,
    /// Order request without a customer
    OrderCustomerRequired = 4003,
    /// A line item failed validation
    OrderItemInvalid = 4004,
    /// A line item references an unknown menu item
    OrderItemUnknown = 4005,
    /// Unknown order status
    OrderStatusInvalid = 4006,

    // ==================== 5xxx: Invoice ====================
    /// Invoice not found
    InvoiceNotFound = 5001,
    /// The order already has an invoice
    InvoiceAlreadyExists = 5002,
    /// Unknown payment status
    PaymentStatusInvalid = 5003,
    /// Invoice request without an order
    InvoiceOrderRequired = 5004,

    // ==================== 6xxx: Menu ====================
    /// Item not found
    ItemNotFound = 6001,
    /// Unknown item type
    ItemTypeInvalid = 6002,
    /// Negative price
    PriceInvalid = 6003,
    /// Referenced item does not exist
    ItemReferenceInvalid = 6004,
    /// Pizza not found
    PizzaNotFound = 6101,
    /// Topping not found
    ToppingNotFound = 6201,
    /// Beverage not found
    BeverageNotFound = 6301,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Whether the error is a server-side failure (logged, detail hidden)
    pub fn is_system(&self) -> bool {
        self.code() >= 9000
    }

    /// Get the default message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Success",
            ErrorCode::Unknown => "Unknown error",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidBody => "Invalid request body",
            ErrorCode::InvalidId => "Invalid ID",

            // Customer
            ErrorCode::CustomerNotFound => "Customer not found",
            ErrorCode::CustomerFieldsRequired => "Name and TelNo cannot be empty",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "At least one item is required",
            ErrorCode::OrderCustomerRequired => "Customer ID is required",
            ErrorCode::OrderItemInvalid => "Invalid order item",
            ErrorCode::OrderItemUnknown => "Item not found",
            ErrorCode::OrderStatusInvalid => "Invalid order status",

            // Invoice
            ErrorCode::InvoiceNotFound => "Invoice not found",
            ErrorCode::InvoiceAlreadyExists => "Invoice already exists for this order",
            ErrorCode::PaymentStatusInvalid => {
                "Invalid payment status. Must be one of: pending, paid, overdue, cancelled"
            }
            ErrorCode::InvoiceOrderRequired => "Order ID is required",

            // Menu
            ErrorCode::ItemNotFound => "Item not found",
            ErrorCode::ItemTypeInvalid => "Invalid item type. Valid types: pizza, topping, beverage",
            ErrorCode::PriceInvalid => "Price cannot be negative",
            ErrorCode::ItemReferenceInvalid => "Referenced item not found",
            ErrorCode::PizzaNotFound => "Pizza not found",
            ErrorCode::ToppingNotFound => "Topping not found",
            ErrorCode::BeverageNotFound => "Beverage not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidBody),
            7 => Ok(ErrorCode::InvalidId),

            // Customer
            1001 => Ok(ErrorCode::CustomerNotFound),
            1002 => Ok(ErrorCode::CustomerFieldsRequired),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderEmpty),
            4003 => Ok(ErrorCode::OrderCustomerRequired),
            4004 => Ok(ErrorCode::OrderItemInvalid),
            4005 => Ok(ErrorCode::OrderItemUnknown),
            4006 => Ok(ErrorCode::OrderStatusInvalid),

            // Invoice
            5001 => Ok(ErrorCode::InvoiceNotFound),
            5002 => Ok(ErrorCode::InvoiceAlreadyExists),
            5003 => Ok(ErrorCode::PaymentStatusInvalid),
            5004 => Ok(ErrorCode::InvoiceOrderRequired),

            // Menu
            6001 => Ok(ErrorCode::ItemNotFound),
            6002 => Ok(ErrorCode::ItemTypeInvalid),
            6003 => Ok(ErrorCode::PriceInvalid),
            6004 => Ok(ErrorCode::ItemReferenceInvalid),
            6101 => Ok(ErrorCode::PizzaNotFound),
            6201 => Ok(ErrorCode::ToppingNotFound),
            6301 => Ok(ErrorCode::BeverageNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip_through_u16() {
        for code in [
            ErrorCode::Success,
            ErrorCode::InvalidBody,
            ErrorCode::CustomerNotFound,
            ErrorCode::OrderItemUnknown,
            ErrorCode::InvoiceAlreadyExists,
            ErrorCode::BeverageNotFound,
            ErrorCode::DatabaseError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_invalid_code() {
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
    }

    #[test]
    fn test_is_system() {
        assert!(ErrorCode::DatabaseError.is_system());
        assert!(ErrorCode::InternalError.is_system());
        assert!(!ErrorCode::InvoiceAlreadyExists.is_system());
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::InvoiceNotFound).unwrap();
        assert_eq!(json, "5001");
    }
}
