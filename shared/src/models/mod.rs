//! Data models
//!
//! Shared between the server and its API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps are Unix millis.

pub mod beverage;
pub mod customer;
pub mod invoice;
pub mod item;
pub mod order;
pub mod pizza;
pub mod topping;

// Re-exports
pub use beverage::*;
pub use customer::*;
pub use invoice::*;
pub use item::*;
pub use order::*;
pub use pizza::*;
pub use topping::*;
