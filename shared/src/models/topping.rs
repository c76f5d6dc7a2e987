//! Topping Model

use serde::{Deserialize, Serialize};

/// Topping entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Topping {
    pub id: i64,
    pub item_id: i64,
    pub name: String,
    pub price: f64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

/// Create topping payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToppingCreate {
    #[serde(default)]
    pub item_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: f64,
    pub is_active: Option<bool>,
}

/// Update topping payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToppingUpdate {
    pub item_id: Option<i64>,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub is_active: Option<bool>,
}
