//! Beverage Model

use serde::{Deserialize, Serialize};

/// Beverage entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Beverage {
    pub id: i64,
    pub item_id: i64,
    pub name: String,
    pub size: String,
    pub price: f64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

/// Create beverage payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BeverageCreate {
    #[serde(default)]
    pub item_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub price: f64,
    pub is_active: Option<bool>,
}

/// Update beverage payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BeverageUpdate {
    pub item_id: Option<i64>,
    pub name: Option<String>,
    pub size: Option<String>,
    pub price: Option<f64>,
    pub is_active: Option<bool>,
}
