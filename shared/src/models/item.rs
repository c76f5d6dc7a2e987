//! Item Model (menu catalogue entry)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Item type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum ItemType {
    Pizza,
    Topping,
    Beverage,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Pizza => "pizza",
            ItemType::Topping => "topping",
            ItemType::Beverage => "beverage",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive parse
impl FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pizza" => Ok(ItemType::Pizza),
            "topping" => Ok(ItemType::Topping),
            "beverage" => Ok(ItemType::Beverage),
            other => Err(format!("unknown item type: {other}")),
        }
    }
}

/// Item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Item {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub unit_price: f64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

/// Create item payload
///
/// `type` is kept as a string and parsed by the handler so an unknown value
/// gets a dedicated message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemCreate {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub item_type: String,
    #[serde(default)]
    pub unit_price: f64,
    pub is_active: Option<bool>,
}

/// Update item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemUpdate {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub unit_price: Option<f64>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_type_parse_case_insensitive() {
        assert_eq!("Pizza".parse::<ItemType>(), Ok(ItemType::Pizza));
        assert_eq!("TOPPING".parse::<ItemType>(), Ok(ItemType::Topping));
        assert_eq!("beverage".parse::<ItemType>(), Ok(ItemType::Beverage));
        assert!("dessert".parse::<ItemType>().is_err());
    }

    #[test]
    fn test_item_serializes_type_field() {
        let item = Item {
            id: 1,
            name: "Margherita".into(),
            item_type: ItemType::Pizza,
            unit_price: 9.5,
            is_active: true,
            created_at: 0,
            updated_at: 0,
            deleted_at: None,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "pizza");
        assert!(json.get("item_type").is_none());
    }
}
