//! Customer Model

use serde::{Deserialize, Serialize};

/// Customer entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub tel_no: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

/// Create customer payload
///
/// Missing fields deserialize as empty strings so that they are reported
/// by validation rather than as a malformed body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerCreate {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "tel", alias = "phone")]
    pub tel_no: String,
}

/// Update customer payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    #[serde(alias = "tel", alias = "phone")]
    pub tel_no: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_accepts_phone_aliases() {
        let c: CustomerCreate = serde_json::from_str(r#"{"name":"Alice","tel":"555-1111"}"#).unwrap();
        assert_eq!(c.tel_no, "555-1111");

        let c: CustomerCreate =
            serde_json::from_str(r#"{"name":"Bob","phone":"555-2222"}"#).unwrap();
        assert_eq!(c.tel_no, "555-2222");

        let c: CustomerCreate =
            serde_json::from_str(r#"{"name":"Carol","tel_no":"555-3333"}"#).unwrap();
        assert_eq!(c.tel_no, "555-3333");
    }

    #[test]
    fn test_create_missing_fields_are_empty() {
        let c: CustomerCreate = serde_json::from_str("{}").unwrap();
        assert!(c.name.is_empty());
        assert!(c.tel_no.is_empty());
    }
}
