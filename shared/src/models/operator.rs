//! Operator Model

use serde::{Deserialize, Serialize};

/// Operator kind
///
/// Machines (tanning beds, pressotherapy units) schedule exactly like
/// people but never receive notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OperatorKind {
    Person,
    Machine,
}

impl Default for OperatorKind {
    fn default() -> Self {
        Self::Person
    }
}

/// Operator entity (staff member or bookable machine)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Operator {
    pub id: i64,
    pub name: String,
    pub kind: OperatorKind,
    pub phone: Option<String>,
    pub is_visible: bool,
    pub is_deleted: bool,
    /// Opted in to the next-day agenda notification
    pub notify_shifts: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Operator {
    /// Whether this operator participates in scheduling at all
    pub fn is_schedulable(&self) -> bool {
        self.is_visible && !self.is_deleted
    }
}

/// Create operator payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorCreate {
    pub name: String,
    pub kind: Option<OperatorKind>,
    pub phone: Option<String>,
    pub is_visible: Option<bool>,
    pub notify_shifts: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operator(visible: bool, deleted: bool) -> Operator {
        Operator {
            id: 1,
            name: "Giulia".to_string(),
            kind: OperatorKind::Person,
            phone: None,
            is_visible: visible,
            is_deleted: deleted,
            notify_shifts: false,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_schedulable() {
        assert!(operator(true, false).is_schedulable());
        assert!(!operator(false, false).is_schedulable());
        assert!(!operator(true, true).is_schedulable());
        assert!(!operator(false, true).is_schedulable());
    }

    #[test]
    fn test_kind_serde() {
        let json = serde_json::to_string(&OperatorKind::Machine).unwrap();
        assert_eq!(json, "\"MACHINE\"");
        let back: OperatorKind = serde_json::from_str("\"PERSON\"").unwrap();
        assert_eq!(back, OperatorKind::Person);
    }
}
