use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const UNKNOWN_CATEGORY: &str = "Unknown";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: i64,
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
    pub category_id: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Payload for creating an expense. Updates send the same fields plus `id`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDraft {
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
    pub category_id: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExpenseUpdate<'a> {
    pub id: i64,
    #[serde(flatten)]
    pub draft: &'a ExpenseDraft,
}

impl ExpenseDraft {
    /// Mirrors the backend's bean validation so obvious mistakes never leave
    /// the browser: amount >= 0.1, non-blank description, no future dates.
    pub fn validate(&self, today: NaiveDate) -> Result<(), String> {
        if self.amount < Decimal::new(1, 1) {
            return Err("Amount must be at least 0.10.".to_string());
        }
        if self.description.trim().is_empty() {
            return Err("Description is required.".to_string());
        }
        if self.date > today {
            return Err("Date cannot be in the future.".to_string());
        }
        if self.category_id <= 0 {
            return Err("Please select a category.".to_string());
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryDraft {
    pub name: String,
}

#[derive(Serialize)]
pub(crate) struct CategoryUpdate<'a> {
    pub id: i64,
    pub name: &'a str,
}

impl CategoryDraft {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Category name is required.".to_string());
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn from_code(code: &str) -> Self {
        match code {
            "ADMIN" => Role::Admin,
            _ => Role::User,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(amount: Decimal, date: &str) -> ExpenseDraft {
        ExpenseDraft {
            amount,
            description: "Lunch".to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            category_id: 1,
        }
    }

    #[test]
    fn expense_uses_camel_case_on_the_wire() {
        let json = r#"{"id":7,"amount":12.5,"description":"Taxi","date":"2024-03-09","categoryId":2}"#;
        let expense: Expense = serde_json::from_str(json).unwrap();
        assert_eq!(expense.category_id, 2);
        assert_eq!(expense.amount, Decimal::new(125, 1));
        assert_eq!(expense.date, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
    }

    #[test]
    fn update_payload_carries_id() {
        let d = draft(Decimal::from(20), "2024-01-02");
        let value = serde_json::to_value(ExpenseUpdate { id: 4, draft: &d }).unwrap();
        assert_eq!(value["id"], 4);
        assert_eq!(value["categoryId"], 1);
        assert_eq!(value["date"], "2024-01-02");
    }

    #[test]
    fn draft_rejects_tiny_amounts_and_future_dates() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert!(draft(Decimal::new(5, 2), "2024-04-01").validate(today).is_err());
        assert!(draft(Decimal::from(5), "2024-05-02").validate(today).is_err());
        assert!(draft(Decimal::from(5), "2024-05-01").validate(today).is_ok());
    }

    #[test]
    fn role_serializes_uppercase() {
        let reg = Registration {
            username: "amy".to_string(),
            password: "secret".to_string(),
            role: Role::from_code("ADMIN"),
        };
        let value = serde_json::to_value(reg).unwrap();
        assert_eq!(value["role"], "ADMIN");
    }
}
