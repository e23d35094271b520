//! Request types for the payroll API.
//!
//! Bodies that carry whole models (formula, roster, period) deserialize
//! straight into the domain types; the types here cover the remaining
//! endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::EmployeeField;

/// Request body for `POST /employees`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddEmployeeRequest {
    /// Display name of the new employee.
    #[serde(default)]
    pub name: String,
}

/// Request body for `PATCH /employees/:id`.
///
/// `value` may be a JSON string or number; anything else clears the field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEmployeeRequest {
    /// The field to change.
    pub field: EmployeeField,
    /// The new value, as typed by the user.
    #[serde(default)]
    pub value: serde_json::Value,
}

impl UpdateEmployeeRequest {
    /// The value as text for [`crate::models::Employee::set_field`].
    pub fn value_text(&self) -> String {
        match &self.value {
            serde_json::Value::String(text) => text.clone(),
            serde_json::Value::Number(number) => number.to_string(),
            _ => String::new(),
        }
    }
}

/// Query string for `DELETE /history/periods`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodKeyQuery {
    /// Start of the period to delete.
    pub start: NaiveDate,
    /// End of the period to delete.
    pub end: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_value_accepts_strings_and_numbers() {
        let request: UpdateEmployeeRequest =
            serde_json::from_str(r#"{"field": "shifts", "value": 20}"#).unwrap();
        assert_eq!(request.field, EmployeeField::Shifts);
        assert_eq!(request.value_text(), "20");

        let request: UpdateEmployeeRequest =
            serde_json::from_str(r#"{"field": "name", "value": "Anna"}"#).unwrap();
        assert_eq!(request.value_text(), "Anna");
    }

    #[test]
    fn test_update_value_missing_or_null_is_empty() {
        let request: UpdateEmployeeRequest =
            serde_json::from_str(r#"{"field": "penalties"}"#).unwrap();
        assert_eq!(request.value_text(), "");

        let request: UpdateEmployeeRequest =
            serde_json::from_str(r#"{"field": "penalties", "value": null}"#).unwrap();
        assert_eq!(request.value_text(), "");
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let result: Result<UpdateEmployeeRequest, _> =
            serde_json::from_str(r#"{"field": "salary", "value": 1}"#);
        assert!(result.is_err());
    }
}
