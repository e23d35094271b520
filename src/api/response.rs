//! Response types for the payroll API.
//!
//! This module defines the response bodies and the error response
//! structures for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PayrollError;
use crate::format::{format_amount, format_percentage};
use crate::models::{CalculatedSalary, FormulaConfig, PayrollPeriod};

/// Response body for `GET /salaries`.
#[derive(Debug, Serialize)]
pub struct SalariesResponse<'a> {
    /// The period being paid.
    pub period: PayrollPeriod,
    /// The formula the salaries were computed with.
    pub formula: &'a FormulaConfig,
    /// Number of employees sharing the bar pool.
    pub employee_count: usize,
    /// One entry per employee, in roster order.
    pub salaries: Vec<CalculatedSalary<'a>>,
    /// Sum of all salaries.
    pub total_payroll: Decimal,
    /// `total_payroll` formatted for display.
    pub total_payroll_display: String,
    /// The bar percentage formatted for display.
    pub bar_percentage_display: String,
}

impl<'a> SalariesResponse<'a> {
    /// Builds the response from computed salaries.
    pub fn new(
        period: PayrollPeriod,
        formula: &'a FormulaConfig,
        salaries: Vec<CalculatedSalary<'a>>,
        total_payroll: Decimal,
    ) -> Self {
        Self {
            period,
            formula,
            employee_count: salaries.len(),
            salaries,
            total_payroll,
            total_payroll_display: format_amount(total_payroll),
            bar_percentage_display: format_percentage(formula.bar_percentage),
        }
    }
}

/// Response body for `POST /payroll/save`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavePayrollResponse {
    /// The period that was saved.
    pub period: PayrollPeriod,
    /// Number of history records written.
    pub records_saved: usize,
    /// Sum of the saved salaries.
    pub total_payroll: Decimal,
}

/// Response body for `DELETE /history/periods`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletePeriodResponse {
    /// Number of history records removed.
    pub removed: usize,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A `400 Bad Request` carrying the given error.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<PayrollError> for ApiErrorResponse {
    fn from(error: PayrollError) -> Self {
        match error {
            PayrollError::ConfigNotFound { .. } | PayrollError::ConfigParseError { .. } => {
                ApiErrorResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: ApiError::with_details(
                        "CONFIG_ERROR",
                        "Configuration error",
                        error.to_string(),
                    ),
                }
            }
            PayrollError::Storage { .. }
            | PayrollError::Database(_)
            | PayrollError::Io(_)
            | PayrollError::Serialization(_) => ApiErrorResponse {
                status: StatusCode::SERVICE_UNAVAILABLE,
                error: ApiError::with_details(
                    "STORAGE_ERROR",
                    "Storage is unavailable",
                    error.to_string(),
                ),
            },
            PayrollError::EmployeeNotFound { id } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new(
                    "EMPLOYEE_NOT_FOUND",
                    format!("Employee not found: {}", id),
                ),
            },
            PayrollError::SaveInProgress => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::new("SAVE_IN_PROGRESS", "A payroll save is already in progress"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Employee;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details")); // Should be skipped when None
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_payroll_error_status_codes() {
        let not_found: ApiErrorResponse = PayrollError::EmployeeNotFound {
            id: "emp_404".to_string(),
        }
        .into();
        assert_eq!(not_found.status, StatusCode::NOT_FOUND);
        assert_eq!(not_found.error.code, "EMPLOYEE_NOT_FOUND");

        let busy: ApiErrorResponse = PayrollError::SaveInProgress.into();
        assert_eq!(busy.status, StatusCode::CONFLICT);

        let storage: ApiErrorResponse = PayrollError::storage("sqlite", "locked").into();
        assert_eq!(storage.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(storage.error.code, "STORAGE_ERROR");
    }

    #[test]
    fn test_salaries_response_display_fields() {
        let formula = FormulaConfig::default();
        let employee = Employee::new("emp_001", "Anna");
        let salaries = crate::calculation::calculate_payroll(
            std::slice::from_ref(&employee),
            &formula,
        );
        let period = PayrollPeriod::month_of(chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());

        let response = SalariesResponse::new(period, &formula, salaries, Decimal::from(24700));

        assert_eq!(response.employee_count, 1);
        assert_eq!(response.total_payroll_display, "24,700");
        assert_eq!(response.bar_percentage_display, "7.0%");
    }
}
