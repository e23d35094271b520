//! Employee model and related types.
//!
//! This module defines the [`Employee`] struct holding one worker's raw
//! counters for the current payroll period, and [`EmployeeField`] for
//! editing those counters one at a time.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::lenient::{count_or_zero, decimal_or_zero, parse_count, parse_decimal};

/// Represents an employee on the current roster.
///
/// `shifts` is the total number of shifts worked and already includes
/// `internship_shifts`. Numeric fields that are missing or unusable in
/// stored input deserialize as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique, stable identifier for the employee.
    pub id: String,
    /// Display name. Also the key under which history is summarised.
    #[serde(default)]
    pub name: String,
    /// Total shifts worked, internship shifts included.
    #[serde(default, deserialize_with = "count_or_zero")]
    pub shifts: u32,
    /// Shifts worked as an intern.
    #[serde(default, deserialize_with = "count_or_zero")]
    pub internship_shifts: u32,
    /// Corkage fee credited to the employee.
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub corkage_fee: Decimal,
    /// Penalties deducted from pay.
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub penalties: Decimal,
    /// Outstanding bar tab deducted from pay.
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub bar_debt: Decimal,
}

/// An editable field of an [`Employee`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeField {
    /// The display name.
    Name,
    /// Total shifts worked.
    Shifts,
    /// Internship shifts worked.
    InternshipShifts,
    /// Corkage fee.
    CorkageFee,
    /// Penalties.
    Penalties,
    /// Bar debt.
    BarDebt,
}

impl Employee {
    /// Creates an employee with all counters at zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use bar_payroll::models::Employee;
    ///
    /// let employee = Employee::new("emp_001", "Anna");
    /// assert_eq!(employee.shifts, 0);
    /// assert!(!employee.is_intern());
    /// ```
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            shifts: 0,
            internship_shifts: 0,
            corkage_fee: Decimal::ZERO,
            penalties: Decimal::ZERO,
            bar_debt: Decimal::ZERO,
        }
    }

    /// Shifts worked outside the internship, never below zero.
    pub fn regular_shifts(&self) -> u32 {
        self.shifts.saturating_sub(self.internship_shifts)
    }

    /// Returns true if the employee worked any internship shifts.
    pub fn is_intern(&self) -> bool {
        self.internship_shifts > 0
    }

    /// Sets a single field from user-entered text.
    ///
    /// Numeric fields that cannot be parsed are set to zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use bar_payroll::models::{Employee, EmployeeField};
    /// use rust_decimal::Decimal;
    ///
    /// let mut employee = Employee::new("emp_001", "Anna");
    /// employee.set_field(EmployeeField::Shifts, "20");
    /// employee.set_field(EmployeeField::Penalties, "not a number");
    /// assert_eq!(employee.shifts, 20);
    /// assert_eq!(employee.penalties, Decimal::ZERO);
    /// ```
    pub fn set_field(&mut self, field: EmployeeField, value: &str) {
        match field {
            EmployeeField::Name => self.name = value.to_string(),
            EmployeeField::Shifts => self.shifts = parse_count(value),
            EmployeeField::InternshipShifts => self.internship_shifts = parse_count(value),
            EmployeeField::CorkageFee => self.corkage_fee = parse_decimal(value),
            EmployeeField::Penalties => self.penalties = parse_decimal(value),
            EmployeeField::BarDebt => self.bar_debt = parse_decimal(value),
        }
    }
}
