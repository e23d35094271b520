//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod calculated_salary;
mod employee;
mod formula;
mod history;
pub mod lenient;
mod payroll_period;

pub use calculated_salary::{CalculatedSalary, SalaryBreakdown};
pub use employee::{Employee, EmployeeField};
pub use formula::FormulaConfig;
pub use history::{EmployeeStats, HistoryFilter, PayrollHistoryRecord, SavedPeriod};
pub use payroll_period::PayrollPeriod;
