//! Calculation logic for the payroll engine.
//!
//! This module contains the salary formula and its roster-wide helpers, the
//! per-employee and per-period history aggregations, and construction of the
//! history records written when a payroll run is saved.

mod history;
mod salary;
mod snapshot;

pub use history::{aggregate_by_employee, aggregate_by_period};
pub use salary::{calculate_payroll, calculate_salary, payroll_total};
pub use snapshot::build_history_records;
