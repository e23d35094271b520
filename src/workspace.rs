//! The working payroll state.
//!
//! A [`PayrollWorkspace`] is the formula, roster and period currently being
//! edited. It is passed explicitly to whatever needs it; nothing in the crate
//! keeps this state in globals.

use chrono::{DateTime, Local, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info};
use uuid::Uuid;

use crate::calculation::{build_history_records, calculate_payroll, payroll_total};
use crate::error::{PayrollError, PayrollResult};
use crate::models::{
    CalculatedSalary, Employee, EmployeeField, FormulaConfig, PayrollHistoryRecord, PayrollPeriod,
};
use crate::storage::PayrollStore;

/// Formula, roster and period for the payroll run being prepared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollWorkspace {
    /// The rates and bar pool settings.
    pub formula: FormulaConfig,
    /// The employees on the current roster, in display order.
    pub employees: Vec<Employee>,
    /// The period being paid.
    pub period: PayrollPeriod,
}

impl PayrollWorkspace {
    /// Creates an empty workspace for the current calendar month.
    pub fn new(formula: FormulaConfig) -> Self {
        Self {
            formula,
            employees: Vec::new(),
            period: PayrollPeriod::month_of(Local::now().date_naive()),
        }
    }

    /// Loads the workspace from storage.
    ///
    /// Anything not saved yet falls back to a default: `default_formula`,
    /// an empty roster, and the current calendar month.
    pub fn load(store: &dyn PayrollStore, default_formula: &FormulaConfig) -> PayrollResult<Self> {
        let defaults = Self::new(default_formula.clone());

        let formula = store.load_formula()?.unwrap_or(defaults.formula);
        let employees = store.load_employees()?.unwrap_or(defaults.employees);
        let period = store.load_period()?.unwrap_or(defaults.period);

        debug!(
            backend = store.backend_name(),
            employees = employees.len(),
            "Loaded workspace"
        );
        Ok(Self {
            formula,
            employees,
            period,
        })
    }

    /// Saves formula, roster and period.
    pub fn save(&self, store: &dyn PayrollStore) -> PayrollResult<()> {
        store.save_formula(&self.formula)?;
        store.save_employees(&self.employees)?;
        store.save_period(&self.period)?;
        info!(
            backend = store.backend_name(),
            employees = self.employees.len(),
            "Saved workspace"
        );
        Ok(())
    }

    /// Adds an employee with zeroed counters and a fresh id.
    pub fn add_employee(&mut self, name: impl Into<String>) -> &Employee {
        let employee = Employee::new(Uuid::new_v4().to_string(), name);
        self.employees.push(employee);
        &self.employees[self.employees.len() - 1]
    }

    /// Sets one field of the employee with the given id.
    pub fn update_employee(
        &mut self,
        id: &str,
        field: EmployeeField,
        value: &str,
    ) -> PayrollResult<&Employee> {
        let employee = self
            .employees
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| PayrollError::EmployeeNotFound { id: id.to_string() })?;
        employee.set_field(field, value);
        Ok(&*employee)
    }

    /// Removes the employee with the given id.
    pub fn remove_employee(&mut self, id: &str) -> PayrollResult<Employee> {
        let index = self
            .employees
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| PayrollError::EmployeeNotFound { id: id.to_string() })?;
        Ok(self.employees.remove(index))
    }

    /// Computes every employee's salary from the current state.
    pub fn salaries(&self) -> Vec<CalculatedSalary<'_>> {
        calculate_payroll(&self.employees, &self.formula)
    }

    /// Sum of all salaries.
    pub fn total_payroll(&self) -> Decimal {
        payroll_total(&self.salaries())
    }

    /// Freezes the current state into history records.
    pub fn history_snapshot(&self, created_at: DateTime<Utc>) -> Vec<PayrollHistoryRecord> {
        build_history_records(&self.employees, &self.formula, &self.period, created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalStore;
    use chrono::NaiveDate;

    fn open_store() -> (LocalStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path()).unwrap();
        (store, dir)
    }

    #[test]
    fn test_load_from_empty_store_uses_defaults() {
        let (store, _dir) = open_store();
        let formula = FormulaConfig {
            shift_rate: Decimal::from(1200),
            ..FormulaConfig::default()
        };

        let workspace = PayrollWorkspace::load(&store, &formula).unwrap();

        assert_eq!(workspace.formula, formula);
        assert!(workspace.employees.is_empty());
        assert!(workspace.period.contains_date(Local::now().date_naive()));
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let (store, _dir) = open_store();
        let mut workspace = PayrollWorkspace::new(FormulaConfig::default());
        workspace.period = PayrollPeriod::new(
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        );
        let id = workspace.add_employee("Anna").id.clone();
        workspace
            .update_employee(&id, EmployeeField::Shifts, "20")
            .unwrap();
        workspace.save(&store).unwrap();

        let loaded = PayrollWorkspace::load(&store, &FormulaConfig::default()).unwrap();
        assert_eq!(loaded, workspace);
    }

    #[test]
    fn test_roster_edits() {
        let mut workspace = PayrollWorkspace::new(FormulaConfig::default());
        let anna = workspace.add_employee("Anna").id.clone();
        let boris = workspace.add_employee("Boris").id.clone();
        assert_ne!(anna, boris);

        let updated = workspace
            .update_employee(&boris, EmployeeField::InternshipShifts, "4")
            .unwrap();
        assert_eq!(updated.internship_shifts, 4);

        let removed = workspace.remove_employee(&anna).unwrap();
        assert_eq!(removed.name, "Anna");
        assert_eq!(workspace.employees.len(), 1);
    }

    #[test]
    fn test_unknown_employee_is_an_error() {
        let mut workspace = PayrollWorkspace::new(FormulaConfig::default());
        assert!(matches!(
            workspace.update_employee("missing", EmployeeField::Name, "x"),
            Err(PayrollError::EmployeeNotFound { .. })
        ));
        assert!(matches!(
            workspace.remove_employee("missing"),
            Err(PayrollError::EmployeeNotFound { .. })
        ));
    }

    #[test]
    fn test_salaries_follow_edits() {
        let mut workspace = PayrollWorkspace::new(FormulaConfig::default());
        let anna = workspace.add_employee("Anna").id.clone();
        workspace
            .update_employee(&anna, EmployeeField::Shifts, "10")
            .unwrap();
        assert_eq!(workspace.total_payroll(), Decimal::from(17000));

        // a second employee halves the bar share even with no shifts
        workspace.add_employee("Boris");
        let salaries = workspace.salaries();
        assert_eq!(salaries[0].breakdown.from_bar, Decimal::from(3500));
        assert_eq!(salaries[1].total, Decimal::ZERO);
        assert_eq!(workspace.total_payroll(), Decimal::from(13500));
    }

    #[test]
    fn test_history_snapshot_uses_period_and_formula() {
        let mut workspace = PayrollWorkspace::new(FormulaConfig::default());
        workspace.add_employee("Anna");
        let records = workspace.history_snapshot(Utc::now());

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].period_start, workspace.period.start_date);
        assert_eq!(records[0].bar_percentage, workspace.formula.bar_percentage);
    }
}
