//! History snapshot construction.
//!
//! Saving a payroll run freezes the current roster, period and formula into
//! one [`PayrollHistoryRecord`] per employee.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Employee, FormulaConfig, PayrollHistoryRecord, PayrollPeriod};

use super::calculate_payroll;

/// Builds the history records for saving the current payroll.
///
/// Salaries are computed with the current roster size, and the formula's bar
/// revenue and percentage are copied into every record so later formula edits
/// do not change the saved run.
///
/// # Examples
///
/// ```
/// use bar_payroll::calculation::build_history_records;
/// use bar_payroll::models::{Employee, FormulaConfig, PayrollPeriod};
/// use chrono::{NaiveDate, Utc};
/// use rust_decimal::Decimal;
///
/// let mut anna = Employee::new("emp_001", "Anna");
/// anna.shifts = 10;
/// let period = PayrollPeriod::month_of(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
///
/// let records = build_history_records(&[anna], &FormulaConfig::default(), &period, Utc::now());
///
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].total_salary, Decimal::from(17000));
/// ```
pub fn build_history_records(
    employees: &[Employee],
    formula: &FormulaConfig,
    period: &PayrollPeriod,
    created_at: DateTime<Utc>,
) -> Vec<PayrollHistoryRecord> {
    calculate_payroll(employees, formula)
        .into_iter()
        .map(|salary| PayrollHistoryRecord {
            id: Uuid::new_v4(),
            period_start: period.start_date,
            period_end: period.end_date,
            employee_id: salary.employee.id.clone(),
            employee_name: salary.employee.name.clone(),
            shifts: salary.employee.shifts,
            internship_shifts: salary.employee.internship_shifts,
            corkage_fee: salary.employee.corkage_fee,
            penalties: salary.employee.penalties,
            bar_debt: salary.employee.bar_debt,
            total_salary: salary.total,
            total_bar_amount: formula.total_bar_amount,
            bar_percentage: formula.bar_percentage,
            created_at,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::{aggregate_by_employee, aggregate_by_period};
    use chrono::{NaiveDate, TimeZone};
    use rust_decimal::Decimal;

    fn create_roster() -> Vec<Employee> {
        let mut anna = Employee::new("emp_a", "Anna");
        anna.shifts = 20;
        anna.corkage_fee = Decimal::from(2000);
        anna.penalties = Decimal::from(500);
        anna.bar_debt = Decimal::from(300);

        let mut boris = Employee::new("emp_b", "Boris");
        boris.shifts = 18;
        boris.internship_shifts = 4;
        boris.corkage_fee = Decimal::from(2500);

        vec![anna, boris]
    }

    fn january() -> PayrollPeriod {
        PayrollPeriod::new(
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        )
    }

    #[test]
    fn test_one_record_per_employee_with_snapshot_fields() {
        let created_at = Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap();
        let records =
            build_history_records(&create_roster(), &FormulaConfig::default(), &january(), created_at);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].employee_id, "emp_a");
        assert_eq!(records[0].employee_name, "Anna");
        assert_eq!(records[0].total_salary, Decimal::from(24700));
        assert_eq!(records[0].bar_debt, Decimal::from(300));
        assert_eq!(records[1].internship_shifts, 4);
        assert_eq!(records[1].total_salary, Decimal::from(24000));

        for record in &records {
            assert_eq!(record.period_start, january().start_date);
            assert_eq!(record.period_end, january().end_date);
            assert_eq!(record.total_bar_amount, Decimal::from(100_000));
            assert_eq!(record.bar_percentage, Decimal::new(7, 2));
            assert_eq!(record.created_at, created_at);
        }
        assert_ne!(records[0].id, records[1].id);
    }

    #[test]
    fn test_snapshot_feeds_aggregations() {
        let records = build_history_records(
            &create_roster(),
            &FormulaConfig::default(),
            &january(),
            Utc::now(),
        );

        let periods = aggregate_by_period(&records);
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].total_employees, 2);
        assert_eq!(periods[0].total_payroll, Decimal::from(48700));

        let stats = aggregate_by_employee(&records);
        assert_eq!(stats.len(), 2);
        assert!(stats.iter().all(|s| s.periods_count == 1));
    }

    #[test]
    fn test_empty_roster_builds_nothing() {
        let records =
            build_history_records(&[], &FormulaConfig::default(), &january(), Utc::now());
        assert!(records.is_empty());
    }
}
