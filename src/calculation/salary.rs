//! Salary calculation functionality.
//!
//! This module provides the salary formula applied to each employee on the
//! roster, plus helpers for applying it to a whole roster at once.

use rust_decimal::Decimal;

use crate::models::{CalculatedSalary, Employee, FormulaConfig, SalaryBreakdown};

/// Calculates one employee's itemised salary.
///
/// The formula is:
/// 1. `regular_shifts = max(0, shifts - internship_shifts)`
/// 2. `from_shifts = regular_shifts × shift_rate`
/// 3. `from_internship_shifts = internship_shifts × internship_rate`
/// 4. `from_bar = total_bar_amount × bar_percentage / employee_count`, paid
///    only when `regular_shifts > 0` and `employee_count > 0`
/// 5. `total = from_shifts + from_internship_shifts + from_bar + corkage_fee
///    - penalties - bar_debt`
///
/// The bar pool is split equally across the whole roster, including
/// employees who receive no share, so `employee_count` is the size of the
/// roster being paid right now.
///
/// # Arguments
///
/// * `employee` - The employee to calculate pay for
/// * `formula` - The rates and bar pool settings
/// * `employee_count` - Number of employees on the current roster
///
/// # Examples
///
/// ```
/// use bar_payroll::calculation::calculate_salary;
/// use bar_payroll::models::{Employee, FormulaConfig};
/// use rust_decimal::Decimal;
///
/// let mut employee = Employee::new("emp_001", "Anna");
/// employee.shifts = 20;
/// employee.corkage_fee = Decimal::from(2000);
/// employee.penalties = Decimal::from(500);
/// employee.bar_debt = Decimal::from(300);
///
/// let salary = calculate_salary(&employee, &FormulaConfig::default(), 2);
///
/// assert_eq!(salary.breakdown.from_bar, Decimal::from(3500));
/// assert_eq!(salary.total, Decimal::from(24700));
/// ```
pub fn calculate_salary<'a>(
    employee: &'a Employee,
    formula: &FormulaConfig,
    employee_count: usize,
) -> CalculatedSalary<'a> {
    let regular_shifts = employee.regular_shifts();

    let from_shifts = Decimal::from(regular_shifts).saturating_mul(formula.shift_rate);
    let from_internship_shifts =
        Decimal::from(employee.internship_shifts).saturating_mul(formula.internship_rate);

    let from_bar = if regular_shifts > 0 && employee_count > 0 {
        formula
            .bar_pool()
            .checked_div(Decimal::from(employee_count))
            .unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };

    let breakdown = SalaryBreakdown {
        from_shifts,
        from_internship_shifts,
        from_bar,
        from_corkage_fee: employee.corkage_fee,
        from_penalties: employee.penalties,
        from_bar_debt: employee.bar_debt,
    };

    CalculatedSalary {
        employee,
        breakdown,
        total: breakdown.total(),
        is_intern: employee.is_intern(),
        regular_shifts,
    }
}

/// Calculates the salary of every employee on the roster.
///
/// The roster length is used as the bar share divisor.
pub fn calculate_payroll<'a>(
    employees: &'a [Employee],
    formula: &FormulaConfig,
) -> Vec<CalculatedSalary<'a>> {
    employees
        .iter()
        .map(|employee| calculate_salary(employee, formula, employees.len()))
        .collect()
}

/// Sums the totals of a set of calculated salaries.
pub fn payroll_total(salaries: &[CalculatedSalary<'_>]) -> Decimal {
    salaries
        .iter()
        .fold(Decimal::ZERO, |sum, salary| sum.saturating_add(salary.total))
}
