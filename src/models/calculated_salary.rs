//! Salary calculation result models.
//!
//! A [`CalculatedSalary`] is a view over an [`Employee`] and the current
//! formula. It borrows the employee and is rebuilt on every access, so it
//! can never go stale.

use rust_decimal::Decimal;
use serde::Serialize;

use super::Employee;

/// Itemised components of one employee's salary.
///
/// `from_penalties` and `from_bar_debt` hold the amounts as entered and are
/// subtracted when the total is formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SalaryBreakdown {
    /// Regular shifts times the shift rate.
    pub from_shifts: Decimal,
    /// Internship shifts times the internship rate.
    pub from_internship_shifts: Decimal,
    /// Equal share of the bar pool.
    pub from_bar: Decimal,
    /// Corkage fee credited.
    pub from_corkage_fee: Decimal,
    /// Penalties deducted.
    pub from_penalties: Decimal,
    /// Bar debt deducted.
    pub from_bar_debt: Decimal,
}

impl SalaryBreakdown {
    /// Credits minus deductions.
    ///
    /// # Example
    ///
    /// ```
    /// use bar_payroll::models::SalaryBreakdown;
    /// use rust_decimal::Decimal;
    ///
    /// let breakdown = SalaryBreakdown {
    ///     from_shifts: Decimal::from(20000),
    ///     from_internship_shifts: Decimal::ZERO,
    ///     from_bar: Decimal::from(3500),
    ///     from_corkage_fee: Decimal::from(2000),
    ///     from_penalties: Decimal::from(500),
    ///     from_bar_debt: Decimal::from(300),
    /// };
    /// assert_eq!(breakdown.total(), Decimal::from(24700));
    /// ```
    pub fn total(&self) -> Decimal {
        self.from_shifts
            .saturating_add(self.from_internship_shifts)
            .saturating_add(self.from_bar)
            .saturating_add(self.from_corkage_fee)
            .saturating_sub(self.from_penalties)
            .saturating_sub(self.from_bar_debt)
    }
}

/// The computed salary of one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalculatedSalary<'a> {
    /// The employee this salary was computed for.
    pub employee: &'a Employee,
    /// The itemised components.
    pub breakdown: SalaryBreakdown,
    /// The final amount; may be negative.
    pub total: Decimal,
    /// Whether the employee worked any internship shifts.
    pub is_intern: bool,
    /// Shifts worked outside the internship.
    pub regular_shifts: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breakdown(credits: i64, deductions: i64) -> SalaryBreakdown {
        SalaryBreakdown {
            from_shifts: Decimal::from(credits),
            from_internship_shifts: Decimal::ZERO,
            from_bar: Decimal::ZERO,
            from_corkage_fee: Decimal::ZERO,
            from_penalties: Decimal::from(deductions),
            from_bar_debt: Decimal::ZERO,
        }
    }

    #[test]
    fn test_total_can_go_negative() {
        assert_eq!(breakdown(100, 400).total(), Decimal::from(-300));
    }

    #[test]
    fn test_total_saturates_instead_of_panicking() {
        let mut b = breakdown(0, 0);
        b.from_shifts = Decimal::MAX;
        b.from_bar = Decimal::MAX;
        assert_eq!(b.total(), Decimal::MAX);
    }

    #[test]
    fn test_serialized_salary_embeds_employee() {
        let employee = Employee::new("emp_001", "Anna");
        let salary = CalculatedSalary {
            employee: &employee,
            breakdown: breakdown(1000, 0),
            total: Decimal::from(1000),
            is_intern: false,
            regular_shifts: 1,
        };

        let json = serde_json::to_value(&salary).unwrap();
        assert_eq!(json["employee"]["id"], "emp_001");
        assert_eq!(json["breakdown"]["from_shifts"], "1000");
        assert_eq!(json["total"], "1000");
        assert_eq!(json["regular_shifts"], 1);
    }
}
