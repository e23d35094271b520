//! Formula configuration model.
//!
//! The [`FormulaConfig`] holds the rates and bar pool shared by every
//! employee in a payroll run.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::lenient::decimal_or_zero;

/// Rates and bar pool settings applied to every employee.
///
/// A field missing from stored input takes its documented default; a field
/// that is present but not a usable number becomes zero.
///
/// # Example
///
/// ```
/// use bar_payroll::models::FormulaConfig;
/// use rust_decimal::Decimal;
///
/// let formula: FormulaConfig = serde_json::from_str(r#"{"shift_rate": 1200}"#).unwrap();
/// assert_eq!(formula.shift_rate, Decimal::from(1200));
/// assert_eq!(formula.total_bar_amount, Decimal::from(100_000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaConfig {
    /// Pay per regular (non-internship) shift.
    #[serde(default = "default_shift_rate", deserialize_with = "decimal_or_zero")]
    pub shift_rate: Decimal,
    /// Pay per internship shift.
    #[serde(
        default = "default_internship_rate",
        deserialize_with = "decimal_or_zero"
    )]
    pub internship_rate: Decimal,
    /// Bar revenue for the period.
    #[serde(
        default = "default_total_bar_amount",
        deserialize_with = "decimal_or_zero"
    )]
    pub total_bar_amount: Decimal,
    /// Share of the bar revenue distributed to staff, as a fraction (0.07 = 7%).
    #[serde(
        default = "default_bar_percentage",
        deserialize_with = "decimal_or_zero"
    )]
    pub bar_percentage: Decimal,
}

fn default_shift_rate() -> Decimal {
    Decimal::from(1000)
}

fn default_internship_rate() -> Decimal {
    Decimal::from(1000)
}

fn default_total_bar_amount() -> Decimal {
    Decimal::from(100_000)
}

fn default_bar_percentage() -> Decimal {
    Decimal::new(7, 2)
}

impl Default for FormulaConfig {
    fn default() -> Self {
        Self {
            shift_rate: default_shift_rate(),
            internship_rate: default_internship_rate(),
            total_bar_amount: default_total_bar_amount(),
            bar_percentage: default_bar_percentage(),
        }
    }
}

impl FormulaConfig {
    /// The part of the bar revenue that is shared among staff.
    pub fn bar_pool(&self) -> Decimal {
        self.total_bar_amount.saturating_mul(self.bar_percentage)
    }
}
