//! Display formatting for amounts and percentages.

use rust_decimal::{Decimal, RoundingStrategy};

/// Formats a fraction as a percentage with one decimal place.
///
/// Midpoints round away from zero, so 1.25% shows as "1.3%".
///
/// # Examples
///
/// ```
/// use bar_payroll::format::format_percentage;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_percentage(Decimal::new(7, 2)), "7.0%");
/// ```
pub fn format_percentage(value: Decimal) -> String {
    let percent = value
        .saturating_mul(Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.1}%", percent)
}

/// Formats an amount with comma thousands separators.
///
/// The amount is rounded to two decimal places, midpoints away from zero,
/// and trailing zeros are dropped.
///
/// # Examples
///
/// ```
/// use bar_payroll::format::format_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_amount(Decimal::from(24700)), "24,700");
/// assert_eq!(format_amount(Decimal::new(-123456789, 2)), "-1,234,567.89");
/// ```
pub fn format_amount(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = rounded.normalize().abs().to_string();
    let (integer, fraction) = match text.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(text.len() + integer.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        grouped.push('-');
    }
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}
