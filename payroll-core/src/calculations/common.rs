//! Shared numeric helpers for payroll calculations.
//!
//! The engine itself never rounds; these helpers exist for presentation and
//! for comparing figures against printed payslips.

use rust_decimal::Decimal;

/// Rounds a value to two decimal places, midpoint away from zero.
///
/// # Arguments
///
/// * `value` - The amount to round
///
/// # Returns
///
/// The value rounded to two decimal places.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use payroll_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(888.704)), dec!(888.70));
/// assert_eq!(round_half_up(dec!(892.1875)), dec!(892.19));
/// assert_eq!(round_half_up(dec!(-4.385)), dec!(-4.39)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two values.
///
/// # Arguments
///
/// * `a` - First value
/// * `b` - Second value
///
/// # Returns
///
/// `a` when it is strictly greater, otherwise `b`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use payroll_core::calculations::common::max;
///
/// assert_eq!(max(dec!(0), dec!(-12.5)), dec!(0));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// `true` when `a` and `b` differ by no more than `tolerance`.
///
/// # Arguments
///
/// * `a` - Computed figure
/// * `b` - Expected figure
/// * `tolerance` - Largest accepted absolute difference, inclusive
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use payroll_core::calculations::common::approx_eq;
///
/// assert!(approx_eq(dec!(888.704), dec!(888.70), dec!(0.01)));
/// assert!(!approx_eq(dec!(888.70), dec!(888.72), dec!(0.01)));
/// ```
pub fn approx_eq(
    a: Decimal,
    b: Decimal,
    tolerance: Decimal,
) -> bool {
    (a - b).abs() <= tolerance
}
