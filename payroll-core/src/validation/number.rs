use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

static NON_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.,]").expect("static pattern is valid"));

static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[0-9]+(?:\.[0-9]+)?|\.[0-9]+)").expect("static pattern is valid")
});

/// Keeps only digits, `.` and `,`, then turns the first `,` into `.`.
///
/// ```
/// use payroll_core::validation::standardize_number;
///
/// assert_eq!(standardize_number("1 234,5 TND"), "1234.5");
/// ```
pub fn standardize_number(value: &str) -> String {
    NON_NUMERIC.replace_all(value, "").replacen(',', ".", 1)
}

/// Parses the leading number of a user-formatted amount.
///
/// Empty or unparseable input yields zero. Signs are stripped along with
/// every other non-numeric character, so the result is never negative.
///
/// ```
/// use rust_decimal_macros::dec;
/// use payroll_core::validation::parse_formatted_number;
///
/// assert_eq!(parse_formatted_number("2 500,750"), dec!(2500.750));
/// assert_eq!(parse_formatted_number(""), dec!(0));
/// ```
pub fn parse_formatted_number(value: &str) -> Decimal {
    let standardized = standardize_number(value);

    LEADING_NUMBER
        .find(&standardized)
        .and_then(|m| {
            let digits = m.as_str();
            if digits.starts_with('.') {
                Decimal::from_str(&format!("0{digits}")).ok()
            } else {
                Decimal::from_str(digits).ok()
            }
        })
        .unwrap_or(Decimal::ZERO)
}

/// Strict parse of a single amount.
///
/// Accepts a comma decimal mark and space thousands separators. Returns
/// `None` for anything that is not a number; negative values are returned
/// as-is so callers can reject them with a precise message.
pub fn parse_amount(value: &str) -> Option<Decimal> {
    let normalized: String = value
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if normalized.is_empty() {
        return None;
    }
    Decimal::from_str(&normalized).ok()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // standardize_number tests
    // =========================================================================

    #[test]
    fn standardize_strips_currency_and_spaces() {
        assert_eq!(standardize_number("TND 1 000"), "1000");
    }

    #[test]
    fn standardize_replaces_only_the_first_comma() {
        assert_eq!(standardize_number("1,2,3"), "1.2,3");
    }

    #[test]
    fn standardize_drops_minus_sign() {
        assert_eq!(standardize_number("-42"), "42");
    }

    // =========================================================================
    // parse_formatted_number tests
    // =========================================================================

    #[test]
    fn parse_formatted_reads_comma_decimals() {
        assert_eq!(parse_formatted_number("888,70"), dec!(888.70));
    }

    #[test]
    fn parse_formatted_keeps_the_leading_number() {
        assert_eq!(parse_formatted_number("1.2.3"), dec!(1.2));
        assert_eq!(parse_formatted_number("12."), dec!(12));
    }

    #[test]
    fn parse_formatted_accepts_leading_dot() {
        assert_eq!(parse_formatted_number(".5"), dec!(0.5));
    }

    #[test]
    fn parse_formatted_returns_zero_for_garbage() {
        assert_eq!(parse_formatted_number("abc"), dec!(0));
        assert_eq!(parse_formatted_number("   "), dec!(0));
        assert_eq!(parse_formatted_number(","), dec!(0));
    }

    // =========================================================================
    // parse_amount tests
    // =========================================================================

    #[test]
    fn parse_amount_accepts_plain_and_comma_decimals() {
        assert_eq!(parse_amount("1000"), Some(dec!(1000)));
        assert_eq!(parse_amount(" 448,238 "), Some(dec!(448.238)));
    }

    #[test]
    fn parse_amount_ignores_thousands_spaces() {
        assert_eq!(parse_amount("12 000"), Some(dec!(12000)));
    }

    #[test]
    fn parse_amount_keeps_negative_values() {
        assert_eq!(parse_amount("-5"), Some(dec!(-5)));
    }

    #[test]
    fn parse_amount_rejects_non_numbers() {
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("12abc"), None);
    }
}
