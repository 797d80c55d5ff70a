//! Number formatting for the calculator display.
//!
//! The display buffer is kept raw (`1234567.5`) and only grouped with
//! thousand separators (`1,234,567.5`) when rendered. Results are rounded
//! to a fixed number of decimal places with trailing zeros trimmed.

/// Decimal places kept when formatting a computed value.
pub const DECIMAL_PLACES: usize = 8;

/// Thousands separator used in the rendered display.
pub const SEPARATOR: char = ',';

/// Format a computed value as a raw buffer string (no separators).
///
/// Rounds to [`DECIMAL_PLACES`], trims trailing zeros and never yields `-0`.
pub fn format_number(value: f64) -> String {
    let formatted = format!("{:.*}", DECIMAL_PLACES, value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');

    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Format a computed value for display (with thousand separators).
pub fn format_display(value: f64) -> String {
    group_thousands(&format_number(value))
}

/// Insert thousand separators into the integer part of a raw number string.
///
/// The fractional part is preserved verbatim, including a trailing `.` or
/// trailing zeros, so partially typed input renders as typed.
pub fn group_thousands(raw: &str) -> String {
    let (sign, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw),
    };

    let (int_part, frac_part) = match unsigned.find('.') {
        Some(dot) => unsigned.split_at(dot),
        None => (unsigned, ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(SEPARATOR);
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();

    format!("{}{}{}", sign, grouped, frac_part)
}

/// Remove thousand separators from a displayed number or expression.
pub fn strip_separators(text: &str) -> String {
    text.chars().filter(|&c| c != SEPARATOR).collect()
}

/// Parse a displayed or raw number, ignoring separators.
pub fn parse_display(text: &str) -> Option<f64> {
    strip_separators(text).trim().parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_results() {
        assert_eq!(format_number(20.0), "20");
        assert_eq!(format_number(-7.0), "-7");
        assert_eq!(format_display(1_000_000.0), "1,000,000");
    }

    #[test]
    fn test_rounds_to_eight_places() {
        assert_eq!(format_number(1.0 / 3.0), "0.33333333");
        assert_eq!(format_number(2.0 / 3.0), "0.66666667");
        assert_eq!(format_number(0.1 + 0.2), "0.3");
    }

    #[test]
    fn test_negative_zero_is_zero() {
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-1e-12), "0");
    }

    #[test]
    fn test_grouping_keeps_partial_input() {
        assert_eq!(group_thousands("1234567"), "1,234,567");
        assert_eq!(group_thousands("1234."), "1,234.");
        assert_eq!(group_thousands("1234.50"), "1,234.50");
        assert_eq!(group_thousands("-98765.4321"), "-98,765.4321");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("0"), "0");
    }

    #[test]
    fn test_separator_round_trip() {
        let shown = group_thousands("1234567");
        assert_eq!(shown, "1,234,567");
        assert_eq!(strip_separators(&shown), "1234567");
        assert_eq!(parse_display(&shown), Some(1_234_567.0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_display("Error"), None);
        assert_eq!(parse_display(""), None);
    }
}
