//! Reporting utilities: localized number formatting and terminal tables.
//!
//! Amounts follow Argentine conventions: `.` groups thousands and `,` marks
//! decimals (`$1.234.568`, `12,3%`, `0,7`).

pub mod format;

pub use format::*;

use crate::cost::round_currency;

/// Whole-peso amount with `.` thousands separators.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let rounded = round_currency(value);
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Amount with a leading `$`.
pub fn format_currency(value: f64) -> String {
    let amount = format_amount(value);
    match amount.strip_prefix('-') {
        Some(abs) => format!("-${abs}"),
        None => format!("${amount}"),
    }
}

/// One decimal, comma separator, trailing `%`.
pub fn format_percent(value: f64) -> String {
    format!("{}%", one_decimal(value))
}

/// Economy-of-scale factor with one decimal (`0,7`).
pub fn format_factor(value: f64) -> String {
    one_decimal(value)
}

/// Age as entered: whole years without decimals.
pub fn format_age(age: f64) -> String {
    if age.fract() == 0.0 {
        format!("{age:.0}")
    } else {
        one_decimal(age)
    }
}

fn one_decimal(value: f64) -> String {
    format!("{value:.1}").replace('.', ",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_group_thousands_with_dots() {
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(999.0), "999");
        assert_eq!(format_amount(1_000.0), "1.000");
        assert_eq!(format_amount(1_234_567.89), "1.234.568");
        assert_eq!(format_amount(-60_000.0), "-60.000");
        assert_eq!(format_amount(f64::NAN), "-");
    }

    #[test]
    fn currency_puts_sign_before_dollar() {
        assert_eq!(format_currency(745_012.0), "$745.012");
        assert_eq!(format_currency(-1_500.0), "-$1.500");
    }

    #[test]
    fn percent_and_factor_use_decimal_comma() {
        assert_eq!(format_percent(12.34), "12,3%");
        assert_eq!(format_percent(-4.0), "-4,0%");
        assert_eq!(format_factor(0.7), "0,7");
        assert_eq!(format_factor(1.0), "1,0");
    }

    #[test]
    fn ages() {
        assert_eq!(format_age(5.0), "5");
        assert_eq!(format_age(0.5), "0,5");
    }
}
