//! # Brazilian-Locale Formatting
//!
//! Display helpers for monetary values and rates using pt-BR conventions:
//! `.` groups thousands, `,` separates decimals, two decimal places.
//!
//! ```text
//! format_brl(1234.5)      -> "R$ 1.234,50"
//! format_brl(-12)         -> "-R$ 12,00"
//! format_percent(41.6585) -> "41,66%"
//! ```
//!
//! Rounding happens here, at display time, and nowhere in the current-regime
//! calculation path.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round a value to two decimal places, midpoint away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format a monetary value as Brazilian reais, e.g. `R$ 1.234,56`.
pub fn format_brl(value: Decimal) -> String {
    let (negative, body) = localized(value);
    if negative {
        format!("-R$ {body}")
    } else {
        format!("R$ {body}")
    }
}

/// Format a percent value (0–100 scale) as `18,00%`.
pub fn format_percent(value: Decimal) -> String {
    let (negative, body) = localized(value);
    if negative {
        format!("-{body}%")
    } else {
        format!("{body}%")
    }
}

/// Round to two places and render the absolute value with pt-BR separators.
fn localized(value: Decimal) -> (bool, String) {
    let mut rounded = round_money(value);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    rounded.set_sign_positive(true);
    rounded.rescale(2);

    let text = rounded.to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    (negative, format!("{},{}", group_thousands(int_part), frac_part))
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn brl_basic() {
        assert_eq!(format_brl(d("1234.56")), "R$ 1.234,56");
        assert_eq!(format_brl(d("0")), "R$ 0,00");
        assert_eq!(format_brl(d("7.5")), "R$ 7,50");
        assert_eq!(format_brl(d("999.999")), "R$ 1.000,00");
    }

    #[test]
    fn brl_large_values_group_every_three_digits() {
        assert_eq!(format_brl(d("1234567.891")), "R$ 1.234.567,89");
        assert_eq!(format_brl(d("100000")), "R$ 100.000,00");
    }

    #[test]
    fn brl_negative() {
        assert_eq!(format_brl(d("-12")), "-R$ 12,00");
        assert_eq!(format_brl(d("-0.001")), "R$ 0,00");
    }

    #[test]
    fn percent_format() {
        assert_eq!(format_percent(d("18")), "18,00%");
        assert_eq!(format_percent(d("41.658536585")), "41,66%");
        assert_eq!(format_percent(d("0.005")), "0,01%");
    }

    #[test]
    fn round_money_midpoint_away_from_zero() {
        assert_eq!(round_money(d("2.345")), d("2.35"));
        assert_eq!(round_money(d("-2.345")), d("-2.35"));
        assert_eq!(round_money(d("2.344")), d("2.34"));
    }
}
