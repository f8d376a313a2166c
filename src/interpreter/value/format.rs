use std::fmt;

use chrono::Timelike;
use rust_decimal::Decimal;

use crate::{
    interpreter::{
        types::{dates::format_date, units::lookup_unit},
        value::core::Value,
    },
    util::num::{display_round, group_thousands},
};

/// Formats a plain amount: rounded for display and grouped by thousands.
///
/// # Example
/// ```
/// use calcmark::interpreter::value::format::format_number;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_number(Decimal::new(12345678, 1)), "1,234,567.8");
/// assert_eq!(format_number(Decimal::new(123456, 6)), "0.1235");
/// ```
#[must_use]
pub fn format_number(value: Decimal) -> String {
    group_thousands(&display_round(value).to_string())
}

/// Formats money with exactly two decimals, prefixed by its symbol when it
/// has one and suffixed by its code otherwise.
#[must_use]
pub fn format_currency(amount: Decimal, code: &str, symbol: Option<&str>) -> String {
    let fixed = format!("{:.2}", amount.round_dp(2).abs());
    let grouped = group_thousands(&fixed);
    let sign = if amount.round_dp(2).is_sign_negative() && !amount.round_dp(2).is_zero() {
        "-"
    } else {
        ""
    };

    match symbol {
        Some(symbol) => format!("{sign}{symbol}{grouped}"),
        None => format!("{sign}{grouped} {code}"),
    }
}

/// The unit label to print after `amount`. Long unit names are re-inflected
/// to agree with the amount (`1 meter`, `3 meters`); symbols and unknown
/// units are printed as written.
fn unit_label(amount: Decimal, written: &str) -> String {
    match lookup_unit(written) {
        Some(def) if def.is_long_name(written) => def.name_for(amount).to_string(),
        _ => written.to_string(),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", format_number(*n)),
            Self::Currency { amount, code, symbol } => {
                write!(f, "{}", format_currency(*amount, code, symbol.as_deref()))
            },
            Self::Quantity { amount, unit } => {
                let shown = display_round(*amount);
                write!(f, "{} {}", format_number(*amount), unit_label(shown, unit))
            },
            Self::Date(date) => write!(f, "{}", format_date(*date)),
            Self::Time(time) if time.second() == 0 => write!(f, "{}", time.format("%H:%M")),
            Self::Time(time) => write!(f, "{}", time.format("%H:%M:%S")),
            Self::Duration { amount, unit, written } => {
                let shown = display_round(*amount);
                match written {
                    Some(written) => write!(f, "{} {}", format_number(*amount), unit_label(shown, written)),
                    None => write!(f, "{} {}", format_number(*amount), unit.name_for(shown)),
                }
            },
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Rate { amount, per } => write!(f, "{amount}/{}", per.singular),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn currency_keeps_symbol_or_code() {
        assert_eq!(format_currency(dec!(1200.5), "USD", Some("$")), "$1,200.50");
        assert_eq!(format_currency(dec!(100), "USD", None), "100.00 USD");
        assert_eq!(format_currency(dec!(-3), "EUR", Some("€")), "-€3.00");
    }

    #[test]
    fn long_unit_names_agree_with_amount() {
        assert_eq!(Value::quantity(dec!(1), "meters").to_string(), "1 meter");
        assert_eq!(Value::quantity(dec!(2.5), "kg").to_string(), "2.5 kg");
        assert_eq!(Value::quantity(dec!(3), "day").to_string(), "3 days");
        assert_eq!(Value::quantity(dec!(4), "apples").to_string(), "4 apples");
    }

    #[test]
    fn durations_echo_the_written_unit() {
        assert_eq!(Value::quantity(dec!(5), "h").to_string(), "5 h");
        assert_eq!(Value::quantity(dec!(10), "sec").to_string(), "10 sec");
        assert_eq!(Value::quantity(dec!(2), "hours").to_string(), "2 hours");
        assert_eq!(Value::quantity(dec!(1), "hours").to_string(), "1 hour");
        assert_eq!(Value::quantity(dec!(5), "h").with_amount(dec!(7.5)).to_string(), "7.5 h");

        let minute = lookup_unit("min").unwrap();
        assert_eq!(Value::duration(dec!(1), minute).to_string(), "1 minute");
        assert_eq!(Value::duration(dec!(43.2), minute).to_string(), "43.2 minutes");
    }

    #[test]
    fn dates_and_times() {
        let date = chrono::NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(Value::Date(date).to_string(), "Mar 1, 2025");

        let time = chrono::NaiveTime::from_hms_opt(9, 5, 0).unwrap();
        assert_eq!(Value::Time(time).to_string(), "09:05");
    }
}
