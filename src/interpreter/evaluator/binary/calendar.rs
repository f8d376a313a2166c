use chrono::{NaiveDate, NaiveTime, TimeDelta};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::{
    ast::{BinaryOperator, Range},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Environment},
        types::{
            dates::add_months,
            units::{UnitDef, time_unit},
        },
        value::core::Value,
    },
    util::num::decimal_to_i64_checked,
};

const SECONDS_PER_DAY: Decimal = dec!(86400);

impl Environment {
    /// Evaluates date and time arithmetic.
    ///
    /// - `date ± duration` and `duration + date` shift a date. Whole months
    ///   and years move along the calendar, clamping to the end of a shorter
    ///   month; every other unit is counted in whole days.
    /// - `date - date` is the number of days between them.
    /// - `time ± duration` wraps around midnight.
    /// - `time - time` is the signed distance between two clock readings.
    ///
    /// # Errors
    /// Returns [`RuntimeError::DateOutOfRange`] when a shift leaves the
    /// calendar.
    ///
    /// # Example
    /// ```
    /// use calcmark::{
    ///     ast::{BinaryOperator, Range},
    ///     interpreter::{evaluator::core::Environment, value::core::Value},
    /// };
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let jan_31 = Value::Date(NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
    /// let month = Value::quantity(Decimal::ONE, "month");
    ///
    /// let shifted = Environment::eval_calendar_op(BinaryOperator::Add, &jan_31, &month, Range::point(1, 1));
    /// assert_eq!(shifted.unwrap().to_string(), "Feb 28, 2025");
    /// ```
    pub fn eval_calendar_op(op: BinaryOperator, left: &Value, right: &Value, range: Range) -> EvalResult<Value> {
        use BinaryOperator::{Add, Sub};

        match (left, op, right) {
            (Value::Date(date), Add | Sub, duration @ Value::Duration { .. }) => {
                Self::shift_date(*date, duration, op == Sub, range).map(Value::Date)
            },
            (duration @ Value::Duration { .. }, Add, Value::Date(date)) => {
                Self::shift_date(*date, duration, false, range).map(Value::Date)
            },
            (Value::Date(a), Sub, Value::Date(b)) => {
                let days = a.signed_duration_since(*b).num_days();
                Ok(Value::duration(Decimal::from(days), Self::calendar_unit("day", range)?))
            },
            (Value::Time(time), Add | Sub, duration @ Value::Duration { .. }) => {
                Self::shift_time(*time, duration, op == Sub, range).map(Value::Time)
            },
            (duration @ Value::Duration { .. }, Add, Value::Time(time)) => {
                Self::shift_time(*time, duration, false, range).map(Value::Time)
            },
            (Value::Time(a), Sub, Value::Time(b)) => Self::time_between(*a, *b, range),
            _ => Err(RuntimeError::Incompatible { details: format!("Operator '{op}' cannot be applied to {} and {}",
                                                                   left.kind(),
                                                                   right.kind()),
                                                  range }),
        }
    }

    fn shift_date(date: NaiveDate, duration: &Value, backwards: bool, range: Range) -> EvalResult<NaiveDate> {
        let out_of_range = RuntimeError::DateOutOfRange { range };
        let Value::Duration { amount, unit, .. } = duration else {
            return Err(out_of_range);
        };
        let amount = if backwards { -*amount } else { *amount };

        let months_per_unit = match unit.symbol {
            "month" => Some(1),
            "year" => Some(12),
            _ => None,
        };
        if let Some(per_unit) = months_per_unit
           && amount.fract().is_zero()
        {
            let months = decimal_to_i64_checked(amount, out_of_range.clone())?
                .checked_mul(per_unit)
                .ok_or_else(|| out_of_range.clone())?;
            return add_months(date, months).ok_or(out_of_range);
        }

        let seconds = amount.checked_mul(Self::seconds_of(unit, range)?)
                            .ok_or_else(|| out_of_range.clone())?;
        let days = decimal_to_i64_checked((seconds / SECONDS_PER_DAY).trunc(), out_of_range.clone())?;
        TimeDelta::try_days(days).and_then(|delta| date.checked_add_signed(delta))
                                 .ok_or(out_of_range)
    }

    fn shift_time(time: NaiveTime, duration: &Value, backwards: bool, range: Range) -> EvalResult<NaiveTime> {
        let overflow = RuntimeError::Overflow { range };
        let seconds = duration.duration_seconds().ok_or_else(|| overflow.clone())?;
        let seconds = decimal_to_i64_checked(seconds.round(), overflow.clone())?;
        let seconds = if backwards { -seconds } else { seconds };

        let delta = TimeDelta::try_seconds(seconds).ok_or(overflow)?;
        Ok(time.overflowing_add_signed(delta).0)
    }

    /// `later - earlier` in whole hours when it divides evenly, otherwise
    /// in minutes.
    fn time_between(later: NaiveTime, earlier: NaiveTime, range: Range) -> EvalResult<Value> {
        let seconds = later.signed_duration_since(earlier).num_seconds();
        let (amount, unit) = if seconds % 3600 == 0 {
            (Decimal::from(seconds / 3600), "hour")
        } else {
            (Decimal::from(seconds) / Decimal::from(60), "minute")
        };
        Ok(Value::duration(amount.normalize(), Self::calendar_unit(unit, range)?))
    }

    fn seconds_of(unit: &UnitDef, range: Range) -> EvalResult<Decimal> {
        unit.seconds().ok_or(RuntimeError::DateOutOfRange { range })
    }

    fn calendar_unit(name: &str, range: Range) -> EvalResult<&'static UnitDef> {
        time_unit(name).ok_or_else(|| RuntimeError::InvalidArgument { details: format!("'{name}' is not a unit of time"),
                                                                      range })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Value {
        Value::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn subtracting_dates_counts_days() {
        let range = Range::point(1, 1);
        let days = Environment::eval_calendar_op(BinaryOperator::Sub, &date(2025, 3, 1), &date(2025, 2, 1), range);
        assert_eq!(days.unwrap().to_string(), "28 days");
    }

    #[test]
    fn weeks_are_counted_in_days() {
        let range = Range::point(1, 1);
        let two_weeks = Value::quantity(dec!(2), "weeks");
        let shifted = Environment::eval_calendar_op(BinaryOperator::Sub, &date(2025, 1, 10), &two_weeks, range);
        assert_eq!(shifted, Ok(date(2024, 12, 27)));
    }

    #[test]
    fn times_wrap_at_midnight() {
        let range = Range::point(1, 1);
        let late = Value::Time(NaiveTime::from_hms_opt(23, 30, 0).unwrap());
        let hour = Value::quantity(dec!(1), "hour");

        let wrapped = Environment::eval_calendar_op(BinaryOperator::Add, &late, &hour, range);
        assert_eq!(wrapped.unwrap().to_string(), "00:30");
    }

    #[test]
    fn time_differences() {
        let range = Range::point(1, 1);
        let start = Value::Time(NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        let end = Value::Time(NaiveTime::from_hms_opt(17, 30, 0).unwrap());

        let worked = Environment::eval_calendar_op(BinaryOperator::Sub, &end, &start, range);
        assert_eq!(worked.unwrap().to_string(), "510 minutes");
    }
}
