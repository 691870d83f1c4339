//! Date and time-of-day arithmetic
//!
//! Dates move by whole days. Times of day wrap around midnight and keep
//! their UTC offset.

use crate::semantic::{Duration, DurationUnit, TimeValue, Value, SECONDS_PER_DAY};
use crate::{ArithmeticOperation, TallyError, TallyResult};
use chrono::{Days, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_MINUTE: i64 = 60;

/// Date ± Duration, Duration + Date and Date − Date
pub fn date_arithmetic(
    left: &Value,
    op: ArithmeticOperation,
    right: &Value,
) -> TallyResult<Value> {
    match (left, right, op) {
        (Value::Date(date), Value::Duration(duration), ArithmeticOperation::Add)
        | (Value::Duration(duration), Value::Date(date), ArithmeticOperation::Add) => {
            shift_date(*date, whole_days(duration)?).map(Value::Date)
        }
        (Value::Date(date), Value::Duration(duration), ArithmeticOperation::Subtract) => {
            let days = whole_days(duration)?
                .checked_neg()
                .ok_or_else(|| TallyError::overflow("date arithmetic"))?;
            shift_date(*date, days).map(Value::Date)
        }
        (Value::Date(l), Value::Date(r), ArithmeticOperation::Subtract) => {
            let days = l.signed_duration_since(*r).num_days();
            Ok(Value::duration(Decimal::from(days), DurationUnit::Day))
        }
        _ => Err(TallyError::unsupported(
            op.to_string(),
            format!("{} and {}", left.describe(), right.describe()),
        )),
    }
}

/// Time ± Duration, Duration + Time and Time − Time
pub fn time_arithmetic(
    left: &Value,
    op: ArithmeticOperation,
    right: &Value,
) -> TallyResult<Value> {
    match (left, right, op) {
        (Value::Time(time), Value::Duration(duration), ArithmeticOperation::Add)
        | (Value::Duration(duration), Value::Time(time), ArithmeticOperation::Add) => {
            shift_time(time, whole_seconds(duration)?).map(Value::Time)
        }
        (Value::Time(time), Value::Duration(duration), ArithmeticOperation::Subtract) => {
            let seconds = whole_seconds(duration)?
                .checked_neg()
                .ok_or_else(|| TallyError::overflow("time arithmetic"))?;
            shift_time(time, seconds).map(Value::Time)
        }
        (Value::Time(l), Value::Time(r), ArithmeticOperation::Subtract) => {
            let seconds = l.utc_seconds_of_day() - r.utc_seconds_of_day();
            Ok(Value::Duration(Duration::from_seconds(
                Decimal::from(seconds),
                DurationUnit::Minute,
            )))
        }
        _ => Err(TallyError::unsupported(
            op.to_string(),
            format!("{} and {}", left.describe(), right.describe()),
        )),
    }
}

fn shift_date(date: NaiveDate, days: i64) -> TallyResult<NaiveDate> {
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.ok_or_else(|| TallyError::overflow("date arithmetic"))
}

fn shift_time(time: &TimeValue, seconds: i64) -> TallyResult<TimeValue> {
    let total = time
        .seconds_of_day()
        .checked_add(seconds)
        .ok_or_else(|| TallyError::overflow("time arithmetic"))?
        .rem_euclid(SECONDS_PER_DAY);

    let second = total % SECONDS_PER_MINUTE;
    Ok(TimeValue {
        hour: to_field(total / SECONDS_PER_HOUR)?,
        minute: to_field((total % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE)?,
        second: if time.second.is_some() || second != 0 {
            Some(to_field(second)?)
        } else {
            None
        },
        offset_minutes: time.offset_minutes,
    })
}

fn to_field(value: i64) -> TallyResult<u8> {
    u8::try_from(value)
        .map_err(|_| TallyError::Internal(format!("time field {} out of range", value)))
}

/// Whole days in a duration, truncated toward zero
fn whole_days(duration: &Duration) -> TallyResult<i64> {
    (duration.seconds()? / Decimal::from(SECONDS_PER_DAY))
        .trunc()
        .to_i64()
        .ok_or_else(|| TallyError::overflow("date arithmetic"))
}

fn whole_seconds(duration: &Duration) -> TallyResult<i64> {
    duration
        .seconds()?
        .trunc()
        .to_i64()
        .ok_or_else(|| TallyError::overflow("time arithmetic"))
}
