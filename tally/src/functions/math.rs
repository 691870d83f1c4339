//! General numeric helpers: aggregates, roots and rounding

use crate::semantic::{Currency, Value};
use crate::{TallyError, TallyResult};
use rust_decimal::{Decimal, MathematicalOps};

/// Arithmetic mean of numbers, or of currency amounts sharing one code
pub fn average(function: &str, values: &[Value]) -> TallyResult<Value> {
    aggregate(function, values, |amounts| {
        let total = checked_sum(amounts)?;
        total
            .checked_div(Decimal::from(amounts.len()))
            .ok_or_else(|| TallyError::overflow("average"))
    })
}

pub fn sum(function: &str, values: &[Value]) -> TallyResult<Value> {
    aggregate(function, values, checked_sum)
}

pub fn min(function: &str, values: &[Value]) -> TallyResult<Value> {
    aggregate(function, values, |amounts| {
        amounts
            .iter()
            .copied()
            .min()
            .ok_or_else(|| TallyError::Internal("min of no values".to_string()))
    })
}

pub fn max(function: &str, values: &[Value]) -> TallyResult<Value> {
    aggregate(function, values, |amounts| {
        amounts
            .iter()
            .copied()
            .max()
            .ok_or_else(|| TallyError::Internal("max of no values".to_string()))
    })
}

/// Square root of a non-negative number
pub fn sqrt(value: Decimal) -> TallyResult<Decimal> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(TallyError::negative("sqrt", value));
    }
    value
        .sqrt()
        .map(|root| root.normalize())
        .ok_or_else(|| TallyError::overflow("square root"))
}

/// Absolute value, keeping the value's type and unit
pub fn abs(function: &str, value: &Value) -> TallyResult<Value> {
    map_magnitude(function, value, |m| Ok(m.abs()))
}

pub fn floor(function: &str, value: &Value) -> TallyResult<Value> {
    map_magnitude(function, value, |m| Ok(m.floor()))
}

pub fn ceil(function: &str, value: &Value) -> TallyResult<Value> {
    map_magnitude(function, value, |m| Ok(m.ceil()))
}

/// Round half away from zero to `places` decimal places
pub fn round(function: &str, value: &Value, places: u32) -> TallyResult<Value> {
    map_magnitude(function, value, |m| {
        Ok(m.round_dp_with_strategy(places, rust_decimal::RoundingStrategy::MidpointAwayFromZero))
    })
}

fn checked_sum(amounts: &[Decimal]) -> TallyResult<Decimal> {
    amounts.iter().try_fold(Decimal::ZERO, |acc, amount| {
        acc.checked_add(*amount)
            .ok_or_else(|| TallyError::overflow("sum"))
    })
}

/// Fold numbers into a Number, or same-code currencies into a Currency
fn aggregate(
    function: &str,
    values: &[Value],
    fold: impl Fn(&[Decimal]) -> TallyResult<Decimal>,
) -> TallyResult<Value> {
    let first = values.first().ok_or_else(|| TallyError::WrongArgumentCount {
        function: function.to_string(),
        expected: "at least 1".to_string(),
        found: 0,
    })?;

    match first {
        Value::Number(_) => {
            let amounts = values
                .iter()
                .enumerate()
                .map(|(index, value)| match value {
                    Value::Number(n) => Ok(*n),
                    other => Err(wrong_type(function, index + 1, "a number", other)),
                })
                .collect::<TallyResult<Vec<_>>>()?;
            Ok(Value::Number(fold(&amounts)?))
        }
        Value::Currency(currency) => {
            let amounts = values
                .iter()
                .enumerate()
                .map(|(index, value)| match value {
                    Value::Currency(c) if c.code == currency.code => Ok(c.amount),
                    Value::Currency(c) => Err(TallyError::IncompatibleCurrencies {
                        from: c.code.clone(),
                        to: currency.code.clone(),
                    }),
                    other => Err(wrong_type(function, index + 1, "a currency amount", other)),
                })
                .collect::<TallyResult<Vec<_>>>()?;
            Ok(Value::Currency(Currency::new(fold(&amounts)?, currency.code.clone())))
        }
        other => Err(wrong_type(function, 1, "a number or currency amount", other)),
    }
}

fn map_magnitude(
    function: &str,
    value: &Value,
    f: impl Fn(Decimal) -> TallyResult<Decimal>,
) -> TallyResult<Value> {
    let magnitude = value
        .magnitude()
        .ok_or_else(|| wrong_type(function, 1, "a numeric value", value))?;
    value
        .with_magnitude(f(magnitude)?)
        .ok_or_else(|| TallyError::Internal(format!("{} has no magnitude", value.type_name())))
}

fn wrong_type(function: &str, position: usize, expected: &str, found: &Value) -> TallyError {
    TallyError::WrongArgumentType {
        function: function.to_string(),
        position,
        expected: expected.to_string(),
        found: found.describe(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_average_numbers() {
        let values = [Value::number(2), Value::number(4), Value::number(9)];
        assert_eq!(average("avg", &values).unwrap(), Value::Number(d("5")));
    }

    #[test]
    fn test_average_currency_keeps_code() {
        let values = [
            Value::Currency(Currency::new(d("10"), "USD")),
            Value::Currency(Currency::new(d("15"), "USD")),
        ];
        assert_eq!(average("avg", &values).unwrap().to_string(), "$12.50");
    }

    #[test]
    fn test_average_rejects_mixed_types() {
        let values = [Value::number(1), Value::Boolean(true)];
        assert!(matches!(
            average("avg", &values),
            Err(TallyError::WrongArgumentType { position: 2, .. })
        ));
        assert!(matches!(
            average("avg", &[]),
            Err(TallyError::WrongArgumentCount { .. })
        ));
    }

    #[test]
    fn test_min_max_sum() {
        let values = [Value::number(3), Value::number(-1), Value::number(7)];
        assert_eq!(min("min", &values).unwrap(), Value::number(-1));
        assert_eq!(max("max", &values).unwrap(), Value::number(7));
        assert_eq!(sum("sum", &values).unwrap(), Value::number(9));
    }

    #[test]
    fn test_sqrt() {
        assert_eq!(sqrt(d("144")).unwrap(), d("12"));
        assert!(matches!(sqrt(d("-4")), Err(TallyError::NegativeValue { .. })));
    }

    #[test]
    fn test_rounding_keeps_units() {
        let q = Value::quantity(d("2.345"), "km");
        assert_eq!(round("round", &q, 2).unwrap().to_string(), "2.35 km");
        assert_eq!(floor("floor", &q).unwrap().to_string(), "2 km");
        assert_eq!(ceil("ceil", &q).unwrap().to_string(), "3 km");
        assert_eq!(abs("abs", &Value::number(-4)).unwrap(), Value::number(4));
    }
}
