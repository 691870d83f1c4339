//! Type-aware arithmetic, comparison and unary operations
//!
//! Dispatches on the operand value types. Results of mixed-unit operations
//! take the unit of the left operand.

use super::datetime;
use crate::functions::rates;
use crate::semantic::{Currency, Duration, Quantity, Rate, Value};
use crate::{
    ArithmeticOperation, ComparisonOperator, Environment, TallyError, TallyResult,
    UnaryOperator, UnitRegistry,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use std::cmp::Ordering;

/// Perform type-aware arithmetic.
///
/// # Examples
/// ```text
/// 5 meters + 3 feet      = 5.9144 meters
/// $10 + $2.50            = $12.50
/// €100 + $10             = €109.20     (with exchange.USD_EUR: 0.92)
/// 1 hour + 30 minutes    = 1.5 hour
/// 100 MB/s * 2 minutes   = 12000 MB
/// 2024-01-15 + 5 days    = 2024-01-20
/// ```
pub fn arithmetic_operation(
    left: &Value,
    op: ArithmeticOperation,
    right: &Value,
    env: &Environment,
    registry: &UnitRegistry,
) -> TallyResult<Value> {
    use ArithmeticOperation::*;

    match (left, right) {
        (Value::Number(l), Value::Number(r)) => Ok(Value::Number(number_arithmetic(*l, op, *r)?)),

        // Currency
        (Value::Currency(l), Value::Currency(r)) => currency_arithmetic(l, op, r, env),
        (Value::Currency(c), Value::Number(n)) => match op {
            Add | Subtract | Multiply | Divide | Modulo => Ok(Value::Currency(
                c.with_amount(number_arithmetic(c.amount, op, *n)?),
            )),
            Power => Err(unsupported(op, left, right)),
        },
        (Value::Number(n), Value::Currency(c)) => match op {
            Multiply => Ok(Value::Currency(
                c.with_amount(number_arithmetic(*n, op, c.amount)?),
            )),
            _ => Err(unsupported(op, left, right)),
        },

        // Quantity
        (Value::Quantity(l), Value::Quantity(r)) => quantity_arithmetic(l, op, r, registry),
        (Value::Quantity(q), Value::Number(n)) => match op {
            Add | Subtract | Multiply | Divide => Ok(Value::Quantity(
                q.with_value(number_arithmetic(q.value, op, *n)?),
            )),
            _ => Err(unsupported(op, left, right)),
        },
        (Value::Number(n), Value::Quantity(q)) => match op {
            Add | Subtract | Multiply => Ok(Value::Quantity(
                q.with_value(number_arithmetic(*n, op, q.value)?),
            )),
            _ => Err(unsupported(op, left, right)),
        },

        // Rate
        (Value::Rate(l), Value::Rate(r)) => rate_arithmetic(l, op, r, registry),
        (Value::Rate(rate), Value::Number(n)) => match op {
            Multiply | Divide => Ok(Value::Rate(
                rate.with_amount_value(number_arithmetic(rate.amount.value, op, *n)?),
            )),
            _ => Err(unsupported(op, left, right)),
        },
        (Value::Number(n), Value::Rate(rate)) => match op {
            Multiply => Ok(Value::Rate(
                rate.with_amount_value(number_arithmetic(*n, op, rate.amount.value)?),
            )),
            _ => Err(unsupported(op, left, right)),
        },
        (Value::Rate(rate), Value::Duration(period)) | (Value::Duration(period), Value::Rate(rate))
            if op == Multiply =>
        {
            Ok(Value::Quantity(rates::accumulate(rate, period)?))
        }

        // Dates and times
        (Value::Date(_), _) | (_, Value::Date(_)) => datetime::date_arithmetic(left, op, right),
        (Value::Time(_), _) | (_, Value::Time(_)) => datetime::time_arithmetic(left, op, right),

        // Duration
        (Value::Duration(l), Value::Duration(r)) => duration_arithmetic(l, op, r),
        (Value::Duration(d), Value::Number(n)) => match op {
            Multiply | Divide => Ok(Value::Duration(Duration::new(
                number_arithmetic(d.value, op, *n)?,
                d.unit,
            ))),
            _ => Err(unsupported(op, left, right)),
        },
        (Value::Number(n), Value::Duration(d)) => match op {
            Multiply => Ok(Value::Duration(Duration::new(
                number_arithmetic(*n, op, d.value)?,
                d.unit,
            ))),
            _ => Err(unsupported(op, left, right)),
        },
        (Value::Duration(d), Value::Quantity(q)) => {
            Err(TallyError::incompatible_units(d.unit.to_string(), q.unit.clone()))
        }
        (Value::Quantity(q), Value::Duration(d)) => {
            Err(TallyError::incompatible_units(q.unit.clone(), d.unit.to_string()))
        }

        _ => Err(unsupported(op, left, right)),
    }
}

/// Same-code amounts combine directly; different codes need an exchange rate
/// and the result is in the left operand's currency.
fn currency_arithmetic(
    left: &Currency,
    op: ArithmeticOperation,
    right: &Currency,
    env: &Environment,
) -> TallyResult<Value> {
    use ArithmeticOperation::*;

    if matches!(op, Multiply | Power) {
        return Err(TallyError::unsupported(
            op.to_string(),
            format!("currency {} and currency {}", left, right),
        ));
    }

    let right_amount = if left.code == right.code {
        right.amount
    } else {
        let rate = env
            .resolve_exchange_rate(&right.code, &left.code)
            .ok_or_else(|| TallyError::IncompatibleCurrencies {
                from: right.code.clone(),
                to: left.code.clone(),
            })?;
        right
            .amount
            .checked_mul(rate)
            .ok_or_else(|| TallyError::overflow("currency exchange"))?
    };

    match op {
        Divide => Ok(Value::Number(number_arithmetic(left.amount, op, right_amount)?)),
        _ => Ok(Value::Currency(
            left.with_amount(number_arithmetic(left.amount, op, right_amount)?),
        )),
    }
}

/// The right operand is converted into the left operand's unit first
fn quantity_arithmetic(
    left: &Quantity,
    op: ArithmeticOperation,
    right: &Quantity,
    registry: &UnitRegistry,
) -> TallyResult<Value> {
    use ArithmeticOperation::*;

    match op {
        Add | Subtract | Multiply | Divide | Modulo => {
            let right_value = registry.convert_value(right.value, &right.unit, &left.unit)?;
            Ok(Value::Quantity(
                left.with_value(number_arithmetic(left.value, op, right_value)?),
            ))
        }
        Power => Err(TallyError::unsupported(
            op.to_string(),
            format!("quantity {} and quantity {}", left, right),
        )),
    }
}

fn rate_arithmetic(
    left: &Rate,
    op: ArithmeticOperation,
    right: &Rate,
    registry: &UnitRegistry,
) -> TallyResult<Value> {
    use ArithmeticOperation::*;

    match op {
        Add | Subtract | Divide => {
            let amount =
                registry.convert_value(right.amount.value, &right.amount.unit, &left.amount.unit)?;
            let left_seconds = left.per_unit_seconds()?;
            let right_seconds = right.per_unit_seconds()?;
            let right_value = amount
                .checked_mul(left_seconds)
                .and_then(|scaled| scaled.checked_div(right_seconds))
                .ok_or_else(|| TallyError::overflow("rate normalisation"))?;
            let result = number_arithmetic(left.amount.value, op, right_value)?;
            Ok(match op {
                Divide => Value::Number(result),
                _ => Value::Rate(left.with_amount_value(result)),
            })
        }
        Multiply | Modulo | Power => Err(TallyError::unsupported(
            op.to_string(),
            format!("rate {} and rate {}", left, right),
        )),
    }
}

/// `+` and `-` combine in seconds; the other operators work in the left unit
fn duration_arithmetic(
    left: &Duration,
    op: ArithmeticOperation,
    right: &Duration,
) -> TallyResult<Value> {
    use ArithmeticOperation::*;

    match op {
        Add | Subtract => {
            let seconds = number_arithmetic(left.seconds()?, op, right.seconds()?)?;
            Ok(Value::Duration(Duration::from_seconds(seconds, left.unit)))
        }
        Multiply | Divide | Modulo => {
            let right_value = right.in_unit(left.unit)?.value;
            Ok(Value::Duration(Duration::new(
                number_arithmetic(left.value, op, right_value)?,
                left.unit,
            )))
        }
        Power => Err(TallyError::unsupported(
            op.to_string(),
            format!("duration {} and duration {}", left, right),
        )),
    }
}

/// Decimal arithmetic with overflow and division-by-zero checks
pub fn number_arithmetic(
    left: Decimal,
    op: ArithmeticOperation,
    right: Decimal,
) -> TallyResult<Decimal> {
    use ArithmeticOperation::*;

    let result = match op {
        Add => left.checked_add(right),
        Subtract => left.checked_sub(right),
        Multiply => left.checked_mul(right),
        Divide => {
            if right.is_zero() {
                return Err(TallyError::DivisionByZero {
                    operator: op.to_string(),
                });
            }
            left.checked_div(right)
        }
        Modulo => {
            if right.is_zero() {
                return Err(TallyError::DivisionByZero {
                    operator: op.to_string(),
                });
            }
            left.checked_rem(right)
        }
        Power => return power(left, right),
    };
    result.ok_or_else(|| TallyError::overflow(op.name()))
}

fn power(base: Decimal, exponent: Decimal) -> TallyResult<Decimal> {
    let op = ArithmeticOperation::Power;
    if base.is_zero() && exponent.is_sign_negative() {
        return Err(TallyError::DivisionByZero {
            operator: op.to_string(),
        });
    }
    let result = if exponent.fract().is_zero() {
        exponent.to_i64().and_then(|e| base.checked_powi(e))
    } else {
        if base.is_sign_negative() {
            return Err(TallyError::OutOfRange {
                context: "fractional exponent base".to_string(),
                value: base.to_string(),
                range: "[0, ∞)".to_string(),
            });
        }
        base.checked_powd(exponent)
    };
    result.ok_or_else(|| TallyError::overflow(op.name()))
}

/// Compare two values.
///
/// Numbers compare with numbers, currencies with the same code, and booleans
/// only for equality.
pub fn comparison_operation(
    left: &Value,
    op: ComparisonOperator,
    right: &Value,
) -> TallyResult<bool> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => Ok(compare_decimals(*l, op, *r)),
        (Value::Currency(l), Value::Currency(r)) => {
            if l.code != r.code {
                return Err(TallyError::IncompatibleCurrencies {
                    from: r.code.clone(),
                    to: l.code.clone(),
                });
            }
            Ok(compare_decimals(l.amount, op, r.amount))
        }
        (Value::Boolean(l), Value::Boolean(r)) => match op {
            ComparisonOperator::Equal => Ok(l == r),
            ComparisonOperator::NotEqual => Ok(l != r),
            _ => Err(TallyError::unsupported(op.to_string(), operands(left, right))),
        },
        _ => Err(TallyError::unsupported(op.to_string(), operands(left, right))),
    }
}

fn compare_decimals(left: Decimal, op: ComparisonOperator, right: Decimal) -> bool {
    let ordering = left.cmp(&right);
    match op {
        ComparisonOperator::GreaterThan => ordering == Ordering::Greater,
        ComparisonOperator::LessThan => ordering == Ordering::Less,
        ComparisonOperator::GreaterThanOrEqual => ordering != Ordering::Less,
        ComparisonOperator::LessThanOrEqual => ordering != Ordering::Greater,
        ComparisonOperator::Equal => ordering == Ordering::Equal,
        ComparisonOperator::NotEqual => ordering != Ordering::Equal,
    }
}

/// Unary minus and plus on numbers and currencies
pub fn unary_operation(op: UnaryOperator, operand: &Value) -> TallyResult<Value> {
    match (op, operand) {
        (UnaryOperator::Negate, Value::Number(n)) => Ok(Value::Number(-*n)),
        (UnaryOperator::Negate, Value::Currency(c)) => {
            Ok(Value::Currency(c.with_amount(-c.amount)))
        }
        (UnaryOperator::Plus, Value::Number(_) | Value::Currency(_)) => Ok(operand.clone()),
        _ => Err(TallyError::unsupported(op.to_string(), operand.describe())),
    }
}

fn operands(left: &Value, right: &Value) -> String {
    format!("{} and {}", left.describe(), right.describe())
}

fn unsupported(op: ArithmeticOperation, left: &Value, right: &Value) -> TallyError {
    TallyError::unsupported(op.to_string(), operands(left, right))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::DurationUnit;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn apply(left: Value, op: ArithmeticOperation, right: Value) -> TallyResult<Value> {
        arithmetic_operation(&left, op, &right, &Environment::new(), UnitRegistry::global())
    }

    #[test]
    fn test_number_arithmetic() {
        use ArithmeticOperation::*;
        assert_eq!(number_arithmetic(d("7"), Add, d("5")).unwrap(), d("12"));
        assert_eq!(number_arithmetic(d("7"), Modulo, d("5")).unwrap(), d("2"));
        assert_eq!(number_arithmetic(d("2"), Power, d("10")).unwrap(), d("1024"));
        assert_eq!(number_arithmetic(d("2"), Power, d("-1")).unwrap(), d("0.5"));
        assert!(matches!(
            number_arithmetic(d("1"), Divide, Decimal::ZERO),
            Err(TallyError::DivisionByZero { .. })
        ));
        assert!(matches!(
            number_arithmetic(d("1"), Modulo, Decimal::ZERO),
            Err(TallyError::DivisionByZero { .. })
        ));
        assert!(matches!(
            number_arithmetic(Decimal::MAX, Add, Decimal::MAX),
            Err(TallyError::Overflow { .. })
        ));
    }

    #[test]
    fn test_quantity_addition_converts_right_operand() {
        let result = apply(
            Value::quantity(d("5"), "meters"),
            ArithmeticOperation::Add,
            Value::quantity(d("3"), "feet"),
        )
        .unwrap();
        assert_eq!(result.to_string(), "5.9144 meters");
    }

    #[test]
    fn test_arbitrary_units_only_combine_with_themselves() {
        let result = apply(
            Value::quantity(d("5"), "apples"),
            ArithmeticOperation::Add,
            Value::quantity(d("3"), "apples"),
        )
        .unwrap();
        assert_eq!(result, Value::quantity(d("8"), "apples"));

        let err = apply(
            Value::quantity(d("5"), "apples"),
            ArithmeticOperation::Add,
            Value::quantity(d("3"), "oranges"),
        )
        .unwrap_err();
        assert!(matches!(err, TallyError::IncompatibleUnits { .. }));
    }

    #[test]
    fn test_quantity_product_and_quotient_keep_left_unit() {
        let quotient = apply(
            Value::quantity(d("1"), "km"),
            ArithmeticOperation::Divide,
            Value::quantity(d("250"), "m"),
        )
        .unwrap();
        assert_eq!(quotient, Value::quantity(d("4"), "km"));

        let product = apply(
            Value::quantity(d("10"), "meters"),
            ArithmeticOperation::Multiply,
            Value::quantity(d("2"), "meters"),
        )
        .unwrap();
        assert_eq!(product.to_string(), "20 meters");

        let power = apply(
            Value::quantity(d("10"), "meters"),
            ArithmeticOperation::Power,
            Value::quantity(d("2"), "meters"),
        );
        assert!(matches!(power, Err(TallyError::UnsupportedOperation { .. })));
    }

    #[test]
    fn test_currency_mismatch_without_rate() {
        let err = apply(
            Value::Currency(Currency::new(d("10"), "USD")),
            ArithmeticOperation::Add,
            Value::Currency(Currency::new(d("10"), "EUR")),
        )
        .unwrap_err();
        assert_eq!(
            err,
            TallyError::IncompatibleCurrencies {
                from: "EUR".to_string(),
                to: "USD".to_string()
            }
        );
    }

    #[test]
    fn test_currency_bridged_by_exchange_rate() {
        let mut env = Environment::new();
        env.set_exchange_rate("USD", "EUR", d("0.92"));
        let result = arithmetic_operation(
            &Value::Currency(Currency::new(d("100"), "EUR")),
            ArithmeticOperation::Add,
            &Value::Currency(Currency::new(d("10"), "USD")),
            &env,
            UnitRegistry::global(),
        )
        .unwrap();
        assert_eq!(result.to_string(), "€109.20");
    }

    #[test]
    fn test_number_times_currency_keeps_currency() {
        let result = apply(
            Value::Number(d("3")),
            ArithmeticOperation::Multiply,
            Value::Currency(Currency::new(d("2.5"), "USD")),
        )
        .unwrap();
        assert_eq!(result.to_string(), "$7.50");
    }

    #[test]
    fn test_rate_sum_uses_left_units() {
        let left = Rate::new(Quantity::new(d("60"), "req"), "min").unwrap();
        let right = Rate::new(Quantity::new(d("2"), "req"), "s").unwrap();
        let result =
            apply(Value::Rate(left), ArithmeticOperation::Add, Value::Rate(right)).unwrap();
        assert_eq!(result.to_string(), "180 req/min");
    }

    #[test]
    fn test_rate_times_duration_accumulates() {
        let rate = Rate::new(Quantity::new(d("100"), "MB"), "s").unwrap();
        let period = Value::duration(d("2"), DurationUnit::Minute);
        let result = apply(Value::Rate(rate), ArithmeticOperation::Multiply, period).unwrap();
        assert_eq!(result, Value::quantity(d("12000"), "MB"));
    }

    #[test]
    fn test_duration_sum_keeps_left_unit() {
        let result = apply(
            Value::duration(d("1"), DurationUnit::Hour),
            ArithmeticOperation::Add,
            Value::duration(d("30"), DurationUnit::Minute),
        )
        .unwrap();
        assert_eq!(result.to_string(), "1.5 hour");
    }

    #[test]
    fn test_duration_product_and_quotient_keep_left_unit() {
        let quotient = apply(
            Value::duration(d("2"), DurationUnit::Hour),
            ArithmeticOperation::Divide,
            Value::duration(d("30"), DurationUnit::Minute),
        )
        .unwrap();
        assert_eq!(quotient.to_string(), "4 hour");

        let product = apply(
            Value::duration(d("2"), DurationUnit::Hour),
            ArithmeticOperation::Multiply,
            Value::duration(d("3"), DurationUnit::Hour),
        )
        .unwrap();
        assert_eq!(product.to_string(), "6 hour");
    }

    #[test]
    fn test_duration_overflow_is_an_error() {
        let huge = Value::duration(d("79228162514264337593543950335"), DurationUnit::Year);
        let result = apply(
            huge,
            ArithmeticOperation::Add,
            Value::duration(d("1"), DurationUnit::Second),
        );
        assert!(matches!(result, Err(TallyError::Overflow { .. })));
    }

    #[test]
    fn test_duration_with_quantity_is_incompatible() {
        let err = apply(
            Value::duration(d("1"), DurationUnit::Hour),
            ArithmeticOperation::Add,
            Value::quantity(d("3"), "meters"),
        )
        .unwrap_err();
        assert!(matches!(err, TallyError::IncompatibleUnits { .. }));
    }

    #[test]
    fn test_boolean_arithmetic_is_unsupported() {
        let err = apply(
            Value::Boolean(true),
            ArithmeticOperation::Add,
            Value::Number(d("1")),
        )
        .unwrap_err();
        assert!(matches!(err, TallyError::UnsupportedOperation { .. }));
    }

    #[test]
    fn test_comparisons() {
        use ComparisonOperator::*;
        assert!(comparison_operation(&Value::number(3), GreaterThan, &Value::number(2)).unwrap());
        assert!(
            comparison_operation(&Value::number(2), LessThanOrEqual, &Value::number(2)).unwrap()
        );
        let (yes, no) = (Value::Boolean(true), Value::Boolean(false));
        assert!(comparison_operation(&yes, NotEqual, &no).unwrap());
        assert!(comparison_operation(&yes, GreaterThan, &no).is_err());
        assert!(matches!(
            comparison_operation(&Value::quantity(d("1"), "m"), Equal, &Value::number(1)),
            Err(TallyError::UnsupportedOperation { .. })
        ));
    }

    #[test]
    fn test_unary() {
        assert_eq!(
            unary_operation(UnaryOperator::Negate, &Value::number(5)).unwrap(),
            Value::number(-5)
        );
        assert_eq!(
            unary_operation(UnaryOperator::Negate, &Value::Currency(Currency::new(d("5"), "USD")))
                .unwrap()
                .to_string(),
            "-$5.00"
        );
        assert!(unary_operation(UnaryOperator::Negate, &Value::Boolean(true)).is_err());
    }
}
