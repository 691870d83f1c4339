//! Domain function library
//!
//! Capacity planning, availability budgets, rate arithmetic, network and
//! storage timing, compression and a few general numeric helpers.
//!
//! Keyword arguments (`rtt(regional)`, `downtime(99.9%, month)`) are read
//! as bare words and never looked up as variables, so arguments reach
//! [`call_function`] unevaluated.

pub mod capacity;
pub mod keywords;
pub mod math;
pub mod network;
pub mod rates;
pub mod reliability;
pub mod storage;

use crate::evaluator::context::EvaluationContext;
use crate::evaluator::expression::evaluate_expression;
use crate::semantic::{Duration, DurationUnit, Quantity, Value};
use crate::{napkin, Expression, TallyError, TallyResult, UnitRegistry};
use keywords::{CompressionType, NetworkType, Scope, StorageType};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::trace;

/// Evaluate a call to a built-in function.
///
/// Names match case-insensitively and `-` is read as `_`, so
/// `Capacity-At` and `capacity_at` are the same function.
pub fn call_function(
    name: &str,
    args: &[Expression],
    context: &mut EvaluationContext,
) -> TallyResult<Value> {
    let function = name.trim().to_lowercase().replace('-', "_");
    trace!(function = %function, args = args.len(), "function call");
    let f = function.as_str();

    match f {
        "requires" => {
            check_arity(f, args, 2, Some(3))?;
            let load = evaluate_expression(&args[0], context)?;
            let capacity = evaluate_expression(&args[1], context)?;
            let buffer = optional_number(f, args, 2, context)?;
            capacity::requires(&load, &capacity, buffer, context.registry).map(Value::Number)
        }
        "capacity_at" => {
            check_arity(f, args, 3, Some(4))?;
            let load = evaluate_expression(&args[0], context)?;
            let capacity = evaluate_expression(&args[1], context)?;
            let unit = keyword_arg(f, args, 2)?;
            let buffer = optional_number(f, args, 3, context)?;
            capacity::capacity_at(&load, &capacity, unit, buffer, context.registry)
                .map(Value::Quantity)
        }
        "downtime" => {
            check_arity(f, args, 2, Some(2))?;
            let availability = number_arg(f, 1, &evaluate_expression(&args[0], context)?)?;
            let period = period_arg(f, args, 1, context)?;
            reliability::downtime(availability, &period).map(Value::Duration)
        }
        "accumulate" => {
            check_arity(f, args, 2, Some(2))?;
            let rate = match evaluate_expression(&args[0], context)? {
                Value::Rate(rate) => rate,
                other => return Err(wrong_type(f, 1, "a rate", &other)),
            };
            let period = period_arg(f, args, 1, context)?;
            rates::accumulate(&rate, &period).map(Value::Quantity)
        }
        "convert_rate" => {
            check_arity(f, args, 2, Some(2))?;
            let rate = match evaluate_expression(&args[0], context)? {
                Value::Rate(rate) => rate,
                other => return Err(wrong_type(f, 1, "a rate", &other)),
            };
            let target = match args[1].as_keyword() {
                Some(word) => word.to_string(),
                None => period_arg(f, args, 1, context)?.unit.to_string(),
            };
            rates::convert_rate(&rate, &target).map(Value::Rate)
        }
        "rtt" => {
            check_arity(f, args, 1, Some(1))?;
            let scope: Scope = keyword_arg(f, args, 0)?.parse()?;
            Ok(Value::Duration(network::rtt(scope)))
        }
        "throughput" => {
            check_arity(f, args, 1, Some(1))?;
            let link: NetworkType = keyword_arg(f, args, 0)?.parse()?;
            network::throughput(link).map(Value::Rate)
        }
        "transfer_time" => {
            check_arity(f, args, 3, Some(3))?;
            let size = quantity_arg(f, 1, evaluate_expression(&args[0], context)?)?;
            let scope: Scope = keyword_arg(f, args, 1)?.parse()?;
            let link: NetworkType = keyword_arg(f, args, 2)?.parse()?;
            network::transfer_time(&size, scope, link, context.registry).map(Value::Duration)
        }
        "read" => {
            check_arity(f, args, 2, Some(2))?;
            let size = quantity_arg(f, 1, evaluate_expression(&args[0], context)?)?;
            let storage: StorageType = keyword_arg(f, args, 1)?.parse()?;
            storage::read(&size, storage, context.registry).map(Value::Duration)
        }
        "seek" => {
            check_arity(f, args, 1, Some(1))?;
            let storage: StorageType = keyword_arg(f, args, 0)?.parse()?;
            Ok(Value::Duration(storage::seek(storage)))
        }
        "compress" => {
            check_arity(f, args, 2, Some(2))?;
            let size = evaluate_expression(&args[0], context)?;
            let compression: CompressionType = keyword_arg(f, args, 1)?.parse()?;
            storage::compress(&size, compression)
        }
        "napkin" => {
            check_arity(f, args, 1, Some(2))?;
            let value = evaluate_expression(&args[0], context)?;
            let figures = match optional_number(f, args, 1, context)? {
                Some(n) => n
                    .to_u32()
                    .filter(|_| n.fract().is_zero())
                    .ok_or_else(|| TallyError::OutOfRange {
                        context: "napkin significant figures".to_string(),
                        value: n.to_string(),
                        range: "[1, 28]".to_string(),
                    })?,
                None => context.limits.napkin_significant_figures,
            };
            napkin::round_value(&value, figures)
        }
        "avg" | "average" | "sum" | "min" | "max" => {
            check_arity(f, args, 1, None)?;
            let values = evaluate_args(args, context)?;
            match f {
                "sum" => math::sum(f, &values),
                "min" => math::min(f, &values),
                "max" => math::max(f, &values),
                _ => math::average(f, &values),
            }
        }
        "sqrt" => {
            check_arity(f, args, 1, Some(1))?;
            let value = number_arg(f, 1, &evaluate_expression(&args[0], context)?)?;
            math::sqrt(value).map(Value::Number)
        }
        "abs" | "floor" | "ceil" => {
            check_arity(f, args, 1, Some(1))?;
            let value = evaluate_expression(&args[0], context)?;
            match f {
                "abs" => math::abs(f, &value),
                "floor" => math::floor(f, &value),
                _ => math::ceil(f, &value),
            }
        }
        "round" => {
            check_arity(f, args, 1, Some(2))?;
            let value = evaluate_expression(&args[0], context)?;
            let places = match optional_number(f, args, 1, context)? {
                Some(n) => n
                    .to_u32()
                    .filter(|_| n.fract().is_zero())
                    .ok_or_else(|| TallyError::OutOfRange {
                        context: "round decimal places".to_string(),
                        value: n.to_string(),
                        range: "[0, 28]".to_string(),
                    })?,
                None => 0,
            };
            math::round(f, &value, places)
        }
        _ => Err(TallyError::UnknownFunction {
            name: name.to_string(),
        }),
    }
}

fn check_arity(
    function: &str,
    args: &[Expression],
    min: usize,
    max: Option<usize>,
) -> TallyResult<()> {
    let found = args.len();
    let within = found >= min && max.map_or(true, |max| found <= max);
    if within {
        return Ok(());
    }
    let expected = match max {
        Some(max) if max == min => min.to_string(),
        Some(max) => format!("{} to {}", min, max),
        None => format!("at least {}", min),
    };
    Err(TallyError::WrongArgumentCount {
        function: function.to_string(),
        expected,
        found,
    })
}

fn evaluate_args(args: &[Expression], context: &mut EvaluationContext) -> TallyResult<Vec<Value>> {
    args.iter()
        .map(|arg| evaluate_expression(arg, context))
        .collect()
}

/// A bare-word argument, e.g. `regional` in `rtt(regional)`
fn keyword_arg<'e>(function: &str, args: &'e [Expression], index: usize) -> TallyResult<&'e str> {
    let arg = &args[index];
    arg.as_keyword().ok_or_else(|| TallyError::WrongArgumentType {
        function: function.to_string(),
        position: index + 1,
        expected: "a keyword".to_string(),
        found: arg.to_string(),
    })
}

fn number_arg(function: &str, position: usize, value: &Value) -> TallyResult<Decimal> {
    match value {
        Value::Number(n) => Ok(*n),
        other => Err(wrong_type(function, position, "a number", other)),
    }
}

fn optional_number(
    function: &str,
    args: &[Expression],
    index: usize,
    context: &mut EvaluationContext,
) -> TallyResult<Option<Decimal>> {
    match args.get(index) {
        Some(arg) => {
            let value = evaluate_expression(arg, context)?;
            number_arg(function, index + 1, &value).map(Some)
        }
        None => Ok(None),
    }
}

fn quantity_arg(function: &str, position: usize, value: Value) -> TallyResult<Quantity> {
    match value {
        Value::Quantity(quantity) => Ok(quantity),
        other => Err(wrong_type(function, position, "a quantity", &other)),
    }
}

/// A time-unit keyword (one of that unit) or an expression yielding a Duration
fn period_arg(
    function: &str,
    args: &[Expression],
    index: usize,
    context: &mut EvaluationContext,
) -> TallyResult<Duration> {
    let arg = &args[index];
    if let Some(unit) = arg.as_keyword().and_then(DurationUnit::parse) {
        return Ok(Duration::new(Decimal::ONE, unit));
    }
    match evaluate_expression(arg, context)? {
        Value::Duration(duration) => Ok(duration),
        other => Err(wrong_type(function, index + 1, "a time period", &other)),
    }
}

fn wrong_type(function: &str, position: usize, expected: &str, found: &Value) -> TallyError {
    TallyError::WrongArgumentType {
        function: function.to_string(),
        position,
        expected: expected.to_string(),
        found: found.describe(),
    }
}

/// Size of a data quantity in MB; negative sizes are rejected
pub(crate) fn size_in_megabytes(
    function: &str,
    size: &Quantity,
    registry: &UnitRegistry,
) -> TallyResult<Decimal> {
    if size.value.is_sign_negative() && !size.value.is_zero() {
        return Err(TallyError::negative(format!("{} size", function), size.value));
    }
    registry.convert_value(size.value, &size.unit, "MB")
}

/// Seconds below one minute, minutes otherwise
pub(crate) fn seconds_or_minutes(seconds: Decimal) -> Duration {
    let unit = if seconds < DurationUnit::Minute.seconds() {
        DurationUnit::Second
    } else {
        DurationUnit::Minute
    };
    Duration::from_seconds(seconds, unit)
}
