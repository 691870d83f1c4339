//! `X in Y` conversions
//!
//! The target is a unit spelling, a time unit, a `unit/time` rate spelling
//! or a currency code.

use crate::functions::rates;
use crate::semantic::{Currency, Duration, DurationUnit, Quantity, Rate, Value};
use crate::{Environment, TallyError, TallyResult, UnitRegistry};
use tracing::trace;

/// Convert `value` into `target`
pub fn convert_value(
    value: &Value,
    target: &str,
    env: &Environment,
    registry: &UnitRegistry,
) -> TallyResult<Value> {
    let target = target.trim();
    trace!(value = %value, target, "conversion");

    match value {
        Value::Quantity(quantity) => registry.convert(quantity, target).map(Value::Quantity),

        Value::Number(n) => {
            if let Some(unit) = DurationUnit::parse(target) {
                return Ok(Value::Duration(Duration::new(*n, unit)));
            }
            match currency_target(target).filter(|_| !registry.is_known(target)) {
                Some(code) => Ok(Value::Currency(Currency::new(*n, code))),
                None => Ok(Value::Quantity(Quantity::new(*n, target))),
            }
        }

        Value::Duration(duration) => match DurationUnit::parse(target) {
            Some(unit) => duration.in_unit(unit).map(Value::Duration),
            None => Err(TallyError::incompatible_units(duration.unit.to_string(), target)),
        },

        Value::Rate(rate) => convert_rate(rate, target, registry).map(Value::Rate),

        Value::Currency(currency) => {
            let code = Currency::resolve_code(target)
                .ok_or_else(|| TallyError::incompatible_units(currency.code.clone(), target))?;
            let rate = env
                .resolve_exchange_rate(&currency.code, &code)
                .ok_or_else(|| TallyError::IncompatibleCurrencies {
                    from: currency.code.clone(),
                    to: code.clone(),
                })?;
            let amount = currency
                .amount
                .checked_mul(rate)
                .ok_or_else(|| TallyError::overflow("currency exchange"))?;
            Ok(Value::Currency(Currency::new(amount, code)))
        }

        Value::Date(_) | Value::Time(_) | Value::Boolean(_) => {
            Err(TallyError::unsupported("in", format!("{} to '{}'", value.describe(), target)))
        }
    }
}

/// A bare time unit changes only the denominator; `unit/time` or
/// `unit per time` changes both parts.
fn convert_rate(rate: &Rate, target: &str, registry: &UnitRegistry) -> TallyResult<Rate> {
    if DurationUnit::parse(target).is_some() {
        return rates::convert_rate(rate, target);
    }

    let (unit, per_unit) = split_rate_target(target).ok_or_else(|| {
        TallyError::incompatible_units(format!("{}/{}", rate.amount.unit, rate.per_unit), target)
    })?;
    let retimed = rates::convert_rate(rate, per_unit)?;
    let amount = registry.convert(&retimed.amount, unit)?;
    Rate::new(amount, per_unit)
}

fn split_rate_target(target: &str) -> Option<(&str, &str)> {
    let (unit, per_unit) = target
        .rsplit_once('/')
        .or_else(|| target.rsplit_once(" per "))?;
    let (unit, per_unit) = (unit.trim(), per_unit.trim());
    if unit.is_empty() || DurationUnit::parse(per_unit).is_none() {
        return None;
    }
    Some((unit, per_unit))
}

/// Code for a currency symbol or an uppercase three-letter code
fn currency_target(target: &str) -> Option<String> {
    Currency::resolve_code(target)
        .filter(|code| code == target || !target.chars().any(|c| c.is_ascii_alphabetic()))
}
