//! Capacity planning: how many units are needed to carry a load

use crate::semantic::{Quantity, Rate, Value};
use crate::{TallyError, TallyResult, UnitRegistry};
use rust_decimal::Decimal;

/// `ceil(load × (1 + buffer) / capacity)`.
///
/// `buffer` is a fraction (`0.2` for twenty percent headroom). Quantities
/// and rates are normalized to a common unit before dividing.
pub fn requires(
    load: &Value,
    capacity: &Value,
    buffer: Option<Decimal>,
    registry: &UnitRegistry,
) -> TallyResult<Decimal> {
    let buffer = buffer.unwrap_or(Decimal::ZERO);
    if buffer.is_sign_negative() && !buffer.is_zero() {
        return Err(TallyError::negative("capacity buffer", buffer));
    }

    let (load, capacity) = normalize_pair(load, capacity, registry)?;
    if capacity <= Decimal::ZERO {
        return Err(TallyError::OutOfRange {
            context: "capacity".to_string(),
            value: capacity.to_string(),
            range: "(0, ∞)".to_string(),
        });
    }
    if load.is_sign_negative() && !load.is_zero() {
        return Err(TallyError::negative("load", load));
    }

    let needed = Decimal::ONE
        .checked_add(buffer)
        .and_then(|factor| load.checked_mul(factor))
        .and_then(|buffered| buffered.checked_div(capacity))
        .ok_or_else(|| TallyError::overflow("capacity planning"))?;
    Ok(needed.ceil().normalize())
}

/// [`requires`], labelled with a caller-chosen unit (`5 disk`)
pub fn capacity_at(
    load: &Value,
    capacity: &Value,
    unit: &str,
    buffer: Option<Decimal>,
    registry: &UnitRegistry,
) -> TallyResult<Quantity> {
    Ok(Quantity::new(requires(load, capacity, buffer, registry)?, unit.trim()))
}

/// Bring load and capacity to the same unit, returning bare magnitudes
fn normalize_pair(
    load: &Value,
    capacity: &Value,
    registry: &UnitRegistry,
) -> TallyResult<(Decimal, Decimal)> {
    match (load, capacity) {
        (Value::Number(l), Value::Number(c)) => Ok((*l, *c)),
        (Value::Number(l), other) => Ok((*l, magnitude(other, 2)?)),
        (other, Value::Number(c)) => Ok((magnitude(other, 1)?, *c)),

        (Value::Quantity(l), Value::Quantity(c)) => {
            Ok((l.value, registry.convert_value(c.value, &c.unit, &l.unit)?))
        }
        (Value::Rate(l), Value::Rate(c)) => {
            let amount = registry.convert_value(c.amount.value, &c.amount.unit, &l.amount.unit)?;
            Ok((
                l.amount.value / l.per_unit_seconds()?,
                amount / c.per_unit_seconds()?,
            ))
        }
        (Value::Rate(r), Value::Quantity(q)) if registry.is_throughput_unit(&q.unit) => {
            Ok((bits_per_second(r, registry)?, registry.to_base(q.value, &q.unit)?))
        }
        (Value::Quantity(q), Value::Rate(r)) if registry.is_throughput_unit(&q.unit) => {
            Ok((registry.to_base(q.value, &q.unit)?, bits_per_second(r, registry)?))
        }
        (Value::Rate(r), Value::Quantity(q)) => Err(TallyError::incompatible_units(
            format!("{}/{}", r.amount.unit, r.per_unit),
            q.unit.clone(),
        )),
        (Value::Quantity(q), Value::Rate(r)) => Err(TallyError::incompatible_units(
            q.unit.clone(),
            format!("{}/{}", r.amount.unit, r.per_unit),
        )),

        (Value::Currency(l), Value::Currency(c)) => {
            if l.code != c.code {
                return Err(TallyError::IncompatibleCurrencies {
                    from: c.code.clone(),
                    to: l.code.clone(),
                });
            }
            Ok((l.amount, c.amount))
        }

        (l, c) => {
            let (position, found, other) = if matches!(l, Value::Quantity(_) | Value::Rate(_)) {
                (2, c, l)
            } else {
                (1, l, c)
            };
            Err(TallyError::WrongArgumentType {
                function: "requires".to_string(),
                position,
                expected: format!("a value comparable with {}", other.describe()),
                found: found.describe(),
            })
        }
    }
}

fn magnitude(value: &Value, position: usize) -> TallyResult<Decimal> {
    match value {
        Value::Quantity(_) | Value::Rate(_) | Value::Currency(_) => value
            .magnitude()
            .ok_or_else(|| TallyError::Internal(format!("{} has no magnitude", value.type_name()))),
        other => Err(TallyError::WrongArgumentType {
            function: "requires".to_string(),
            position,
            expected: "a number, quantity, rate or currency".to_string(),
            found: other.describe(),
        }),
    }
}

fn bits_per_second(rate: &Rate, registry: &UnitRegistry) -> TallyResult<Decimal> {
    let bits = registry.to_base(rate.amount.value, &rate.amount.unit)?;
    Ok(bits / rate.per_unit_seconds()?)
}
