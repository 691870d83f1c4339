//! Napkin rounding
//!
//! Rounds magnitudes to a few significant figures. The computational form
//! feeds back into arithmetic; the display form renders K/M/B/T suffixes.

use crate::semantic::{format_decimal, Value};
use crate::{TallyError, TallyResult};
use rust_decimal::{Decimal, RoundingStrategy};

pub const DEFAULT_SIGNIFICANT_FIGURES: u32 = 2;

const SUFFIXES: &[(i64, &str)] = &[
    (1_000_000_000_000, "T"),
    (1_000_000_000, "B"),
    (1_000_000, "M"),
    (1_000, "K"),
];

/// Round to `significant_figures`, halves away from zero
pub fn round(value: Decimal, significant_figures: u32) -> TallyResult<Decimal> {
    if significant_figures == 0 {
        return Err(TallyError::OutOfRange {
            context: "napkin significant figures".to_string(),
            value: "0".to_string(),
            range: "[1, 28]".to_string(),
        });
    }
    if value.is_zero() {
        return Ok(Decimal::ZERO);
    }
    value
        .round_sf_with_strategy(significant_figures, RoundingStrategy::MidpointAwayFromZero)
        .map(|rounded| rounded.normalize())
        .ok_or_else(|| TallyError::overflow("napkin rounding"))
}

/// Computational form: the same value type with its magnitude rounded
pub fn round_value(value: &Value, significant_figures: u32) -> TallyResult<Value> {
    let magnitude = value.magnitude().ok_or_else(|| TallyError::WrongArgumentType {
        function: "napkin".to_string(),
        position: 1,
        expected: "a numeric value".to_string(),
        found: value.describe(),
    })?;
    let rounded = round(magnitude, significant_figures)?;
    value
        .with_magnitude(rounded)
        .ok_or_else(|| TallyError::Internal(format!("{} has no magnitude", value.type_name())))
}

/// Display form of a bare magnitude, e.g. `1234567` → `1.2M`
pub fn format_number(value: Decimal, significant_figures: u32) -> TallyResult<String> {
    let rounded = round(value, significant_figures)?;
    let magnitude = rounded.abs();
    for (scale, suffix) in SUFFIXES {
        let scale = Decimal::from(*scale);
        if magnitude >= scale {
            let scaled = round(rounded / scale, significant_figures)?;
            return Ok(format!("{}{}", format_decimal(scaled), suffix));
        }
    }
    Ok(format_decimal(rounded))
}

/// Display form of a value, keeping its unit or currency marker
pub fn format_value(value: &Value, significant_figures: u32) -> TallyResult<String> {
    match value {
        Value::Number(n) => format_number(*n, significant_figures),
        Value::Currency(c) => {
            let body = format_number(c.amount.abs(), significant_figures)?;
            let sign = if c.amount.is_sign_negative() && !c.amount.is_zero() {
                "-"
            } else {
                ""
            };
            Ok(match &c.symbol {
                Some(symbol) => format!("{}{}{}", sign, symbol, body),
                None => format!("{}{} {}", sign, body, c.code),
            })
        }
        Value::Quantity(q) => Ok(format!(
            "{} {}",
            format_number(q.value, significant_figures)?,
            q.unit
        )),
        Value::Rate(r) => Ok(format!(
            "{} {}/{}",
            format_number(r.amount.value, significant_figures)?,
            r.amount.unit,
            r.per_unit
        )),
        Value::Duration(d) => Ok(format!(
            "{} {}",
            format_number(d.value, significant_figures)?,
            d.unit
        )),
        Value::Date(_) | Value::Time(_) | Value::Boolean(_) => Ok(value.to_string()),
    }
}
