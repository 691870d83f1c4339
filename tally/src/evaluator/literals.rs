//! Literal payload parsing
//!
//! The parser hands literal nodes over as source text. This module turns
//! that text into values.

use crate::semantic::{Currency, Duration, DurationUnit, Quantity, Rate, TimeValue, Value};
use crate::{TallyError, TallyResult};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

const PERCENT_DENOMINATOR: i64 = 100;

/// Accepted date layouts, tried in order
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

/// Largest UTC offset accepted, in hours
const MAX_OFFSET_HOURS: i16 = 14;

static NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([+-]?)(\d*\.?\d+)([eE][+-]?\d+)?\s*([kKmMbBtT])?\s*(%)?$")
        .expect("number pattern is a valid regex")
});

static TIME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(\d{1,2}):(\d{2})(?::(\d{2}))?\s*([ap]m)?\s*(z|utc|[+-]\d{2}:?\d{2})?$",
    )
    .expect("time pattern is a valid regex")
});

/// Parse a number literal.
///
/// Accepts `,` and `_` digit separators, scientific notation, a `k`/`m`/`b`/`t`
/// magnitude suffix and a trailing `%` (which divides by 100).
pub fn parse_number(text: &str) -> TallyResult<Decimal> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();
    let captures = NUMBER_PATTERN
        .captures(&cleaned)
        .ok_or_else(|| TallyError::invalid_literal("number", text))?;

    let sign = captures.get(1).map_or("", |m| m.as_str());
    let digits = captures.get(2).map_or("", |m| m.as_str());
    let leading_zero = if digits.starts_with('.') { "0" } else { "" };
    let mantissa = format!("{}{}{}", sign, leading_zero, digits);

    let mut value = match captures.get(3) {
        Some(exponent) => Decimal::from_scientific(&format!("{}{}", mantissa, exponent.as_str())),
        None => Decimal::from_str(&mantissa),
    }
    .map_err(|_| TallyError::invalid_literal("number", text))?;

    if let Some(suffix) = captures.get(4) {
        let multiplier = match suffix.as_str().to_ascii_lowercase().as_str() {
            "k" => Decimal::from(1_000i64),
            "m" => Decimal::from(1_000_000i64),
            "b" => Decimal::from(1_000_000_000i64),
            _ => Decimal::from(1_000_000_000_000i64),
        };
        value = value
            .checked_mul(multiplier)
            .ok_or_else(|| TallyError::overflow(format!("number literal '{}'", text)))?;
    }

    if captures.get(5).is_some() {
        value /= Decimal::from(PERCENT_DENOMINATOR);
    }

    Ok(value)
}

/// `true`/`yes`/`on` and `false`/`no`/`off`, case-insensitive
pub fn parse_boolean(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" => Some(true),
        "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn parse_currency(amount: &str, currency: &str) -> TallyResult<Currency> {
    let code = Currency::resolve_code(currency)
        .ok_or_else(|| TallyError::invalid_literal("currency", currency))?;
    Ok(Currency::new(parse_number(amount)?, code))
}

pub fn parse_date(text: &str) -> TallyResult<NaiveDate> {
    let trimmed = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| TallyError::invalid_literal("date", text))
}

/// Parse `HH:MM[:SS]` with an optional `am`/`pm` marker and UTC offset
pub fn parse_time(text: &str) -> TallyResult<TimeValue> {
    let invalid = || TallyError::invalid_literal("time", text);
    let captures = TIME_PATTERN.captures(text.trim()).ok_or_else(invalid)?;

    let field = |index: usize| -> TallyResult<Option<u8>> {
        captures
            .get(index)
            .map(|m| m.as_str().parse::<u8>().map_err(|_| invalid()))
            .transpose()
    };
    let mut hour = field(1)?.ok_or_else(invalid)?;
    let minute = field(2)?.ok_or_else(invalid)?;
    let second = field(3)?;

    if let Some(meridiem) = captures.get(4) {
        if !(1..=12).contains(&hour) {
            return Err(invalid());
        }
        let pm = meridiem.as_str().eq_ignore_ascii_case("pm");
        hour = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, true) => h + 12,
            (h, false) => h,
        };
    }
    if hour > 23 || minute > 59 || second.is_some_and(|s| s > 59) {
        return Err(invalid());
    }

    let offset_minutes = captures
        .get(5)
        .map(|m| parse_offset(m.as_str()).ok_or_else(invalid))
        .transpose()?;

    Ok(TimeValue {
        hour,
        minute,
        second,
        offset_minutes,
    })
}

fn parse_offset(text: &str) -> Option<i16> {
    if text.eq_ignore_ascii_case("z") || text.eq_ignore_ascii_case("utc") {
        return Some(0);
    }
    let sign: i16 = if text.starts_with('-') { -1 } else { 1 };
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != 4 {
        return None;
    }
    let hours: i16 = digits[..2].parse().ok()?;
    let minutes: i16 = digits[2..].parse().ok()?;
    if hours > MAX_OFFSET_HOURS || minutes > 59 {
        return None;
    }
    Some(sign * (hours * 60 + minutes))
}

pub fn parse_duration(amount: &str, unit: &str) -> TallyResult<Duration> {
    let unit = DurationUnit::parse_keyword(unit)?;
    Ok(Duration::new(parse_number(amount)?, unit))
}

/// A quantity literal; a time-unit spelling yields a duration instead
pub fn parse_quantity(amount: &str, unit: &str) -> TallyResult<Value> {
    let value = parse_number(amount)?;
    let unit = unit.trim();
    if unit.is_empty() {
        return Err(TallyError::invalid_literal("quantity", amount));
    }
    Ok(match DurationUnit::parse(unit) {
        Some(time_unit) => Value::Duration(Duration::new(value, time_unit)),
        None => Value::Quantity(Quantity::new(value, unit)),
    })
}

pub fn parse_rate(amount: &str, unit: &str, per_unit: &str) -> TallyResult<Rate> {
    let unit = unit.trim();
    if unit.is_empty() {
        return Err(TallyError::invalid_literal("rate", format!("{} /{}", amount, per_unit)));
    }
    Rate::new(Quantity::new(parse_number(amount)?, unit), per_unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_number_forms() {
        assert_eq!(parse_number("42").unwrap(), d("42"));
        assert_eq!(parse_number("-3.5").unwrap(), d("-3.5"));
        assert_eq!(parse_number(".5").unwrap(), d("0.5"));
        assert_eq!(parse_number("1,000,000").unwrap(), d("1000000"));
        assert_eq!(parse_number("1_000").unwrap(), d("1000"));
        assert_eq!(parse_number("1.2k").unwrap(), d("1200"));
        assert_eq!(parse_number("3M").unwrap(), d("3000000"));
        assert_eq!(parse_number("2b").unwrap(), d("2000000000"));
        assert_eq!(parse_number("1e3").unwrap(), d("1000"));
        assert_eq!(parse_number("20%").unwrap(), d("0.2"));
        assert_eq!(parse_number("99.9%").unwrap(), d("0.999"));
    }

    #[test]
    fn test_parse_number_rejects_garbage() {
        assert!(matches!(
            parse_number("twelve"),
            Err(TallyError::InvalidLiteral { .. })
        ));
        assert!(parse_number("").is_err());
        assert!(parse_number("1.2.3").is_err());
    }

    #[test]
    fn test_parse_boolean_keywords() {
        assert_eq!(parse_boolean("Yes"), Some(true));
        assert_eq!(parse_boolean("off"), Some(false));
        assert_eq!(parse_boolean("maybe"), None);
    }

    #[test]
    fn test_parse_date_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_date("2024-01-15").unwrap(), expected);
        assert_eq!(parse_date("2024/01/15").unwrap(), expected);
        assert_eq!(parse_date("Jan 15, 2024").unwrap(), expected);
        assert_eq!(parse_date("January 15, 2024").unwrap(), expected);
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn test_parse_time_forms() {
        let t = parse_time("14:30").unwrap();
        assert_eq!((t.hour, t.minute, t.second, t.offset_minutes), (14, 30, None, None));

        let t = parse_time("2:05 pm").unwrap();
        assert_eq!((t.hour, t.minute), (14, 5));

        let t = parse_time("12:00am").unwrap();
        assert_eq!(t.hour, 0);

        let t = parse_time("09:15:30 +02:00").unwrap();
        assert_eq!(t.second, Some(30));
        assert_eq!(t.offset_minutes, Some(120));

        assert_eq!(parse_time("23:00Z").unwrap().offset_minutes, Some(0));
        assert_eq!(parse_time("23:00 UTC").unwrap().offset_minutes, Some(0));
        assert_eq!(parse_time("08:00-0530").unwrap().offset_minutes, Some(-330));
    }

    #[test]
    fn test_parse_time_rejects_out_of_range() {
        assert!(parse_time("24:00").is_err());
        assert!(parse_time("13:00 pm").is_err());
        assert!(parse_time("10:60").is_err());
        assert!(parse_time("10:00 +15:00").is_err());
    }

    #[test]
    fn test_quantity_with_time_unit_is_duration() {
        assert_eq!(
            parse_quantity("3", "hours").unwrap(),
            Value::duration(d("3"), DurationUnit::Hour)
        );
        assert_eq!(
            parse_quantity("5", "apples").unwrap(),
            Value::quantity(d("5"), "apples")
        );
    }

    #[test]
    fn test_rate_requires_time_denominator() {
        assert!(parse_rate("100", "MB", "s").is_ok());
        assert!(matches!(
            parse_rate("100", "MB", "apple"),
            Err(TallyError::UnknownKeyword { .. })
        ));
    }
}
