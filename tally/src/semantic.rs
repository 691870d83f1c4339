//! Value model
//!
//! The closed set of results an expression can evaluate to. Values are
//! immutable: every operation builds a new one.

use crate::{TallyError, TallyResult};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Decimal places kept when rendering magnitudes
const DISPLAY_DECIMAL_PLACES: u32 = 10;

/// Canonical rendering of a decimal magnitude.
///
/// Rounds to 10 places and strips trailing zeros, so float noise from unit
/// conversion never reaches the output (`11.5240000000000002` → `11.524`).
pub fn format_decimal(value: Decimal) -> String {
    value.round_dp(DISPLAY_DECIMAL_PLACES).normalize().to_string()
}

/// A value produced by evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Number(Decimal),
    Currency(Currency),
    Quantity(Quantity),
    Rate(Rate),
    Duration(Duration),
    Date(NaiveDate),
    Time(TimeValue),
    Boolean(bool),
}

impl Value {
    pub fn number(n: impl Into<Decimal>) -> Self {
        Value::Number(n.into())
    }

    pub fn quantity(value: Decimal, unit: impl Into<String>) -> Self {
        Value::Quantity(Quantity::new(value, unit))
    }

    pub fn duration(value: Decimal, unit: DurationUnit) -> Self {
        Value::Duration(Duration::new(value, unit))
    }

    /// Short type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Currency(_) => "currency",
            Value::Quantity(_) => "quantity",
            Value::Rate(_) => "rate",
            Value::Duration(_) => "duration",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::Boolean(_) => "boolean",
        }
    }

    /// Type name together with the rendered value, e.g. `quantity 5 apples`
    pub fn describe(&self) -> String {
        format!("{} {}", self.type_name(), self)
    }

    /// The scalar magnitude of numeric values
    pub fn magnitude(&self) -> Option<Decimal> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Currency(c) => Some(c.amount),
            Value::Quantity(q) => Some(q.value),
            Value::Rate(r) => Some(r.amount.value),
            Value::Duration(d) => Some(d.value),
            Value::Date(_) | Value::Time(_) | Value::Boolean(_) => None,
        }
    }

    /// Same value type and unit with a different magnitude.
    ///
    /// Returns `None` for values without a magnitude.
    pub fn with_magnitude(&self, magnitude: Decimal) -> Option<Value> {
        match self {
            Value::Number(_) => Some(Value::Number(magnitude)),
            Value::Currency(c) => Some(Value::Currency(c.with_amount(magnitude))),
            Value::Quantity(q) => Some(Value::Quantity(q.with_value(magnitude))),
            Value::Rate(r) => Some(Value::Rate(r.with_amount_value(magnitude))),
            Value::Duration(d) => Some(Value::Duration(Duration::new(magnitude, d.unit))),
            Value::Date(_) | Value::Time(_) | Value::Boolean(_) => None,
        }
    }
}

/// A monetary amount in one currency
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Currency {
    pub amount: Decimal,
    /// Uppercase ISO-style code, e.g. `USD`
    pub code: String,
    pub symbol: Option<String>,
}

/// Symbol ↔ code pairs rendered with a prefix symbol
const CURRENCY_SYMBOLS: &[(&str, &str)] = &[
    ("$", "USD"),
    ("€", "EUR"),
    ("£", "GBP"),
    ("¥", "JPY"),
    ("₹", "INR"),
];

impl Currency {
    /// Build a currency amount from a code, attaching its symbol when one is known
    pub fn new(amount: Decimal, code: impl Into<String>) -> Self {
        let code = code.into().to_uppercase();
        let symbol = CURRENCY_SYMBOLS
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(s, _)| s.to_string());
        Self {
            amount,
            code,
            symbol,
        }
    }

    /// Resolve a symbol (`$`) or a three-letter code (`usd`) to an uppercase code
    pub fn resolve_code(text: &str) -> Option<String> {
        let text = text.trim();
        if let Some((_, code)) = CURRENCY_SYMBOLS.iter().find(|(s, _)| *s == text) {
            return Some(code.to_string());
        }
        if text.len() == 3 && text.chars().all(|c| c.is_ascii_alphabetic()) {
            return Some(text.to_uppercase());
        }
        None
    }

    pub fn with_amount(&self, amount: Decimal) -> Self {
        Self {
            amount,
            code: self.code.clone(),
            symbol: self.symbol.clone(),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.amount.round_dp(2);
        match &self.symbol {
            Some(symbol) => {
                let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
                    "-"
                } else {
                    ""
                };
                write!(f, "{}{}{:.2}", sign, symbol, rounded.abs())
            }
            None => write!(f, "{:.2} {}", rounded, self.code),
        }
    }
}

/// A physical or arbitrary quantity.
///
/// The unit is kept verbatim; whether it is a known unit is decided by the
/// registry at the point of use.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quantity {
    pub value: Decimal,
    pub unit: String,
}

impl Quantity {
    pub fn new(value: Decimal, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }

    pub fn with_value(&self, value: Decimal) -> Self {
        Self {
            value,
            unit: self.unit.clone(),
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", format_decimal(self.value), self.unit)
    }
}

/// An amount per unit of time, e.g. `100 MB/s`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rate {
    pub amount: Quantity,
    /// Time unit spelling as written; always parses as a [`DurationUnit`]
    pub per_unit: String,
}

impl Rate {
    /// Build a rate, rejecting a `per_unit` that is not a time unit
    pub fn new(amount: Quantity, per_unit: impl Into<String>) -> TallyResult<Self> {
        let per_unit = per_unit.into().trim().to_string();
        DurationUnit::parse_keyword(&per_unit)?;
        Ok(Self { amount, per_unit })
    }

    pub fn per_duration_unit(&self) -> TallyResult<DurationUnit> {
        DurationUnit::parse_keyword(&self.per_unit)
    }

    /// Length of the per-unit in seconds
    pub fn per_unit_seconds(&self) -> TallyResult<Decimal> {
        Ok(self.per_duration_unit()?.seconds())
    }

    pub fn with_amount_value(&self, value: Decimal) -> Self {
        Self {
            amount: self.amount.with_value(value),
            per_unit: self.per_unit.clone(),
        }
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}/{}",
            format_decimal(self.amount.value),
            self.amount.unit,
            self.per_unit
        )
    }
}

/// Time units shared by durations and rate denominators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl DurationUnit {
    pub const ALL: [DurationUnit; 7] = [
        DurationUnit::Second,
        DurationUnit::Minute,
        DurationUnit::Hour,
        DurationUnit::Day,
        DurationUnit::Week,
        DurationUnit::Month,
        DurationUnit::Year,
    ];

    /// Fixed length in seconds. A month is 30 days and a year 365 days.
    pub fn seconds(&self) -> Decimal {
        match self {
            DurationUnit::Second => Decimal::ONE,
            DurationUnit::Minute => Decimal::from(60),
            DurationUnit::Hour => Decimal::from(3_600),
            DurationUnit::Day => Decimal::from(86_400),
            DurationUnit::Week => Decimal::from(604_800),
            DurationUnit::Month => Decimal::from(2_592_000),
            DurationUnit::Year => Decimal::from(31_536_000),
        }
    }

    /// Parse a time-unit spelling (case-insensitive, trimmed)
    pub fn parse(s: &str) -> Option<DurationUnit> {
        match s.trim().to_lowercase().as_str() {
            "s" | "sec" | "secs" | "second" | "seconds" => Some(DurationUnit::Second),
            "min" | "mins" | "minute" | "minutes" => Some(DurationUnit::Minute),
            "h" | "hr" | "hrs" | "hour" | "hours" => Some(DurationUnit::Hour),
            "d" | "day" | "days" => Some(DurationUnit::Day),
            "w" | "wk" | "wks" | "week" | "weeks" => Some(DurationUnit::Week),
            "mo" | "mon" | "month" | "months" => Some(DurationUnit::Month),
            "y" | "yr" | "yrs" | "year" | "years" => Some(DurationUnit::Year),
            _ => None,
        }
    }

    /// Like [`DurationUnit::parse`], failing with an unknown-keyword error
    pub fn parse_keyword(s: &str) -> TallyResult<DurationUnit> {
        Self::parse(s).ok_or_else(|| TallyError::UnknownKeyword {
            kind: "time unit".to_string(),
            keyword: s.trim().to_string(),
            expected: "second, minute, hour, day, week, month, year".to_string(),
        })
    }
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationUnit::Second => write!(f, "second"),
            DurationUnit::Minute => write!(f, "minute"),
            DurationUnit::Hour => write!(f, "hour"),
            DurationUnit::Day => write!(f, "day"),
            DurationUnit::Week => write!(f, "week"),
            DurationUnit::Month => write!(f, "month"),
            DurationUnit::Year => write!(f, "year"),
        }
    }
}

/// Elapsed time in one [`DurationUnit`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Duration {
    pub value: Decimal,
    pub unit: DurationUnit,
}

impl Duration {
    pub fn new(value: Decimal, unit: DurationUnit) -> Self {
        Self { value, unit }
    }

    /// Length in seconds; fails when the product leaves the decimal range
    pub fn seconds(&self) -> TallyResult<Decimal> {
        self.value
            .checked_mul(self.unit.seconds())
            .ok_or_else(|| TallyError::overflow(format!("duration {} in seconds", self)))
    }

    pub fn from_seconds(seconds: Decimal, unit: DurationUnit) -> Self {
        Self::new(seconds / unit.seconds(), unit)
    }

    pub fn in_unit(&self, unit: DurationUnit) -> TallyResult<Self> {
        if unit == self.unit {
            return Ok(self.clone());
        }
        Ok(Self::from_seconds(self.seconds()?, unit))
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", format_decimal(self.value), self.unit)
    }
}

/// A time of day with an optional second and UTC offset
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TimeValue {
    pub hour: u8,
    pub minute: u8,
    pub second: Option<u8>,
    /// Offset east of UTC in minutes
    pub offset_minutes: Option<i16>,
}

pub(crate) const SECONDS_PER_DAY: i64 = 86_400;

impl TimeValue {
    pub fn seconds_of_day(&self) -> i64 {
        i64::from(self.hour) * 3_600
            + i64::from(self.minute) * 60
            + i64::from(self.second.unwrap_or(0))
    }

    /// Seconds since midnight UTC, treating a missing offset as UTC
    pub fn utc_seconds_of_day(&self) -> i64 {
        self.seconds_of_day() - i64::from(self.offset_minutes.unwrap_or(0)) * 60
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)?;
        if let Some(second) = self.second {
            write!(f, ":{:02}", second)?;
        }
        match self.offset_minutes {
            None => Ok(()),
            Some(0) => write!(f, "Z"),
            Some(offset) => {
                let sign = if offset >= 0 { "+" } else { "-" };
                let abs = offset.unsigned_abs();
                write!(f, "{}{:02}:{:02}", sign, abs / 60, abs % 60)
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", format_decimal(*n)),
            Value::Currency(c) => write!(f, "{}", c),
            Value::Quantity(q) => write!(f, "{}", q),
            Value::Rate(r) => write!(f, "{}", r),
            Value::Duration(d) => write!(f, "{}", d),
            Value::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Value::Time(t) => write!(f, "{}", t),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}
