//! Rate accumulation and re-timing

use crate::semantic::{Duration, DurationUnit, Quantity, Rate};
use crate::{TallyError, TallyResult};

/// Total amount a rate produces over `period`, in the rate's amount unit
pub fn accumulate(rate: &Rate, period: &Duration) -> TallyResult<Quantity> {
    let per_unit_seconds = rate.per_unit_seconds()?;
    let total = rate
        .amount
        .value
        .checked_mul(period.seconds()?)
        .and_then(|scaled| scaled.checked_div(per_unit_seconds))
        .ok_or_else(|| TallyError::overflow("rate accumulation"))?;
    Ok(rate.amount.with_value(total))
}

/// The same rate expressed per `target` time unit, keeping its spelling
pub fn convert_rate(rate: &Rate, target: &str) -> TallyResult<Rate> {
    let target_unit = DurationUnit::parse_keyword(target)?;
    let source_seconds = rate.per_unit_seconds()?;
    let value = rate
        .amount
        .value
        .checked_mul(target_unit.seconds())
        .and_then(|scaled| scaled.checked_div(source_seconds))
        .ok_or_else(|| TallyError::overflow("rate conversion"))?;
    Rate::new(rate.amount.with_value(value), target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_accumulate_over_day() {
        let rate = Rate::new(Quantity::new(d("50"), "GB"), "hour").unwrap();
        let total = accumulate(&rate, &Duration::new(Decimal::ONE, DurationUnit::Day)).unwrap();
        assert_eq!(total.to_string(), "1200 GB");
    }

    #[test]
    fn test_convert_rate_keeps_target_spelling() {
        let rate = Rate::new(Quantity::new(d("1000"), "req"), "min").unwrap();
        let converted = convert_rate(&rate, "s").unwrap();
        assert_eq!(converted.to_string(), "16.6666666667 req/s");

        let daily = convert_rate(&rate, "day").unwrap();
        assert_eq!(daily.to_string(), "1440000 req/day");
    }

    #[test]
    fn test_convert_rate_rejects_non_time_unit() {
        let rate = Rate::new(Quantity::new(d("1"), "req"), "s").unwrap();
        assert!(matches!(
            convert_rate(&rate, "meters"),
            Err(TallyError::UnknownKeyword { .. })
        ));
    }
}
