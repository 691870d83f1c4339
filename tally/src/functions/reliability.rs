//! Availability budgets

use crate::semantic::{Duration, DurationUnit};
use crate::{TallyError, TallyResult};
use rust_decimal::Decimal;

/// Downtime allowed by `availability` over `period`.
///
/// `availability` is a fraction in `[0, 1]` (`0.999` or `99.9%`). The result
/// unit follows the magnitude: seconds under a minute, minutes under an
/// hour, hours otherwise.
pub fn downtime(availability: Decimal, period: &Duration) -> TallyResult<Duration> {
    if availability < Decimal::ZERO || availability > Decimal::ONE {
        return Err(TallyError::OutOfRange {
            context: "availability".to_string(),
            value: availability.to_string(),
            range: "[0, 1]".to_string(),
        });
    }
    let seconds = (Decimal::ONE - availability)
        .checked_mul(period.seconds()?)
        .ok_or_else(|| TallyError::overflow("downtime"))?;
    Ok(Duration::from_seconds(seconds.normalize(), downtime_unit(seconds)))
}

fn downtime_unit(seconds: Decimal) -> DurationUnit {
    if seconds < DurationUnit::Minute.seconds() {
        DurationUnit::Second
    } else if seconds < DurationUnit::Hour.seconds() {
        DurationUnit::Minute
    } else {
        DurationUnit::Hour
    }
}
