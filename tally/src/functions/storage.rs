//! Storage read timing and compression estimates

use super::keywords::{CompressionType, StorageType};
use super::{seconds_or_minutes, size_in_megabytes};
use crate::semantic::{Duration, DurationUnit, Quantity, Value};
use crate::{TallyError, TallyResult, UnitRegistry};

/// Sequential read time for `size` on a storage class
pub fn read(
    size: &Quantity,
    storage: StorageType,
    registry: &UnitRegistry,
) -> TallyResult<Duration> {
    let megabytes = size_in_megabytes("read", size, registry)?;
    let seconds = megabytes
        .checked_div(storage.read_mbps())
        .ok_or_else(|| TallyError::overflow("read time"))?;
    Ok(seconds_or_minutes(seconds))
}

/// Random access latency of a storage class
pub fn seek(storage: StorageType) -> Duration {
    Duration::new(storage.access_latency_seconds(), DurationUnit::Second)
}

/// Estimated compressed size, in the unit of the input
pub fn compress(size: &Value, compression: CompressionType) -> TallyResult<Value> {
    let magnitude = match size {
        Value::Number(n) => *n,
        Value::Quantity(q) => q.value,
        other => {
            return Err(TallyError::WrongArgumentType {
                function: "compress".to_string(),
                position: 1,
                expected: "a size".to_string(),
                found: other.describe(),
            })
        }
    };
    if magnitude.is_sign_negative() && !magnitude.is_zero() {
        return Err(TallyError::negative("compress size", magnitude));
    }
    let compressed = magnitude
        .checked_div(compression.ratio())
        .ok_or_else(|| TallyError::overflow("compression"))?;
    size.with_magnitude(compressed)
        .ok_or_else(|| TallyError::Internal("compress size has no magnitude".to_string()))
}
