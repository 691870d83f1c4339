//! Network latency and transfer estimates

use super::keywords::{NetworkType, Scope};
use super::{seconds_or_minutes, size_in_megabytes};
use crate::semantic::{Duration, DurationUnit, Quantity, Rate};
use crate::{TallyError, TallyResult, UnitRegistry};

/// Typical round trip for a network scope, in seconds
pub fn rtt(scope: Scope) -> Duration {
    Duration::new(scope.round_trip_seconds(), DurationUnit::Second)
}

/// Sustained throughput of a link type, in MB/s
pub fn throughput(network: NetworkType) -> TallyResult<Rate> {
    Rate::new(Quantity::new(network.throughput_mbps(), "MB"), "s")
}

/// One round trip plus the time to push `size` through the link
pub fn transfer_time(
    size: &Quantity,
    scope: Scope,
    network: NetworkType,
    registry: &UnitRegistry,
) -> TallyResult<Duration> {
    let megabytes = size_in_megabytes("transfer_time", size, registry)?;
    let seconds = megabytes
        .checked_div(network.throughput_mbps())
        .and_then(|wire| wire.checked_add(scope.round_trip_seconds()))
        .ok_or_else(|| TallyError::overflow("transfer time"))?;
    Ok(seconds_or_minutes(seconds))
}
