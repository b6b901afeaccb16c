use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{ChartError, ChartResult};

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

#[must_use]
pub fn datetime_to_epoch_ms(time: DateTime<Utc>) -> i64 {
    time.timestamp_millis()
}

/// Rounds a fractional epoch to the nearest millisecond.
#[must_use]
pub(crate) fn round_epoch(epoch: f64) -> i64 {
    epoch.round() as i64
}
