//! Epoch-millisecond encoding for timestamp columns.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};

pub fn to_millis(instant: DateTime<Utc>) -> i64 {
    instant.timestamp_millis()
}

pub fn from_millis(millis: i64) -> Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| anyhow!("Timestamp {} is out of range", millis))
}
