use anyhow::{bail, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::fmt;
use std::str::FromStr;

/// Point in time before which no further executions are collected.
///
/// Accepts epoch seconds (`1700000000`), an RFC 3339 timestamp (`2024-01-31T12:00:00Z`) or a
/// plain date (`2024-01-31`, interpreted as UTC midnight).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cutoff {
    epoch_seconds: i64,
}

impl Cutoff {
    pub fn from_epoch_seconds(epoch_seconds: i64) -> Self {
        Cutoff { epoch_seconds }
    }

    pub fn epoch_seconds(&self) -> i64 {
        self.epoch_seconds
    }

    /// Returns true if an execution that started at `start_date` lies before the cutoff.
    pub fn is_passed_by(&self, start_date: i64) -> bool {
        start_date < self.epoch_seconds
    }
}

impl FromStr for Cutoff {
    type Err = anyhow::Error;

    fn from_str(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if let Ok(epoch_seconds) = trimmed.parse::<i64>() {
            return Ok(Cutoff::from_epoch_seconds(epoch_seconds));
        }
        if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Cutoff::from_epoch_seconds(timestamp.timestamp()));
        }
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
                return Ok(Cutoff::from_epoch_seconds(
                    Utc.from_utc_datetime(&midnight).timestamp(),
                ));
            }
        }
        bail!(
            "'{}' is not a valid cutoff; use epoch seconds, an RFC 3339 timestamp or YYYY-MM-DD",
            input
        )
    }
}

impl fmt::Display for Cutoff {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match Utc.timestamp_opt(self.epoch_seconds, 0).single() {
            Some(date) => write!(formatter, "{} ({})", self.epoch_seconds, date.to_rfc3339()),
            None => write!(formatter, "{}", self.epoch_seconds),
        }
    }
}
