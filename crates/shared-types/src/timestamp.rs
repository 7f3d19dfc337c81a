//! # Canonical Timestamps
//!
//! UTC instants with microsecond precision, rendered as fixed-width ISO-8601
//! with a literal `Z` suffix (`2017-01-02T03:04:05.000123Z`).

use crate::errors::SerializationError;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SubsecRound, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// `strftime` pattern of the canonical form.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// A UTC instant truncated to microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Normalize an instant into canonical form.
    ///
    /// Sub-microsecond precision is truncated. Years outside `0000..=9999`
    /// cannot be written in the fixed-width form and are rejected.
    pub fn new(instant: DateTime<Utc>) -> Result<Self, SerializationError> {
        if !(0..=9999).contains(&instant.year()) {
            return Err(SerializationError::InvalidTimestamp {
                value: instant.to_rfc3339(),
            });
        }
        Ok(Self(instant.trunc_subsecs(6)))
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        Self(Utc::now().trunc_subsecs(6))
    }

    /// Build from calendar fields.
    #[allow(clippy::too_many_arguments)]
    pub fn from_ymd_hms_micro(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        micro: u32,
    ) -> Result<Self, SerializationError> {
        let naive = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_micro_opt(hour, minute, second, micro))
            .ok_or_else(|| SerializationError::InvalidTimestamp {
                value: format!("{year}-{month}-{day} {hour}:{minute}:{second}.{micro}"),
            })?;
        Self::new(Utc.from_utc_datetime(&naive))
    }

    /// Parse the canonical string form. Any other spelling is rejected.
    pub fn parse(value: &str) -> Result<Self, SerializationError> {
        let invalid = || SerializationError::InvalidTimestamp {
            value: value.to_string(),
        };
        let naive = NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|_| invalid())?;
        let parsed = Self::new(Utc.from_utc_datetime(&naive))?;

        // chrono accepts a variable number of fractional digits
        if parsed.to_string() != value {
            return Err(invalid());
        }
        Ok(parsed)
    }

    /// The underlying instant.
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

impl FromStr for Timestamp {
    type Err = SerializationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Serialized as the canonical string.
impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Only the canonical string form is accepted.
impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(de::Error::custom)
    }
}
