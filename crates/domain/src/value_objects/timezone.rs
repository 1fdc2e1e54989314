//! Timezone value object
//!
//! The station reports in one fixed timezone-of-record. Every timestamp shown
//! to callers, and every "today" boundary, is computed in that zone.

use chrono::{DateTime, FixedOffset, LocalResult, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::errors::DomainError;

/// An IANA timezone validated against the chrono-tz database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(Tz);

impl Timezone {
    /// Parse an IANA timezone name such as `Asia/Taipei`
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimezone` if the name is not in the
    /// IANA database.
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        name.trim()
            .parse::<Tz>()
            .map(Self)
            .map_err(|_| DomainError::InvalidTimezone(name.to_string()))
    }

    /// UTC timezone
    #[must_use]
    pub const fn utc() -> Self {
        Self(Tz::UTC)
    }

    /// Asia/Taipei timezone
    #[must_use]
    pub const fn taipei() -> Self {
        Self(Tz::Asia__Taipei)
    }

    /// Get the IANA name
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Get the underlying chrono-tz zone
    #[must_use]
    pub const fn tz(&self) -> Tz {
        self.0
    }

    /// Check if this is a UTC timezone
    #[must_use]
    pub fn is_utc(&self) -> bool {
        matches!(self.name(), "UTC" | "Etc/UTC" | "Etc/GMT")
    }

    /// Express an instant in this timezone, keeping the instant unchanged
    #[must_use]
    pub fn normalize<T: TimeZone>(&self, instant: &DateTime<T>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.0).fixed_offset()
    }

    /// Attach this timezone to a naive local wall-clock time
    ///
    /// Ambiguous local times (DST fall-back) resolve to the earlier instant.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDateTime` if the local time does not exist
    /// in this zone (DST spring-forward gap).
    pub fn localize(&self, local: NaiveDateTime) -> Result<DateTime<FixedOffset>, DomainError> {
        match self.0.from_local_datetime(&local) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Ok(dt.fixed_offset()),
            LocalResult::None => Err(DomainError::InvalidDateTime(format!(
                "{local} does not exist in {}",
                self.name()
            ))),
        }
    }

    /// Local midnight of the day containing `instant`
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDateTime` if midnight is skipped by a DST
    /// transition in this zone.
    pub fn start_of_day<T: TimeZone>(
        &self,
        instant: &DateTime<T>,
    ) -> Result<DateTime<FixedOffset>, DomainError> {
        let local_date = instant.with_timezone(&self.0).date_naive();
        self.localize(local_date.and_time(NaiveTime::MIN))
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self::utc()
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Timezone {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Self::parse(&name).map_err(serde::de::Error::custom)
    }
}
