use anyhow::{Error, format_err};
use chrono::{DateTime, NaiveDateTime, TimeZone as ChronoTimeZone, Utc};
use chrono_tz::{Tz, UTC};
use serde::Deserialize;
use stack_string::StackString;
use std::{fmt, str::FromStr};

/// IANA time zone attached to every event we create
#[derive(Debug, PartialEq, Eq, Deserialize, Clone, Copy)]
#[serde(try_from = "StackString")]
pub struct TimeZone(Tz);

impl TimeZone {
    #[must_use]
    pub fn utc() -> Self {
        Self(UTC)
    }

    /// Resolve a wall-clock time in this zone to an instant.
    ///
    /// # Errors
    /// Returns error if the local time is skipped or repeated by a DST
    /// transition
    pub fn local_to_utc(self, local: NaiveDateTime) -> Result<DateTime<Utc>, Error> {
        self.0
            .from_local_datetime(&local)
            .single()
            .map(|d| d.with_timezone(&Utc))
            .ok_or_else(|| format_err!("{local} is not a unique local time in {self}"))
    }
}

impl Default for TimeZone {
    fn default() -> Self {
        Self::utc()
    }
}

impl fmt::Display for TimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.name())
    }
}

impl From<TimeZone> for String {
    fn from(item: TimeZone) -> Self {
        item.0.name().to_string()
    }
}

impl FromStr for TimeZone {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Tz>()
            .map(Self)
            .map_err(|_| format_err!("{s} is not a valid timezone"))
    }
}

impl TryFrom<StackString> for TimeZone {
    type Error = Error;
    fn try_from(item: StackString) -> Result<Self, Self::Error> {
        item.as_str().parse()
    }
}
