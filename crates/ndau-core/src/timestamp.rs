//! Points in time, in microseconds since the ndau epoch.

use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{EPOCH_UNIX_MICROS, MAX_TIMESTAMP, MIN_TIMESTAMP, TIMESTAMP_FORMAT};
use crate::duration::Duration;
use crate::error::ParseError;

/// Layouts accepted when parsing. `%.f` also matches an absent fraction.
const PARSE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.fZ", "%Y-%m-%dT%H:%M:%SZ"];

/// Microseconds since 2000-01-01T00:00:00Z. Never negative.
///
/// Adding or subtracting a [`Duration`] saturates at
/// [`MIN_TIMESTAMP`] and [`MAX_TIMESTAMP`].
#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    bincode::Encode,
    bincode::Decode,
)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub const EPOCH: Timestamp = Timestamp(MIN_TIMESTAMP);
    pub const MAX: Timestamp = Timestamp(MAX_TIMESTAMP);

    pub const fn from_micros(us: i64) -> Self {
        Timestamp(us)
    }

    pub const fn micros(self) -> i64 {
        self.0
    }

    /// `self − earlier`. Negative when `earlier` is actually later.
    pub fn since(self, earlier: Timestamp) -> Duration {
        Duration(self.0.saturating_sub(earlier.0))
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Result<Self, ParseError> {
        let us = dt.timestamp_micros() - EPOCH_UNIX_MICROS;
        if us < 0 {
            return Err(ParseError::DateBeforeEpoch);
        }
        Ok(Timestamp(us))
    }

    /// `None` when the instant lies past chrono's representable range.
    pub fn as_datetime(self) -> Option<DateTime<Utc>> {
        self.0
            .checked_add(EPOCH_UNIX_MICROS)
            .and_then(DateTime::from_timestamp_micros)
    }

    fn saturate(self, micros: Option<i64>, toward_max: bool) -> Timestamp {
        match micros {
            Some(us) if us >= MIN_TIMESTAMP => Timestamp(us),
            Some(_) => Timestamp::EPOCH,
            None if toward_max => Timestamp::MAX,
            None => Timestamp::EPOCH,
        }
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Timestamp {
        self.saturate(self.0.checked_add(rhs.0), rhs.0 > 0)
    }
}

impl Sub<Duration> for Timestamp {
    type Output = Timestamp;

    fn sub(self, rhs: Duration) -> Timestamp {
        self.saturate(self.0.checked_sub(rhs.0), rhs.0 < 0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_datetime() {
            Some(dt) => write!(f, "{}", dt.format(TIMESTAMP_FORMAT)),
            None => write!(f, "{}us", self.0),
        }
    }
}

impl FromStr for Timestamp {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let naive = PARSE_FORMATS
            .iter()
            .find_map(|layout| NaiveDateTime::parse_from_str(s.trim(), layout).ok())
            .ok_or_else(|| ParseError::invalid("timestamp", s))?;
        Timestamp::from_datetime(naive.and_utc())
    }
}
