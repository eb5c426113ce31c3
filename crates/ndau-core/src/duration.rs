//! Signed spans of time in microseconds.

use std::fmt;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::{DAY, HOUR, MINUTE, MONTH, SECOND, YEAR};
use crate::error::{MathError, ParseError};

// `M` before `T` is months; after it, minutes.
static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^(?P<neg>-)?p?",
        r"(?:(?P<years>\d+)y)?",
        r"(?:(?P<months>\d{1,2})m)?",
        r"(?:(?P<days>\d{1,2})d)?",
        r"(?:t",
        r"(?:(?P<hours>\d{1,2})h)?",
        r"(?:(?P<minutes>\d{1,2})m)?",
        r"(?:(?P<seconds>\d{1,2})s)?",
        r"(?:(?P<micros>\d{1,6})[μu]s?)?",
        r")?$",
    ))
    .expect("duration pattern is valid")
});

/// A signed span of time in microseconds.
///
/// Arithmetic through the operator traits saturates at the i64 bounds; use
/// [`Duration::checked_add`] where overflow must be reported.
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
pub struct Duration(pub i64);

impl Duration {
    pub const ZERO: Duration = Duration(0);

    pub const fn from_micros(us: i64) -> Self {
        Duration(us)
    }

    pub const fn from_days(days: i64) -> Self {
        Duration(days.saturating_mul(DAY))
    }

    pub const fn micros(self) -> i64 {
        self.0
    }

    pub fn abs(self) -> Duration {
        Duration(self.0.saturating_abs())
    }

    pub fn checked_add(self, other: Duration) -> Result<Duration, MathError> {
        self.0.checked_add(other.0).map(Duration).ok_or(MathError::Overflow)
    }

    pub fn checked_sub(self, other: Duration) -> Result<Duration, MathError> {
        self.0.checked_sub(other.0).map(Duration).ok_or(MathError::Overflow)
    }
}

impl Add for Duration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Duration {
        Duration(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Duration {
    type Output = Duration;

    fn sub(self, rhs: Duration) -> Duration {
        Duration(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for Duration {
    type Output = Duration;

    fn neg(self) -> Duration {
        Duration(self.0.saturating_neg())
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("t0s");
        }
        if self.0 < 0 {
            f.write_str("-")?;
        }
        let mut rest = self.0.unsigned_abs();
        let mut take = |unit: i64| {
            let n = rest / unit as u64;
            rest %= unit as u64;
            n
        };
        let years = take(YEAR);
        let months = take(MONTH);
        let days = take(DAY);
        let hours = take(HOUR);
        let minutes = take(MINUTE);
        let seconds = take(SECOND);
        let micros = rest;

        for (n, suffix) in [(years, "y"), (months, "m"), (days, "d")] {
            if n > 0 {
                write!(f, "{n}{suffix}")?;
            }
        }
        if hours + minutes + seconds + micros > 0 {
            f.write_str("t")?;
            for (n, suffix) in [(hours, "h"), (minutes, "m"), (seconds, "s"), (micros, "us")] {
                if n > 0 {
                    write!(f, "{n}{suffix}")?;
                }
            }
        }
        Ok(())
    }
}

impl FromStr for Duration {
    type Err = ParseError;

    /// Parses `p1y2m3dt4h5m6s7us` style durations. Every component is
    /// optional; the empty string is zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const KIND: &str = "duration";
        let caps = DURATION_RE.captures(s).ok_or_else(|| ParseError::invalid(KIND, s))?;

        let mut total: i128 = 0;
        for (name, unit) in [
            ("years", YEAR),
            ("months", MONTH),
            ("days", DAY),
            ("hours", HOUR),
            ("minutes", MINUTE),
            ("seconds", SECOND),
            ("micros", 1),
        ] {
            let Some(m) = caps.name(name) else { continue };
            let n: i128 = m.as_str().parse().map_err(|_| ParseError::out_of_range(KIND, s))?;
            total = n
                .checked_mul(unit as i128)
                .and_then(|v| v.checked_add(total))
                .ok_or_else(|| ParseError::out_of_range(KIND, s))?;
        }
        if caps.name("neg").is_some() {
            total = -total;
        }
        i64::try_from(total)
            .map(Duration)
            .map_err(|_| ParseError::out_of_range(KIND, s))
    }
}
