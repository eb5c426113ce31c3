//! Annual interest rates as fixed-point fractions of [`RATE_DENOM`].

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::{ONE_PERCENT, RATE_DENOM};
use crate::error::{MathError, ParseError};

/// Fractional percent digits a rate can express; one raw unit is 10^-10 percent.
pub const RATE_PERCENT_DECIMALS: usize = 10;

static RATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<pct>\d+)(?:\.(?P<frac>\d+))?%\s*$").expect("rate pattern is valid")
});

/// An annual rate; `Rate(RATE_DENOM)` is 100%.
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
pub struct Rate(pub u64);

impl Rate {
    pub const ZERO: Rate = Rate(0);
    pub const ONE: Rate = Rate(RATE_DENOM);

    /// Whole percent. Saturates rather than overflowing.
    pub const fn from_percent(pct: u64) -> Self {
        Rate(pct.saturating_mul(ONE_PERCENT))
    }

    pub const fn raw(self) -> u64 {
        self.0
    }

    pub fn checked_add(self, other: Rate) -> Result<Rate, MathError> {
        self.0.checked_add(other.0).map(Rate).ok_or(MathError::Overflow)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pct = self.0 / ONE_PERCENT;
        let frac = self.0 % ONE_PERCENT;
        if frac == 0 {
            return write!(f, "{pct}%");
        }
        let digits = format!("{frac:010}");
        write!(f, "{pct}.{}%", digits.trim_end_matches('0'))
    }
}

impl FromStr for Rate {
    type Err = ParseError;

    /// `"5%"`, `"0.5%"`, `" 12.3456789012% "`; the percent sign is required.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const KIND: &str = "rate";
        let caps = RATE_RE.captures(s).ok_or_else(|| ParseError::invalid(KIND, s))?;
        let frac = caps.name("frac").map_or("", |m| m.as_str());
        if frac.len() > RATE_PERCENT_DECIMALS {
            return Err(ParseError::TooPrecise {
                kind: KIND,
                input: s.to_string(),
                max: RATE_PERCENT_DECIMALS,
            });
        }
        let pct: u64 = caps["pct"]
            .parse()
            .map_err(|_| ParseError::out_of_range(KIND, s))?;
        let frac: u64 = if frac.is_empty() {
            0
        } else {
            format!("{frac:0<10}")
                .parse()
                .map_err(|_| ParseError::invalid(KIND, s))?
        };
        pct.checked_mul(ONE_PERCENT)
            .and_then(|p| p.checked_add(frac))
            .map(Rate)
            .ok_or_else(|| ParseError::out_of_range(KIND, s))
    }
}
