//! Nanocents: 10^-11 USD, the unit prices are quoted in.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use ndau_core::error::ParseError;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One US dollar in nanocents.
pub const DOLLAR: i64 = 100_000_000_000;

/// Digits after the decimal point of a dollar amount.
const CENTS_DIGITS: usize = 11;

static DOLLARS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<neg>-?)\$?(?P<dollars>\d+)(?:\.(?P<cents>\d{2,11}))?$")
        .expect("dollar pattern is valid")
});

/// One billionth of one hundredth of a dollar. Integer-only for determinism.
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
pub struct Nanocent(pub i64);

impl Nanocent {
    pub const fn from_dollars(dollars: i64) -> Self {
        Nanocent(dollars.saturating_mul(DOLLAR))
    }

    /// Lossy; for display and float comparisons only.
    pub fn as_dollars_f64(self) -> f64 {
        self.0 as f64 / DOLLAR as f64
    }
}

impl fmt::Display for Nanocent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let dollars = abs / DOLLAR as u64;
        let cents = format!("{:011}", abs % DOLLAR as u64);
        let trimmed = cents.trim_end_matches('0');
        let shown = if trimmed.len() < 2 { &cents[..2] } else { trimmed };
        write!(f, "{sign}${dollars}.{shown}")
    }
}

impl FromStr for Nanocent {
    type Err = ParseError;

    /// `$1,234.56`, `-0.00_000_000_001`, `17`. Fractions need at least two
    /// and at most eleven digits; `,` and `_` separators are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const KIND: &str = "dollars";
        let cleaned: String = s.trim().chars().filter(|c| !matches!(c, ',' | '_')).collect();
        let caps = DOLLARS_RE
            .captures(&cleaned)
            .ok_or_else(|| ParseError::invalid(KIND, s))?;

        let dollars: i128 = caps["dollars"]
            .parse()
            .map_err(|_| ParseError::out_of_range(KIND, s))?;
        let cents: i128 = match caps.name("cents") {
            Some(m) => format!("{:0<width$}", m.as_str(), width = CENTS_DIGITS)
                .parse()
                .map_err(|_| ParseError::invalid(KIND, s))?,
            None => 0,
        };
        let mut nc = dollars
            .checked_mul(DOLLAR as i128)
            .and_then(|d| d.checked_add(cents))
            .ok_or_else(|| ParseError::out_of_range(KIND, s))?;
        if &caps["neg"] == "-" {
            nc = -nc;
        }
        i64::try_from(nc)
            .map(Nanocent)
            .map_err(|_| ParseError::out_of_range(KIND, s))
    }
}
