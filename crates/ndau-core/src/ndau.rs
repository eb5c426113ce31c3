//! The ndau currency quantity.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::QUANTA_PER_UNIT;
use crate::error::{MathError, ParseError};

/// Most fractional digits a textual ndau amount may carry (one napu).
pub const NDAU_DECIMALS: usize = 8;

static NDAU_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<sign>[-+])?(?P<whole>\d*)(?:\.(?P<frac>\d*))?\s*$")
        .expect("ndau pattern is valid")
});

/// A signed quantity of napu. 1 ndau = 10^8 napu.
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
pub struct Ndau(pub i64);

impl Ndau {
    pub const ZERO: Ndau = Ndau(0);

    pub const fn from_napu(napu: i64) -> Self {
        Ndau(napu)
    }

    /// Whole ndau, failing if the napu count does not fit.
    pub fn from_units(units: i64) -> Result<Self, MathError> {
        units
            .checked_mul(QUANTA_PER_UNIT)
            .map(Ndau)
            .ok_or(MathError::Overflow)
    }

    pub const fn napu(self) -> i64 {
        self.0
    }

    /// Sum, or [`MathError::Overflow`] if it does not fit.
    pub fn checked_add(self, other: Ndau) -> Result<Ndau, MathError> {
        self.0.checked_add(other.0).map(Ndau).ok_or(MathError::Overflow)
    }

    /// Difference, or [`MathError::Overflow`] if it does not fit.
    pub fn checked_sub(self, other: Ndau) -> Result<Ndau, MathError> {
        self.0.checked_sub(other.0).map(Ndau).ok_or(MathError::Overflow)
    }

    /// Absolute value; `i64::MIN` saturates to `i64::MAX`.
    pub fn abs(self) -> Ndau {
        Ndau(self.0.saturating_abs())
    }
}

impl fmt::Display for Ndau {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let napu = self.0.unsigned_abs();
        let quanta = QUANTA_PER_UNIT as u64;
        let whole = napu / quanta;
        let frac = napu % quanta;
        if frac == 0 {
            return write!(f, "{sign}{whole}");
        }
        let digits = format!("{frac:08}");
        write!(f, "{sign}{whole}.{}", digits.trim_end_matches('0'))
    }
}

impl FromStr for Ndau {
    type Err = ParseError;

    /// Accepts `17`, `-0.5`, `.1`, `+3.00000001`; rejects `1%` and anything
    /// finer than one napu.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const KIND: &str = "ndau";
        let caps = NDAU_RE.captures(s).ok_or_else(|| ParseError::invalid(KIND, s))?;
        let whole = caps.name("whole").map_or("", |m| m.as_str());
        let frac = caps.name("frac").map_or("", |m| m.as_str());
        if whole.is_empty() && frac.is_empty() {
            return Err(ParseError::invalid(KIND, s));
        }
        if frac.len() > NDAU_DECIMALS {
            return Err(ParseError::TooPrecise {
                kind: KIND,
                input: s.to_string(),
                max: NDAU_DECIMALS,
            });
        }

        let whole: i128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| ParseError::out_of_range(KIND, s))?
        };
        let frac: i128 = if frac.is_empty() {
            0
        } else {
            format!("{frac:0<8}")
                .parse()
                .map_err(|_| ParseError::invalid(KIND, s))?
        };
        let mut napu = whole
            .checked_mul(QUANTA_PER_UNIT as i128)
            .and_then(|w| w.checked_add(frac))
            .ok_or_else(|| ParseError::out_of_range(KIND, s))?;
        if caps.name("sign").is_some_and(|m| m.as_str() == "-") {
            napu = -napu;
        }
        i64::try_from(napu)
            .map(Ndau)
            .map_err(|_| ParseError::out_of_range(KIND, s))
    }
}
