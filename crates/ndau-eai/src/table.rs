//! Piecewise-constant rate tables and the slicing algorithm.
//!
//! A table maps an age to a rate: row `i` applies from `rows[i].from` until
//! the next row starts, the last row applies forever, and every age before
//! the first row earns nothing. Slicing walks an age interval across those
//! steps and reports how long each rate was in force.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use bincode::de::{BorrowDecoder, Decoder};
use bincode::error::DecodeError;
use bincode::{BorrowDecode, Decode};
use ndau_core::constants::{DAY, YEAR};
use ndau_core::error::{ParseError, RateTableError};
use ndau_core::{Duration, Rate};
use serde::{Deserialize, Serialize};

/// Rates for unlocked accounts: 2% from 30 days up to 10% from 270 days.
pub static DEFAULT_UNLOCKED_EAI: LazyLock<RateTable> =
    LazyLock::new(RateTable::default_unlocked);

/// Lock bonus by notice period: 1% at 90 days up to 5% at three years.
pub static DEFAULT_LOCK_BONUS_EAI: LazyLock<RateTable> =
    LazyLock::new(RateTable::default_lock_bonus);

/// One step of a [`RateTable`]. Serialized as the pair `[from, rate]`.
#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Default,
    bincode::Encode,
    bincode::Decode,
)]
#[serde(from = "(Duration, Rate)", into = "(Duration, Rate)")]
pub struct RateTableRow {
    pub from: Duration,
    pub rate: Rate,
}

impl RateTableRow {
    /// A step starting at age `from`.
    pub const fn new(from: Duration, rate: Rate) -> Self {
        Self { from, rate }
    }
}

impl From<(Duration, Rate)> for RateTableRow {
    fn from((from, rate): (Duration, Rate)) -> Self {
        Self { from, rate }
    }
}

impl From<RateTableRow> for (Duration, Rate) {
    fn from(row: RateTableRow) -> Self {
        (row.from, row.rate)
    }
}

impl fmt::Display for RateTableRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.from, self.rate)
    }
}

impl FromStr for RateTableRow {
    type Err = ParseError;

    /// `"<duration>:<rate>"`, e.g. `1d:1%`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (from, rate) = s
            .split_once(':')
            .ok_or_else(|| ParseError::invalid("rate table row", s))?;
        Ok(Self {
            from: from.trim().parse()?,
            rate: rate.parse()?,
        })
    }
}

/// A rate in force for a length of time.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct RateSliceRow {
    pub duration: Duration,
    pub rate: Rate,
}

pub type RateSlice = Vec<RateSliceRow>;

/// Rows sorted by strictly increasing, non-negative `from`.
#[derive(
    Serialize,
    Deserialize,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Default,
    bincode::Encode,
)]
#[serde(try_from = "Vec<RateTableRow>", into = "Vec<RateTableRow>")]
pub struct RateTable {
    rows: Vec<RateTableRow>,
}

/// Index of the step in force, `None` before the first row.
type Step = Option<usize>;

impl RateTable {
    /// Build a table, rejecting negative or out-of-order thresholds.
    pub fn new(rows: Vec<RateTableRow>) -> Result<Self, RateTableError> {
        let table = Self { rows };
        table.validate()?;
        Ok(table)
    }

    /// Checks that thresholds are non-negative and strictly increasing.
    pub fn validate(&self) -> Result<(), RateTableError> {
        for (index, row) in self.rows.iter().enumerate() {
            if row.from.micros() < 0 {
                return Err(RateTableError::NegativeThreshold { index });
            }
            if index > 0 && row.from <= self.rows[index - 1].from {
                return Err(RateTableError::Unsorted { index });
            }
        }
        Ok(())
    }

    /// The table's steps in threshold order.
    pub fn rows(&self) -> &[RateTableRow] {
        &self.rows
    }

    /// True when no age earns anything.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The protocol's unlocked table; see [`DEFAULT_UNLOCKED_EAI`].
    pub fn default_unlocked() -> Self {
        let rows = (1..10)
            .map(|i| RateTableRow::new(Duration(i * 30 * DAY), Rate::from_percent(i as u64 + 1)))
            .collect();
        Self { rows }
    }

    /// The protocol's lock bonus table; see [`DEFAULT_LOCK_BONUS_EAI`].
    pub fn default_lock_bonus() -> Self {
        let rows = [
            (90 * DAY, 1),
            (180 * DAY, 2),
            (YEAR, 3),
            (2 * YEAR, 4),
            (3 * YEAR, 5),
        ]
        .into_iter()
        .map(|(from, pct)| RateTableRow::new(Duration(from), Rate::from_percent(pct)))
        .collect();
        Self { rows }
    }

    /// Rate of the last row starting at or before `point`; zero before the
    /// first row.
    pub fn rate_at(&self, point: Duration) -> Rate {
        self.rate_of(self.step_at(point))
    }

    fn step_at(&self, point: Duration) -> Step {
        self.rows.partition_point(|row| row.from <= point).checked_sub(1)
    }

    fn rate_of(&self, step: Step) -> Rate {
        step.map_or(Rate::ZERO, |i| self.rows[i].rate)
    }

    fn next_threshold(&self, step: Step) -> Option<Duration> {
        let next = step.map_or(0, |i| i + 1);
        self.rows.get(next).map(|row| row.from)
    }

    /// Partitions `[start, end)` along the table's thresholds. `start < end`.
    fn partition(&self, start: Duration, end: Duration) -> Vec<(Step, RateSliceRow)> {
        let mut out = Vec::new();
        let mut cursor = start;
        let mut step = self.step_at(start);
        loop {
            let stop = match self.next_threshold(step) {
                Some(threshold) if threshold < end => threshold,
                _ => end,
            };
            out.push((
                step,
                RateSliceRow {
                    duration: stop - cursor,
                    rate: self.rate_of(step),
                },
            ));
            if stop >= end {
                return out;
            }
            cursor = stop;
            step = Some(step.map_or(0, |i| i + 1));
        }
    }

    /// The rates in force while age runs from `from` to `to`, with the table
    /// read `offset` further along.
    ///
    /// Negative `from` counts as zero. An empty interval yields the single
    /// row `(0, 0%)`. Durations always sum to `to − from`.
    pub fn slice(&self, from: Duration, to: Duration, offset: Duration) -> RateSlice {
        let from = from.max(Duration::ZERO);
        if to <= from {
            return vec![RateSliceRow::default()];
        }
        self.partition(from + offset, to + offset)
            .into_iter()
            .map(|(_, row)| row)
            .collect()
    }

    /// Like [`slice`](Self::slice), except the table stops advancing `freeze`
    /// before the end of the window.
    ///
    /// Sampling is truncated at the notify point `to + offset − |freeze|`;
    /// the rate in force there accrues for the rest of the window, either
    /// by lengthening the last row or, when the notify point sits exactly on
    /// a threshold, as a row of its own. A notify point at or before the
    /// window start gives a single row at that frozen rate.
    pub fn slice_f(
        &self,
        from: Duration,
        to: Duration,
        offset: Duration,
        freeze: Duration,
    ) -> RateSlice {
        let freeze = freeze.abs();
        if freeze == Duration::ZERO {
            return self.slice(from, to, offset);
        }
        let from = from.max(Duration::ZERO);
        if to <= from {
            return vec![RateSliceRow::default()];
        }

        let start = from + offset;
        let notify = to + offset - freeze;
        let frozen = self.step_at(notify);
        if notify <= start {
            return vec![RateSliceRow {
                duration: to - from,
                rate: self.rate_of(frozen),
            }];
        }

        let mut rows = self.partition(start, notify);
        match rows.last_mut() {
            Some((step, row)) if *step == frozen => row.duration = row.duration + freeze,
            _ => rows.push((
                frozen,
                RateSliceRow {
                    duration: freeze,
                    rate: self.rate_of(frozen),
                },
            )),
        }
        rows.into_iter().map(|(_, row)| row).collect()
    }
}

impl<Context> Decode<Context> for RateTable {
    /// Decodes the row vector, then validates it like [`RateTable::new`].
    fn decode<D: Decoder<Context = Context>>(decoder: &mut D) -> Result<Self, DecodeError> {
        let rows: Vec<RateTableRow> = Decode::decode(decoder)?;
        RateTable::new(rows).map_err(|e| DecodeError::OtherString(e.to_string()))
    }
}

impl<'de, Context> BorrowDecode<'de, Context> for RateTable {
    fn borrow_decode<D: BorrowDecoder<'de, Context = Context>>(
        decoder: &mut D,
    ) -> Result<Self, DecodeError> {
        Decode::decode(decoder)
    }
}

impl TryFrom<Vec<RateTableRow>> for RateTable {
    type Error = RateTableError;

    fn try_from(rows: Vec<RateTableRow>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

impl From<RateTable> for Vec<RateTableRow> {
    fn from(table: RateTable) -> Self {
        table.rows
    }
}
