//! Account locks.
//!
//! A lock commits a balance for a notice period. Until notified the account
//! accrues as if it were `notice_period` older than it is; once notified the
//! clock on that extra age stops, and after `unlocks_on` the lock no longer
//! applies.

use ndau_core::error::LockError;
use ndau_core::{Duration, Rate, Timestamp};
use serde::{Deserialize, Serialize};

use crate::table::RateTable;

/// Where a lock stands at a given moment. No lock at all is simply `None`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LockState {
    Locked,
    Notified,
    Expired,
}

/// A lock on an account's balance.
///
/// The bonus rate is fixed when the lock is created and is not part of the
/// persisted [`LockRecord`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Lock {
    notice_period: Duration,
    unlocks_on: Option<Timestamp>,
    bonus_rate: Rate,
}

/// The persisted form of a lock: `{"notice": .., "unlock": ..}`.
#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    bincode::Encode,
    bincode::Decode,
)]
pub struct LockRecord {
    #[serde(rename = "notice")]
    pub notice_period: Duration,
    #[serde(rename = "unlock")]
    pub unlocks_on: Option<Timestamp>,
}

impl Lock {
    /// A fresh, un-notified lock whose bonus is read from `bonus_table` at the
    /// notice period.
    pub fn new(notice_period: Duration, bonus_table: &RateTable) -> Self {
        Self::with_bonus_rate(notice_period, bonus_table.rate_at(notice_period))
    }

    /// A fresh, un-notified lock with an explicit bonus rate.
    pub fn with_bonus_rate(notice_period: Duration, bonus_rate: Rate) -> Self {
        Self {
            notice_period,
            unlocks_on: None,
            bonus_rate,
        }
    }

    /// Rebuild a lock from its persisted record and the bonus fixed at creation.
    pub fn from_record(record: LockRecord, bonus_rate: Rate) -> Self {
        Self {
            notice_period: record.notice_period,
            unlocks_on: record.unlocks_on,
            bonus_rate,
        }
    }

    /// The persisted form of this lock.
    pub fn record(&self) -> LockRecord {
        LockRecord {
            notice_period: self.notice_period,
            unlocks_on: self.unlocks_on,
        }
    }

    /// How long notice takes to run out.
    pub fn notice_period(&self) -> Duration {
        self.notice_period
    }

    /// When the lock ends, once notified.
    pub fn unlocks_on(&self) -> Option<Timestamp> {
        self.unlocks_on
    }

    /// Rate added on top of the age-based rate while locked.
    pub fn bonus_rate(&self) -> Rate {
        self.bonus_rate
    }

    /// Whether notice has been given.
    pub fn is_notified(&self) -> bool {
        self.unlocks_on.is_some()
    }

    /// When notice was given.
    pub fn notified_at(&self) -> Option<Timestamp> {
        self.unlocks_on.map(|u| u - self.notice_period)
    }

    /// Give notice at `at`. A lock can only be notified once.
    pub fn notify(&mut self, at: Timestamp) -> Result<(), LockError> {
        if self.is_notified() {
            return Err(LockError::AlreadyNotified);
        }
        self.unlocks_on = Some(at + self.notice_period);
        Ok(())
    }

    /// Where the lock stands at `at`.
    pub fn state(&self, at: Timestamp) -> LockState {
        match self.unlocks_on {
            None => LockState::Locked,
            Some(u) if at < u => LockState::Notified,
            Some(_) => LockState::Expired,
        }
    }
}
