//! EAI configuration.
//!
//! Provides [`EaiConfig`], the pair of rate tables the engine is evaluated
//! against. Both default to the protocol tables; a partial document only
//! overrides the tables it names.

use ndau_core::Duration;
use serde::{Deserialize, Serialize};

use crate::lock::Lock;
use crate::table::RateTable;

/// Rate tables for EAI evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EaiConfig {
    /// Age-to-rate table for every account.
    pub unlocked: RateTable,
    /// Notice-period-to-bonus table for locked accounts.
    pub lock_bonus: RateTable,
}

impl Default for EaiConfig {
    fn default() -> Self {
        Self {
            unlocked: RateTable::default_unlocked(),
            lock_bonus: RateTable::default_lock_bonus(),
        }
    }
}

impl EaiConfig {
    /// A new lock priced against the configured bonus table.
    pub fn new_lock(&self, notice_period: Duration) -> Lock {
        Lock::new(notice_period, &self.lock_bonus)
    }
}
