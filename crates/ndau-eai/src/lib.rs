//! # ndau-eai
//! Ecosystem alignment incentive: the interest ndau accounts earn for holding.
//!
//! - [`table`]: piecewise-constant rate tables and interval slicing
//! - [`lock`]: notice-period locks and their persisted record
//! - [`engine`]: the continuous-compounding factor engine
//! - [`config`]: the rate tables an engine evaluates against

pub mod config;
pub mod engine;
pub mod lock;
pub mod table;
pub mod traits;

pub use config::EaiConfig;
pub use engine::{EaiEngine, calculate, calculate_rate, eai_factor};
pub use lock::{Lock, LockRecord, LockState};
pub use table::{
    DEFAULT_LOCK_BONUS_EAI, DEFAULT_UNLOCKED_EAI, RateSlice, RateSliceRow, RateTable, RateTableRow,
};
pub use traits::EaiCalculator;
