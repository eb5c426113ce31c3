//! The seam between EAI consumers and the factor engine.

use ndau_core::{Duration, MathError, Ndau, Rate, Timestamp};

use crate::engine::apply_factor;
use crate::lock::Lock;

/// Computes ecosystem alignment incentive for an account.
///
/// Implementations carry their own rate tables; callers supply only the
/// account's state.
pub trait EaiCalculator: Send + Sync {
    /// Growth factor over `(last_eai_calc, block_time]`, scaled by `RATE_DENOM`.
    fn eai_factor(
        &self,
        block_time: Timestamp,
        last_eai_calc: Timestamp,
        waa: Duration,
        lock: Option<&Lock>,
    ) -> Result<u64, MathError>;

    /// Napu to credit to `balance` for the same interval.
    ///
    /// Default implementation applies [`eai_factor`](Self::eai_factor) to the balance.
    fn calculate_eai(
        &self,
        balance: Ndau,
        block_time: Timestamp,
        last_eai_calc: Timestamp,
        waa: Duration,
        lock: Option<&Lock>,
    ) -> Result<Ndau, MathError> {
        let factor = self.eai_factor(block_time, last_eai_calc, waa, lock)?;
        apply_factor(balance, factor)
    }

    /// The instantaneous rate the account earns at `at`, bonus included.
    fn eai_rate(&self, waa: Duration, lock: Option<&Lock>, at: Timestamp) -> Result<Rate, MathError>;
}
