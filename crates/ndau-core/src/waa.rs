//! Weighted average age of an account's balance.
//!
//! Age advances with the clock. A credit is weighted as brand new, so it pulls
//! the average toward zero in proportion to its share of the new balance; a
//! debit leaves the average untouched.

use crate::duration::Duration;
use crate::error::MathError;
use crate::math::mul_div_signed;
use crate::ndau::Ndau;

/// Advance `waa` by `since_last_update`, then fold in a transfer.
///
/// For `transfer_qty ≥ 0` and a positive resulting balance the aged value is
/// scaled by `previous_balance / (previous_balance + transfer_qty)`. Debits,
/// and credits that leave the balance at or below zero, only age it.
///
/// Applying two credits one after the other may differ from applying their
/// sum at once by a microsecond, since each step truncates.
pub fn update_waa(
    waa: Duration,
    since_last_update: Duration,
    transfer_qty: Ndau,
    previous_balance: Ndau,
) -> Result<Duration, MathError> {
    let aged = waa.checked_add(since_last_update)?;
    if transfer_qty.napu() < 0 {
        return Ok(aged);
    }
    let new_balance = previous_balance.checked_add(transfer_qty)?;
    if new_balance.napu() <= 0 {
        return Ok(aged);
    }
    mul_div_signed(aged.micros(), previous_balance.napu(), new_balance.napu()).map(Duration)
}
