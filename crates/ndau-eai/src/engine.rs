//! EAI factor engine implementing the [`EaiCalculator`] trait.
//!
//! Interest compounds continuously: over a window in which rate `r` applies
//! for time `t`, a balance grows by `e^(r·t/YEAR)`. The window is cut into
//! constant-rate pieces by the age table (see [`RateTable::slice`]) and the
//! per-piece factors are multiplied together. All arithmetic is integer-only
//! with `RATE_DENOM` as the fixed-point denominator.

use ndau_core::constants::{RATE_DENOM, YEAR};
use ndau_core::math::{exp_frac, mul_div_unsigned};
use ndau_core::{Duration, MathError, Ndau, Rate, Timestamp};
use tracing::{debug, trace, warn};

use crate::config::EaiConfig;
use crate::lock::Lock;
use crate::table::{RateSliceRow, RateTable};
use crate::traits::EaiCalculator;

/// The production EAI calculator over a configured pair of tables.
#[derive(Debug, Clone, Default)]
pub struct EaiEngine {
    config: EaiConfig,
}

impl EaiEngine {
    /// Create a new engine over `config`.
    pub fn new(config: EaiConfig) -> Self {
        Self { config }
    }

    /// The tables this engine evaluates against.
    pub fn config(&self) -> &EaiConfig {
        &self.config
    }
}

impl EaiCalculator for EaiEngine {
    fn eai_factor(
        &self,
        block_time: Timestamp,
        last_eai_calc: Timestamp,
        waa: Duration,
        lock: Option<&Lock>,
    ) -> Result<u64, MathError> {
        eai_factor(block_time, last_eai_calc, waa, lock, &self.config.unlocked)
    }

    fn eai_rate(&self, waa: Duration, lock: Option<&Lock>, at: Timestamp) -> Result<Rate, MathError> {
        calculate_rate(waa, lock, &self.config.unlocked, at)
    }
}

/// Growth factor, scaled by `RATE_DENOM`, for an account over
/// `(last_eai_calc, block_time]`.
///
/// `waa` is the account's weighted average age as of `block_time`. A locked
/// account reads the table `notice_period` further along; once notified its
/// effective age stops advancing, and time past `unlocks_on` accrues under
/// unlocked rules.
pub fn eai_factor(
    block_time: Timestamp,
    last_eai_calc: Timestamp,
    waa: Duration,
    lock: Option<&Lock>,
    age_table: &RateTable,
) -> Result<u64, MathError> {
    if block_time < last_eai_calc {
        warn!(
            block_time = block_time.micros(),
            last_eai_calc = last_eai_calc.micros(),
            "EAI requested for a window that ends before it starts; no accrual"
        );
        return Ok(RATE_DENOM);
    }

    if let Some(unlocks_on) = lock.and_then(Lock::unlocks_on) {
        if unlocks_on < block_time {
            if last_eai_calc >= unlocks_on {
                return eai_factor(block_time, last_eai_calc, waa, None, age_table);
            }
            let after_unlock = block_time.since(unlocks_on);
            debug!(
                unlocks_on = unlocks_on.micros(),
                after_unlock = after_unlock.micros(),
                "splitting EAI window at unlock"
            );
            let pre = eai_factor(unlocks_on, last_eai_calc, waa - after_unlock, lock, age_table)?;
            let post = eai_factor(block_time, unlocks_on, waa, None, age_table)?;
            return mul_div_unsigned(pre, post, RATE_DENOM);
        }
    }

    let last_age = block_time.since(last_eai_calc);
    let from = (waa - last_age).max(Duration::ZERO);
    let slice = match lock {
        None => age_table.slice(from, waa, Duration::ZERO),
        Some(lock) => match lock.notified_at() {
            None => age_table.slice(from, waa, lock.notice_period()),
            Some(notified_at) => age_table.slice_f(
                from,
                waa,
                lock.notice_period(),
                block_time.since(notified_at),
            ),
        },
    };
    let bonus = lock.map_or(Rate::ZERO, Lock::bonus_rate);
    integrate(&slice, bonus)
}

/// Multiplies together `e^((rate + bonus) · duration / YEAR)` for each row.
fn integrate(slice: &[RateSliceRow], bonus: Rate) -> Result<u64, MathError> {
    let mut factor = RATE_DENOM;
    for row in slice {
        let rate = row.rate.checked_add(bonus)?;
        let micros = u64::try_from(row.duration.micros()).map_err(|_| MathError::Overflow)?;
        // rate · t / YEAR, still over RATE_DENOM
        let exponent = mul_div_unsigned(rate.raw(), micros, YEAR as u64)?;
        let growth = exp_frac(exponent, RATE_DENOM)?;
        factor = mul_div_unsigned(factor, growth, RATE_DENOM)?;
        trace!(
            duration = row.duration.micros(),
            rate = rate.raw(),
            growth,
            factor,
            "integrated slice row"
        );
    }
    Ok(factor)
}

/// `balance · (factor − 1)`, truncated to napu. Non-positive balances earn nothing.
pub(crate) fn apply_factor(balance: Ndau, factor: u64) -> Result<Ndau, MathError> {
    let Ok(napu) = u64::try_from(balance.napu()) else {
        return Ok(Ndau::ZERO);
    };
    let eai = mul_div_unsigned(napu, factor.saturating_sub(RATE_DENOM), RATE_DENOM)?;
    i64::try_from(eai).map(Ndau).map_err(|_| MathError::Overflow)
}

/// Napu of EAI to credit to `balance` for `(last_eai_calc, block_time]`.
pub fn calculate(
    balance: Ndau,
    block_time: Timestamp,
    last_eai_calc: Timestamp,
    waa: Duration,
    lock: Option<&Lock>,
    age_table: &RateTable,
) -> Result<Ndau, MathError> {
    let factor = eai_factor(block_time, last_eai_calc, waa, lock, age_table)?;
    apply_factor(balance, factor)
}

/// The rate an account earns at `at`, lock bonus included.
///
/// An un-notified lock counts its whole notice period as extra age; a
/// notified one counts only the time left until it unlocks.
pub fn calculate_rate(
    waa: Duration,
    lock: Option<&Lock>,
    age_table: &RateTable,
    at: Timestamp,
) -> Result<Rate, MathError> {
    let Some(lock) = lock else {
        return Ok(age_table.rate_at(waa));
    };
    let age = match lock.unlocks_on() {
        None => waa + lock.notice_period(),
        Some(unlocks_on) if unlocks_on > at => waa + unlocks_on.since(at),
        Some(_) => waa,
    };
    age_table.rate_at(age).checked_add(lock.bonus_rate())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{DEFAULT_LOCK_BONUS_EAI, DEFAULT_UNLOCKED_EAI, RateTableRow};
    use ndau_core::constants::{DAY, HOUR, QUANTA_PER_UNIT};
    use proptest::prelude::*;

    fn days(n: i64) -> Duration {
        Duration::from_days(n)
    }

    fn day(n: i64) -> Timestamp {
        Timestamp(n * DAY)
    }

    /// Float model of the factor for a list of (percent, days) pieces.
    fn expected(pieces: &[(f64, f64)]) -> f64 {
        pieces.iter().map(|(pct, d)| (pct / 100.0 * d / 365.0).exp()).product()
    }

    fn as_float(factor: u64) -> f64 {
        factor as f64 / RATE_DENOM as f64
    }

    fn assert_close(factor: u64, want: f64) {
        let got = as_float(factor);
        assert!(((got - want) / want).abs() < 1e-9, "got {got}, want {want}");
    }

    fn flat(pct: u64) -> RateTable {
        RateTable::new(vec![RateTableRow::new(Duration::ZERO, Rate::from_percent(pct))]).unwrap()
    }

    // --- factor ---

    #[test]
    fn unlocked_across_thresholds() {
        // age 20..100 days: 10 at 0%, 30 at 2%, 30 at 3%, 10 at 4%
        let f = eai_factor(day(100), day(20), days(100), None, &DEFAULT_UNLOCKED_EAI).unwrap();
        assert_close(f, expected(&[(2.0, 30.0), (3.0, 30.0), (4.0, 10.0)]));
    }

    #[test]
    fn flat_rate_for_a_year() {
        let f = eai_factor(day(400), day(35), days(365), None, &flat(10)).unwrap();
        assert_close(f, 0.1f64.exp());
    }

    #[test]
    fn empty_window_is_neutral() {
        let f = eai_factor(day(50), day(50), days(80), None, &DEFAULT_UNLOCKED_EAI).unwrap();
        assert_eq!(f, RATE_DENOM);
    }

    #[test]
    fn backwards_window_is_neutral() {
        let f = eai_factor(day(10), day(50), days(80), None, &DEFAULT_UNLOCKED_EAI).unwrap();
        assert_eq!(f, RATE_DENOM);
    }

    #[test]
    fn unnotified_lock_reads_ahead_and_adds_bonus() {
        // 90-day notice, 1% bonus; age 0..10 days reads the table at 90..100.
        let lock = Lock::new(days(90), &DEFAULT_LOCK_BONUS_EAI);
        let f = eai_factor(day(10), day(0), days(10), Some(&lock), &DEFAULT_UNLOCKED_EAI).unwrap();
        assert_close(f, expected(&[(5.0, 10.0)]));
    }

    #[test]
    fn notified_lock_freezes_rate() {
        // notice 90 days given at day 80, window day 80..100, age 80..100.
        // Frozen at rate_at(80 + 90) = 6%, plus 1% bonus.
        let mut lock = Lock::new(days(90), &DEFAULT_LOCK_BONUS_EAI);
        lock.notify(day(80)).unwrap();
        let f = eai_factor(day(100), day(80), days(100), Some(&lock), &DEFAULT_UNLOCKED_EAI).unwrap();
        assert_close(f, expected(&[(7.0, 20.0)]));
    }

    #[test]
    fn window_after_unlock_is_unlocked() {
        let mut lock = Lock::new(days(90), &DEFAULT_LOCK_BONUS_EAI);
        lock.notify(day(0)).unwrap();
        let locked = eai_factor(day(200), day(150), days(200), Some(&lock), &DEFAULT_UNLOCKED_EAI).unwrap();
        let unlocked = eai_factor(day(200), day(150), days(200), None, &DEFAULT_UNLOCKED_EAI).unwrap();
        assert_eq!(locked, unlocked);
    }

    #[test]
    fn bonus_overflow_is_reported() {
        let lock = Lock::with_bonus_rate(days(1), Rate(u64::MAX));
        let r = eai_factor(day(10), day(0), days(10), Some(&lock), &flat(1));
        assert_eq!(r, Err(MathError::Overflow));
    }

    // --- calculate ---

    #[test]
    fn one_ndau_yield() {
        // 15% for a whole year: e^0.15 − 1 ≈ 0.161834
        let eai = calculate(
            Ndau(QUANTA_PER_UNIT),
            day(365),
            day(0),
            days(365),
            None,
            &flat(15),
        )
        .unwrap();
        let want = (0.15f64.exp() - 1.0) * QUANTA_PER_UNIT as f64;
        assert!((eai.napu() as f64 - want).abs() <= 1.0, "{eai:?} vs {want}");
    }

    #[test]
    fn non_positive_balance_earns_nothing() {
        for balance in [Ndau(0), Ndau(-5)] {
            let eai = calculate(balance, day(365), day(0), days(365), None, &flat(15)).unwrap();
            assert_eq!(eai, Ndau::ZERO);
        }
    }

    #[test]
    fn engine_matches_free_functions() {
        let engine = EaiEngine::default();
        let lock = engine.config().new_lock(days(180));
        let free = calculate(
            Ndau(10 * QUANTA_PER_UNIT),
            day(40),
            day(10),
            days(40),
            Some(&lock),
            &DEFAULT_UNLOCKED_EAI,
        );
        let via_trait =
            engine.calculate_eai(Ndau(10 * QUANTA_PER_UNIT), day(40), day(10), days(40), Some(&lock));
        assert_eq!(free, via_trait);
    }

    // --- calculate_rate ---

    #[test]
    fn rate_for_unlocked_accounts() {
        let t = &*DEFAULT_UNLOCKED_EAI;
        assert_eq!(calculate_rate(days(65), None, t, day(0)), Ok(Rate::from_percent(3)));
        assert_eq!(calculate_rate(days(90), None, t, day(0)), Ok(Rate::from_percent(4)));
    }

    #[test]
    fn rate_for_locked_accounts() {
        let t = &*DEFAULT_UNLOCKED_EAI;
        let lock90 = Lock::new(days(90), &DEFAULT_LOCK_BONUS_EAI);
        let lock1000 = Lock::new(days(1000), &DEFAULT_LOCK_BONUS_EAI);
        assert_eq!(calculate_rate(days(65), Some(&lock90), t, day(0)), Ok(Rate::from_percent(7)));
        assert_eq!(calculate_rate(days(90), Some(&lock90), t, day(0)), Ok(Rate::from_percent(8)));
        assert_eq!(calculate_rate(days(0), Some(&lock90), t, day(0)), Ok(Rate::from_percent(5)));
        assert_eq!(calculate_rate(days(0), Some(&lock1000), t, day(0)), Ok(Rate::from_percent(14)));
    }

    #[test]
    fn rate_for_notified_lock_counts_remaining_notice() {
        let t = &*DEFAULT_UNLOCKED_EAI;
        let mut lock = Lock::new(days(90), &DEFAULT_LOCK_BONUS_EAI);
        lock.notify(day(100)).unwrap();
        // 40 days left: age 50 + 40 = 90 → 4%, plus 1%
        assert_eq!(calculate_rate(days(50), Some(&lock), t, day(150)), Ok(Rate::from_percent(5)));
        // expired: plain age, bonus still applies
        assert_eq!(calculate_rate(days(50), Some(&lock), t, day(300)), Ok(Rate::from_percent(3)));
    }

    // --- properties ---

    proptest! {
        #[test]
        fn factor_never_below_one(
            last in 0i64..1000,
            span in 0i64..1000,
            waa in 0i64..2000,
        ) {
            let f = eai_factor(day(last + span), day(last), days(waa), None, &DEFAULT_UNLOCKED_EAI)?;
            prop_assert!(f >= RATE_DENOM);
        }

        #[test]
        fn flat_rate_matches_continuous_compounding(
            pct in 1u64..20,
            hours in 1i64..24 * 365 * 3,
        ) {
            let dt = Duration(hours * HOUR);
            let f = eai_factor(Timestamp(dt.micros()), Timestamp::EPOCH, dt, None, &flat(pct))?;
            let want = (pct as f64 / 100.0 * dt.micros() as f64 / YEAR as f64).exp();
            prop_assert!(((as_float(f) - want) / want).abs() < 1e-9);
        }

        #[test]
        fn splitting_the_window_compounds(
            a in 1i64..500,
            b in 1i64..500,
            waa0 in 0i64..500,
        ) {
            let t = &*DEFAULT_UNLOCKED_EAI;
            let whole = eai_factor(day(a + b), day(0), days(waa0 + a + b), None, t)?;
            let first = eai_factor(day(a), day(0), days(waa0 + a), None, t)?;
            let second = eai_factor(day(a + b), day(a), days(waa0 + a + b), None, t)?;
            let joined = mul_div_unsigned(first, second, RATE_DENOM)?;
            prop_assert!((as_float(whole) - as_float(joined)).abs() < 1e-9);
        }
    }
}
