//! Overflow-safe fixed-point arithmetic.
//!
//! Every product is carried in 128 bits before dividing, so `a * b / c` never
//! overflows as long as the quotient fits in 64 bits. All functions are pure
//! and deterministic; nothing here touches floating point.

use crate::constants::RATE_DENOM;
use crate::error::MathError;

/// ⌊e · RATE_DENOM⌋.
pub const E: u64 = 2_718_281_828_459;

/// Extra decimal digit carried through the Taylor series.
const ROUNDER: u128 = 10;

/// `e^k ≤ x` holds for the largest `k` with `x > LN_BOUNDS[k]`.
///
/// Entry `k` is ⌈e^k⌉ − 1; the final entry caps the table at `u64::MAX`.
const LN_BOUNDS: [u64; 46] = [
    0,
    2,
    7,
    20,
    54,
    148,
    403,
    1_096,
    2_980,
    8_103,
    22_026,
    59_874,
    162_754,
    442_413,
    1_202_604,
    3_269_017,
    8_886_110,
    24_154_952,
    65_659_969,
    178_482_300,
    485_165_195,
    1_318_815_734,
    3_584_912_846,
    9_744_803_446,
    26_489_122_129,
    72_004_899_337,
    195_729_609_428,
    532_048_240_601,
    1_446_257_064_291,
    3_931_334_297_144,
    10_686_474_581_524,
    29_048_849_665_247,
    78_962_960_182_680,
    214_643_579_785_916,
    583_461_742_527_454,
    1_586_013_452_313_430,
    4_311_231_547_115_194,
    11_719_142_372_802_611,
    31_855_931_757_113_755,
    86_593_400_423_993_743,
    235_385_266_837_019_999,
    639_843_493_530_054_911,
    1_739_274_941_520_500_991,
    4_727_839_468_229_346_303,
    12_851_600_114_359_308_287,
    u64::MAX,
];

/// ⌊a · b / c⌋ without intermediate overflow.
pub fn mul_div_unsigned(a: u64, b: u64, c: u64) -> Result<u64, MathError> {
    if c == 0 {
        return Err(MathError::DivideByZero);
    }
    let q = (a as u128) * (b as u128) / (c as u128);
    u64::try_from(q).map_err(|_| MathError::Overflow)
}

/// `a · b / c` truncated toward zero, sign preserved.
pub fn mul_div_signed(a: i64, b: i64, c: i64) -> Result<i64, MathError> {
    if c == 0 {
        return Err(MathError::DivideByZero);
    }
    let q = (a as i128) * (b as i128) / (c as i128);
    i64::try_from(q).map_err(|_| MathError::Overflow)
}

/// e^(num / denom), scaled by [`RATE_DENOM`].
///
/// The quotient is first brought to `RATE_DENOM` scale and split at the
/// decimal point. The fractional part goes through a fixed-point Taylor series
/// carried one digit finer than the result; the whole part is applied by
/// repeated multiplication by [`E`]. Accurate to about one unit in the last
/// place for arguments of a few units.
///
/// ```
/// use ndau_core::constants::RATE_DENOM;
/// use ndau_core::math::exp_frac;
/// assert_eq!(exp_frac(0, 7).unwrap(), RATE_DENOM);
/// assert_eq!(exp_frac(1, 1).unwrap(), 2_718_281_828_459);
/// ```
pub fn exp_frac(num: u64, denom: u64) -> Result<u64, MathError> {
    let x = mul_div_unsigned(num, RATE_DENOM, denom)?;
    let whole = x / RATE_DENOM;
    let frac = x % RATE_DENOM;

    let mut result = exp_fractional(frac);
    // e^45 · RATE_DENOM is far past u64::MAX, so this loop is short.
    for _ in 0..whole {
        result = mul_div_unsigned(result, E, RATE_DENOM)?;
    }
    Ok(result)
}

/// e^(frac / RATE_DENOM) · RATE_DENOM for `frac < RATE_DENOM`.
fn exp_fractional(frac: u64) -> u64 {
    let denom = RATE_DENOM as u128 * ROUNDER;
    let x = frac as u128 * ROUNDER;

    let mut sum = denom + x;
    let mut power = x;
    let mut factorial: u128 = 1;
    let mut n: u128 = 2;
    loop {
        power = power * x / denom;
        factorial *= n;
        let term = power / factorial;
        if term == 0 {
            break;
        }
        sum += term;
        n += 1;
    }
    // sum < e · denom, well inside u64 after rescaling.
    ((sum + ROUNDER / 2) / ROUNDER) as u64
}

/// ⌊ln x⌋, or −1 for `x == 0`.
pub fn floor_ln(x: u64) -> i32 {
    LN_BOUNDS
        .iter()
        .position(|&bound| x <= bound)
        .map_or(LN_BOUNDS.len() as i32 - 1, |k| k as i32 - 1)
}
