//! The ndau issuance price curve.
//!
//! Ndau are sold in blocks of [`SALE_BLOCK_QTY`]. Phase 1 covers the first
//! [`PHASE_BLOCKS`] blocks and doubles the price fourteen times, from $1 to
//! $16384. Phases 2 and 3 follow a fixed cubic for the next
//! `2 · PHASE_BLOCKS` blocks; after that the price stays at the terminal
//! value. The integer functions here are authoritative; the `approx_*`
//! functions are a float model for quoting and search.

use ndau_core::constants::QUANTA_PER_UNIT;
use ndau_core::math::mul_div_signed;
use ndau_core::{MathError, Ndau};
use tracing::trace;

use crate::nanocent::{DOLLAR, Nanocent};

/// Sale blocks per phase.
pub const PHASE_BLOCKS: i64 = 10_000;

/// Ndau per sale block.
pub const SALE_BLOCK_QTY: i64 = 1_000;

/// Price once phase 3 has sold out: $500450.83.
pub const TERMINAL_PRICE: Nanocent = Nanocent(50_045_083 * (DOLLAR / 100));

const RATIO_DENOM: i64 = 1_000_000_000_000_000;

/// Which block phase 1 reaches $16384 at.
///
/// Block 9999 is correct. Block 10000 is what the curve used historically;
/// it is kept only so early sales replay deterministically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Phase1Endpoint {
    #[default]
    Block9999,
    Block10000,
}

impl Phase1Endpoint {
    /// Prices at blocks `2^n − 1`, n = 0..14.
    fn doublings(self) -> &'static [i64; 14] {
        match self {
            Self::Block9999 => &DOUBLINGS_9999,
            Self::Block10000 => &DOUBLINGS_10000,
        }
    }

    /// ⌊10^15 · 2^(14/K)⌋, the price ratio between neighbouring blocks.
    fn ratio(self) -> i64 {
        match self {
            Self::Block9999 => 1_000_970_974_193_617,
            Self::Block10000 => 1_000_970_877_049_078,
        }
    }

    fn divisor(self) -> f64 {
        match self {
            Self::Block9999 => 9999.0,
            Self::Block10000 => 10000.0,
        }
    }
}

const DOUBLINGS_9999: [i64; 14] = [
    100_000_000_000,
    100_097_097_419,
    100_291_575_187,
    100_681_665_003,
    101_466_402_368,
    103_054_274_072,
    106_304_953_285,
    113_117_158_227,
    128_079_155_775,
    164_201_982_670,
    269_884_708_015,
    729_084_792_015,
    5_320_807_694_887,
    283_384_837_710_462,
];

const DOUBLINGS_10000: [i64; 14] = [
    100_000_000_000,
    100_097_087_704,
    100_291_545_986,
    100_681_596_605,
    101_466_254_658,
    103_053_964_027,
    106_304_303_320,
    113_115_764_023,
    128_075_986_132,
    164_193_839_650,
    269_857_914_525,
    728_939_964_968,
    5_318_693_514_199,
    283_159_653_540_666,
];

/// Phase-1 price of a sale block: `2^(block · 14 / K)` dollars.
///
/// Starts from the nearest tabulated doubling at or below `block` and applies
/// the per-block ratio once per remaining step.
pub fn phase1(block: u64, endpoint: Phase1Endpoint) -> Result<Nanocent, MathError> {
    let doublings = endpoint.doublings();
    if block <= 1 {
        return Ok(Nanocent(doublings[block as usize]));
    }
    let d = (block.ilog2() as usize).min(doublings.len() - 1);
    let mut out = doublings[d];
    for _ in 0..=(block - (1u64 << d)) {
        out = mul_div_signed(out, endpoint.ratio(), RATIO_DENOM)?;
    }
    Ok(Nanocent(out))
}

/// Phase-2/3 price of a sale block:
/// `−41633 − 8.286618·x + 0.00167424·x² − 2.654015e-8·x³` dollars.
///
/// Each term is truncated to whole dollars before scaling.
pub fn phase23(block: i64) -> Result<Nanocent, MathError> {
    const A: i64 = 41_633;
    const B: i64 = 8_286_618;
    const B_DENOM: i64 = 1_000_000;
    const C: i64 = 167_424;
    const C_DENOM: i64 = 100_000_000;
    const D: i64 = 2_654_015;
    // applied twice: the real divisor is 10^14
    const D_DENOM: i64 = 10_000_000;

    let square = block.checked_mul(block).ok_or(MathError::Overflow)?;
    let order1 = mul_div_signed(block, B, B_DENOM)?;
    let order2 = mul_div_signed(square, C, C_DENOM)?;
    let order3 = mul_div_signed(square, block, D_DENOM)?;
    let order3 = mul_div_signed(order3, D, D_DENOM)?;

    [-A, -order1, order2, -order3]
        .into_iter()
        .try_fold(0i64, |acc, term| {
            term.checked_mul(DOLLAR).and_then(|t| acc.checked_add(t))
        })
        .map(Nanocent)
        .ok_or(MathError::Overflow)
}

/// Sale block the next unit falls in. Negative quantities count as none sold.
fn sale_block(n_sold: Ndau) -> i64 {
    (n_sold.napu() / QUANTA_PER_UNIT / SALE_BLOCK_QTY).max(0)
}

/// Price of the next ndau after `n_sold` napu have been sold.
pub fn price_at_unit(n_sold: Ndau, endpoint: Phase1Endpoint) -> Result<Nanocent, MathError> {
    let block = sale_block(n_sold);
    if block < PHASE_BLOCKS {
        trace!(block, ?endpoint, "phase 1 price");
        return phase1(block as u64, endpoint);
    }
    if block < 3 * PHASE_BLOCKS {
        trace!(block, "phase 2/3 price");
        return phase23(block);
    }
    Ok(TERMINAL_PRICE)
}

/// [`price_at_unit`] with phase 1 ending at block 9999.
pub fn price_at_unit_9999(n_sold: Ndau) -> Result<Nanocent, MathError> {
    price_at_unit(n_sold, Phase1Endpoint::Block9999)
}

/// [`price_at_unit`] with phase 1 ending at block 10000. Replay only.
pub fn price_at_unit_10000(n_sold: Ndau) -> Result<Nanocent, MathError> {
    price_at_unit(n_sold, Phase1Endpoint::Block10000)
}

/// Float model of the price in dollars. Within a sale block the price moves
/// continuously.
pub fn approx_price_at_unit(n_sold: Ndau) -> f64 {
    let ndau_sold = (n_sold.napu() / QUANTA_PER_UNIT) as f64;
    let block = ndau_sold / SALE_BLOCK_QTY as f64;

    if block < PHASE_BLOCKS as f64 {
        return 2f64.powf(block * 14.0 / Phase1Endpoint::Block9999.divisor());
    }
    if block < (3 * PHASE_BLOCKS) as f64 {
        let x = block;
        return -2.654015e-8 * x.powi(3) + 0.00167424 * x.powi(2) - 8.286618 * x - 41633.0;
    }
    TERMINAL_PRICE.as_dollars_f64()
}

/// Ndau sold when the float model's price reaches `price`, to the sale
/// block. Searches blocks `[0, 3 · PHASE_BLOCKS)` and returns the block the
/// search settles on times [`SALE_BLOCK_QTY`].
pub fn unit_at_price(price: f64) -> i64 {
    let mut high = 3 * PHASE_BLOCKS;
    let mut low = 0;
    let mut guess = high / 2;
    while high - low > 1 {
        let p = approx_price_at_unit(Ndau(guess * SALE_BLOCK_QTY * QUANTA_PER_UNIT));
        if p >= price {
            high = guess;
        } else {
            low = guess;
        }
        guess = (high + low) / 2;
    }
    guess * SALE_BLOCK_QTY
}

/// Float-model cost of buying `num` napu after `already_sold` have gone.
///
/// Each sale block is charged at the price of its first unit still for sale.
pub fn total_price_for(num: Ndau, already_sold: Ndau) -> f64 {
    let per_block = SALE_BLOCK_QTY * QUANTA_PER_UNIT;
    let mut remaining = num.napu();
    let mut sold = already_sold.napu();
    let mut total = 0.0;
    loop {
        let price = approx_price_at_unit(Ndau(sold));
        let available = per_block - sold.rem_euclid(per_block);
        if remaining <= available {
            return total + price * (remaining as f64 / QUANTA_PER_UNIT as f64);
        }
        remaining -= available;
        sold = sold.saturating_add(available);
        total += price * (available as f64 / QUANTA_PER_UNIT as f64);
    }
}
