//! # ndau-pricecurve
//!
//! The price at which ndau are issued, as a function of how many have
//! already been sold.
//!
//! - [`nanocent`]: the fixed-point dollar unit prices are quoted in
//! - [`curve`]: the integer three-phase curve, plus a float model used for
//!   quoting totals and searching by price

pub mod curve;
pub mod nanocent;

pub use curve::{
    PHASE_BLOCKS, Phase1Endpoint, SALE_BLOCK_QTY, TERMINAL_PRICE, approx_price_at_unit, phase1,
    phase23, price_at_unit, price_at_unit_9999, price_at_unit_10000, total_price_for,
    unit_at_price,
};
pub use nanocent::{DOLLAR, Nanocent};
