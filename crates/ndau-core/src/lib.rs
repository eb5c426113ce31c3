//! # ndau-core
//! Scalar types and fixed-point math shared by the ndau crates.
//!
//! - [`Ndau`], [`Duration`], [`Timestamp`] and [`Rate`]: 64-bit fixed-point
//!   scalars with text and binary forms
//! - [`math`]: `a·b/c` through 128-bit intermediates, `exp_frac`, `floor_ln`
//! - [`waa::update_waa`]: weighted-average-age bookkeeping
//! - [`codec`]: fixed-width binary encoding

pub mod codec;
pub mod constants;
pub mod duration;
pub mod error;
pub mod math;
pub mod ndau;
pub mod rate;
pub mod timestamp;
pub mod waa;

pub use duration::Duration;
pub use error::{LockError, MathError, NdauError, ParseError, RateTableError};
pub use ndau::Ndau;
pub use rate::Rate;
pub use timestamp::Timestamp;
