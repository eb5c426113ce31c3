//! Shared test helpers for scenario and property tests.

use ndau_core::constants::{DAY, QUANTA_PER_UNIT, RATE_DENOM};
use ndau_core::{Duration, Ndau, Timestamp};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;

/// Route engine logs to the test harness.
///
/// `RUST_LOG` wins over `level`. Set `NDAU_LOG_FORMAT=json` for structured
/// output. Only the first call in a test binary installs a subscriber.
pub fn init_tracing(level: &str) {
    let _ = try_init_tracing(level);
}

fn try_init_tracing(level: &str) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    if std::env::var("NDAU_LOG_FORMAT").is_ok_and(|f| f == "json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_test_writer())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_test_writer())
            .try_init()
    }
}

pub fn days(n: i64) -> Duration {
    Duration::from_days(n)
}

/// The timestamp `n` days after the epoch.
pub fn day(n: i64) -> Timestamp {
    Timestamp(n * DAY)
}

pub fn ndau(units: i64) -> Ndau {
    Ndau(units * QUANTA_PER_UNIT)
}

/// Float model of a growth factor over `(percent, days)` pieces.
pub fn expected_factor(pieces: &[(f64, f64)]) -> f64 {
    pieces
        .iter()
        .map(|(pct, d)| (pct / 100.0 * d / 365.0).exp())
        .product()
}

pub fn as_float(factor: u64) -> f64 {
    factor as f64 / RATE_DENOM as f64
}

/// Relative difference between `got` and `want`.
pub fn rel_err(got: f64, want: f64) -> f64 {
    ((got - want) / want).abs()
}

/// Panics unless `factor` is within one part per million of `want`.
#[track_caller]
pub fn assert_factor(factor: u64, want: f64) {
    let got = as_float(factor);
    assert!(rel_err(got, want) < 1e-6, "factor {got}, want {want}");
}
