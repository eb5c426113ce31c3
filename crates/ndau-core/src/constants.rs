//! Protocol constants. Quantities are in napu (1 ndau = 10^8 napu), times in
//! microseconds.

/// Napu per ndau.
pub const QUANTA_PER_UNIT: i64 = 100_000_000;

/// Implied denominator of every [`Rate`](crate::Rate).
pub const RATE_DENOM: u64 = QUANTA_PER_UNIT as u64 * 10_000;

/// One percent expressed against [`RATE_DENOM`].
pub const ONE_PERCENT: u64 = RATE_DENOM / 100;

pub const MICROSECOND: i64 = 1;
pub const MILLISECOND: i64 = 1_000 * MICROSECOND;
pub const SECOND: i64 = 1_000 * MILLISECOND;
pub const MINUTE: i64 = 60 * SECOND;
pub const HOUR: i64 = 60 * MINUTE;
pub const DAY: i64 = 24 * HOUR;
/// A month is always 30 days.
pub const MONTH: i64 = 30 * DAY;
/// A year is always 365 days.
pub const YEAR: i64 = 365 * DAY;

/// Unix time of 2000-01-01T00:00:00Z in microseconds. Timestamps count from here.
pub const EPOCH_UNIX_MICROS: i64 = 946_684_800 * SECOND;

/// Text form of the epoch.
pub const EPOCH_START: &str = "2000-01-01T00:00:00.000000Z";

/// Canonical timestamp layout (chrono strftime syntax).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

pub const MIN_TIMESTAMP: i64 = 0;
pub const MAX_TIMESTAMP: i64 = i64::MAX;
pub const MIN_DURATION: i64 = i64::MIN;
pub const MAX_DURATION: i64 = i64::MAX;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_units_are_consistent() {
        assert_eq!(RATE_DENOM, 1_000_000_000_000);
        assert_eq!(ONE_PERCENT, 10_000_000_000);
        assert_eq!(100 * ONE_PERCENT, RATE_DENOM);
    }

    #[test]
    fn calendar_units() {
        assert_eq!(DAY, 86_400_000_000);
        assert_eq!(YEAR, 365 * DAY);
        assert_eq!(12 * MONTH + 5 * DAY, YEAR);
    }
}
