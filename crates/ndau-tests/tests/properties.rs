//! Cross-crate properties: accuracy against a float model, determinism, and
//! stable wire forms for everything the ledger persists.

use ndau_core::constants::{DAY, ONE_PERCENT, QUANTA_PER_UNIT, RATE_DENOM};
use ndau_core::waa::update_waa;
use ndau_core::{Duration, Ndau, Rate, Timestamp, codec};
use ndau_eai::{EaiCalculator, EaiEngine, LockRecord, RateTable, RateTableRow, calculate};
use ndau_pricecurve::{Nanocent, Phase1Endpoint, price_at_unit};
use ndau_tests::helpers::*;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn flat(rate: Rate) -> RateTable {
    RateTable::new(vec![RateTableRow::new(Duration::ZERO, rate)]).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// A constant rate compounds to `balance · (e^(r·t/year) − 1)` within 1 ppm.
    #[test]
    fn constant_rate_matches_continuous_compounding(
        units in 1_000i64..1_000_000_000,
        elapsed_days in 1i64..3650,
        pct_hundredths in 100u64..2000,
    ) {
        let balance = ndau(units);
        let rate = Rate(pct_hundredths * ONE_PERCENT / 100);
        let table = flat(rate);
        let block_time = day(4000);
        let last = block_time - days(elapsed_days);
        let waa = block_time.since(last);

        let got = calculate(balance, block_time, last, waa, None, &table).unwrap();

        let r = rate.raw() as f64 / RATE_DENOM as f64;
        let t = elapsed_days as f64 / 365.0;
        let want = balance.napu() as f64 * ((r * t).exp() - 1.0);
        let tolerance = want * 1e-6 + 1.0;
        prop_assert!((got.napu() as f64 - want).abs() <= tolerance, "got {}, want {}", got.napu(), want);
    }

    /// Same inputs, same answer, whichever entry point computes it.
    #[test]
    fn engine_is_deterministic(
        waa_days in 0i64..2000,
        elapsed_days in 0i64..2000,
        notice_days in prop::option::of(0i64..1500),
        notified_days_ago in prop::option::of(0i64..1500),
    ) {
        let engine = EaiEngine::default();
        let block_time = day(5000);
        let last = block_time - days(elapsed_days);
        let lock = notice_days.map(|n| {
            let mut lock = engine.config().new_lock(days(n));
            if let Some(ago) = notified_days_ago {
                lock.notify(block_time - days(ago)).unwrap();
            }
            lock
        });

        let a = engine.eai_factor(block_time, last, days(waa_days), lock.as_ref());
        let b = engine.eai_factor(block_time, last, days(waa_days), lock.as_ref());
        prop_assert_eq!(a, b);

        let via_trait = engine.calculate_eai(ndau(1000), block_time, last, days(waa_days), lock.as_ref());
        let via_fn = calculate(
            ndau(1000),
            block_time,
            last,
            days(waa_days),
            lock.as_ref(),
            &engine.config().unlocked,
        );
        prop_assert_eq!(via_trait, via_fn);
    }

    /// Yield never shrinks a positive balance.
    #[test]
    fn factor_is_at_least_one(
        waa_days in 0i64..2000,
        elapsed_days in 0i64..2000,
        notice_days in 0i64..1500,
    ) {
        let engine = EaiEngine::default();
        let block_time = day(5000);
        let lock = engine.config().new_lock(days(notice_days));
        let factor = engine
            .eai_factor(block_time, block_time - days(elapsed_days), days(waa_days), Some(&lock))
            .unwrap();
        prop_assert!(factor >= RATE_DENOM);
    }

    #[test]
    fn price_never_falls(a in 0i64..40_000_000_000 / 1000, b in 0i64..40_000_000_000 / 1000) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        for endpoint in [Phase1Endpoint::Block9999, Phase1Endpoint::Block10000] {
            let p_lo = price_at_unit(Ndau(lo * QUANTA_PER_UNIT), endpoint).unwrap();
            let p_hi = price_at_unit(Ndau(hi * QUANTA_PER_UNIT), endpoint).unwrap();
            prop_assert!(p_lo <= p_hi);
        }
    }

    #[test]
    fn scalars_round_trip_everywhere(v in any::<i64>(), r in any::<u64>()) {
        let d = Duration(v);
        let n = Ndau(v);
        let c = Nanocent(v);
        let rate = Rate(r);

        prop_assert_eq!(d.to_string().parse::<Duration>(), Ok(d));
        prop_assert_eq!(n.to_string().parse::<Ndau>(), Ok(n));
        prop_assert_eq!(c.to_string().parse::<Nanocent>(), Ok(c));
        prop_assert_eq!(rate.to_string().parse::<Rate>(), Ok(rate));

        prop_assert_eq!(codec::decode::<Duration>(&codec::encode(&d).unwrap()).unwrap(), d);
        prop_assert_eq!(codec::decode::<Ndau>(&codec::encode(&n).unwrap()).unwrap(), n);
        prop_assert_eq!(codec::decode::<Nanocent>(&codec::encode(&c).unwrap()).unwrap(), c);
        prop_assert_eq!(codec::decode::<Rate>(&codec::encode(&rate).unwrap()).unwrap(), rate);

        let json = serde_json::to_string(&(d, n, c, rate)).unwrap();
        let back: (Duration, Ndau, Nanocent, Rate) = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, (d, n, c, rate));
    }
}

#[test]
fn waa_order_sensitivity_is_bounded() {
    let mut rng = StdRng::seed_from_u64(0x6e_64_61_75);
    for _ in 0..10_000 {
        let waa = Duration(rng.gen_range(0..10 * 365 * DAY));
        let since = Duration(rng.gen_range(0..365 * DAY));
        let balance = Ndau(rng.gen_range(1..1_000_000 * QUANTA_PER_UNIT));
        let first = Ndau(rng.gen_range(1..1_000 * QUANTA_PER_UNIT));
        let second = Ndau(rng.gen_range(1..1_000 * QUANTA_PER_UNIT));

        let once = update_waa(waa, since, first, balance).unwrap();
        let twice = update_waa(once, Duration::ZERO, second, Ndau(balance.napu() + first.napu()))
            .unwrap();
        let merged =
            update_waa(waa, since, Ndau(first.napu() + second.napu()), balance).unwrap();
        assert!(
            (twice.micros() - merged.micros()).abs() <= 1,
            "waa {waa} since {since} bal {balance}: {twice} vs {merged}"
        );
    }
}

#[test]
fn persisted_forms_are_stable() {
    let record = LockRecord {
        notice_period: days(90),
        unlocks_on: Some(Timestamp(12 * DAY)),
    };
    let bytes = codec::encode(&record).unwrap();
    // notice, option tag, unlock
    assert_eq!(bytes.len(), 17);
    assert_eq!(&bytes[..8], &days(90).micros().to_le_bytes());
    assert_eq!(codec::decode::<LockRecord>(&bytes).unwrap(), record);

    let table = RateTable::default_lock_bonus();
    let json = serde_json::to_string(&table).unwrap();
    let back: RateTable = serde_json::from_str(&json).unwrap();
    assert_eq!(back, table);
    let bytes = codec::encode(&table).unwrap();
    assert_eq!(codec::decode::<RateTable>(&bytes).unwrap(), table);
}
