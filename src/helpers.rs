use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dto::{HISTORICAL_DAYS_RANGE, Interval, PricePoint, clamp_to};

/// Lookbacks above this many days are requested at weekly resolution.
pub(crate) const DAILY_INTERVAL_MAX_DAYS: u32 = 90;

const FALLBACK_BASE_PRICE: f64 = 15_000_000.0;
const FALLBACK_AMPLITUDE: f64 = 500_000.0;
const FALLBACK_PHASE_STEP: f64 = 0.2;
const FALLBACK_NOISE_MAX: f64 = 200_000.0;
const FALLBACK_SEED: u64 = 0x6274_635f_6a70_79;

pub(crate) fn interval_for_days(historical_days: u32) -> Interval {
    if historical_days > DAILY_INTERVAL_MAX_DAYS {
        Interval::Weekly
    } else {
        Interval::Daily
    }
}

pub(crate) fn clamp_historical_days(historical_days: u32) -> u32 {
    clamp_to(historical_days, &HISTORICAL_DAYS_RANGE)
}

/// Round a provider quote to whole currency units. Negative or non-finite
/// quotes collapse to zero.
pub(crate) fn round_price(price: f64) -> u64 {
    if !price.is_finite() || price <= 0.0 {
        return 0;
    }
    price.round() as u64
}

/// Deterministic stand-in history used when the provider is unreachable.
///
/// Produces exactly `historical_days` points ending yesterday. Prices follow a
/// sine wave around a fixed base plus bounded noise from an RNG seeded by the
/// window length, so the same inputs always give the same series.
pub(crate) fn synthesize_fallback(historical_days: u32, today: NaiveDate) -> Vec<PricePoint> {
    let mut rng = StdRng::seed_from_u64(FALLBACK_SEED ^ u64::from(historical_days));
    let days = i64::from(historical_days);

    (0..days)
        .map(|idx| {
            let date = today - Duration::days(days - idx);
            let oscillation = (idx as f64 * FALLBACK_PHASE_STEP).sin() * FALLBACK_AMPLITUDE;
            let noise = rng.gen_range(0.0..FALLBACK_NOISE_MAX);
            PricePoint::historical(date, round_price(FALLBACK_BASE_PRICE + oscillation + noise))
        })
        .collect()
}
