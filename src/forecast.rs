//! Short-horizon forecast built from a bounded random perturbation of the last
//! observed price.
//!
//! Every step perturbs the same anchor price independently and scales it by a
//! compounding `1.001^step` trend term; forecast points do not feed into one
//! another.

use chrono::{Duration, NaiveDate};
use rand::Rng;

use crate::dto::{FORECAST_DAYS_RANGE, PredictionError, PricePoint, check_range};
use crate::helpers;

pub const VOLATILITY: f64 = 0.03;
pub const DAILY_TREND: f64 = 0.001;
pub const TREND_GROWTH: f64 = 1.001;

/// Price for a single forecast step.
///
/// `unit_sample` is a draw from `U(0, 1)`; `0.5` yields a zero random factor.
///
/// ```
/// use btc_prediction_sdk::forecast::forecast_price;
///
/// assert_eq!(forecast_price(15_000_000, 1, 0.5), 15_030_015);
/// ```
pub fn forecast_price(last_price: u64, step: u32, unit_sample: f64) -> u64 {
    let random_factor = (unit_sample - 0.5) * VOLATILITY;
    let trend = TREND_GROWTH.powi(step as i32);
    helpers::round_price(last_price as f64 * (1.0 + DAILY_TREND + random_factor) * trend)
}

/// Generate `forecast_days` points dated `today + 1 ..= today + forecast_days`.
///
/// The random source is passed in so callers can seed it; a seeded
/// [`rand::rngs::StdRng`] produces identical forecasts for identical inputs.
///
/// Returns [`PredictionError::InvalidPrice`] for a zero anchor and
/// [`PredictionError::InvalidWindow`] when `forecast_days` is outside
/// `1..=90`.
pub fn generate<R: Rng + ?Sized>(
    last_price: u64,
    forecast_days: u32,
    today: NaiveDate,
    rng: &mut R,
) -> Result<Vec<PricePoint>, PredictionError> {
    if last_price == 0 {
        return Err(PredictionError::InvalidPrice(last_price));
    }
    check_range("forecast_days", forecast_days, &FORECAST_DAYS_RANGE)?;

    let points = (1..=forecast_days)
        .map(|step| {
            let date = today + Duration::days(i64::from(step));
            let sample: f64 = rng.gen();
            PricePoint::forecast(date, forecast_price(last_price, step, sample))
        })
        .collect();

    Ok(points)
}
