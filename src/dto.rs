use std::ops::RangeInclusive;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const HISTORICAL_DAYS_RANGE: RangeInclusive<u32> = 1..=365;
pub const FORECAST_DAYS_RANGE: RangeInclusive<u32> = 1..=90;

/// A single point on the dashboard series.
///
/// * `date` is the calendar date in the display timezone. It serializes as the
///   ja-JP short form (`2026/10/5`), which is what the chart axis and forecast
///   table print.
/// * `price` is a whole-yen amount; the provider's fractional quotes are
///   rounded to the nearest integer on ingestion.
/// * `is_forecast` separates the historical prefix from the forecast suffix of
///   a combined series.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PricePoint {
    #[serde(with = "display_date")]
    pub date: NaiveDate,
    pub price: u64,
    pub is_forecast: bool,
}

impl PricePoint {
    pub fn historical(date: NaiveDate, price: u64) -> Self {
        Self {
            date,
            price,
            is_forecast: false,
        }
    }

    pub fn forecast(date: NaiveDate, price: u64) -> Self {
        Self {
            date,
            price,
            is_forecast: true,
        }
    }

    /// Date rendered the way the dashboard shows it.
    pub fn display_date(&self) -> String {
        display_date::format(&self.date)
    }
}

/// Lookback and horizon selected on the dashboard.
///
/// Both bounds are inclusive: `historical_days` in `1..=365`,
/// `forecast_days` in `1..=90`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequestWindow {
    pub historical_days: u32,
    pub forecast_days: u32,
}

impl RequestWindow {
    /// Validate a window, rejecting values outside the supported ranges.
    ///
    /// ```
    /// use btc_prediction_sdk::{PredictionError, RequestWindow};
    ///
    /// assert!(RequestWindow::new(365, 90).is_ok());
    /// assert!(matches!(
    ///     RequestWindow::new(366, 7),
    ///     Err(PredictionError::InvalidWindow { .. })
    /// ));
    /// ```
    pub fn new(historical_days: u32, forecast_days: u32) -> Result<Self, PredictionError> {
        check_range("historical_days", historical_days, &HISTORICAL_DAYS_RANGE)?;
        check_range("forecast_days", forecast_days, &FORECAST_DAYS_RANGE)?;
        Ok(Self {
            historical_days,
            forecast_days,
        })
    }

    /// Build a window by clamping both values into range, the way the
    /// dashboard's range sliders do.
    pub fn clamped(historical_days: u32, forecast_days: u32) -> Self {
        Self {
            historical_days: clamp_to(historical_days, &HISTORICAL_DAYS_RANGE),
            forecast_days: clamp_to(forecast_days, &FORECAST_DAYS_RANGE),
        }
    }
}

impl Default for RequestWindow {
    fn default() -> Self {
        Self {
            historical_days: 30,
            forecast_days: 7,
        }
    }
}

pub(crate) fn check_range(
    field: &'static str,
    value: u32,
    range: &RangeInclusive<u32>,
) -> Result<(), PredictionError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(PredictionError::InvalidWindow {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

pub(crate) fn clamp_to(value: u32, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start(), *range.end())
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
/// Sample resolution requested from the market chart endpoint.
///
/// Serialized with `snake_case` strings (`"daily"`, `"weekly"`), which are
/// also the values of the `interval` query parameter.
pub enum Interval {
    Daily,
    Weekly,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Daily => "daily",
            Interval::Weekly => "weekly",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
/// Where the historical part of a series came from.
pub enum SeriesSource {
    Live,
    Fallback,
}

/// Historical series returned by the loader together with its origin.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HistoryLoad {
    pub points: Vec<PricePoint>,
    pub source: SeriesSource,
}

/// One row of the forecast table.
///
/// `change_pct` is measured against the previous row, or against the last
/// historical price for the first row.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ForecastRow {
    #[serde(with = "display_date")]
    pub date: NaiveDate,
    pub price: u64,
    pub change_pct: f64,
}

/// Everything the dashboard renders for one window.
///
/// Snapshots are rebuilt from scratch on every window change and never
/// mutated afterwards. `generation` identifies the refresh that produced it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DashboardSnapshot {
    pub generation: u64,
    pub window: RequestWindow,
    pub source: SeriesSource,
    pub series: Vec<PricePoint>,
    pub current_price: u64,
    pub change_24h_pct: f64,
    pub forecast_rows: Vec<ForecastRow>,
}

impl DashboardSnapshot {
    pub fn historical(&self) -> impl Iterator<Item = &PricePoint> {
        self.series.iter().filter(|point| !point.is_forecast)
    }

    pub fn forecast(&self) -> impl Iterator<Item = &PricePoint> {
        self.series.iter().filter(|point| point.is_forecast)
    }
}

#[derive(Debug, Error)]
/// Errors that can be returned while loading history or building forecasts.
pub enum PredictionError {
    #[error("network call failed: {0}")]
    Network(String),
    #[error("failed to deserialize response: {0}")]
    Serialization(String),
    #[error("time conversion failed")]
    TimeConversion,
    #[error("price history is empty")]
    EmptySeries,
    #[error("{field} must be within {min}..={max}, got {value}")]
    InvalidWindow {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
    #[error("anchor price must be positive, got {0}")]
    InvalidPrice(u64),
}

impl PredictionError {
    /// True for failures of the upstream fetch, the class the loader masks
    /// with the fallback series.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            PredictionError::Network(_)
                | PredictionError::Serialization(_)
                | PredictionError::TimeConversion
                | PredictionError::EmptySeries
        )
    }
}

/// ja-JP short date form used across the dashboard (`YYYY/M/D`).
pub mod display_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const DISPLAY_FORMAT: &str = "%Y/%-m/%-d";
    const PARSE_FORMAT: &str = "%Y/%m/%d";

    pub fn format(date: &NaiveDate) -> String {
        date.format(DISPLAY_FORMAT).to_string()
    }

    pub fn parse(value: &str) -> Result<NaiveDate, chrono::ParseError> {
        NaiveDate::parse_from_str(value, PARSE_FORMAT)
    }

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn window_accepts_inclusive_bounds() {
        assert!(RequestWindow::new(1, 1).is_ok());
        assert!(RequestWindow::new(365, 90).is_ok());
    }

    #[test]
    fn window_rejects_out_of_range_values() {
        let err = RequestWindow::new(366, 7).unwrap_err();
        assert!(matches!(
            err,
            PredictionError::InvalidWindow {
                field: "historical_days",
                value: 366,
                min: 1,
                max: 365
            }
        ));

        let err = RequestWindow::new(30, 0).unwrap_err();
        assert!(matches!(
            err,
            PredictionError::InvalidWindow {
                field: "forecast_days",
                value: 0,
                ..
            }
        ));
    }

    #[test]
    fn clamped_window_pins_to_bounds() {
        let window = RequestWindow::clamped(366, 0);
        assert_eq!(window.historical_days, 365);
        assert_eq!(window.forecast_days, 1);

        let window = RequestWindow::clamped(0, 120);
        assert_eq!(window.historical_days, 1);
        assert_eq!(window.forecast_days, 90);
    }

    #[test]
    fn price_point_serializes_with_display_date() {
        let point = PricePoint::historical(date(2026, 1, 5), 15_000_000);

        let json = serde_json::to_value(&point).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "date": "2026/1/5", "price": 15_000_000, "is_forecast": false })
        );
        let back: PricePoint = serde_json::from_value(json).unwrap();
        assert_eq!(back, point);
    }

    #[test]
    fn interval_serializes_as_query_value() {
        assert_eq!(serde_json::to_string(&Interval::Weekly).unwrap(), "\"weekly\"");
        assert_eq!(Interval::Daily.as_str(), "daily");
    }

    #[test]
    fn fetch_errors_are_classified() {
        assert!(PredictionError::Network("down".into()).is_fetch_error());
        assert!(PredictionError::EmptySeries.is_fetch_error());
        assert!(!PredictionError::InvalidPrice(0).is_fetch_error());
    }
}
