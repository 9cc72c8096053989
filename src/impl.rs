use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

use std::sync::Arc;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::SdkConfig;
use crate::helpers;
use crate::{HistoryLoad, PredictionError, PricePoint, SeriesSource};

pub struct PredictionSdk {
    client: Client,
    config: SdkConfig,
    limiter: Arc<RateLimiter<governor::state::NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
}

impl PredictionSdk {
    /// Construct an SDK client that uses the default CoinGecko base URL.
    ///
    /// The internal `reqwest::Client` uses default TLS and proxy settings. If
    /// client construction fails, the [`PredictionError::Network`] variant is
    /// returned.
    ///
    /// ```no_run
    /// use btc_prediction_sdk::PredictionSdk;
    ///
    /// let sdk = PredictionSdk::new()?;
    /// # Ok::<(), btc_prediction_sdk::PredictionError>(())
    /// ```
    pub fn new() -> Result<Self, PredictionError> {
        let client = Client::builder()
            .build()
            .map_err(|err| PredictionError::Network(err.to_string()))?;
        Ok(Self::with_config(client, SdkConfig::default()))
    }

    /// Build an SDK with a pre-configured HTTP client and optional base URL.
    ///
    /// Use this constructor when you need to inject custom timeouts,
    /// instrumentation, or a mock server URL during tests.
    ///
    /// ```no_run
    /// use btc_prediction_sdk::PredictionSdk;
    /// use reqwest::Client;
    ///
    /// let client = Client::builder().timeout(std::time::Duration::from_secs(10)).build()?;
    /// let sdk = PredictionSdk::with_client(client, None);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn with_client(client: Client, market_base_url: Option<String>) -> Self {
        let config = match market_base_url {
            Some(url) => SdkConfig::default().with_base_url(url),
            None => SdkConfig::default(),
        };
        Self::with_config(client, config)
    }

    pub fn with_config(client: Client, config: SdkConfig) -> Self {
        let quota = Quota::per_second(config.requests_per_second);
        let limiter = Arc::new(RateLimiter::direct(quota));

        Self {
            client,
            config,
            limiter,
        }
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Current calendar date in the display timezone.
    pub fn today(&self) -> Result<NaiveDate, PredictionError> {
        let offset = self.config.display_offset()?;
        Ok(Utc::now().with_timezone(&offset).date_naive())
    }

    /// Fetch the historical series for the last `historical_days` days.
    ///
    /// Lookbacks above 90 days are requested at weekly resolution, shorter
    /// ones daily. Values outside `1..=365` are clamped. Each sample becomes a
    /// [`PricePoint`] dated in the display timezone with its price rounded to
    /// whole units.
    ///
    /// Errors are returned when the upstream call fails, responds with a
    /// non-success status, the payload cannot be deserialized, or it carries
    /// no samples. The body is parsed as a whole; one malformed sample fails
    /// the request.
    pub async fn fetch_history(
        &self,
        historical_days: u32,
    ) -> Result<Vec<PricePoint>, PredictionError> {
        let days = helpers::clamp_historical_days(historical_days);
        if days != historical_days {
            warn!(requested = historical_days, clamped = days, "historical window out of range");
        }

        let interval = helpers::interval_for_days(days);
        let url = format!(
            "{}/coins/{}/market_chart",
            self.config.base_url.trim_end_matches('/'),
            self.config.asset_id
        );
        let query = vec![
            ("vs_currency", self.config.vs_currency.clone()),
            ("days", days.to_string()),
            ("interval", interval.as_str().to_string()),
        ];

        self.request_market_chart(url, query).await
    }

    /// Load history for the dashboard, substituting the synthetic fallback
    /// series whenever the fetch fails.
    ///
    /// Never fails on network or parse problems: the error is logged and a
    /// deterministic series of exactly `historical_days` points is returned
    /// instead, tagged [`SeriesSource::Fallback`]. There is no retry. The only
    /// remaining error is an unusable display offset in the config.
    pub async fn load_history(&self, historical_days: u32) -> Result<HistoryLoad, PredictionError> {
        match self.fetch_history(historical_days).await {
            Ok(points) => Ok(HistoryLoad {
                points,
                source: SeriesSource::Live,
            }),
            Err(err) => {
                warn!(error = %err, historical_days, "price history unavailable, using fallback series");
                let days = helpers::clamp_historical_days(historical_days);
                Ok(HistoryLoad {
                    points: helpers::synthesize_fallback(days, self.today()?),
                    source: SeriesSource::Fallback,
                })
            }
        }
    }

    async fn request_market_chart(
        &self,
        url: String,
        query: Vec<(&str, String)>,
    ) -> Result<Vec<PricePoint>, PredictionError> {
        self.limiter.until_ready().await;
        debug!(%url, ?query, "requesting market chart");

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|err| PredictionError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PredictionError::Network(format!(
                "unexpected status: {}",
                status
            )));
        }

        let payload: MarketChartResponse = response
            .json()
            .await
            .map_err(|err| PredictionError::Serialization(err.to_string()))?;

        build_price_points(payload, self.config.display_offset()?)
    }
}

#[derive(Deserialize)]
struct MarketChartResponse {
    prices: Vec<[f64; 2]>,
}

fn build_price_points(
    payload: MarketChartResponse,
    offset: FixedOffset,
) -> Result<Vec<PricePoint>, PredictionError> {
    if payload.prices.is_empty() {
        return Err(PredictionError::EmptySeries);
    }

    let mut samples = Vec::with_capacity(payload.prices.len());
    for entry in payload.prices {
        let timestamp_ms = entry[0] as i64;
        let timestamp = Utc
            .timestamp_millis_opt(timestamp_ms)
            .single()
            .ok_or(PredictionError::TimeConversion)?;
        samples.push((timestamp, entry[1]));
    }

    samples.sort_by_key(|(timestamp, _)| *timestamp);

    Ok(samples
        .into_iter()
        .map(|(timestamp, price)| {
            PricePoint::historical(
                timestamp.with_timezone(&offset).date_naive(),
                helpers::round_price(price),
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn build_sdk(server: &MockServer) -> PredictionSdk {
        let client = Client::builder().build().unwrap();
        PredictionSdk::with_client(client, Some(server.base_url()))
    }

    fn jst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    #[tokio::test]
    async fn fetch_history_requests_daily_interval_for_short_windows() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/coins/bitcoin/market_chart")
                    .query_param("vs_currency", "jpy")
                    .query_param("days", "90")
                    .query_param("interval", "daily");
                then.status(200)
                    .json_body(json!({ "prices": [[1_700_000_000_000i64, 5_400_000.4]] }));
            })
            .await;

        let sdk = build_sdk(&server);
        let points = sdk.fetch_history(90).await.unwrap();

        mock.assert_async().await;
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].price, 5_400_000);
        assert!(!points[0].is_forecast);
    }

    #[tokio::test]
    async fn fetch_history_requests_weekly_interval_past_ninety_days() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/coins/bitcoin/market_chart")
                    .query_param("days", "91")
                    .query_param("interval", "weekly");
                then.status(200)
                    .json_body(json!({ "prices": [[1_700_000_000_000i64, 1.0]] }));
            })
            .await;

        let sdk = build_sdk(&server);
        sdk.fetch_history(91).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_history_clamps_oversized_window() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/coins/bitcoin/market_chart")
                    .query_param("days", "365")
                    .query_param("interval", "weekly");
                then.status(200)
                    .json_body(json!({ "prices": [[1_700_000_000_000i64, 1.0]] }));
            })
            .await;

        let sdk = build_sdk(&server);
        sdk.fetch_history(366).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_history_handles_unexpected_status() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/coins/bitcoin/market_chart");
                then.status(500);
            })
            .await;

        let sdk = build_sdk(&server);
        let result = sdk.fetch_history(30).await.unwrap_err();

        mock.assert_async().await;
        assert!(matches!(result, PredictionError::Network(message) if message.contains("unexpected status")));
    }

    #[tokio::test]
    async fn fetch_history_rejects_malformed_sample() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/coins/bitcoin/market_chart");
                then.status(200)
                    .json_body(json!({ "prices": [[1_700_000_000_000i64, 1.0], [1_700_086_400_000i64]] }));
            })
            .await;

        let sdk = build_sdk(&server);
        let result = sdk.fetch_history(30).await.unwrap_err();

        assert!(matches!(result, PredictionError::Serialization(_)));
    }

    #[tokio::test]
    async fn load_history_falls_back_when_upstream_fails() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/coins/bitcoin/market_chart");
                then.status(503);
            })
            .await;

        let sdk = build_sdk(&server);
        let load = sdk.load_history(14).await.unwrap();

        assert_eq!(load.source, SeriesSource::Fallback);
        assert_eq!(load.points.len(), 14);
        assert!(load.points.iter().all(|point| !point.is_forecast));
    }

    #[test]
    fn price_points_are_dated_in_display_timezone_and_sorted() {
        // 2023-11-14T22:13:20Z is already 2023-11-15 in JST.
        let payload = MarketChartResponse {
            prices: vec![[1_700_086_400_000.0, 2.6], [1_700_000_000_000.0, 1.4]],
        };

        let points = build_price_points(payload, jst()).unwrap();

        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2023, 11, 15).unwrap());
        assert_eq!(points[0].price, 1);
        assert_eq!(points[1].date, NaiveDate::from_ymd_opt(2023, 11, 16).unwrap());
        assert_eq!(points[1].price, 3);
    }

    #[test]
    fn empty_payload_is_an_error() {
        let payload = MarketChartResponse { prices: Vec::new() };

        let result = build_price_points(payload, jst());

        assert!(matches!(result, Err(PredictionError::EmptySeries)));
    }
}
