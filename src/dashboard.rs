use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use rand::Rng;
use tokio::sync::RwLock;
use tracing::debug;

use crate::display;
use crate::dto::{DashboardSnapshot, HistoryLoad, PredictionError, RequestWindow};
use crate::forecast;
use crate::implementation::PredictionSdk;

/// Recompute everything the dashboard shows for one window.
///
/// The forecast is anchored on the last historical price; `history.points`
/// must therefore be non-empty, which the loader guarantees.
pub fn build_snapshot<R: Rng + ?Sized>(
    generation: u64,
    window: RequestWindow,
    history: HistoryLoad,
    today: NaiveDate,
    rng: &mut R,
) -> Result<DashboardSnapshot, PredictionError> {
    let HistoryLoad { points, source } = history;
    let current_price = points
        .last()
        .map(|point| point.price)
        .ok_or(PredictionError::EmptySeries)?;

    let forecast = forecast::generate(current_price, window.forecast_days, today, rng)?;
    let change_24h_pct = display::change_24h_pct(&points);
    let forecast_rows = display::forecast_rows(current_price, &forecast);

    let mut series = points;
    series.extend(forecast);

    Ok(DashboardSnapshot {
        generation,
        window,
        source,
        series,
        current_price,
        change_24h_pct,
        forecast_rows,
    })
}

/// Holds the visible dashboard state and serializes updates to it.
///
/// Every [`Dashboard::refresh`] takes a new generation number before it
/// starts loading. Refreshes may finish in any order, but a result is only
/// published if no newer refresh was issued in the meantime.
pub struct Dashboard {
    sdk: PredictionSdk,
    issued: AtomicU64,
    visible: RwLock<Option<Arc<DashboardSnapshot>>>,
}

impl Dashboard {
    pub fn new(sdk: PredictionSdk) -> Self {
        Self {
            sdk,
            issued: AtomicU64::new(0),
            visible: RwLock::new(None),
        }
    }

    pub fn sdk(&self) -> &PredictionSdk {
        &self.sdk
    }

    /// The snapshot currently on display, if any refresh has completed.
    pub async fn current(&self) -> Option<Arc<DashboardSnapshot>> {
        self.visible.read().await.clone()
    }

    /// Load and recompute the dashboard for `window`.
    ///
    /// Returns `Ok(Some(snapshot))` when the result was published and
    /// `Ok(None)` when a newer refresh was issued before this one finished,
    /// in which case the result is dropped.
    pub async fn refresh(
        &self,
        window: RequestWindow,
    ) -> Result<Option<Arc<DashboardSnapshot>>, PredictionError> {
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;

        let history = self.sdk.load_history(window.historical_days).await?;
        let today = self.sdk.today()?;
        let snapshot = {
            let mut rng = rand::thread_rng();
            Arc::new(build_snapshot(generation, window, history, today, &mut rng)?)
        };

        let mut visible = self.visible.write().await;
        let latest = self.issued.load(Ordering::SeqCst);
        if generation != latest {
            debug!(generation, latest, "discarding stale dashboard refresh");
            return Ok(None);
        }
        *visible = Some(Arc::clone(&snapshot));
        Ok(Some(snapshot))
    }
}
