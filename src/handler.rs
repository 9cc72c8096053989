use crate::{Dashboard, DashboardSnapshot, PredictionError, PredictionSdk, RequestWindow};

/// Build a dashboard snapshot for `window`, returning serialized JSON.
///
/// This helper is intended for HTTP or MCP entry points that hand the
/// dashboard data to a separate front end. It constructs an SDK with default
/// settings, loads history (substituting the fallback series if the provider
/// is unreachable), generates the forecast, and returns a JSON string
/// containing a [`DashboardSnapshot`].
///
/// # Examples
///
/// ```no_run
/// use btc_prediction_sdk::RequestWindow;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), btc_prediction_sdk::PredictionError> {
/// let window = RequestWindow::new(30, 7)?;
/// let json = btc_prediction_sdk::run_dashboard_handler(window).await?;
/// println!("{json}");
/// # Ok(())
/// # }
/// ```
pub async fn run_dashboard_handler(window: RequestWindow) -> Result<String, PredictionError> {
    let sdk = PredictionSdk::new()?;
    run_dashboard_handler_with(sdk, window).await
}

/// Same as [`run_dashboard_handler`] with a caller-provided SDK.
pub async fn run_dashboard_handler_with(
    sdk: PredictionSdk,
    window: RequestWindow,
) -> Result<String, PredictionError> {
    let dashboard = Dashboard::new(sdk);
    let snapshot = dashboard
        .refresh(window)
        .await?
        .ok_or_else(|| PredictionError::Serialization("dashboard refresh was superseded".to_string()))?;

    to_json(&snapshot)
}

fn to_json(snapshot: &DashboardSnapshot) -> Result<String, PredictionError> {
    serde_json::to_string(snapshot).map_err(|err| PredictionError::Serialization(err.to_string()))
}
