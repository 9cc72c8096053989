//! Bitcoin price history and short-horizon forecast for a price dashboard.
//! Consumers should import exported types via the crate root.
//!
//! History comes from the CoinGecko market chart endpoint (daily samples up to
//! 90 days, weekly beyond); when the provider is unreachable a deterministic
//! synthetic series is used instead. The forecast is a bounded random
//! perturbation of the last observed price with a slight upward trend.
//!
//! # Example
//!
//! ```no_run
//! use btc_prediction_sdk::{Dashboard, PredictionSdk, RequestWindow, display};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), btc_prediction_sdk::PredictionError> {
//!     let dashboard = Dashboard::new(PredictionSdk::new()?);
//!
//!     if let Some(snapshot) = dashboard.refresh(RequestWindow::new(30, 7)?).await? {
//!         println!("{}", display::render_forecast_table(&snapshot));
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dashboard;
pub mod display;
pub mod dto;
pub mod forecast;
pub(crate) mod helpers;
pub mod handler;
pub mod implementation {
    include!("impl.rs");
}

pub use config::SdkConfig;
pub use dashboard::{Dashboard, build_snapshot};
pub use dto::*;
pub use handler::{run_dashboard_handler, run_dashboard_handler_with};
pub use implementation::PredictionSdk;
