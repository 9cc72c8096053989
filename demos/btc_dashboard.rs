use btc_prediction_sdk::{Dashboard, PredictionSdk, RequestWindow, SeriesSource, display};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("🚀 Initializing Prediction SDK for Bitcoin (JPY)...");
    let dashboard = Dashboard::new(PredictionSdk::new()?);
    let window = RequestWindow::default();

    println!(
        "📊 Loading {} days of history and forecasting {} days...",
        window.historical_days, window.forecast_days
    );

    match dashboard.refresh(window).await {
        Ok(Some(snapshot)) => {
            if snapshot.source == SeriesSource::Fallback {
                println!("⚠️  Provider unreachable, showing synthetic history");
            }
            println!("\n--- ₿ Bitcoin Dashboard ---");
            println!("      💰 Current Price: {}", display::format_currency(snapshot.current_price));
            println!("      📈 24h Change: {}", display::format_change_pct(snapshot.change_24h_pct));
            println!("      🗓️  Forecast Days: {}\n", snapshot.window.forecast_days);
            print!("{}", display::render_forecast_table(&snapshot));
        }
        Ok(None) => println!("Refresh superseded by a newer request"),
        Err(e) => eprintln!("❌ Dashboard refresh failed: {}", e),
    }

    Ok(())
}
