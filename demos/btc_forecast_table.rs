use btc_prediction_sdk::{RequestWindow, display, forecast};
use chrono::Local;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Offline forecast from a fixed anchor price with a seeded random source.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let window = RequestWindow::new(30, 14)?;
    let anchor = 15_000_000u64;
    let today = Local::now().date_naive();
    let mut rng = StdRng::seed_from_u64(2024);

    let points = forecast::generate(anchor, window.forecast_days, today, &mut rng)?;
    let rows = display::forecast_rows(anchor, &points);

    println!("🔮 {}-day forecast from {}", window.forecast_days, display::format_currency(anchor));
    for row in rows {
        println!(
            "  {:<12} {:>14} {:>9}   axis {}",
            btc_prediction_sdk::display_date::format(&row.date),
            display::format_currency(row.price),
            display::format_change_pct(row.change_pct),
            display::format_axis_label(row.price),
        );
    }

    Ok(())
}
