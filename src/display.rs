//! Derived figures and string formatting for the dashboard's stat cards,
//! chart axis and forecast table.

use std::fmt::Write as _;

use crate::dto::{DashboardSnapshot, ForecastRow, PricePoint, SeriesSource};

/// Percentage change between `previous` and `current`; `0.0` when there is no
/// usable base.
pub fn percent_change(previous: u64, current: u64) -> f64 {
    if previous == 0 {
        return 0.0;
    }
    (current as f64 - previous as f64) / previous as f64 * 100.0
}

/// Change between the last two historical points, or `0.0` with fewer than
/// two points.
pub fn change_24h_pct(history: &[PricePoint]) -> f64 {
    match history {
        [.., previous, last] => percent_change(previous.price, last.price),
        _ => 0.0,
    }
}

/// Table rows for the forecast, each compared with the point before it. The
/// first row is compared with `anchor_price`, the last historical price.
pub fn forecast_rows(anchor_price: u64, forecast: &[PricePoint]) -> Vec<ForecastRow> {
    let mut previous = anchor_price;
    forecast
        .iter()
        .map(|point| {
            let row = ForecastRow {
                date: point.date,
                price: point.price,
                change_pct: percent_change(previous, point.price),
            };
            previous = point.price;
            row
        })
        .collect()
}

/// Group an integer with thousands separators.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Yen amount in ja-JP currency style: full-width sign, grouped, no decimals.
///
/// ```
/// use btc_prediction_sdk::display::format_currency;
///
/// assert_eq!(format_currency(15_000_000), "￥15,000,000");
/// ```
pub fn format_currency(value: u64) -> String {
    format!("￥{}", group_thousands(value))
}

/// Signed percentage with two decimals, e.g. `+1.23%`.
pub fn format_change_pct(value: f64) -> String {
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{sign}{value:.2}%")
}

/// Y-axis tick label in millions of yen, e.g. `¥15.0M`.
pub fn format_axis_label(value: u64) -> String {
    format!("¥{:.1}M", value as f64 / 1_000_000.0)
}

/// Plain-text forecast table for terminals and logs.
pub fn render_forecast_table(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();
    let source = match snapshot.source {
        SeriesSource::Live => "live",
        SeriesSource::Fallback => "fallback",
    };

    let _ = writeln!(
        out,
        "current {}  24h {}  history {}d ({source})  forecast {}d",
        format_currency(snapshot.current_price),
        format_change_pct(snapshot.change_24h_pct),
        snapshot.window.historical_days,
        snapshot.window.forecast_days,
    );
    let _ = writeln!(out, "{:<12}{:>16}{:>10}", "date", "price", "change");
    for row in &snapshot.forecast_rows {
        let _ = writeln!(
            out,
            "{:<12}{:>16}{:>10}",
            crate::dto::display_date::format(&row.date),
            format_currency(row.price),
            format_change_pct(row.change_pct),
        );
    }
    out
}
