pub mod chart;
pub mod curve;
pub mod series;
pub mod stack;
pub mod svg;

pub use chart::{AxisPolicy, Band, ChartLayout, ChartStyle, Domain, Margin, StackedAreaChart};
pub use series::{build_series, periods, PartnerSet, SeriesEntry, OTHER};
pub use svg::{render_placeholder, render_svg};

/// Abbreviates a dollar amount for axis labels, e.g. `$1.5B`.
pub fn short_currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();
    if magnitude >= 1_000_000_000.0 {
        format!("{sign}${:.1}B", magnitude / 1_000_000_000.0)
    } else if magnitude >= 1_000_000.0 {
        format!("{sign}${:.1}M", magnitude / 1_000_000.0)
    } else if magnitude >= 1000.0 {
        format!("{sign}${:.1}K", magnitude / 1000.0)
    } else {
        format!("{sign}${magnitude:.0}")
    }
}
