use anyhow::{anyhow, Result};
use plotters::prelude::*;
use plotters_svg::SVGBackend;

use crate::chart::{draw_loading, ChartLayout, StackedAreaChart};

/// Renders the chart into a standalone SVG document.
pub fn render_svg(chart: &StackedAreaChart) -> Result<String> {
    let mut buffer = String::new();
    {
        let backend = SVGBackend::with_string(&mut buffer, chart.layout().size());
        chart
            .draw(backend)
            .map_err(|e| anyhow!("Failed to draw chart: {}", e))?;
    }
    Ok(buffer)
}

/// An empty drawing surface carrying only the loading indicator, shown before any
/// data has arrived.
pub fn render_placeholder(layout: &ChartLayout) -> Result<String> {
    let mut buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut buffer, layout.size()).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| anyhow!("Failed to draw placeholder: {}", e))?;
        draw_loading(&root, layout).map_err(|e| anyhow!("Failed to draw placeholder: {}", e))?;
        root.present()
            .map_err(|e| anyhow!("Failed to draw placeholder: {}", e))?;
    }
    Ok(buffer)
}
