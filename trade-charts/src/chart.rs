use std::ops::Range;

use anyhow::anyhow;
use comtrade::{PartnerCode, Period, TradeRecord};
use itertools::Itertools;
use plotters::{coord::Shift, drawing::DrawingAreaErrorKind, prelude::*, style::RGBColor};

use crate::{
    curve::monotone_x,
    series::{build_series, periods, world_totals, PartnerSet, OTHER},
    short_currency,
    stack::{stack, StackPoint, StackedSeries},
};

const SAMPLES_PER_SEGMENT: usize = 8;

/// d3's category10 scheme.
const PALETTE: [RGBColor; 10] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0x94, 0x67, 0xbd),
    RGBColor(0x8c, 0x56, 0x4b),
    RGBColor(0xe3, 0x77, 0xc2),
    RGBColor(0x7f, 0x7f, 0x7f),
    RGBColor(0xbc, 0xbd, 0x22),
    RGBColor(0x17, 0xbe, 0xcf),
];
pub const HIGHLIGHT_COLOR: RGBColor = RGBColor(0xe6, 0x55, 0x0d);
pub const OTHER_COLOR: RGBColor = RGBColor(0xcc, 0xcc, 0xcc);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Margin {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartLayout {
    pub width: u32,
    pub height: u32,
    pub margin: Margin,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            width: 600,
            height: 250,
            margin: Margin {
                top: 20,
                right: 30,
                bottom: 30,
                left: 60,
            },
        }
    }
}

impl ChartLayout {
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// What happens to the axis domains after the initial render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisPolicy {
    /// Domains stay as computed from the first dataset; bands are clamped to them.
    #[default]
    Frozen,
    /// Domains widen whenever new data falls outside them.
    GrowToFit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChartStyle {
    /// Partner drawn in [`HIGHLIGHT_COLOR`].
    pub highlight: Option<PartnerCode>,
    pub axis_policy: AxisPolicy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Domain {
    pub x: Range<f64>,
    pub y: Range<f64>,
}

impl Domain {
    fn from_records(records: &[TradeRecord]) -> anyhow::Result<Self> {
        let (first, last) = periods(records)
            .into_iter()
            .minmax()
            .into_option()
            .ok_or(anyhow!("no periods to chart"))?;
        let max_world = world_totals(records)
            .into_values()
            .fold(f64::NEG_INFINITY, f64::max);
        if !max_world.is_finite() {
            return Err(anyhow!("no World trade to scale against"));
        }
        Ok(Self {
            x: x_range(first, last),
            y: 0.0..if max_world > 0.0 { max_world } else { 1.0 },
        })
    }

    fn grow_to(&mut self, stacked: &[StackedSeries]) {
        let points = stacked.iter().flat_map(|s| s.points.iter());
        for point in points {
            let x = point.period.0 as f64;
            self.x.start = self.x.start.min(x);
            self.x.end = self.x.end.max(x);
            self.y.start = self.y.start.min(point.lower).min(point.upper);
            self.y.end = self.y.end.max(point.lower).max(point.upper);
        }
    }

    fn clamp(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (
            x.clamp(self.x.start, self.x.end),
            y.clamp(self.y.start, self.y.end),
        )
    }
}

fn x_range(first: Period, last: Period) -> Range<f64> {
    if first == last {
        (first.0 - 1) as f64..(last.0 + 1) as f64
    } else {
        first.0 as f64..last.0 as f64
    }
}

/// One filled category area, as a closed outline in data coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub key: String,
    pub color: RGBColor,
    pub outline: Vec<(f64, f64)>,
}

/// Picks a band colour: the highlighted partner and [`OTHER`] have fixed colours,
/// everything else comes from the palette by series index.
pub fn band_color(key: &str, index: usize, highlight: Option<&str>) -> RGBColor {
    if Some(key) == highlight {
        HIGHLIGHT_COLOR
    } else if key == OTHER {
        OTHER_COLOR
    } else {
        PALETTE[index % PALETTE.len()]
    }
}

/// A stacked-area chart of partner shares that is redrawn as data arrives.
///
/// The axis domains, the partner order and the bands all live here, so callers
/// own the whole chart state and pass it between renders.
#[derive(Debug, Clone)]
pub struct StackedAreaChart {
    layout: ChartLayout,
    style: ChartStyle,
    domain: Domain,
    partners: PartnerSet,
    bands: Vec<Band>,
    loading: bool,
}

impl StackedAreaChart {
    /// Sets up the chart against the initial dataset, which fixes the axis domains.
    /// No bands exist until [`StackedAreaChart::update`] is called.
    pub fn setup(
        records: &[TradeRecord],
        layout: ChartLayout,
        style: ChartStyle,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            layout,
            style,
            domain: Domain::from_records(records)?,
            partners: PartnerSet::default(),
            bands: vec![],
            loading: true,
        })
    }

    /// Recomputes every band from `records`. Bands are matched by category key:
    /// missing categories are dropped, known ones are updated where they are and
    /// new ones are appended.
    pub fn update(&mut self, records: &[TradeRecord]) {
        self.partners.observe(records);
        let partners = self.partners.present_in(records);
        let series = build_series(records, &partners);
        let keys: Vec<&str> = partners.into_iter().chain([OTHER]).collect();
        let stacked = stack(&series, &keys);
        if self.style.axis_policy == AxisPolicy::GrowToFit {
            self.domain.grow_to(&stacked);
        }
        let highlight = self
            .style
            .highlight
            .and_then(|code| self.partners.title_of(code))
            .map(str::to_string);

        self.bands.retain(|band| stacked.iter().any(|s| s.key == band.key));
        for series in &stacked {
            let color = band_color(&series.key, series.index, highlight.as_deref());
            let outline = self.outline(series);
            match self.bands.iter_mut().find(|b| b.key == series.key) {
                Some(band) => {
                    band.color = color;
                    band.outline = outline;
                }
                None => self.bands.push(Band {
                    key: series.key.clone(),
                    color,
                    outline,
                }),
            }
        }
    }

    fn outline(&self, series: &StackedSeries) -> Vec<(f64, f64)> {
        let edge = |y: fn(&StackPoint) -> f64| {
            let knots: Vec<_> = series
                .points
                .iter()
                .map(|p| self.domain.clamp((p.period.0 as f64, y(p))))
                .collect();
            monotone_x(&knots, SAMPLES_PER_SEGMENT)
        };
        let mut outline = edge(|p: &StackPoint| p.upper);
        outline.extend(edge(|p: &StackPoint| p.lower).into_iter().rev());
        outline
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    pub fn keys(&self) -> Vec<&str> {
        self.bands.iter().map(|b| b.key.as_str()).collect()
    }

    pub fn band(&self, key: &str) -> Option<&Band> {
        self.bands.iter().find(|b| b.key == key)
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn draw<'a, T>(
        &self,
        backend: T,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'a>>
    where
        T: 'a + DrawingBackend,
    {
        let root = backend.into_drawing_area();
        root.fill(&WHITE)?;
        let margin = self.layout.margin;
        let mut chart = ChartBuilder::on(&root)
            .margin_top(margin.top)
            .margin_right(margin.right)
            .x_label_area_size(margin.bottom)
            .y_label_area_size(margin.left)
            .build_cartesian_2d(self.domain.x.clone(), self.domain.y.clone())?;

        chart
            .configure_mesh()
            .disable_mesh()
            .label_style(("sans-serif", 10))
            .x_labels(10)
            .y_labels(5)
            .x_label_formatter(&|x| year_label(*x))
            .y_label_formatter(&|y| short_currency(*y))
            .draw()?;

        for band in &self.bands {
            let color = band.color;
            chart
                .draw_series(std::iter::once(Polygon::new(
                    band.outline.clone(),
                    color.filled(),
                )))?
                .label(band.key.as_str())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 4), (x + 8, y + 4)], color.filled())
                });
        }

        if !self.bands.is_empty() {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .label_font(("sans-serif", 10))
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()?;
        }

        if self.loading {
            draw_loading(&root, &self.layout)?;
        }

        root.present()?;
        Ok(())
    }
}

fn year_label(x: f64) -> String {
    if (x - x.round()).abs() > 1e-6 {
        return String::new();
    }
    Period(x.round() as i32)
        .start_date()
        .map(|date| date.format("%Y").to_string())
        .unwrap_or_default()
}

pub(crate) fn draw_loading<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    layout: &ChartLayout,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let x = layout.width.saturating_sub(layout.margin.right) as i32 - 60;
    let y = layout.margin.top as i32;
    root.draw(&Text::new(
        "Loading…",
        (x, y),
        ("sans-serif", 12).into_font().color(&BLACK),
    ))
}
