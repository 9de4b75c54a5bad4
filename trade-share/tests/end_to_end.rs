use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use comtrade::{CommodityCode, Error, PartnerCode, Period, Selection, TradeRecord};
use trade_charts::{
    chart::{HIGHLIGHT_COLOR, OTHER_COLOR},
    Band, OTHER,
};
use trade_share::{draw_trade_chart, ChartTarget, ShareSettings, TradeSource};

type Call = (Selection<PartnerCode>, Selection<Period>);

/// Answers queries from a fixed table of records and remembers what was asked.
struct FakeComtrade {
    records: Vec<TradeRecord>,
    calls: Mutex<Vec<Call>>,
    fail_after: Option<usize>,
}

impl FakeComtrade {
    fn new(records: Vec<TradeRecord>) -> Self {
        Self {
            records,
            calls: Mutex::new(vec![]),
            fail_after: None,
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

fn selected<T: PartialEq>(selection: &Selection<T>, value: &T) -> bool {
    match selection {
        Selection::All => true,
        Selection::Only(values) => values.contains(value),
    }
}

#[async_trait]
impl TradeSource for FakeComtrade {
    async fn fetch(
        &self,
        commodity: &CommodityCode,
        partners: Selection<PartnerCode>,
        periods: Selection<Period>,
    ) -> Result<Vec<TradeRecord>, Error> {
        assert_eq!(commodity.0, "0901");
        let mut calls = self.calls.lock().unwrap();
        if self.fail_after.is_some_and(|limit| calls.len() >= limit) {
            return Err(Error::MissingDataset("usage limit exceeded".to_string()));
        }
        calls.push((partners.clone(), periods.clone()));
        Ok(self
            .records
            .iter()
            .filter(|r| selected(&partners, &r.partner_code) && selected(&periods, &r.period))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
struct Frames(Vec<String>);

impl ChartTarget for Frames {
    fn present(&mut self, svg: &str) -> Result<()> {
        self.0.push(svg.to_string());
        Ok(())
    }
}

fn record(code: i32, title: &str, period: i32, value: f64) -> TradeRecord {
    TradeRecord {
        partner_code: PartnerCode(code),
        partner_title: title.to_string(),
        period: Period(period),
        trade_value: value,
    }
}

/// First and last knot of a band's upper edge, then of its lower edge.
fn edge_ends(band: &Band) -> [(f64, f64); 4] {
    let half = band.outline.len() / 2;
    [
        band.outline[0],
        band.outline[half - 1],
        band.outline[band.outline.len() - 1],
        band.outline[half],
    ]
}

fn coffee(canada_2020: f64) -> Vec<TradeRecord> {
    vec![
        record(0, "World", 2019, 900.0),
        record(0, "World", 2020, 1000.0),
        record(124, "Canada", 2019, 70.0),
        record(124, "Canada", 2020, canada_2020),
        record(484, "Mexico", 2020, 20.0),
    ]
}

#[tokio::test]
async fn small_partner_is_not_backfilled() {
    let source = FakeComtrade::new(coffee(40.0));
    let mut frames = Frames::default();
    let chart = draw_trade_chart(
        &source,
        &mut frames,
        &ShareSettings::default(),
        &CommodityCode::from("0901"),
    )
    .await
    .unwrap();

    let calls = source.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[0],
        (
            Selection::Only(vec![PartnerCode::WORLD, PartnerCode(124)]),
            Selection::All
        )
    );
    assert_eq!(calls[1], (Selection::All, Selection::Only(vec![Period(2020)])));
    // placeholder, initial render, finished chart
    assert_eq!(frames.0.len(), 3);
    assert_eq!(chart.keys(), vec!["Canada", OTHER]);
    assert!(!chart.is_loading());
}

#[tokio::test]
async fn significant_partner_is_backfilled_and_redrawn() {
    let source = FakeComtrade::new(coffee(60.0));
    let mut frames = Frames::default();
    let chart = draw_trade_chart(
        &source,
        &mut frames,
        &ShareSettings::default(),
        &CommodityCode::from("0901"),
    )
    .await
    .unwrap();

    let calls = source.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(
        calls[2],
        (Selection::Only(vec![PartnerCode(124)]), Selection::All)
    );
    // placeholder, initial render, backfill render, finished chart
    assert_eq!(frames.0.len(), 4);
    let backfill_frame = &frames.0[2];
    assert!(backfill_frame.contains("Canada"));
    assert!(backfill_frame.contains(OTHER));
    assert!(backfill_frame.contains("Loading"));
    assert!(!frames.0[3].contains("Loading"));
    assert_eq!(chart.keys(), vec!["Canada", OTHER]);

    // Other fills the gap between Canada and World trade
    let other = chart.band(OTHER).unwrap();
    assert_eq!(
        edge_ends(other),
        [(2019.0, 900.0), (2020.0, 1000.0), (2019.0, 70.0), (2020.0, 60.0)]
    );
}

#[tokio::test]
async fn new_partners_are_backfilled_tail_first_and_appended() {
    let source = FakeComtrade::new(vec![
        record(0, "World", 2019, 900.0),
        record(0, "World", 2020, 1000.0),
        record(124, "Canada", 2019, 70.0),
        record(124, "Canada", 2020, 60.0),
        record(484, "Mexico", 2020, 100.0),
        record(76, "Brazil", 2020, 200.0),
        record(484, "Mexico", 2019, 80.0),
        record(76, "Brazil", 2019, 150.0),
    ]);
    let settings = ShareSettings {
        batch_size: 2,
        ..Default::default()
    };
    let mut frames = Frames::default();
    let chart = draw_trade_chart(
        &source,
        &mut frames,
        &settings,
        &CommodityCode::from("0901"),
    )
    .await
    .unwrap();

    let calls = source.calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(
        calls[2],
        (
            Selection::Only(vec![PartnerCode(484), PartnerCode(76)]),
            Selection::All
        )
    );
    assert_eq!(
        calls[3],
        (Selection::Only(vec![PartnerCode(124)]), Selection::All)
    );
    // placeholder, initial render, one per batch, finished chart
    assert_eq!(frames.0.len(), 5);
    assert!(frames.0[2].contains("Mexico"));
    assert!(frames.0[2].contains("Brazil"));

    assert_eq!(chart.keys(), vec!["Canada", OTHER, "Mexico", "Brazil"]);
    let rgb = |key: &str| {
        let color = chart.band(key).unwrap().color;
        (color.0, color.1, color.2)
    };
    assert_eq!(rgb("Canada"), (HIGHLIGHT_COLOR.0, HIGHLIGHT_COLOR.1, HIGHLIGHT_COLOR.2));
    assert_eq!(rgb(OTHER), (OTHER_COLOR.0, OTHER_COLOR.1, OTHER_COLOR.2));
    assert_eq!(rgb("Mexico"), (0xff, 0x7f, 0x0e));
    assert_eq!(rgb("Brazil"), (0x2c, 0xa0, 0x2c));

    let other = chart.band(OTHER).unwrap();
    assert_eq!(
        edge_ends(other),
        [(2019.0, 900.0), (2020.0, 1000.0), (2019.0, 300.0), (2020.0, 360.0)]
    );
}

#[tokio::test]
async fn failed_batch_aborts_with_loading_frame_left_behind() {
    let mut source = FakeComtrade::new(coffee(60.0));
    source.fail_after = Some(2);
    let mut frames = Frames::default();
    let result = draw_trade_chart(
        &source,
        &mut frames,
        &ShareSettings::default(),
        &CommodityCode::from("0901"),
    )
    .await;

    assert!(result.is_err());
    assert_eq!(frames.0.len(), 2);
    assert!(frames.0.last().unwrap().contains("Loading"));
}

#[tokio::test]
async fn empty_initial_fetch_is_an_error() {
    let source = FakeComtrade::new(vec![]);
    let mut frames = Frames::default();
    let result = draw_trade_chart(
        &source,
        &mut frames,
        &ShareSettings::default(),
        &CommodityCode::from("0901"),
    )
    .await;
    assert!(result.is_err());
    assert_eq!(source.calls().len(), 1);
}
