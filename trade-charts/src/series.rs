use std::collections::HashMap;

use comtrade::{PartnerCode, Period, TradeRecord};
use itertools::Itertools;
use log::warn;

/// Synthetic category holding whatever world trade the tracked partners don't explain.
pub const OTHER: &str = "Other";

/// Distinct periods present in `records`, ascending.
pub fn periods(records: &[TradeRecord]) -> Vec<Period> {
    records.iter().map(|r| r.period).sorted().dedup().collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partner {
    pub code: PartnerCode,
    pub title: String,
}

/// Partners in the order they were first seen. Titles are the category keys, so a
/// second code reusing a title is folded into the first.
#[derive(Debug, Clone, Default)]
pub struct PartnerSet {
    partners: Vec<Partner>,
}

impl PartnerSet {
    pub fn from_records(records: &[TradeRecord]) -> Self {
        let mut set = Self::default();
        set.observe(records);
        set
    }

    pub fn observe(&mut self, records: &[TradeRecord]) {
        for record in records.iter().filter(|r| !r.partner_code.is_world()) {
            if !self.contains_title(&record.partner_title) {
                self.partners.push(Partner {
                    code: record.partner_code,
                    title: record.partner_title.clone(),
                });
            }
        }
    }

    pub fn contains_title(&self, title: &str) -> bool {
        self.partners.iter().any(|p| p.title == title)
    }

    pub fn title_of(&self, code: PartnerCode) -> Option<&str> {
        self.partners
            .iter()
            .find(|p| p.code == code)
            .map(|p| p.title.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Partner> {
        self.partners.iter()
    }

    pub fn len(&self) -> usize {
        self.partners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }

    /// Titles of the known partners that appear in `records`, in first-seen order.
    pub fn present_in<'a>(&'a self, records: &[TradeRecord]) -> Vec<&'a str> {
        self.partners
            .iter()
            .filter(|p| records.iter().any(|r| r.partner_title == p.title))
            .map(|p| p.title.as_str())
            .collect()
    }
}

/// Per-period category values, partners first and [`OTHER`] last.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesEntry {
    pub period: Period,
    pub values: Vec<(String, f64)>,
}

impl SeriesEntry {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| *value)
    }

    pub fn total(&self) -> f64 {
        self.values.iter().map(|(_, value)| value).sum()
    }
}

/// World trade per period, first record wins.
pub fn world_totals(records: &[TradeRecord]) -> HashMap<Period, f64> {
    let mut totals = HashMap::new();
    for record in records.iter().filter(|r| r.partner_code.is_world()) {
        totals.entry(record.period).or_insert(record.trade_value);
    }
    totals
}

/// Groups `records` by period into one entry per period holding each of `partners`
/// (zero when absent) plus the [`OTHER`] residual. Periods without a World record
/// can't be residualised and are skipped. An [`OTHER`] entry in `partners` is
/// ignored; the residual is always computed.
pub fn build_series(records: &[TradeRecord], partners: &[&str]) -> Vec<SeriesEntry> {
    let partners: Vec<&str> = partners.iter().copied().filter(|t| *t != OTHER).collect();
    let world = world_totals(records);
    let mut partner_values: HashMap<(&str, Period), f64> = HashMap::new();
    for record in records.iter().filter(|r| !r.partner_code.is_world()) {
        *partner_values
            .entry((record.partner_title.as_str(), record.period))
            .or_default() += record.trade_value;
    }

    periods(records)
        .into_iter()
        .filter_map(|period| {
            let Some(world_value) = world.get(&period) else {
                warn!("no World record for {period}, leaving it out of the chart");
                return None;
            };
            let mut values = Vec::with_capacity(partners.len() + 1);
            let mut known = 0.0;
            for title in &partners {
                let value = partner_values
                    .get(&(*title, period))
                    .copied()
                    .unwrap_or(0.0);
                known += value;
                values.push((title.to_string(), value));
            }
            let other = world_value - known;
            if other < 0.0 {
                warn!(
                    "partners report {known} for {period} but world trade is only {world_value}"
                );
            }
            values.push((OTHER.to_string(), other));
            Some(SeriesEntry { period, values })
        })
        .collect()
}
