use comtrade::{PartnerCode, Period, TradeRecord};
use itertools::Itertools;
use tracing::warn;

/// `value` is at least `threshold_percent` of `world`. Compared in percent space so
/// an exact share such as 10 of 200 at 5% isn't lost to rounding.
pub fn is_significant(value: f64, world: f64, threshold_percent: f64) -> bool {
    value * 100.0 >= world * threshold_percent
}

/// Partners in `ranking` whose trade in `period` reaches the threshold share of World
/// trade, in response order. World trade is read from `ranking`, then from `known`.
pub fn rank_partners(
    ranking: &[TradeRecord],
    known: &[TradeRecord],
    period: Period,
    threshold_percent: f64,
) -> Vec<PartnerCode> {
    let world = ranking
        .iter()
        .chain(known)
        .find(|r| r.partner_code.is_world() && r.period == period)
        .map(|r| r.trade_value);
    let Some(world) = world else {
        warn!(%period, "no World trade to rank partners against");
        return vec![];
    };
    ranking
        .iter()
        .filter(|r| r.period == period && !r.partner_code.is_world())
        .filter(|r| is_significant(r.trade_value, world, threshold_percent))
        .map(|r| r.partner_code)
        .unique()
        .collect()
}

/// Partners waiting for their full history. Batches come off the tail, so the last
/// queued partners are fetched first; each batch keeps queue order.
#[derive(Debug, Clone)]
pub struct BackfillQueue {
    pending: Vec<PartnerCode>,
    batch_size: usize,
}

impl BackfillQueue {
    pub fn new(pending: Vec<PartnerCode>, batch_size: usize) -> Self {
        Self {
            pending,
            batch_size: batch_size.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Iterator for BackfillQueue {
    type Item = Vec<PartnerCode>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pending.is_empty() {
            return None;
        }
        let at = self.pending.len().saturating_sub(self.batch_size);
        Some(self.pending.split_off(at))
    }
}
