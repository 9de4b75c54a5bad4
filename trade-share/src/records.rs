use comtrade::TradeRecord;
use itertools::Itertools;

/// Keeps the first record seen for every (partner, period) pair.
pub fn dedupe(records: Vec<TradeRecord>) -> Vec<TradeRecord> {
    records
        .into_iter()
        .unique_by(|r| (r.partner_code, r.period))
        .collect()
}

/// Appends `fetched` to `accumulated`, keeping records that were already there.
pub fn merge(accumulated: &mut Vec<TradeRecord>, fetched: Vec<TradeRecord>) {
    let mut all = std::mem::take(accumulated);
    all.extend(fetched);
    *accumulated = dedupe(all);
}

#[cfg(test)]
mod test {
    use super::{dedupe, merge};
    use comtrade::{PartnerCode, Period, TradeRecord};

    fn record(code: i32, period: i32, value: f64) -> TradeRecord {
        TradeRecord {
            partner_code: PartnerCode(code),
            partner_title: format!("partner {code}"),
            period: Period(period),
            trade_value: value,
        }
    }

    #[test]
    fn test_dedupe_keeps_first() {
        let records = vec![
            record(0, 2020, 100.0),
            record(124, 2020, 10.0),
            record(0, 2020, 999.0),
            record(124, 2019, 8.0),
            record(124, 2020, 11.0),
        ];
        let deduped = dedupe(records);
        assert_eq!(
            deduped,
            vec![record(0, 2020, 100.0), record(124, 2020, 10.0), record(124, 2019, 8.0)]
        );
    }

    #[test]
    fn test_merge() {
        let mut accumulated = vec![record(0, 2020, 100.0), record(124, 2020, 10.0)];
        merge(
            &mut accumulated,
            vec![record(124, 2020, 12.0), record(76, 2020, 40.0)],
        );
        assert_eq!(
            accumulated,
            vec![record(0, 2020, 100.0), record(124, 2020, 10.0), record(76, 2020, 40.0)]
        );
    }
}
