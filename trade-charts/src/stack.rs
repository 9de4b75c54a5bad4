use comtrade::Period;

use crate::series::SeriesEntry;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackPoint {
    pub period: Period,
    pub lower: f64,
    pub upper: f64,
}

/// One category's band: its lower and upper boundary for every period.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedSeries {
    pub key: String,
    pub index: usize,
    pub points: Vec<StackPoint>,
}

/// Stacks `entries` in the order of `keys`, each band starting where the previous
/// one ended. Values are not normalised, so a negative value dips below its
/// predecessor's upper edge.
pub fn stack(entries: &[SeriesEntry], keys: &[&str]) -> Vec<StackedSeries> {
    let mut baseline = vec![0.0; entries.len()];
    keys.iter()
        .enumerate()
        .map(|(index, key)| {
            let points = entries
                .iter()
                .zip(baseline.iter_mut())
                .map(|(entry, base)| {
                    let lower = *base;
                    let upper = lower + entry.get(key).unwrap_or(0.0);
                    *base = upper;
                    StackPoint {
                        period: entry.period,
                        lower,
                        upper,
                    }
                })
                .collect();
            StackedSeries {
                key: key.to_string(),
                index,
                points,
            }
        })
        .collect()
}
