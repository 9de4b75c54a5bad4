use std::path::PathBuf;

use clap::Parser;
use comtrade::{ComtradeClient, PartnerCode, MAX_PARTNER_CODES};
use trade_charts::{AxisPolicy, ChartLayout};

/// Knobs for one charting run.
#[derive(Debug, Clone, PartialEq)]
pub struct ShareSettings {
    /// Partner fetched alongside World up front, and drawn highlighted.
    pub seed_partner: PartnerCode,
    /// Minimum share of World trade in the latest period for a partner to be backfilled.
    pub share_threshold_percent: f64,
    pub batch_size: usize,
    pub layout: ChartLayout,
    pub axis_policy: AxisPolicy,
}

impl Default for ShareSettings {
    fn default() -> Self {
        Self {
            seed_partner: PartnerCode(124),
            share_threshold_percent: 5.0,
            batch_size: MAX_PARTNER_CODES,
            layout: ChartLayout::default(),
            axis_policy: AxisPolicy::Frozen,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Charts each partner's share of a commodity's imports")]
pub struct Args {
    /// HS commodity code, e.g. 0901 for coffee
    pub commodity: String,
    /// Reporting (importing) country code
    #[arg(long, default_value_t = 842)]
    pub reporter: i32,
    /// Partner fetched with World before ranking, drawn highlighted
    #[arg(long, default_value_t = 124)]
    pub seed_partner: i32,
    #[arg(long, default_value_t = 5.0)]
    pub threshold_percent: f64,
    /// Partners per backfill request, at most 5
    #[arg(long, default_value_t = MAX_PARTNER_CODES)]
    pub batch_size: usize,
    #[arg(short, long, default_value = "trade-share.svg")]
    pub output: PathBuf,
    #[arg(long, default_value = ComtradeClient::COMTRADE_BASE_URL)]
    pub api_url: String,
    #[arg(long, default_value = "trade-share")]
    pub user_agent: String,
    /// Widen the axes when later data outgrows the first render
    #[arg(long)]
    pub grow_axes: bool,
}

impl Args {
    pub fn settings(&self) -> ShareSettings {
        ShareSettings {
            seed_partner: PartnerCode(self.seed_partner),
            share_threshold_percent: self.threshold_percent,
            batch_size: self.batch_size.clamp(1, MAX_PARTNER_CODES),
            axis_policy: if self.grow_axes {
                AxisPolicy::GrowToFit
            } else {
                AxisPolicy::Frozen
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["trade-share", "0901"]).unwrap();
        assert_eq!(args.commodity, "0901");
        assert_eq!(args.reporter, 842);
        assert_eq!(args.api_url, ComtradeClient::COMTRADE_BASE_URL);
        assert_eq!(args.settings(), ShareSettings::default());
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "trade-share",
            "0902",
            "--seed-partner",
            "76",
            "--batch-size",
            "50",
            "--grow-axes",
            "-o",
            "tea.svg",
        ])
        .unwrap();
        let settings = args.settings();
        assert_eq!(settings.seed_partner, PartnerCode(76));
        assert_eq!(settings.batch_size, MAX_PARTNER_CODES);
        assert_eq!(settings.axis_policy, AxisPolicy::GrowToFit);
        assert_eq!(args.output, PathBuf::from("tea.svg"));
        assert!(Args::try_parse_from(["trade-share"]).is_err());
    }
}
