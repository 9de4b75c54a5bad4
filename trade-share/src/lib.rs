pub mod chart_service;
pub mod config;
pub mod discovery;
pub mod records;
pub mod source;
pub mod target;

pub use chart_service::draw_trade_chart;
pub use config::{Args, ShareSettings};
pub use source::{ComtradeSource, TradeSource};
pub use target::{ChartTarget, SvgFileTarget};
