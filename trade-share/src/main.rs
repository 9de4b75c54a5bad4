use anyhow::Result;
use clap::Parser;
use comtrade::{CommodityCode, ComtradeClient, ReporterCode};
use tracing::info;
use trade_share::{draw_trade_chart, Args, ComtradeSource, SvgFileTarget};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    let client = ComtradeClient::with_base_url(&args.user_agent, &args.api_url)?;
    let source = ComtradeSource::new(client, ReporterCode(args.reporter));
    let mut target = SvgFileTarget::new(&args.output);
    let commodity = CommodityCode(args.commodity.clone());
    let chart = draw_trade_chart(&source, &mut target, &args.settings(), &commodity).await?;
    info!(
        output = %args.output.display(),
        partners = chart.bands().len(),
        frames = target.frames(),
        "wrote chart"
    );
    Ok(())
}
