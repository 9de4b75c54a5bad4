use anyhow::{anyhow, Result};
use comtrade::{CommodityCode, PartnerCode, Selection, TradeRecord};
use tracing::{info, instrument};
use trade_charts::{periods, render_placeholder, render_svg, ChartStyle, StackedAreaChart};

use crate::{
    config::ShareSettings,
    discovery::{rank_partners, BackfillQueue},
    records::{dedupe, merge},
    source::TradeSource,
    target::ChartTarget,
};

/// Builds the partner-share chart for `commodity`, presenting a frame to `target`
/// after every round of data, and returns the finished chart.
///
/// World and the seed partner are fetched for every year first, which fixes the
/// axes. The latest year is then fetched for all partners to find those holding at
/// least the threshold share, and their histories are backfilled in batches. Any
/// fetch failure aborts the run; the last presented frame keeps its loading
/// indicator.
#[instrument(skip(source, target, settings))]
pub async fn draw_trade_chart<S, T>(
    source: &S,
    target: &mut T,
    settings: &ShareSettings,
    commodity: &CommodityCode,
) -> Result<StackedAreaChart>
where
    S: TradeSource + ?Sized,
    T: ChartTarget + ?Sized,
{
    target.present(&render_placeholder(&settings.layout)?)?;

    let mut records = dedupe(
        source
            .fetch(
                commodity,
                Selection::Only(vec![PartnerCode::WORLD, settings.seed_partner]),
                Selection::All,
            )
            .await?,
    );
    info!(records = records.len(), "fetched World and seed partner history");
    let mut chart = StackedAreaChart::setup(
        &records,
        settings.layout,
        ChartStyle {
            highlight: Some(settings.seed_partner),
            axis_policy: settings.axis_policy,
        },
    )?;
    redraw(&mut chart, &records, target)?;

    let latest = *periods(&records)
        .last()
        .ok_or(anyhow!("initial fetch returned no periods"))?;
    let ranking = source
        .fetch(commodity, Selection::All, Selection::Only(vec![latest]))
        .await?;
    let queue = BackfillQueue::new(
        rank_partners(&ranking, &records, latest, settings.share_threshold_percent),
        settings.batch_size,
    );
    info!(%latest, queued = queue.len(), "ranked partners by share");

    for batch in queue {
        info!(?batch, "backfilling partner history");
        let fetched = source
            .fetch(commodity, Selection::Only(batch), Selection::All)
            .await?;
        merge(&mut records, fetched);
        redraw(&mut chart, &records, target)?;
    }

    chart.set_loading(false);
    target.present(&render_svg(&chart)?)?;
    info!(bands = chart.bands().len(), "chart complete");
    Ok(chart)
}

fn redraw<T>(chart: &mut StackedAreaChart, records: &[TradeRecord], target: &mut T) -> Result<()>
where
    T: ChartTarget + ?Sized,
{
    chart.update(records);
    target.present(&render_svg(chart)?)
}
