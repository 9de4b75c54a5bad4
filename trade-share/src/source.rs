use async_trait::async_trait;
use comtrade::{
    CommodityCode, ComtradeClient, Error, PartnerCode, Period, ReporterCode, Selection,
    TradeQuery, TradeRecord,
};

/// Anything that can answer "imports of this commodity from these partners over these
/// periods". The reporter and trade flow are fixed by the implementation.
#[async_trait]
pub trait TradeSource {
    async fn fetch(
        &self,
        commodity: &CommodityCode,
        partners: Selection<PartnerCode>,
        periods: Selection<Period>,
    ) -> Result<Vec<TradeRecord>, Error>;
}

pub struct ComtradeSource {
    client: ComtradeClient,
    reporter: ReporterCode,
}

impl ComtradeSource {
    pub fn new(client: ComtradeClient, reporter: ReporterCode) -> Self {
        Self { client, reporter }
    }
}

#[async_trait]
impl TradeSource for ComtradeSource {
    async fn fetch(
        &self,
        commodity: &CommodityCode,
        partners: Selection<PartnerCode>,
        periods: Selection<Period>,
    ) -> Result<Vec<TradeRecord>, Error> {
        let query = TradeQuery::imports(commodity.clone())
            .reporter(self.reporter)
            .partners(partners)
            .periods(periods);
        self.client.get_trade_data(&query).await
    }
}
