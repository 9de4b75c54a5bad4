use comtrade::{CommodityCode, ComtradeClient, PartnerCode, Selection, TradeQuery};

// Print the world-level coffee imports for every year the API knows about
#[tokio::main]
async fn main() {
    pretty_env_logger::init();
    let client = ComtradeClient::new("trade-share-comtrade-examples").unwrap();
    let query = TradeQuery::imports(CommodityCode::from("0901"))
        .partners(Selection::Only(vec![PartnerCode::WORLD]))
        .periods(Selection::All);
    for record in client.get_trade_data(&query).await.unwrap() {
        println!(
            "{} {}: {}",
            record.period, record.partner_title, record.trade_value
        );
    }
}
