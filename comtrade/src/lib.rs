use chrono::NaiveDate;
use itertools::Itertools;
use log::info;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use thiserror::Error;

/// The legacy Comtrade API refuses queries naming more partner codes than this.
pub const MAX_PARTNER_CODES: usize = 5;

#[derive(Hash, Copy, Clone, Debug, Deserialize, Serialize, Eq, PartialEq, PartialOrd, Ord)]
pub struct PartnerCode(pub i32);

impl PartnerCode {
    /// The aggregate "World" partner every reporter publishes.
    pub const WORLD: PartnerCode = PartnerCode(0);

    pub fn is_world(&self) -> bool {
        *self == Self::WORLD
    }
}

#[derive(Hash, Copy, Clone, Debug, Deserialize, Serialize, Eq, PartialEq, PartialOrd, Ord)]
pub struct ReporterCode(pub i32);

impl ReporterCode {
    pub const USA: ReporterCode = ReporterCode(842);
}

/// A reporting year.
#[derive(Hash, Copy, Clone, Debug, Deserialize, Serialize, Eq, PartialEq, PartialOrd, Ord)]
pub struct Period(pub i32);

impl Period {
    /// First day of the year, used to place the period on a time axis.
    pub fn start_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.0, 1, 1)
    }
}

/// Harmonized System commodity code, e.g. `0901` for coffee.
#[derive(Hash, Clone, Debug, Deserialize, Serialize, Eq, PartialEq, PartialOrd, Ord)]
pub struct CommodityCode(pub String);

impl From<&str> for CommodityCode {
    fn from(value: &str) -> Self {
        CommodityCode(value.to_string())
    }
}

macro_rules! display_inner {
    ($($t:ty),*) => {
        $(impl Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        })*
    };
}

display_inner!(PartnerCode, ReporterCode, Period, CommodityCode);

#[derive(Error, Debug)]
pub enum Error {
    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),
    #[error("HTTP Error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("No partners were requested")]
    NoPartners,
    #[error("No periods were requested")]
    NoPeriods,
    #[error("{0} partner codes requested, comtrade accepts at most 5")]
    TooManyPartners(usize),
    #[error("Response had no dataset: {0}")]
    MissingDataset(String),
}

/// Either every value the API knows about, or an explicit list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(Vec<T>),
}

impl<T: Display> Selection<T> {
    fn to_param(&self) -> String {
        match self {
            Selection::All => "all".to_string(),
            Selection::Only(ids) => ids.iter().join(","),
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, Selection::Only(ids) if ids.is_empty())
    }
}

/// Trade flow code for imports.
const IMPORTS: &str = "1";
/// Annual reporting frequency.
const ANNUAL: &str = "A";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeQuery {
    pub reporter: ReporterCode,
    pub commodity: CommodityCode,
    pub partners: Selection<PartnerCode>,
    pub periods: Selection<Period>,
}

impl TradeQuery {
    /// Annual imports of `commodity` into the USA from every partner over every year.
    pub fn imports(commodity: CommodityCode) -> Self {
        Self {
            reporter: ReporterCode::USA,
            commodity,
            partners: Selection::All,
            periods: Selection::All,
        }
    }

    pub fn reporter(mut self, reporter: ReporterCode) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn partners(mut self, partners: Selection<PartnerCode>) -> Self {
        self.partners = partners;
        self
    }

    pub fn periods(mut self, periods: Selection<Period>) -> Self {
        self.periods = periods;
        self
    }
}

/// One reported trade value between the reporter and a partner for a single period.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TradeRecord {
    #[serde(rename = "ptCode")]
    pub partner_code: PartnerCode,
    #[serde(rename = "ptTitle")]
    pub partner_title: String,
    pub period: Period,
    /// US dollars
    #[serde(rename = "TradeValue")]
    pub trade_value: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ValidationStatus {
    pub name: Option<String>,
    pub value: Option<i32>,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ValidationView {
    pub status: Option<ValidationStatus>,
    pub message: Option<String>,
}

impl ValidationView {
    fn describe(&self) -> String {
        let status = self.status.as_ref();
        self.message
            .clone()
            .or_else(|| status.and_then(|s| s.description.clone()))
            .filter(|m| !m.is_empty())
            .or_else(|| status.and_then(|s| s.name.clone()))
            .unwrap_or_else(|| "no validation message".to_string())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TradeDataView {
    pub validation: Option<ValidationView>,
    pub dataset: Option<Vec<TradeRecord>>,
}

impl TradeDataView {
    pub fn into_dataset(self) -> Result<Vec<TradeRecord>, Error> {
        match self.dataset {
            Some(dataset) => Ok(dataset),
            None => Err(Error::MissingDataset(
                self.validation.unwrap_or_default().describe(),
            )),
        }
    }
}

/// Parses a raw response body into its dataset.
pub fn parse_dataset(body: &str) -> Result<Vec<TradeRecord>, Error> {
    serde_json::from_str::<TradeDataView>(body)?.into_dataset()
}

pub struct ComtradeClient {
    client: Client,
    base_url: Url,
}

impl ComtradeClient {
    pub const COMTRADE_BASE_URL: &'static str = "https://comtrade.un.org/api/get";
    const MAX_RECORDS: u32 = 100_000;

    pub fn new(user_agent: impl ToString) -> Result<Self, Error> {
        Self::with_base_url(user_agent, Self::COMTRADE_BASE_URL)
    }

    pub fn with_base_url(user_agent: impl ToString, base_url: &str) -> Result<Self, Error> {
        let client = Client::builder()
            .user_agent(user_agent.to_string())
            .build()?;
        Ok(ComtradeClient {
            client,
            base_url: Url::parse(base_url)?,
        })
    }

    pub fn query_url(&self, query: &TradeQuery) -> Result<Url, Error> {
        if query.partners.is_empty() {
            return Err(Error::NoPartners);
        }
        if query.periods.is_empty() {
            return Err(Error::NoPeriods);
        }
        if let Selection::Only(partners) = &query.partners {
            if partners.len() > MAX_PARTNER_CODES {
                return Err(Error::TooManyPartners(partners.len()));
            }
        }
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("r", &query.reporter.to_string())
            .append_pair("rg", IMPORTS)
            .append_pair("p", &query.partners.to_param())
            .append_pair("freq", ANNUAL)
            .append_pair("ps", &query.periods.to_param())
            .append_pair("px", "HS")
            .append_pair("cc", &query.commodity.0)
            .append_pair("fmt", "json")
            .append_pair("max", &Self::MAX_RECORDS.to_string());
        Ok(url)
    }

    pub async fn get_trade_data(&self, query: &TradeQuery) -> Result<Vec<TradeRecord>, Error> {
        let url = self.query_url(query)?;
        info!("getting comtrade data: {}", url);
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_dataset(&body)
    }
}
