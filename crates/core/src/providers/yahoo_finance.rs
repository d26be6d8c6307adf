use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use reqwest::Client;
use serde_json::{Map, Value};
use time::OffsetDateTime;
use tracing::debug;

use super::traits::MarketDataProvider;
use crate::errors::CoreError;
use crate::models::price::OhlcBar;

const QUOTE_SUMMARY_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";

/// Which quoteSummary modules to request. Together they cover every
/// key in the metadata allow-list.
const INFO_MODULES: &str = "assetProfile,price,financialData,summaryProfile";

/// Yahoo Finance provider for OHLC history and company metadata.
///
/// - **Free**: No API key required (unofficial public API).
/// - **Coverage**: Global equities, ETFs, indices.
///
/// Price history goes through the `yahoo_finance_api` crate; company
/// metadata hits the quoteSummary endpoint directly with `reqwest`,
/// since the crate does not expose it. Prices come back in the
/// instrument's native currency — sub-unit correction and currency
/// normalization are the caller's concern.
pub struct YahooProvider {
    connector: yahoo_finance_api::YahooConnector,
    client: Client,
}

impl YahooProvider {
    pub fn new() -> Result<Self, CoreError> {
        let connector = yahoo_finance_api::YahooConnector::new().map_err(|e| CoreError::Api {
            provider: "Yahoo Finance".into(),
            message: format!("Failed to create connector: {e}"),
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Ok(Self { connector, client })
    }

    /// Convert a `chrono::NaiveDate` to `time::OffsetDateTime` (midnight UTC).
    fn to_offset_datetime(date: NaiveDate) -> Result<OffsetDateTime, CoreError> {
        let month: time::Month = match date.month() {
            1 => time::Month::January,
            2 => time::Month::February,
            3 => time::Month::March,
            4 => time::Month::April,
            5 => time::Month::May,
            6 => time::Month::June,
            7 => time::Month::July,
            8 => time::Month::August,
            9 => time::Month::September,
            10 => time::Month::October,
            11 => time::Month::November,
            12 => time::Month::December,
            _ => unreachable!(),
        };

        let odt = time::Date::from_calendar_date(date.year(), month, date.day() as u8)
            .map_err(|e| CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Invalid date {date}: {e}"),
            })?
            .with_hms(0, 0, 0)
            .map_err(|e| CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Invalid time for {date}: {e}"),
            })?
            .assume_utc();
        Ok(odt)
    }

    /// Convert a unix timestamp (seconds) to `chrono::NaiveDate`.
    fn timestamp_to_naive_date(ts: i64) -> Option<NaiveDate> {
        chrono::DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
    }

    async fn fetch_bars(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<OhlcBar>, CoreError> {
        let start = Self::to_offset_datetime(from)?;
        let end = Self::to_offset_datetime(to + chrono::Duration::days(1))?; // inclusive end

        let resp = self
            .connector
            .get_quote_history(symbol, start, end)
            .await
            .map_err(|e| CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Failed to fetch history for {symbol}: {e}"),
            })?;

        let quotes = resp.quotes().map_err(|e| CoreError::Api {
            provider: "Yahoo Finance".into(),
            message: format!("Failed to parse quotes for {symbol}: {e}"),
        })?;

        let mut bars: Vec<OhlcBar> = quotes
            .iter()
            .filter_map(|q| {
                let date = Self::timestamp_to_naive_date(q.timestamp)?;
                if date >= from && date <= to {
                    Some(OhlcBar {
                        date,
                        open: q.open,
                        high: q.high,
                        low: q.low,
                        close: q.close,
                    })
                } else {
                    None
                }
            })
            .collect();

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    async fn company_info(&self, symbol: &str) -> Result<Map<String, Value>, CoreError> {
        let url = format!("{QUOTE_SUMMARY_URL}/{symbol}?modules={INFO_MODULES}");

        let body: Value = self
            .client
            .get(&url)
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Failed to parse quoteSummary for {symbol}: {e}"),
            })?;

        let result = body
            .pointer("/quoteSummary/result/0")
            .and_then(Value::as_object)
            .ok_or_else(|| CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("No quoteSummary result for {symbol}"),
            })?;

        // Flatten the requested modules into one key space; the caller
        // filters this down to the allow-listed snapshot.
        let mut info = Map::new();
        for module in result.values() {
            if let Some(fields) = module.as_object() {
                for (key, value) in fields {
                    info.insert(key.clone(), value.clone());
                }
            }
        }
        debug!(symbol, keys = info.len(), "company info fetched");
        Ok(info)
    }

    async fn price_history(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<OhlcBar>, CoreError> {
        self.fetch_bars(symbol, from, to).await
    }

    async fn close_on(&self, symbol: &str, date: NaiveDate) -> Result<f64, CoreError> {
        // Fetch a 3-day window to handle weekends/holidays, then take
        // the bar closest to the requested date.
        let bars = self
            .fetch_bars(symbol, date, date + chrono::Duration::days(3))
            .await?;

        let bar = bars
            .iter()
            .min_by_key(|b| (b.date - date).num_days().unsigned_abs())
            .ok_or_else(|| CoreError::PriceNotAvailable {
                symbol: symbol.to_string(),
                date: date.to_string(),
            })?;

        Ok(bar.close)
    }
}
