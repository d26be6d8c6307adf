use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::errors::CoreError;
use crate::models::price::OhlcBar;

/// Trait abstraction for market-data retrieval.
///
/// The tracker holds a boxed provider as an injected collaborator, so
/// swapping the data source (or substituting a test double) touches
/// nothing but construction.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Raw company metadata for a ticker. The caller filters this down
    /// to the allow-listed snapshot; providers return whatever they have.
    async fn company_info(&self, symbol: &str) -> Result<Map<String, Value>, CoreError>;

    /// Daily OHLC price history for an inclusive date range,
    /// sorted by date.
    async fn price_history(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<OhlcBar>, CoreError>;

    /// Closing price on a specific date.
    async fn close_on(&self, symbol: &str, date: NaiveDate) -> Result<f64, CoreError>;
}

/// Trait abstraction for currency conversion.
///
/// Implementations must return `amount` unchanged, without any network
/// call, when `from == to`. Failures surface as `CoreError::Conversion`;
/// retry policy, if any, belongs to the implementation, never to the
/// position engine.
#[async_trait]
pub trait CurrencyConverter: Send + Sync {
    fn name(&self) -> &str;

    /// Convert `amount` from one currency code to another.
    async fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64, CoreError>;
}
