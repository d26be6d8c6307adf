use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of open/high/low/close price data for a ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Correct a price series quoted in a currency sub-unit (e.g., the JSE
/// reports cents) by dividing every OHLC field by 100.
///
/// Pure, stateless transform applied at the retrieval boundary, before
/// any other component consumes the series. NOT idempotent — callers
/// gate it on the instrument's `subunit_quoted` flag and must apply it
/// at most once per retrieval.
pub fn correct_subunit_prices(bars: &mut [OhlcBar]) {
    for bar in bars {
        bar.open /= 100.0;
        bar.high /= 100.0;
        bar.low /= 100.0;
        bar.close /= 100.0;
    }
}
