use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Textual date format used on disk for purchase dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single dated purchase of shares in one ticker.
///
/// No unique key exists — two identical purchases on the same date are
/// two legitimate rows. Invariant at recording time:
/// `price_per_share == purchase_price / shares_purchased`, evaluated in
/// the record's stated `currency`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    /// Calendar date of the purchase (day precision).
    pub date: NaiveDate,

    /// Total money paid for this purchase, in `currency`.
    pub purchase_price: f64,

    /// Number of shares bought (fractional shares allowed).
    pub shares_purchased: f64,

    /// Price of a single share at recording time, in `currency`.
    pub price_per_share: f64,

    /// Currency code the monetary fields are expressed in (e.g., "USD").
    pub currency: String,
}

/// A purchase whose acquisition date is unknown ("rogue holding").
/// Same shape as [`PurchaseRecord`] minus the date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoguePurchaseRecord {
    pub purchase_price: f64,
    pub shares_purchased: f64,
    pub price_per_share: f64,
    pub currency: String,
}

/// The combined purchase history of one ticker: dated purchases plus
/// undated rogue holdings. Owned by exactly one [`crate::TrackedStock`];
/// loaded fully into memory on read and rewritten fully on every
/// persisting mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub purchases: Vec<PurchaseRecord>,
    pub rogue: Vec<RoguePurchaseRecord>,
}

impl Ledger {
    pub fn new(purchases: Vec<PurchaseRecord>, rogue: Vec<RoguePurchaseRecord>) -> Self {
        Self { purchases, rogue }
    }

    /// Total number of records across both collections.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.purchases.len() + self.rogue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.purchases.is_empty() && self.rogue.is_empty()
    }
}

/// The derived aggregate for one ticker, computed at query time.
/// Never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// Shares owned across dated and rogue records.
    pub shares: f64,

    /// Total money invested, normalized to the display currency.
    pub invested: f64,
}
