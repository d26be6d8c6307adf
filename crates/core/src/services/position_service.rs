use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::ledger::{Ledger, Position, PurchaseRecord, RoguePurchaseRecord};
use crate::providers::traits::CurrencyConverter;

/// Derives holdings and money-weighted metrics from a ledger,
/// normalizing all monetary amounts into one display currency.
///
/// Pure business logic over an injected converter, no file I/O.
/// Three currencies are in play for a purchase: the currency the
/// transaction was paid in, the instrument's financial (native)
/// currency, and the display currency every stored amount ends up in.
/// Conversions are skipped whenever source and target coincide, so the
/// converter is never called redundantly.
pub struct PositionService;

impl PositionService {
    pub fn new() -> Self {
        Self
    }

    // ── Aggregates ──────────────────────────────────────────────────

    /// Total money invested across dated and rogue records, converted
    /// to `display_currency`. An empty ledger sums to zero.
    pub async fn total_invested(
        &self,
        ledger: &Ledger,
        display_currency: &str,
        converter: &dyn CurrencyConverter,
    ) -> Result<f64, CoreError> {
        let mut total = 0.0;
        for record in &ledger.purchases {
            total += self
                .convert_if_needed(
                    converter,
                    record.purchase_price,
                    &record.currency,
                    display_currency,
                )
                .await?;
        }
        for record in &ledger.rogue {
            total += self
                .convert_if_needed(
                    converter,
                    record.purchase_price,
                    &record.currency,
                    display_currency,
                )
                .await?;
        }
        Ok(total)
    }

    /// Number of shares owned across both record sets. Currency-free.
    #[must_use]
    pub fn total_shares(&self, ledger: &Ledger) -> f64 {
        let dated: f64 = ledger.purchases.iter().map(|r| r.shares_purchased).sum();
        let rogue: f64 = ledger.rogue.iter().map(|r| r.shares_purchased).sum();
        dated + rogue
    }

    /// Derived aggregate: shares owned plus invested value.
    pub async fn position(
        &self,
        ledger: &Ledger,
        display_currency: &str,
        converter: &dyn CurrencyConverter,
    ) -> Result<Position, CoreError> {
        Ok(Position {
            shares: self.total_shares(ledger),
            invested: self
                .total_invested(ledger, display_currency, converter)
                .await?,
        })
    }

    // ── Recording ───────────────────────────────────────────────────

    /// Build a dated purchase record, deriving whichever of purchase
    /// price / share count was not supplied.
    ///
    /// Exactly one may be omitted:
    /// - both absent → `InvalidArgument`;
    /// - both present → pass through unchanged (no derivation), with
    ///   the price normalized from the purchase currency to the
    ///   display currency;
    /// - price absent → `shares × price_on_date` in the financial
    ///   currency, then financial → display;
    /// - shares absent → the price is taken purchase → financial and
    ///   divided by `price_on_date`; the stored price is the original
    ///   amount taken purchase → display.
    ///
    /// The stored record is always expressed in the display currency,
    /// with `price_per_share = purchase_price / shares_purchased`.
    /// `price_on_date` is the instrument's closing price on `date` in
    /// its financial currency.
    #[allow(clippy::too_many_arguments)]
    pub async fn record_purchase(
        &self,
        date: NaiveDate,
        purchase_price: Option<f64>,
        shares_purchased: Option<f64>,
        purchase_currency: &str,
        financial_currency: &str,
        display_currency: &str,
        price_on_date: f64,
        converter: &dyn CurrencyConverter,
    ) -> Result<PurchaseRecord, CoreError> {
        if purchase_price.is_none() && shares_purchased.is_none() {
            return Err(CoreError::InvalidArgument(
                "neither purchase_price nor shares_purchased was supplied; provide at least one"
                    .into(),
            ));
        }
        if let Some(price) = purchase_price {
            if price <= 0.0 {
                return Err(CoreError::InvalidArgument(format!(
                    "purchase_price must be positive, got {price}"
                )));
            }
        }
        if let Some(shares) = shares_purchased {
            if shares <= 0.0 {
                return Err(CoreError::InvalidArgument(format!(
                    "shares_purchased must be positive, got {shares}"
                )));
            }
        }

        let (display_price, shares) = match (purchase_price, shares_purchased) {
            (Some(price), Some(shares)) => {
                // Both known: nothing to derive, only normalize the price
                let display_price = self
                    .convert_if_needed(converter, price, purchase_currency, display_currency)
                    .await?;
                (display_price, shares)
            }
            (None, Some(shares)) => {
                // Derive the price from the closing price on the purchase date
                let price = shares * price_on_date;
                let display_price = self
                    .convert_if_needed(converter, price, financial_currency, display_currency)
                    .await?;
                (display_price, shares)
            }
            (Some(price), None) => {
                if price_on_date <= 0.0 {
                    return Err(CoreError::InvalidArgument(format!(
                        "cannot derive share count from a non-positive closing price \
                         ({price_on_date}) on {date}"
                    )));
                }
                // Derive the share count in the instrument's native currency
                let native_price = self
                    .convert_if_needed(converter, price, purchase_currency, financial_currency)
                    .await?;
                let shares = native_price / price_on_date;
                let display_price = self
                    .convert_if_needed(converter, price, purchase_currency, display_currency)
                    .await?;
                (display_price, shares)
            }
            (None, None) => unreachable!("rejected above"),
        };

        Ok(PurchaseRecord {
            date,
            purchase_price: display_price,
            shares_purchased: shares,
            price_per_share: display_price / shares,
            currency: display_currency.to_uppercase(),
        })
    }

    /// Build an undated ("rogue") purchase record. Both quantity and
    /// price are known; only currency normalization happens, through
    /// the same purchase → financial → display chain as dated
    /// purchases.
    pub async fn record_rogue_purchase(
        &self,
        purchase_price: f64,
        shares_purchased: f64,
        purchase_currency: &str,
        financial_currency: &str,
        display_currency: &str,
        converter: &dyn CurrencyConverter,
    ) -> Result<RoguePurchaseRecord, CoreError> {
        if purchase_price <= 0.0 {
            return Err(CoreError::InvalidArgument(format!(
                "purchase_price must be positive, got {purchase_price}"
            )));
        }
        if shares_purchased <= 0.0 {
            return Err(CoreError::InvalidArgument(format!(
                "shares_purchased must be positive, got {shares_purchased}"
            )));
        }

        // Per-share price in the native currency, then into display
        let native_price = self
            .convert_if_needed(
                converter,
                purchase_price,
                purchase_currency,
                financial_currency,
            )
            .await?;
        let price_per_share = self
            .convert_if_needed(
                converter,
                native_price / shares_purchased,
                financial_currency,
                display_currency,
            )
            .await?;
        let display_price = self
            .convert_if_needed(converter, purchase_price, purchase_currency, display_currency)
            .await?;

        Ok(RoguePurchaseRecord {
            purchase_price: display_price,
            shares_purchased,
            price_per_share,
            currency: display_currency.to_uppercase(),
        })
    }

    // ── Checks ──────────────────────────────────────────────────────

    /// Whether `current_price` sits below the average purchase price
    /// discounted by `discount_fraction`:
    /// `(total_invested / total_shares) * (1 - discount_fraction)`.
    ///
    /// `current_price` is expected in the display currency. A ledger
    /// with zero shares has no average price and yields `InvalidState`.
    pub async fn is_price_below_average_purchase(
        &self,
        ledger: &Ledger,
        current_price: f64,
        discount_fraction: f64,
        display_currency: &str,
        converter: &dyn CurrencyConverter,
    ) -> Result<bool, CoreError> {
        if !(0.0..=1.0).contains(&discount_fraction) {
            return Err(CoreError::InvalidArgument(format!(
                "discount_fraction must be within [0, 1], got {discount_fraction}"
            )));
        }

        let shares = self.total_shares(ledger);
        if shares <= 0.0 {
            return Err(CoreError::InvalidState(
                "average purchase price is undefined with zero shares owned".into(),
            ));
        }

        let invested = self
            .total_invested(ledger, display_currency, converter)
            .await?;
        let threshold = (invested / shares) * (1.0 - discount_fraction);
        Ok(current_price < threshold)
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Convert only when the codes differ; identical currencies must
    /// never reach the converter.
    async fn convert_if_needed(
        &self,
        converter: &dyn CurrencyConverter,
        amount: f64,
        from: &str,
        to: &str,
    ) -> Result<f64, CoreError> {
        if from.eq_ignore_ascii_case(to) {
            return Ok(amount);
        }
        converter.convert(amount, from, to).await
    }
}

impl Default for PositionService {
    fn default() -> Self {
        Self::new()
    }
}
