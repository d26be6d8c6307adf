pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use std::path::Path;

use chrono::NaiveDate;
use tracing::info;

use errors::CoreError;
use models::{
    ledger::{Ledger, Position, PurchaseRecord, RoguePurchaseRecord},
    metadata::StockMetadata,
    price::{correct_subunit_prices, OhlcBar},
    settings::StockConfig,
};
use providers::traits::{CurrencyConverter, MarketDataProvider};
use services::{metadata_service::MetadataService, position_service::PositionService};
use storage::ledger_store::LedgerStore;

/// Main entry point for the stock-tracker core library: one tracked
/// instrument, its purchase ledger, and its derived position.
///
/// Composition over inheritance: the market-data provider and the
/// currency converter are injected collaborators behind traits, never
/// base classes and never process-wide singletons. Each instance owns
/// its ticker-scoped files exclusively; `&mut self` receivers on every
/// mutating path make two in-process writers a compile error rather
/// than a race.
#[must_use]
pub struct TrackedStock {
    ticker: String,
    config: StockConfig,
    provider: Box<dyn MarketDataProvider>,
    converter: Box<dyn CurrencyConverter>,
    store: Option<LedgerStore>,
    position_service: PositionService,
    metadata_service: MetadataService,
    /// Display currency resolved for this session: the configured
    /// value, or the instrument's financial currency when unset.
    resolved_display_currency: Option<String>,
}

impl std::fmt::Debug for TrackedStock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackedStock")
            .field("ticker", &self.ticker)
            .field("config", &self.config)
            .field("provider", &self.provider.name())
            .field("converter", &self.converter.name())
            .finish()
    }
}

impl TrackedStock {
    pub fn new(
        ticker: impl Into<String>,
        config: StockConfig,
        provider: Box<dyn MarketDataProvider>,
        converter: Box<dyn CurrencyConverter>,
    ) -> Self {
        let ticker = ticker.into().to_uppercase();
        let store = config
            .base_dir
            .as_deref()
            .map(|base| LedgerStore::new(base, &ticker, config.lenient_ledger_parse));
        Self {
            ticker,
            config,
            provider,
            converter,
            store,
            position_service: PositionService::new(),
            metadata_service: MetadataService::new(),
            resolved_display_currency: None,
        }
    }

    #[must_use]
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    #[must_use]
    pub fn config(&self) -> &StockConfig {
        &self.config
    }

    /// Ticker-scoped data directory, when a base directory is configured.
    #[must_use]
    pub fn data_dir(&self) -> Option<&Path> {
        self.store.as_ref().map(LedgerStore::dir)
    }

    // ── Storage ─────────────────────────────────────────────────────

    /// Create the ticker directory tree (idempotent). The only place
    /// directories are ever created.
    pub fn create_directories(&self) -> Result<(), CoreError> {
        self.require_store()?.create_directories()
    }

    /// All dated purchases on record, in append order.
    pub fn purchase_history(&self) -> Result<Vec<PurchaseRecord>, CoreError> {
        self.require_store()?.load_purchases()
    }

    /// All undated holdings on record, in append order.
    pub fn rogue_holdings(&self) -> Result<Vec<RoguePurchaseRecord>, CoreError> {
        self.require_store()?.load_rogue_holdings()
    }

    /// The full ledger: dated purchases plus rogue holdings.
    pub fn ledger(&self) -> Result<Ledger, CoreError> {
        let store = self.require_store()?;
        Ok(Ledger::new(
            store.load_purchases()?,
            store.load_rogue_holdings()?,
        ))
    }

    // ── Recording ───────────────────────────────────────────────────

    /// Record a dated purchase. Exactly one of `purchase_price` /
    /// `shares_purchased` may be omitted; the missing one is derived
    /// from the closing price on `date`. `purchase_currency` defaults
    /// to the display currency. Returns the updated purchase history.
    pub async fn buy(
        &mut self,
        date: NaiveDate,
        purchase_price: Option<f64>,
        shares_purchased: Option<f64>,
        purchase_currency: Option<&str>,
        persist: bool,
    ) -> Result<Vec<PurchaseRecord>, CoreError> {
        let display_currency = self.display_currency().await?;
        let financial_currency = self.financial_currency().await?;
        let purchase_currency = purchase_currency
            .map(str::to_uppercase)
            .unwrap_or_else(|| display_currency.clone());
        let price_on_date = self.close_on(date).await?;

        let record = self
            .position_service
            .record_purchase(
                date,
                purchase_price,
                shares_purchased,
                &purchase_currency,
                &financial_currency,
                &display_currency,
                price_on_date,
                self.converter.as_ref(),
            )
            .await?;

        info!(
            ticker = %self.ticker,
            %date,
            shares = record.shares_purchased,
            price = record.purchase_price,
            persist,
            "purchase recorded"
        );
        self.require_store_mut()?.append_purchase(record, persist)
    }

    /// Record a purchase with an unknown acquisition date. Both price
    /// and share count are required; only currency normalization is
    /// applied. Returns the updated rogue holdings.
    pub async fn add_rogue_purchase(
        &mut self,
        purchase_price: f64,
        shares_purchased: f64,
        purchase_currency: Option<&str>,
        persist: bool,
    ) -> Result<Vec<RoguePurchaseRecord>, CoreError> {
        let display_currency = self.display_currency().await?;
        let financial_currency = self.financial_currency().await?;
        let purchase_currency = purchase_currency
            .map(str::to_uppercase)
            .unwrap_or_else(|| display_currency.clone());

        let record = self
            .position_service
            .record_rogue_purchase(
                purchase_price,
                shares_purchased,
                &purchase_currency,
                &financial_currency,
                &display_currency,
                self.converter.as_ref(),
            )
            .await?;

        info!(
            ticker = %self.ticker,
            shares = record.shares_purchased,
            price = record.purchase_price,
            persist,
            "rogue purchase recorded"
        );
        self.require_store_mut()?
            .append_rogue_holding(record, persist)
    }

    // ── Derived metrics ─────────────────────────────────────────────

    /// Total money invested, normalized to the display currency.
    pub async fn invested_value(&mut self) -> Result<f64, CoreError> {
        let display_currency = self.display_currency().await?;
        let ledger = self.ledger()?;
        self.position_service
            .total_invested(&ledger, &display_currency, self.converter.as_ref())
            .await
    }

    /// Number of shares owned across dated and rogue records.
    pub fn shares_owned(&self) -> Result<f64, CoreError> {
        Ok(self.position_service.total_shares(&self.ledger()?))
    }

    /// Shares owned plus invested value, computed at query time.
    pub async fn position(&mut self) -> Result<Position, CoreError> {
        let display_currency = self.display_currency().await?;
        let ledger = self.ledger()?;
        self.position_service
            .position(&ledger, &display_currency, self.converter.as_ref())
            .await
    }

    /// Whether `current_price` (display currency) sits below the
    /// average purchase price discounted by `discount_fraction`.
    pub async fn is_discounted(
        &mut self,
        current_price: f64,
        discount_fraction: f64,
    ) -> Result<bool, CoreError> {
        let display_currency = self.display_currency().await?;
        let ledger = self.ledger()?;
        self.position_service
            .is_price_below_average_purchase(
                &ledger,
                current_price,
                discount_fraction,
                &display_currency,
                self.converter.as_ref(),
            )
            .await
    }

    // ── Market data ─────────────────────────────────────────────────

    /// Filtered company metadata, served from the on-disk snapshot
    /// unless `force_refresh` is set.
    pub async fn company_info(&mut self, force_refresh: bool) -> Result<StockMetadata, CoreError> {
        self.metadata_service
            .get(
                self.store.as_mut().ok_or(CoreError::MissingBaseDirectory)?,
                self.provider.as_ref(),
                &self.ticker,
                force_refresh,
            )
            .await
    }

    /// Daily OHLC history over an inclusive range, with the sub-unit
    /// correction applied once when the instrument is flagged.
    pub async fn price_history(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<OhlcBar>, CoreError> {
        let mut bars = self.provider.price_history(&self.ticker, from, to).await?;
        if self.config.subunit_quoted {
            correct_subunit_prices(&mut bars);
        }
        Ok(bars)
    }

    /// Display currency for this instrument, resolving the config
    /// default (the financial currency) on first use.
    pub async fn display_currency(&mut self) -> Result<String, CoreError> {
        if let Some(currency) = &self.resolved_display_currency {
            return Ok(currency.clone());
        }
        let currency = match &self.config.display_currency {
            Some(c) => c.to_uppercase(),
            None => self.financial_currency().await?,
        };
        self.resolved_display_currency = Some(currency.clone());
        Ok(currency)
    }

    /// Native reporting currency declared by the market-data provider.
    pub async fn financial_currency(&mut self) -> Result<String, CoreError> {
        let info = self.company_info(false).await?;
        info.financial_currency()
            .map(str::to_uppercase)
            .ok_or_else(|| {
                CoreError::InvalidState(format!(
                    "provider metadata for {} carries no financialCurrency",
                    self.ticker
                ))
            })
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Closing price on `date` in the instrument's financial currency,
    /// sub-unit corrected when flagged.
    async fn close_on(&self, date: NaiveDate) -> Result<f64, CoreError> {
        let close = self.provider.close_on(&self.ticker, date).await?;
        if self.config.subunit_quoted {
            Ok(close / 100.0)
        } else {
            Ok(close)
        }
    }

    fn require_store(&self) -> Result<&LedgerStore, CoreError> {
        self.store.as_ref().ok_or(CoreError::MissingBaseDirectory)
    }

    fn require_store_mut(&mut self) -> Result<&mut LedgerStore, CoreError> {
        self.store.as_mut().ok_or(CoreError::MissingBaseDirectory)
    }
}
