use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Per-instrument configuration for a tracked stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockConfig {
    /// Currency in which derived monetary metrics are reported.
    /// `None` falls back to the instrument's financial currency from
    /// the metadata snapshot, resolved on first use.
    pub display_currency: Option<String>,

    /// Root under which the ticker-scoped data directory lives.
    /// `None` means storage operations fail with `MissingBaseDirectory`.
    pub base_dir: Option<PathBuf>,

    /// Provider reports prices for this instrument in a sub-unit
    /// (e.g., JSE cents); apply the divide-by-100 correction once on
    /// every retrieved series.
    pub subunit_quoted: bool,

    /// Compatibility mode: treat an unparseable ledger file as empty
    /// instead of surfacing `CorruptLedger`. Mirrors the behaviour of
    /// earlier versions; off by default because it masks corruption.
    pub lenient_ledger_parse: bool,
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            display_currency: None,
            base_dir: None,
            subunit_quoted: false,
            lenient_ledger_parse: false,
        }
    }
}

impl StockConfig {
    #[must_use]
    pub fn with_display_currency(mut self, currency: impl Into<String>) -> Self {
        self.display_currency = Some(currency.into().to_uppercase());
        self
    }

    #[must_use]
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn subunit_quoted(mut self, flag: bool) -> Self {
        self.subunit_quoted = flag;
        self
    }

    #[must_use]
    pub fn lenient_ledger_parse(mut self, flag: bool) -> Self {
        self.lenient_ledger_parse = flag;
        self
    }
}
