use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::ledger::{PurchaseRecord, RoguePurchaseRecord};
use crate::models::metadata::StockMetadata;

use super::table;

pub const STOCK_INFO_FILE: &str = "StockInfo.json";
pub const PURCHASE_HISTORY_FILE: &str = "stockPurchaseHistory.json";
pub const ROGUE_HOLDINGS_FILE: &str = "rogueHoldings.json";
pub const FINANCIAL_STATEMENTS_DIR: &str = "FinancialStatements";

/// Reserved statement export directories. Created by
/// `create_directories()`, never written to yet.
pub const STATEMENT_SUBDIRS: &[&str] = &["cashflow", "incomestatement", "balancesheet"];

/// Durable round-trip of one ticker's record collections.
///
/// Each ticker owns a private directory under the configured base
/// directory. Tables are loaded fully into memory on read and the file
/// is rewritten in full on every persisting append, via a temp file in
/// the same directory followed by an atomic rename, so a partial write
/// can never truncate existing records.
///
/// Directories are created only by an explicit `create_directories()`
/// call, never implicitly during a read. Persisting into a directory
/// that was never created surfaces as a file I/O error.
pub struct LedgerStore {
    dir: PathBuf,
    lenient_parse: bool,
}

impl LedgerStore {
    pub fn new(base_dir: &Path, ticker: &str, lenient_parse: bool) -> Self {
        Self {
            dir: base_dir.join(ticker),
            lenient_parse,
        }
    }

    /// Ticker-scoped data directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn purchase_history_path(&self) -> PathBuf {
        self.dir.join(PURCHASE_HISTORY_FILE)
    }

    #[must_use]
    pub fn rogue_holdings_path(&self) -> PathBuf {
        self.dir.join(ROGUE_HOLDINGS_FILE)
    }

    #[must_use]
    pub fn stock_info_path(&self) -> PathBuf {
        self.dir.join(STOCK_INFO_FILE)
    }

    /// Create the ticker directory plus the reserved statement
    /// subdirectories. Idempotent: pre-existence is not an error.
    pub fn create_directories(&self) -> Result<(), CoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let statements = self.dir.join(FINANCIAL_STATEMENTS_DIR);
        for sub in STATEMENT_SUBDIRS {
            std::fs::create_dir_all(statements.join(sub))?;
        }
        debug!(dir = %self.dir.display(), "ledger directories ready");
        Ok(())
    }

    // ── Purchase history ────────────────────────────────────────────

    /// Load all dated purchases. A missing file is an empty ledger; a
    /// file that exists but does not parse as the expected table is
    /// `CorruptLedger` (or empty, in lenient compatibility mode).
    pub fn load_purchases(&self) -> Result<Vec<PurchaseRecord>, CoreError> {
        let path = self.purchase_history_path();
        match self.load_table(&path)? {
            None => Ok(Vec::new()),
            Some(value) => match table::decode_purchases(&value) {
                Ok(records) => Ok(records),
                Err(e) => self.corrupt(&path, e),
            },
        }
    }

    /// Append a dated purchase, returning the updated sequence. When
    /// `persist` is set the whole table is rewritten atomically.
    pub fn append_purchase(
        &mut self,
        record: PurchaseRecord,
        persist: bool,
    ) -> Result<Vec<PurchaseRecord>, CoreError> {
        let mut records = self.load_purchases()?;
        records.push(record);
        if persist {
            self.write_atomic(
                &self.purchase_history_path(),
                &table::encode_purchases(&records),
            )?;
            debug!(
                path = %self.purchase_history_path().display(),
                rows = records.len(),
                "purchase history persisted"
            );
        }
        Ok(records)
    }

    // ── Rogue holdings ──────────────────────────────────────────────

    /// Load all undated holdings. Same contract as `load_purchases`.
    pub fn load_rogue_holdings(&self) -> Result<Vec<RoguePurchaseRecord>, CoreError> {
        let path = self.rogue_holdings_path();
        match self.load_table(&path)? {
            None => Ok(Vec::new()),
            Some(value) => match table::decode_rogue_holdings(&value) {
                Ok(records) => Ok(records),
                Err(e) => self.corrupt(&path, e),
            },
        }
    }

    /// Append an undated holding; symmetric with `append_purchase`.
    pub fn append_rogue_holding(
        &mut self,
        record: RoguePurchaseRecord,
        persist: bool,
    ) -> Result<Vec<RoguePurchaseRecord>, CoreError> {
        let mut records = self.load_rogue_holdings()?;
        records.push(record);
        if persist {
            self.write_atomic(
                &self.rogue_holdings_path(),
                &table::encode_rogue_holdings(&records),
            )?;
            debug!(
                path = %self.rogue_holdings_path().display(),
                rows = records.len(),
                "rogue holdings persisted"
            );
        }
        Ok(records)
    }

    // ── Metadata snapshot ───────────────────────────────────────────

    /// Load the cached metadata snapshot, if one has been persisted.
    pub fn load_info(&self) -> Result<Option<StockMetadata>, CoreError> {
        let path = self.stock_info_path();
        match self.load_table(&path)? {
            None => Ok(None),
            Some(value) => match value.as_object() {
                Some(obj) => Ok(Some(StockMetadata::from_stored(obj))),
                None => self.corrupt(
                    &path,
                    CoreError::Serialization("top level is not a JSON object".into()),
                ),
            },
        }
    }

    /// Persist a metadata snapshot, replacing any previous one.
    pub fn save_info(&mut self, metadata: &StockMetadata) -> Result<(), CoreError> {
        self.write_atomic(
            &self.stock_info_path(),
            &Value::Object(metadata.as_object().clone()),
        )
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Read and parse a JSON file; `None` when the file does not exist.
    /// A file that exists but is not valid JSON follows the corrupt
    /// policy.
    fn load_table(&self, path: &Path) -> Result<Option<Value>, CoreError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&contents) {
            Ok(value) => Ok(Some(value)),
            Err(e) => self.corrupt::<Option<Value>>(path, CoreError::Serialization(e.to_string())),
        }
    }

    /// Apply the corrupt-file policy: surface `CorruptLedger`, or in
    /// lenient compatibility mode log and pretend the file is empty.
    fn corrupt<T: Default>(&self, path: &Path, cause: CoreError) -> Result<T, CoreError> {
        if self.lenient_parse {
            warn!(
                path = %path.display(),
                error = %cause,
                "unparseable ledger file treated as empty (lenient mode)"
            );
            return Ok(T::default());
        }
        Err(CoreError::CorruptLedger {
            path: path.to_path_buf(),
            detail: cause.to_string(),
        })
    }

    /// Serialize to a temp file in the target directory, then rename
    /// over the destination so readers never observe a torn write.
    fn write_atomic(&self, path: &Path, value: &Value) -> Result<(), CoreError> {
        let tmp = NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer_pretty(tmp.as_file(), value)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path)
            .map_err(|e| CoreError::FileIO(e.error.to_string()))?;
        Ok(())
    }
}
