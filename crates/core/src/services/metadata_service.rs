use tracing::debug;

use crate::errors::CoreError;
use crate::models::metadata::StockMetadata;
use crate::providers::traits::MarketDataProvider;
use crate::storage::ledger_store::LedgerStore;

/// Keeps a filtered company-metadata snapshot on disk so repeated
/// lookups don't hit the external provider.
///
/// Cache policy: a persisted snapshot is returned as-is until the
/// caller explicitly asks for a refresh. There is no TTL; company
/// metadata changes rarely enough that staleness is the caller's call.
pub struct MetadataService;

impl MetadataService {
    pub fn new() -> Self {
        Self
    }

    /// Return the cached snapshot, fetching (and persisting) a fresh
    /// one when `force_refresh` is set or nothing is cached yet.
    pub async fn get(
        &self,
        store: &mut LedgerStore,
        provider: &dyn MarketDataProvider,
        symbol: &str,
        force_refresh: bool,
    ) -> Result<StockMetadata, CoreError> {
        if !force_refresh {
            if let Some(cached) = store.load_info()? {
                debug!(symbol, "metadata served from cache");
                return Ok(cached);
            }
        }

        let raw = provider.company_info(symbol).await?;
        let snapshot = StockMetadata::from_provider(&raw);
        store.save_info(&snapshot)?;
        debug!(
            symbol,
            fields = snapshot.field_count(),
            "metadata snapshot refreshed"
        );
        Ok(snapshot)
    }
}

impl Default for MetadataService {
    fn default() -> Self {
        Self::new()
    }
}
