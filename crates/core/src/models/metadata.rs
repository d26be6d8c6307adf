use serde_json::{Map, Value};

/// Keys retained when filtering provider metadata into a snapshot.
/// Anything outside this list is discarded; keys the provider didn't
/// return are omitted rather than null-filled.
pub const ALLOWED_INFO_KEYS: &[&str] = &[
    "sector",
    "zip",
    "fullTimeEmployees",
    "longBusinessSummary",
    "city",
    "phone",
    "country",
    "website",
    "address1",
    "address2",
    "fax",
    "industry",
    "recommendationKey",
    "financialCurrency",
    "exchange",
    "shortName",
    "longName",
    "exchangeTimezoneName",
    "symbol",
    "logo_url",
];

/// A filtered snapshot of provider-returned company metadata,
/// cached on disk to avoid repeated external calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockMetadata {
    fields: Map<String, Value>,
}

impl StockMetadata {
    /// Build a snapshot from a raw provider response, keeping only
    /// allow-listed keys with non-null values.
    #[must_use]
    pub fn from_provider(raw: &Map<String, Value>) -> Self {
        let fields = ALLOWED_INFO_KEYS
            .iter()
            .filter_map(|&key| {
                let value = raw.get(key)?;
                if value.is_null() {
                    return None;
                }
                Some((key.to_string(), value.clone()))
            })
            .collect();
        Self { fields }
    }

    /// Rehydrate a snapshot from a previously persisted JSON object.
    /// Re-applies the allow-list so stale files with extra keys stay clean.
    #[must_use]
    pub fn from_stored(raw: &Map<String, Value>) -> Self {
        Self::from_provider(raw)
    }

    /// Raw field access for anything in the allow-list.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Native reporting currency declared by the market-data provider.
    #[must_use]
    pub fn financial_currency(&self) -> Option<&str> {
        self.fields.get("financialCurrency").and_then(Value::as_str)
    }

    #[must_use]
    pub fn symbol(&self) -> Option<&str> {
        self.fields.get("symbol").and_then(Value::as_str)
    }

    #[must_use]
    pub fn exchange(&self) -> Option<&str> {
        self.fields.get("exchange").and_then(Value::as_str)
    }

    #[must_use]
    pub fn short_name(&self) -> Option<&str> {
        self.fields.get("shortName").and_then(Value::as_str)
    }

    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Underlying JSON object, for persistence.
    #[must_use]
    pub fn as_object(&self) -> &Map<String, Value> {
        &self.fields
    }
}
