use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::traits::CurrencyConverter;
use crate::errors::CoreError;

const BASE_URL: &str = "https://api.frankfurter.dev/v1";

/// Frankfurter API converter for fiat currency amounts.
///
/// - **Free**: No API key, no rate limits, open-source.
/// - **Source**: European Central Bank (ECB) data.
/// - **Coverage**: ~30+ currencies (EUR, USD, ZAR, GBP, JPY, etc.)
///
/// The `/latest` endpoint accepts an `amount` parameter and returns the
/// converted value directly, so no client-side rate arithmetic is needed.
pub struct FrankfurterConverter {
    client: Client,
    base_url: String,
}

impl FrankfurterConverter {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    /// Point the converter at a different endpoint (used by tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

impl Default for FrankfurterConverter {
    fn default() -> Self {
        Self::new()
    }
}

// ── Frankfurter API response types ──────────────────────────────────

#[derive(Deserialize)]
struct RatesResponse {
    rates: HashMap<String, f64>,
}

#[async_trait]
impl CurrencyConverter for FrankfurterConverter {
    fn name(&self) -> &str {
        "Frankfurter"
    }

    async fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64, CoreError> {
        let from = from.to_uppercase();
        let to = to.to_uppercase();

        // Same currency → identity, no network call
        if from == to {
            return Ok(amount);
        }

        let url = format!(
            "{}/latest?amount={amount}&base={from}&symbols={to}",
            self.base_url
        );

        let resp: RatesResponse = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CoreError::Conversion {
                from: from.clone(),
                to: to.clone(),
                detail: CoreError::from(e).to_string(),
            })?
            .json()
            .await
            .map_err(|e| CoreError::Conversion {
                from: from.clone(),
                to: to.clone(),
                detail: format!("failed to parse response: {e}"),
            })?;

        let converted = resp
            .rates
            .get(&to)
            .copied()
            .ok_or_else(|| CoreError::Conversion {
                from: from.clone(),
                to: to.clone(),
                detail: format!("no rate returned for {to}"),
            })?;

        debug!(%from, %to, amount, converted, "currency conversion");
        Ok(converted)
    }
}
