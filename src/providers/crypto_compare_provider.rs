use async_trait::async_trait;
use log::debug;
use std::time::Duration;

use super::provider_errors::ProviderError;
use super::quote_source::{PriceMap, QuoteSource};

pub const DEFAULT_FEED_URL: &str = "https://min-api.cryptocompare.com/data/price";

/// Quote source backed by the CryptoCompare price endpoint, which answers a
/// batched `fsyms`/`tsyms` query with a symbol→price map.
pub struct CryptoCompareProvider {
    client: reqwest::Client,
    base_url: String,
}

impl CryptoCompareProvider {
    pub fn new(base_url: String, fetch_timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder().timeout(fetch_timeout).build()?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl QuoteSource for CryptoCompareProvider {
    async fn fetch_batch(
        &self,
        base_symbols: &[String],
        quote_symbols: &[String],
    ) -> Result<PriceMap, ProviderError> {
        if base_symbols.is_empty() || quote_symbols.is_empty() {
            return Err(ProviderError::EmptyBatch);
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("fsyms", base_symbols.join(",")),
                ("tsyms", quote_symbols.join(",")),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::BadStatus(response.status().to_string()));
        }

        let prices: PriceMap = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        ensure_batch_complete(base_symbols, &prices)?;

        debug!(
            "Fetched prices for {} base symbols against {} quote symbols",
            base_symbols.len(),
            quote_symbols.len()
        );
        Ok(prices)
    }
}

/// Every requested base symbol must be present in the response; a missing
/// quote symbol inside a present base is tolerated and simply not stored.
fn ensure_batch_complete(base_symbols: &[String], prices: &PriceMap) -> Result<(), ProviderError> {
    for base in base_symbols {
        if !prices.contains_key(base) {
            return Err(ProviderError::MissingSymbol(base.clone()));
        }
    }
    Ok(())
}
