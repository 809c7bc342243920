use async_trait::async_trait;
use std::collections::HashMap;

use super::provider_errors::ProviderError;

/// Current prices keyed by base symbol, then by quote symbol.
pub type PriceMap = HashMap<String, HashMap<String, f64>>;

/// External price feed, queried by batch of tracked symbols.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetches current prices for every requested base symbol against every
    /// requested quote symbol. Fails on upstream errors, malformed payloads,
    /// or a requested base symbol missing from the response.
    async fn fetch_batch(
        &self,
        base_symbols: &[String],
        quote_symbols: &[String],
    ) -> Result<PriceMap, ProviderError>;
}
