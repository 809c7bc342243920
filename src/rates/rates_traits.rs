use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::rates_model::{AggregationOption, CurrencyPair, ObservationRow, RateView};
use crate::errors::Result;

/// Narrow contract over the observation store. The repository exclusively owns
/// persistence; services never mutate state outside these operations.
pub trait ObservationRepositoryTrait: Send + Sync {
    fn exists_pair(&self, symbol: &str) -> Result<bool>;
    fn register_pair(&self, symbol: &str) -> Result<()>;
    fn list_tracked_pairs(&self) -> Result<Vec<CurrencyPair>>;
    fn list_quote_symbols(&self) -> Result<Vec<String>>;
    fn register_quote_symbol(&self, symbol: &str) -> Result<()>;
    /// Stores one fetch result for a base currency. All quote rows share the
    /// same `observed_at` and commit atomically; a repeated write for the same
    /// (base, quote, observed_at) overwrites the amount.
    fn upsert_observations(
        &self,
        base: &str,
        prices: &[(String, f64)],
        observed_at: NaiveDateTime,
    ) -> Result<()>;
    /// Restricts observations to the half-open window `[start, end)` and the
    /// given currency (all currencies when `None`), reduced per (base, quote)
    /// pair according to `option`. Rows come back ordered by base then quote.
    fn query_window(
        &self,
        currency: Option<&str>,
        start: NaiveDateTime,
        end: NaiveDateTime,
        option: AggregationOption,
    ) -> Result<Vec<ObservationRow>>;
}

#[async_trait]
pub trait RateServiceTrait: Send + Sync {
    async fn get_rate(
        &self,
        currency: &str,
        date: Option<&str>,
        option: AggregationOption,
    ) -> Result<RateView>;

    async fn get_all_rates(
        &self,
        date: Option<&str>,
        option: AggregationOption,
    ) -> Result<Vec<RateView>>;
}
