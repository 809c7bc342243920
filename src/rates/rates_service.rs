use async_trait::async_trait;
use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use log::{debug, info};
use std::sync::Arc;

use super::rates_errors::RateError;
use super::rates_model::{AggregationOption, ObservationRow, QuotePrice, RateView};
use super::rates_traits::{ObservationRepositoryTrait, RateServiceTrait};
use crate::channel::ChannelError;
use crate::errors::Result;
use crate::provisioning::ProvisionerTrait;

/// Aggregation query engine. Read-only against the store apart from the
/// provisioning handshake it triggers for unknown currencies.
pub struct RateService {
    repository: Arc<dyn ObservationRepositoryTrait>,
    provisioner: Arc<dyn ProvisionerTrait>,
}

impl RateService {
    pub fn new(
        repository: Arc<dyn ObservationRepositoryTrait>,
        provisioner: Arc<dyn ProvisionerTrait>,
    ) -> Self {
        Self {
            repository,
            provisioner,
        }
    }

    async fn provision(&self, symbol: &str) -> Result<()> {
        info!("Currency {} is untracked, requesting provisioning", symbol);
        self.provisioner
            .provision(symbol)
            .await
            .map_err(|e| match e {
                ChannelError::AckMismatch { received, .. } => {
                    RateError::ProtocolMismatch(received).into()
                }
                ChannelError::AckTimeout(_) | ChannelError::Closed | ChannelError::Lagged(_) => {
                    RateError::Unavailable(symbol.to_string()).into()
                }
            })
    }
}

#[async_trait]
impl RateServiceTrait for RateService {
    async fn get_rate(
        &self,
        currency: &str,
        date: Option<&str>,
        option: AggregationOption,
    ) -> Result<RateView> {
        let symbol = normalize_symbol(currency);
        let (start, end) = day_window(date)?;

        if !self.repository.exists_pair(&symbol)? {
            self.provision(&symbol).await?;
        }

        let rows = self
            .repository
            .query_window(Some(&symbol), start, end, option)?;

        debug!(
            "Rate query for {} ({}) matched {} quote rows",
            symbol,
            option,
            rows.len()
        );

        group_rows(rows)
            .into_iter()
            .next()
            .ok_or_else(|| RateError::NotFound(symbol).into())
    }

    async fn get_all_rates(
        &self,
        date: Option<&str>,
        option: AggregationOption,
    ) -> Result<Vec<RateView>> {
        let (start, end) = day_window(date)?;
        let rows = self.repository.query_window(None, start, end, option)?;
        Ok(group_rows(rows))
    }
}

fn normalize_symbol(currency: &str) -> String {
    currency.trim().to_uppercase()
}

/// Resolves the half-open day window `[midnight(date), midnight(date)+24h)`.
/// A missing date means "today" on the caller's clock; malformed input fails
/// before any store access.
fn day_window(date: Option<&str>) -> Result<(NaiveDateTime, NaiveDateTime)> {
    let day: NaiveDate = match date {
        None => Local::now().date_naive(),
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|e| RateError::InvalidDate(format!("{}: {}", raw, e)))?,
    };

    let start = day.and_time(NaiveTime::MIN);
    Ok((start, start + Duration::days(1)))
}

/// Folds repository rows (ordered by base then quote symbol) into one view per
/// base currency, with `as_of` the latest contributing observation.
fn group_rows(rows: Vec<ObservationRow>) -> Vec<RateView> {
    let mut views: Vec<RateView> = Vec::new();

    for row in rows {
        match views.last_mut() {
            Some(view) if view.title == row.base_symbol => {
                view.values.push(QuotePrice {
                    symbol: row.quote_symbol,
                    amount: row.amount,
                });
                if row.observed_at > view.as_of {
                    view.as_of = row.observed_at;
                }
            }
            _ => views.push(RateView {
                title: row.base_symbol,
                values: vec![QuotePrice {
                    symbol: row.quote_symbol,
                    amount: row.amount,
                }],
                as_of: row.observed_at,
            }),
        }
    }

    views
}
