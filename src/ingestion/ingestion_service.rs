use chrono::Utc;
use lazy_static::lazy_static;
use log::{debug, error, info, warn};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::channel::{ChannelError, NotificationChannel};
use crate::errors::Result;
use crate::providers::{PriceMap, QuoteSource};
use crate::provisioning::{TOPIC_CURRENCY_READY, TOPIC_REQUEST_NEW_CURRENCY};
use crate::rates::ObservationRepositoryTrait;

lazy_static! {
    static ref SYMBOL_RE: Regex = Regex::new(r"^[A-Z0-9]{1,10}$").unwrap();
}

/// Owns all writes to the observation store: a periodic batch fetch over the
/// tracked set and a listener that provisions newly requested currencies on
/// demand. Both tasks exit promptly on cancellation.
pub struct IngestionService {
    repository: Arc<dyn ObservationRepositoryTrait>,
    source: Arc<dyn QuoteSource>,
    channel: Arc<dyn NotificationChannel>,
    poll_interval: Duration,
}

impl IngestionService {
    pub fn new(
        repository: Arc<dyn ObservationRepositoryTrait>,
        source: Arc<dyn QuoteSource>,
        channel: Arc<dyn NotificationChannel>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            repository,
            source,
            channel,
            poll_interval,
        }
    }

    /// Runs both ingestion tasks until the token is cancelled.
    pub async fn run(&self, shutdown: CancellationToken) {
        tokio::join!(
            self.run_periodic(shutdown.clone()),
            self.run_listener(shutdown)
        );
        info!("Ingestion service stopped");
    }

    async fn run_periodic(&self, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first interval tick fires immediately; skip it so a fresh start
        // does not race the seeding of tracked currencies.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    // A failed tick is isolated; the next tick still runs.
                    if let Err(e) = self.run_tick().await {
                        error!("Scheduled rate fetch failed: {}", e);
                    }
                }
            }
        }
    }

    /// One periodic batch fetch: re-reads the tracked set from the store,
    /// queries the feed once for all of it, and stores the result stamped
    /// with the fetch time.
    pub(crate) async fn run_tick(&self) -> Result<()> {
        let pairs = self.repository.list_tracked_pairs()?;
        if pairs.is_empty() {
            debug!("No tracked currencies, skipping fetch");
            return Ok(());
        }

        let bases: Vec<String> = pairs.iter().map(|p| p.base.clone()).collect();
        let quotes: Vec<String> = pairs
            .iter()
            .flat_map(|p| p.quotes.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let prices = self.source.fetch_batch(&bases, &quotes).await?;
        self.store_prices(&bases, &prices)?;

        debug!("Stored rates for {} currencies", bases.len());
        Ok(())
    }

    fn store_prices(&self, bases: &[String], prices: &PriceMap) -> Result<()> {
        let observed_at = Utc::now().naive_utc();

        for base in bases {
            if let Some(by_quote) = prices.get(base) {
                let mut rows: Vec<(String, f64)> = by_quote
                    .iter()
                    .map(|(quote, amount)| (quote.clone(), *amount))
                    .collect();
                rows.sort_by(|a, b| a.0.cmp(&b.0));
                self.repository
                    .upsert_observations(base, &rows, observed_at)?;
            }
        }

        Ok(())
    }

    async fn run_listener(&self, shutdown: CancellationToken) {
        let mut requests = self.channel.subscribe(TOPIC_REQUEST_NEW_CURRENCY);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                received = requests.recv() => match received {
                    Ok(symbol) => self.handle_provision_request(&symbol).await,
                    Err(ChannelError::Lagged(n)) => {
                        warn!("Provisioning listener lagged by {} requests", n);
                    }
                    Err(e) => {
                        error!("Provisioning listener stopped receiving: {}", e);
                        break;
                    }
                }
            }
        }
    }

    /// Listener side of the provisioning handshake: register the currency,
    /// fetch and store it immediately, and ack regardless of the outcome so
    /// the requester never hangs. A failed fetch leaves the currency with no
    /// observations and the read reports it as not found.
    pub(crate) async fn handle_provision_request(&self, symbol: &str) {
        if !SYMBOL_RE.is_match(symbol) {
            // Fail closed on registration, but still ack.
            warn!("Ignoring provisioning request for invalid symbol {:?}", symbol);
        } else if let Err(e) = self.repository.register_pair(symbol) {
            error!("Failed to register currency {}: {}", symbol, e);
        } else if let Err(e) = self.fetch_single(symbol).await {
            error!("Provisioning fetch for {} failed: {}", symbol, e);
        } else {
            info!("Provisioned new currency {}", symbol);
        }

        if let Err(e) = self.channel.publish(TOPIC_CURRENCY_READY, symbol) {
            error!("Failed to ack provisioning of {}: {}", symbol, e);
        }
    }

    /// Immediate fetch+store for one newly requested currency only, not the
    /// full tracked set.
    async fn fetch_single(&self, base: &str) -> Result<()> {
        let quotes = self.repository.list_quote_symbols()?;
        if quotes.is_empty() {
            warn!("No quote symbols configured, nothing to fetch for {}", base);
            return Ok(());
        }

        let bases = vec![base.to_string()];
        let prices = self.source.fetch_batch(&bases, &quotes).await?;
        self.store_prices(&bases, &prices)
    }
}
