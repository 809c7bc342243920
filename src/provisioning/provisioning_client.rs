use async_trait::async_trait;
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;

use super::provisioning_traits::ProvisionerTrait;
use super::{TOPIC_CURRENCY_READY, TOPIC_REQUEST_NEW_CURRENCY};
use crate::channel::{ChannelError, NotificationChannel};

/// Default bounded wait for a readiness ack.
pub const DEFAULT_ACK_TIMEOUT: Duration = Duration::from_secs(3);

/// Blocking request/response over the notification channel. Single-slot by
/// design: two concurrent handshakes share the ack topic and can observe each
/// other's acks, so callers must not issue them concurrently.
pub struct ProvisioningClient {
    channel: Arc<dyn NotificationChannel>,
    ack_timeout: Duration,
}

impl ProvisioningClient {
    pub fn new(channel: Arc<dyn NotificationChannel>, ack_timeout: Duration) -> Self {
        Self {
            channel,
            ack_timeout,
        }
    }

    /// One publish-then-wait round. Subscribing before publishing closes the
    /// race where the listener acks before the requester starts waiting.
    async fn attempt(&self, symbol: &str) -> Result<(), ChannelError> {
        let mut ack = self.channel.subscribe(TOPIC_CURRENCY_READY);
        self.channel.publish(TOPIC_REQUEST_NEW_CURRENCY, symbol)?;

        // Dropping `ack` on timeout cancels the pending receive.
        match tokio::time::timeout(self.ack_timeout, ack.recv()).await {
            Err(_) => Err(ChannelError::AckTimeout(symbol.to_string())),
            Ok(Err(e)) => Err(e),
            Ok(Ok(received)) if received == symbol => {
                debug!("Provisioning ack received for {}", symbol);
                Ok(())
            }
            Ok(Ok(received)) => Err(ChannelError::AckMismatch {
                requested: symbol.to_string(),
                received,
            }),
        }
    }
}

#[async_trait]
impl ProvisionerTrait for ProvisioningClient {
    async fn provision(&self, symbol: &str) -> Result<(), ChannelError> {
        match self.attempt(symbol).await {
            Err(ChannelError::AckMismatch {
                requested,
                received,
            }) => {
                // One retry with a fresh deadline; a second failure surfaces.
                warn!(
                    "Provisioning ack mismatch (requested {}, received {}), retrying once",
                    requested, received
                );
                self.attempt(symbol).await
            }
            other => other,
        }
    }
}
