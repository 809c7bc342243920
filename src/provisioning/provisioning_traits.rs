use async_trait::async_trait;

use crate::channel::ChannelError;

/// Requester side of the provisioning handshake: asks the ingestion service
/// to start tracking a currency and waits (bounded) for its readiness ack.
#[async_trait]
pub trait ProvisionerTrait: Send + Sync {
    async fn provision(&self, symbol: &str) -> Result<(), ChannelError>;
}
