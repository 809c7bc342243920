use async_trait::async_trait;

use super::channel_errors::ChannelError;

/// A live subscription to one topic. Dropping it cancels any pending receive
/// and releases the subscription.
#[async_trait]
pub trait ChannelSubscription: Send {
    /// Blocks until the next payload published on the topic.
    async fn recv(&mut self) -> Result<String, ChannelError>;
}

/// Pub/sub transport used solely for the provisioning handshake. Delivery is
/// at-least-once; ordering across distinct publishers is not guaranteed, which
/// is acceptable since the handshake is single-slot.
pub trait NotificationChannel: Send + Sync {
    /// Publishes a payload on a topic. A publish with no live subscriber is
    /// dropped silently.
    fn publish(&self, topic: &str, payload: &str) -> Result<(), ChannelError>;

    /// Opens a subscription receiving every payload published on the topic
    /// from this point on.
    fn subscribe(&self, topic: &str) -> Box<dyn ChannelSubscription>;
}
