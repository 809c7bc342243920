use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::broadcast;

use super::channel_errors::ChannelError;
use super::channel_traits::{ChannelSubscription, NotificationChannel};

/// In-process notification channel that fans out each topic over a tokio
/// broadcast channel. Topics are created lazily on first publish or subscribe.
pub struct BroadcastChannel {
    topics: DashMap<String, broadcast::Sender<String>>,
    capacity: usize,
}

impl BroadcastChannel {
    pub fn new(capacity: usize) -> Self {
        Self {
            topics: DashMap::new(),
            capacity,
        }
    }

    fn sender(&self, topic: &str) -> broadcast::Sender<String> {
        self.topics
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }
}

impl NotificationChannel for BroadcastChannel {
    fn publish(&self, topic: &str, payload: &str) -> Result<(), ChannelError> {
        // A send error only means nobody is subscribed right now.
        let _ = self.sender(topic).send(payload.to_string());
        Ok(())
    }

    fn subscribe(&self, topic: &str) -> Box<dyn ChannelSubscription> {
        Box::new(BroadcastSubscription {
            receiver: self.sender(topic).subscribe(),
        })
    }
}

struct BroadcastSubscription {
    receiver: broadcast::Receiver<String>,
}

#[async_trait]
impl ChannelSubscription for BroadcastSubscription {
    async fn recv(&mut self) -> Result<String, ChannelError> {
        self.receiver.recv().await.map_err(|e| match e {
            broadcast::error::RecvError::Closed => ChannelError::Closed,
            broadcast::error::RecvError::Lagged(n) => ChannelError::Lagged(n),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_published_payloads_in_order() {
        let channel = BroadcastChannel::new(16);
        let mut sub = channel.subscribe("prices");

        channel.publish("prices", "BTC").unwrap();
        channel.publish("prices", "ETH").unwrap();

        assert_eq!(sub.recv().await.unwrap(), "BTC");
        assert_eq!(sub.recv().await.unwrap(), "ETH");
    }

    #[tokio::test]
    async fn topics_are_isolated() {
        let channel = BroadcastChannel::new(16);
        let mut sub = channel.subscribe("a");

        channel.publish("b", "ignored").unwrap();
        channel.publish("a", "seen").unwrap();

        assert_eq!(sub.recv().await.unwrap(), "seen");
    }

    #[tokio::test]
    async fn publish_without_subscriber_is_dropped() {
        let channel = BroadcastChannel::new(16);
        channel.publish("empty", "nobody-home").unwrap();

        // A later subscriber must not see the earlier payload.
        let mut sub = channel.subscribe("empty");
        channel.publish("empty", "fresh").unwrap();
        assert_eq!(sub.recv().await.unwrap(), "fresh");
    }
}
