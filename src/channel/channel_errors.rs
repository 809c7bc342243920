use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("Timed out waiting for a readiness ack for {0}")]
    AckTimeout(String),

    #[error("Expected a readiness ack for {requested}, received one for {received}")]
    AckMismatch { requested: String, received: String },

    #[error("Notification channel closed")]
    Closed,

    #[error("Subscription lagged behind by {0} messages")]
    Lagged(u64),
}
