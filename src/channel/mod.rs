pub mod broadcast_channel;
pub mod channel_errors;
pub mod channel_traits;

pub use broadcast_channel::BroadcastChannel;
pub use channel_errors::ChannelError;
pub use channel_traits::{ChannelSubscription, NotificationChannel};
