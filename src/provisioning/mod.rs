pub mod provisioning_client;
pub mod provisioning_traits;

pub use provisioning_client::ProvisioningClient;
pub use provisioning_traits::ProvisionerTrait;

/// Topic carrying requests to start tracking a new currency.
pub const TOPIC_REQUEST_NEW_CURRENCY: &str = "request-new-currency";
/// Topic carrying readiness acks for provisioned currencies.
pub const TOPIC_CURRENCY_READY: &str = "currency-ready";
