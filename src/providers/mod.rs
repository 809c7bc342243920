pub mod crypto_compare_provider;
pub mod provider_errors;
pub mod quote_source;

pub use crypto_compare_provider::CryptoCompareProvider;
pub use provider_errors::ProviderError;
pub use quote_source::{PriceMap, QuoteSource};
