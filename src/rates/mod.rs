pub mod rates_errors;
pub mod rates_model;
pub mod rates_repository;
pub mod rates_service;
pub mod rates_traits;

pub use rates_errors::RateError;
pub use rates_model::{AggregationOption, CurrencyPair, QuotePrice, RateView};
pub use rates_repository::ObservationRepository;
pub use rates_service::RateService;
pub use rates_traits::{ObservationRepositoryTrait, RateServiceTrait};

#[cfg(test)]
mod rates_service_tests;
