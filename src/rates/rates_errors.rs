use thiserror::Error;

#[derive(Error, Debug)]
pub enum RateError {
    #[error("No rates found for currency {0} in the requested window")]
    NotFound(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Currency {0} could not be provisioned in time")]
    Unavailable(String),

    #[error("Provisioning handshake answered with the wrong currency: {0}")]
    ProtocolMismatch(String),
}
