use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Upstream feed answered with status {0}")]
    BadStatus(String),

    #[error("Failed to parse upstream payload: {0}")]
    Parse(String),

    #[error("Upstream feed returned no prices for {0}")]
    MissingSymbol(String),

    #[error("Refusing to fetch an empty symbol batch")]
    EmptyBatch,
}
