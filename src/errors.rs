use diesel::result::Error as DieselError;
use thiserror::Error;

use crate::channel::ChannelError;
use crate::providers::ProviderError;
use crate::rates::RateError;

// Create a type alias for Result using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the exchange services
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Rate query failed: {0}")]
    Rate(#[from] RateError),

    #[error("Notification channel failed: {0}")]
    Channel(#[from] ChannelError),

    #[error("Quote source failed: {0}")]
    Provider(#[from] ProviderError),
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(#[from] diesel::result::ConnectionError),

    #[error("Failed to get database connection from pool: {0}")]
    PoolFailed(#[from] r2d2::Error),

    #[error("Database query failed: {0}")]
    QueryFailed(#[from] DieselError),

    #[error("Database migration failed: {0}")]
    MigrationFailed(String),
}

// Implement From for DieselError to Error directly
impl From<DieselError> for Error {
    fn from(err: DieselError) -> Self {
        Error::Database(DatabaseError::QueryFailed(err))
    }
}

impl From<r2d2::Error> for Error {
    fn from(err: r2d2::Error) -> Self {
        Error::Database(DatabaseError::PoolFailed(err))
    }
}
