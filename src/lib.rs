pub mod api;
pub mod channel;
pub mod config;
pub mod db;
pub mod errors;
pub mod ingestion;
pub mod providers;
pub mod provisioning;
pub mod rates;
pub mod schema;
