//! Client for the Open Energy Dashboard CSV upload endpoints.
//!
//! ```no_run
//! use std::sync::Arc;
//! use oed_csv_uploader::{
//!     ClientConfig, CsvApiClient, InMemoryCache, MetersPreferences, MetersUploadSubmitter, UploadFile,
//! };
//!
//! # async fn run() -> Result<(), String> {
//! let config = ClientConfig::load()?;
//! let client = Arc::new(CsvApiClient::with_config(&config, None));
//! let cache = Arc::new(InMemoryCache::new());
//!
//! let submitter = MetersUploadSubmitter::new(client, cache, None);
//! let file = UploadFile::from_bytes("meters.csv", b"name,identifier\nA,A\n".to_vec());
//! let result = submitter.submit(&MetersPreferences::default(), file).await;
//! println!("{}: {}", result.success, result.message);
//! # Ok(())
//! # }
//! ```

pub mod api_client;
pub mod api_contracts;
pub mod cache;
pub mod config_utils;
pub mod debug_logger;
pub mod error;
pub mod services;
pub mod types;

#[cfg(test)]
mod test_harness;

pub use api_client::{CsvApiClient, UploadFile, UploadPayload};
pub use api_contracts::{MeterData, MetersUploadResponse, UploadResult};
pub use cache::{CacheDispatch, CacheEvent, CacheTag, InMemoryCache, MeterCollection, GET_METERS_QUERY};
pub use config_utils::ClientConfig;
pub use debug_logger::{init_tracing, DebugLogger};
pub use error::UploadError;
pub use services::{MetersUploadSubmitter, ReadingsUploadSubmitter};
pub use types::{
    encode_flags, BooleanMeterType, BooleanToken, FormField, MetersPreferences, ReadingsPreferences,
    TimeSortType, UploadPreferences, CSV_FILE_FIELD,
};
