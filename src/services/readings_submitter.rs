//! Readings upload service
//!
//! Sends a readings CSV to the server and, when it is accepted, marks every
//! cached readings query stale so charts refetch.

use crate::api_client::{CsvApiClient, UploadFile, UploadPayload};
use crate::api_contracts::UploadResult;
use crate::cache::{CacheDispatch, CacheTag};
use crate::debug_logger::DebugLogger;
use crate::error::UploadError;
use crate::types::{ReadingsPreferences, UploadPreferences};
use std::path::Path;
use std::sync::Arc;

pub struct ReadingsUploadSubmitter {
    client: Arc<CsvApiClient>,
    cache: Arc<dyn CacheDispatch>,
    logger: Option<Arc<DebugLogger>>,
}

impl ReadingsUploadSubmitter {
    pub fn new(
        client: Arc<CsvApiClient>,
        cache: Arc<dyn CacheDispatch>,
        logger: Option<Arc<DebugLogger>>,
    ) -> Self {
        Self { client, cache, logger }
    }

    /// Upload `file` with `preferences`. Never fails; check `success`.
    pub async fn submit(&self, preferences: &ReadingsPreferences, file: UploadFile) -> UploadResult {
        let payload = UploadPayload::new(preferences, file);

        match self
            .client
            .post_form_text(ReadingsPreferences::ENDPOINT, payload)
            .await
        {
            Ok(message) => {
                self.cache.invalidate_tags(&[CacheTag::Readings]);
                self.log_info(format!(
                    "Readings upload for '{}' accepted",
                    preferences.meter_identifier
                ));
                UploadResult::succeeded(message)
            }
            Err(e) => self.failure(e),
        }
    }

    /// Read the file at `path` and upload it
    pub async fn submit_path(&self, preferences: &ReadingsPreferences, path: &Path) -> UploadResult {
        match UploadFile::from_path(path) {
            Ok(file) => self.submit(preferences, file).await,
            Err(e) => self.failure(e),
        }
    }

    fn failure(&self, error: UploadError) -> UploadResult {
        let message = error.server_message();
        match self.logger {
            Some(ref logger) => logger.warn(format!("Readings upload failed: {}", error)),
            None => tracing::warn!(%error, "readings upload failed"),
        }
        UploadResult::failed(message)
    }

    fn log_info(&self, message: String) {
        match self.logger {
            Some(ref logger) => logger.info(message),
            None => tracing::info!("{}", message),
        }
    }
}
