//! Meters upload service
//!
//! Sends a meters CSV and reconciles the cached meter list. When the upload
//! may have changed existing rows (`update` set) the whole meter cache is
//! invalidated; otherwise only new meters were created and each one is added
//! to the cached list directly.

use crate::api_client::{CsvApiClient, UploadFile, UploadPayload};
use crate::api_contracts::{MeterData, MetersUploadResponse, UploadResult};
use crate::cache::{CacheDispatch, CacheTag, GET_METERS_QUERY};
use crate::debug_logger::DebugLogger;
use crate::error::UploadError;
use crate::types::{MetersPreferences, UploadPreferences};
use std::path::Path;
use std::sync::Arc;

pub struct MetersUploadSubmitter {
    client: Arc<CsvApiClient>,
    cache: Arc<dyn CacheDispatch>,
    logger: Option<Arc<DebugLogger>>,
}

impl MetersUploadSubmitter {
    pub fn new(
        client: Arc<CsvApiClient>,
        cache: Arc<dyn CacheDispatch>,
        logger: Option<Arc<DebugLogger>>,
    ) -> Self {
        Self { client, cache, logger }
    }

    /// Upload `file` with `preferences`. Never fails; check `success`.
    pub async fn submit(&self, preferences: &MetersPreferences, file: UploadFile) -> UploadResult {
        let payload = UploadPayload::new(preferences, file);

        let response: MetersUploadResponse = match self
            .client
            .post_form_json(MetersPreferences::ENDPOINT, payload)
            .await
        {
            Ok(response) => response,
            Err(e) => return self.failure(e),
        };

        let meter_names = response.meter_names();
        self.reconcile_cache(preferences.update, response.meters);

        UploadResult::succeeded(format!("{} {}", response.message, meter_names))
    }

    /// Read the file at `path` and upload it
    pub async fn submit_path(&self, preferences: &MetersPreferences, path: &Path) -> UploadResult {
        match UploadFile::from_path(path) {
            Ok(file) => self.submit(preferences, file).await,
            Err(e) => self.failure(e),
        }
    }

    fn reconcile_cache(&self, update: bool, meters: Vec<MeterData>) {
        if update {
            self.log_info(format!(
                "Meters upload updated rows, invalidating meter cache ({} returned)",
                meters.len()
            ));
            self.cache.invalidate_tags(&[CacheTag::MeterData]);
            return;
        }

        self.log_info(format!("Adding {} new meter(s) to cache", meters.len()));
        for meter in meters {
            let mut pending = Some(meter);
            self.cache.update_cached_collection(GET_METERS_QUERY, &mut |collection| {
                if let Some(meter) = pending.take() {
                    collection.add_one(meter);
                }
            });
        }
    }

    fn failure(&self, error: UploadError) -> UploadResult {
        let message = error.server_message();
        match self.logger {
            Some(ref logger) => logger.warn(format!("Meters upload failed: {}", error)),
            None => tracing::warn!(%error, "meters upload failed"),
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
