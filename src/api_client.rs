use crate::config_utils::ClientConfig;
use crate::debug_logger::DebugLogger;
use crate::error::UploadError;
use crate::types::{FormField, UploadPreferences, CSV_FILE_FIELD};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Header the server reads the auth token from
const TOKEN_HEADER: &str = "token";

/// CSV content to attach to an upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub contents: Vec<u8>,
}

impl UploadFile {
    pub fn from_bytes(file_name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            contents: contents.into(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, UploadError> {
        let contents = fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.csv")
            .to_string();
        Ok(Self { file_name, contents })
    }
}

/// Preference fields followed by the file, in send order.
///
/// The server streams the form and expects the file part last.
#[derive(Debug, Clone)]
pub struct UploadPayload {
    fields: Vec<FormField>,
    file: UploadFile,
}

impl UploadPayload {
    pub fn new<P: UploadPreferences>(preferences: &P, file: UploadFile) -> Self {
        Self {
            fields: preferences.form_fields(),
            file,
        }
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Every part name in the order it will be appended
    pub fn field_names(&self) -> Vec<&str> {
        self.fields
            .iter()
            .map(|f| f.name)
            .chain(std::iter::once(CSV_FILE_FIELD))
            .collect()
    }

    pub fn into_form(self) -> reqwest::multipart::Form {
        let form = self
            .fields
            .into_iter()
            .fold(reqwest::multipart::Form::new(), |form, field| {
                form.text(field.name, field.value)
            });

        let part = reqwest::multipart::Part::bytes(self.file.contents)
            .file_name(self.file.file_name);

        form.part(CSV_FILE_FIELD, part)
    }
}

/// HTTP client for the CSV upload endpoints
pub struct CsvApiClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
    logger: Option<Arc<DebugLogger>>,
}

impl CsvApiClient {
    /// Create a client with default settings against `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        let config = ClientConfig {
            base_url: base_url.into(),
            ..Default::default()
        };
        Self::with_config(&config, None)
    }

    pub fn with_config(config: &ClientConfig, logger: Option<Arc<DebugLogger>>) -> Self {
        let user_agent = format!("OEDCsvUploader/{}", env!("CARGO_PKG_VERSION"));

        // Large meter files can take the server a while to ingest
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&user_agent)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            client,
            logger,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST a payload and return the plain-text success body
    pub async fn post_form_text(&self, path: &str, payload: UploadPayload) -> Result<String, UploadError> {
        let response = self.send_form(path, payload).await?;
        Ok(response.text().await?)
    }

    /// POST a payload and decode the JSON success body
    pub async fn post_form_json<T: DeserializeOwned>(
        &self,
        path: &str,
        payload: UploadPayload,
    ) -> Result<T, UploadError> {
        let response = self.send_form(path, payload).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn send_form(&self, path: &str, payload: UploadPayload) -> Result<reqwest::Response, UploadError> {
        let url = self.endpoint_url(path);

        if let Some(ref logger) = self.logger {
            logger.debug(format!(
                "Posting {} ({} bytes) to {}",
                payload.file.file_name,
                payload.file.contents.len(),
                url
            ));
        }

        let mut request = self.client.post(&url).multipart(payload.into_form());
        if let Some(ref token) = self.token {
            request = request.header(TOKEN_HEADER, token);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await.unwrap_or_default();
            return Err(UploadError::Rejected { status, message });
        }

        Ok(response)
    }
}
