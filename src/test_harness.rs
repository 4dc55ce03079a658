//! Integration test harness for mock API servers
//!
//! Stands up a mockito server playing the part of the OED CSV endpoints so
//! the submitters can be exercised end to end without a real server.

use crate::types::{MetersPreferences, ReadingsPreferences, UploadPreferences, CSV_FILE_FIELD};
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::json;

/// A test harness that sets up a mock OED server
pub struct TestHarness {
    pub server: ServerGuard,
}

impl TestHarness {
    /// Create a new test harness with a mock server
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        Self { server }
    }

    /// Get the mock server URL
    pub fn url(&self) -> String {
        self.server.url()
    }

    /// Mock `/api/csv/readings` accepting the upload with a text message
    pub async fn mock_readings_success(&mut self, message: &str) -> Mock {
        self.server.mock("POST", ReadingsPreferences::ENDPOINT)
            .match_header("content-type", Matcher::Regex("^multipart/form-data".to_string()))
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body(message)
            .create_async()
            .await
    }

    /// Mock `/api/csv/meters` accepting the upload and returning `meters`
    pub async fn mock_meters_success(&mut self, message: &str, meters: Vec<serde_json::Value>) -> Mock {
        self.server.mock("POST", MetersPreferences::ENDPOINT)
            .match_header("content-type", Matcher::Regex("^multipart/form-data".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({
                "message": message,
                "meters": meters
            }).to_string())
            .create_async()
            .await
    }

    /// Mock a rejected upload whose body is plain error text
    pub async fn mock_upload_failure(&mut self, path: &str, status: usize, error_text: &str) -> Mock {
        self.server.mock("POST", path)
            .with_status(status)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body(error_text)
            .create_async()
            .await
    }

    /// Mock that only matches when `field` carries `value` and the CSV file
    /// is the final part of the form.
    pub async fn mock_file_after_field(&mut self, path: &str, field: &str, value: &str, body: &str) -> Mock {
        self.server.mock("POST", path)
            .match_body(Matcher::Regex(file_last_pattern(field, value)))
            .with_status(200)
            .with_body(body)
            .create_async()
            .await
    }
}

/// Body regex: `field=value` appears, later the file part, and nothing but
/// file bytes and the closing boundary follow it.
fn file_last_pattern(field: &str, value: &str) -> String {
    format!(
        concat!(
            r#"(?s)name="{field}"\r\n(?:[^\r\n]+\r\n)*\r\n{value}\r\n"#,
            r#".*name="{file}"; filename="[^"]+"\r\n(?:[^\r\n"]+\r\n)*\r\n"#,
            r#"[^"]*\r\n--[0-9a-f-]+--\r\n$"#,
        ),
        field = field,
        value = value,
        file = CSV_FILE_FIELD,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::{CsvApiClient, UploadFile, UploadPayload};
    use crate::error::UploadError;

    fn csv() -> UploadFile {
        UploadFile::from_bytes("test.csv", b"1,2\n3,4\n".to_vec())
    }

    #[tokio::test]
    async fn test_post_form_text_with_mock_server() {
        let mut harness = TestHarness::new().await;
        let _mock = harness.mock_readings_success("uploaded").await;

        let client = CsvApiClient::new(harness.url());
        let payload = UploadPayload::new(&ReadingsPreferences::default(), csv());
        let result = client.post_form_text(ReadingsPreferences::ENDPOINT, payload).await;

        assert_eq!(result.unwrap(), "uploaded");
    }

    #[tokio::test]
    async fn test_post_form_rejected_carries_body() {
        let mut harness = TestHarness::new().await;
        let _mock = harness
            .mock_upload_failure(MetersPreferences::ENDPOINT, 500, "Failed to upload meters")
            .await;

        let client = CsvApiClient::new(harness.url());
        let payload = UploadPayload::new(&MetersPreferences::default(), csv());
        let result = client
            .post_form_json::<serde_json::Value>(MetersPreferences::ENDPOINT, payload)
            .await;

        match result {
            Err(UploadError::Rejected { status, message }) => {
                assert_eq!(status.as_u16(), 500);
                assert_eq!(message, "Failed to upload meters");
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_file_last_pattern_rejects_file_first() {
        // A hand-built body with the file before a text field must not match
        let mut harness = TestHarness::new().await;
        let _mock = harness
            .mock_file_after_field("/order", "gzip", "false", "ok")
            .await;
        let _fallback = harness.server.mock("POST", "/order")
            .with_status(418)
            .create_async()
            .await;

        let form = reqwest::multipart::Form::new()
            .part(CSV_FILE_FIELD, reqwest::multipart::Part::bytes(b"1,2\n".to_vec()).file_name("x.csv"))
            .text("gzip", "false");
        let response = reqwest::Client::new()
            .post(format!("{}/order", harness.url()))
            .multipart(form)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 418);
    }

    #[test]
    fn test_file_last_pattern_mentions_field() {
        let pattern = file_last_pattern("update", "true");
        assert!(pattern.contains(r#"name="update""#));
        assert!(pattern.contains(r#"name="csvfile""#));
    }
}
