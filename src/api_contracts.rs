/**
 * API Contract Types for the OED CSV upload endpoints
 *
 * These types define the JSON bodies exchanged with `/api/csv/meters` and the
 * result record handed back to callers of the submitters.
 *
 * Principles:
 * - Field names match the server's camelCase JSON exactly
 * - Meter attributes this client never reads are carried opaquely so a
 *   cached meter is identical to what the server sent
 */

use serde::{Deserialize, Serialize};

// =============================================================================
// Meters Upload Endpoint
// =============================================================================

/// Response from `/api/csv/meters`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetersUploadResponse {
    pub message: String,
    pub meters: Vec<MeterData>,
}

impl MetersUploadResponse {
    /// Meter names joined for display, e.g. "A, B"
    pub fn meter_names(&self) -> String {
        self.meters
            .iter()
            .map(|meter| meter.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A meter row as the server returns it. Only `name` is guaranteed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MeterData {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub displayable: bool,
    /// Everything else the server sends (area, gps, unitId, timeZone, ...)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// =============================================================================
// Submitter Result
// =============================================================================

/// Outcome of one upload; failures are values, not errors
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadResult {
    pub success: bool,
    pub message: String,
}

impl UploadResult {
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meters_upload_response_deserialization() {
        let json = r#"{
            "message": "Successfully inserted the meters.",
            "meters": [
                {
                    "id": 7,
                    "identifier": "A",
                    "name": "A",
                    "enabled": true,
                    "displayable": false,
                    "area": 120.5,
                    "timeZone": null,
                    "unitId": -99
                },
                {"id": 8, "identifier": "B", "name": "B"}
            ]
        }"#;

        let response: MetersUploadResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.meters.len(), 2);
        assert_eq!(response.meters[0].id, Some(7));
        assert!(response.meters[0].enabled);
        assert_eq!(response.meters[0].extra.get("area"), Some(&serde_json::json!(120.5)));
        assert!(!response.meters[1].enabled);
        assert_eq!(response.meter_names(), "A, B");
    }

    #[test]
    fn test_meter_data_keeps_unknown_fields() {
        let json = r#"{"id":1,"identifier":"m","name":"m","enabled":true,"displayable":true,"gps":{"latitude":1.0,"longitude":2.0}}"#;
        let meter: MeterData = serde_json::from_str(json).unwrap();

        let back = serde_json::to_value(&meter).unwrap();
        assert_eq!(back["gps"]["longitude"], serde_json::json!(2.0));
        assert_eq!(back["identifier"], serde_json::json!("m"));
    }

    #[test]
    fn test_name_only_meters_deserialize() {
        let json = r#"{"message": "ok", "meters": [{"name": "A"}, {"name": "B"}]}"#;

        let response: MetersUploadResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.meters[0].id, None);
        assert_eq!(response.meters[1].identifier, None);
        assert!(response.meters[1].extra.is_empty());
        assert_eq!(response.meter_names(), "A, B");

        let back = serde_json::to_value(&response.meters[0]).unwrap();
        assert_eq!(back, serde_json::json!({"name": "A", "enabled": false, "displayable": false}));
    }

    #[test]
    fn test_meter_names_empty() {
        let response = MetersUploadResponse {
            message: "none".to_string(),
            meters: vec![],
        };
        assert_eq!(response.meter_names(), "");
    }

    #[test]
    fn test_upload_result_constructors() {
        assert_eq!(
            UploadResult::succeeded("ok"),
            UploadResult { success: true, message: "ok".to_string() }
        );
        let failed = UploadResult::failed("bad file");
        assert!(!failed.success);
        assert_eq!(failed.message, "bad file");
    }

    #[test]
    fn test_upload_result_serialize() {
        let json = serde_json::to_string(&UploadResult::failed("bad file")).unwrap();
        assert_eq!(json, r#"{"success":false,"message":"bad file"}"#);
    }
}
