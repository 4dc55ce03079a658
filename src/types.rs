//! Upload preference types and their form encoding.
//!
//! Preferences are what the user picks on the CSV upload page. The server
//! reads them as multipart text fields, so every value is turned into a
//! string before it leaves the client.

use serde::{Deserialize, Serialize};

/// Multipart key the CSV file is attached under.
pub const CSV_FILE_FIELD: &str = "csvfile";

/// The two literal tokens the server accepts for boolean settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BooleanToken {
    True,
    False,
}

impl BooleanToken {
    pub fn as_str(&self) -> &'static str {
        match self {
            BooleanToken::True => "true",
            BooleanToken::False => "false",
        }
    }
}

impl From<bool> for BooleanToken {
    fn from(value: bool) -> Self {
        if value {
            BooleanToken::True
        } else {
            BooleanToken::False
        }
    }
}

/// Encode named boolean settings into their token form, keeping order.
pub fn encode_flags<'a, I>(flags: I) -> Vec<(&'a str, BooleanToken)>
where
    I: IntoIterator<Item = (&'a str, bool)>,
{
    flags
        .into_iter()
        .map(|(name, value)| (name, BooleanToken::from(value)))
        .collect()
}

/// A setting that is true, false, or deferred to the meter's stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BooleanMeterType {
    #[serde(rename = "true")]
    True,
    #[serde(rename = "false")]
    False,
    #[default]
    #[serde(rename = "meter value or default")]
    Meter,
}

impl BooleanMeterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BooleanMeterType::True => "true",
            BooleanMeterType::False => "false",
            BooleanMeterType::Meter => "meter value or default",
        }
    }
}

/// Order readings appear in the uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeSortType {
    #[serde(rename = "increasing")]
    Increasing,
    #[serde(rename = "decreasing")]
    Decreasing,
    #[default]
    #[serde(rename = "meter value or default")]
    Meter,
}

impl TimeSortType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSortType::Increasing => "increasing",
            TimeSortType::Decreasing => "decreasing",
            TimeSortType::Meter => "meter value or default",
        }
    }
}

/// One text part of the outgoing multipart form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: &'static str,
    pub value: String,
}

impl FormField {
    pub fn new(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

/// Preferences that can be sent alongside a CSV file.
pub trait UploadPreferences {
    /// Server path the upload is posted to.
    const ENDPOINT: &'static str;

    /// Stringified fields in the order they are appended to the form.
    fn form_fields(&self) -> Vec<FormField>;
}

/// Preferences for `/api/csv/meters`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetersPreferences {
    pub meter_identifier: String,
    pub gzip: bool,
    pub header_row: bool,
    pub update: bool,
}

impl UploadPreferences for MetersPreferences {
    const ENDPOINT: &'static str = "/api/csv/meters";

    fn form_fields(&self) -> Vec<FormField> {
        let mut fields = vec![FormField::new("meterIdentifier", self.meter_identifier.clone())];
        fields.extend(flag_fields([
            ("gzip", self.gzip),
            ("headerRow", self.header_row),
            ("update", self.update),
        ]));
        fields
    }
}

/// Boolean preferences as form fields, in the order given
fn flag_fields<I>(flags: I) -> impl Iterator<Item = FormField>
where
    I: IntoIterator<Item = (&'static str, bool)>,
{
    encode_flags(flags)
        .into_iter()
        .map(|(name, token)| FormField::new(name, token.as_str()))
}

/// Preferences for `/api/csv/readings`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingsPreferences {
    pub meter_identifier: String,
    pub gzip: bool,
    pub header_row: bool,
    pub update: bool,
    pub cumulative: BooleanMeterType,
    pub cumulative_reset: BooleanMeterType,
    pub cumulative_reset_start: String,
    pub cumulative_reset_end: String,
    pub duplications: String,
    pub end_only: BooleanMeterType,
    pub honor_dst: bool,
    pub length_gap: String,
    pub length_variation: String,
    pub refresh_readings: bool,
    pub relaxed_parsing: bool,
    pub time_sort: TimeSortType,
    pub use_meter_zone: bool,
}

impl Default for ReadingsPreferences {
    fn default() -> Self {
        Self {
            meter_identifier: String::new(),
            gzip: false,
            header_row: false,
            update: false,
            cumulative: BooleanMeterType::Meter,
            cumulative_reset: BooleanMeterType::Meter,
            cumulative_reset_start: String::new(),
            cumulative_reset_end: String::new(),
            duplications: "1".to_string(),
            end_only: BooleanMeterType::Meter,
            honor_dst: false,
            length_gap: String::new(),
            length_variation: String::new(),
            refresh_readings: false,
            relaxed_parsing: false,
            time_sort: TimeSortType::Meter,
            use_meter_zone: false,
        }
    }
}

impl UploadPreferences for ReadingsPreferences {
    const ENDPOINT: &'static str = "/api/csv/readings";

    fn form_fields(&self) -> Vec<FormField> {
        let mut fields = vec![FormField::new("meterIdentifier", self.meter_identifier.clone())];
        fields.extend(flag_fields([
            ("gzip", self.gzip),
            ("headerRow", self.header_row),
            ("update", self.update),
        ]));
        fields.extend([
            FormField::new("cumulative", self.cumulative.as_str()),
            FormField::new("cumulativeReset", self.cumulative_reset.as_str()),
            FormField::new("cumulativeResetStart", self.cumulative_reset_start.clone()),
            FormField::new("cumulativeResetEnd", self.cumulative_reset_end.clone()),
            FormField::new("duplications", self.duplications.clone()),
            FormField::new("endOnly", self.end_only.as_str()),
        ]);
        fields.extend(flag_fields([("honorDst", self.honor_dst)]));
        fields.extend([
            FormField::new("lengthGap", self.length_gap.clone()),
            FormField::new("lengthVariation", self.length_variation.clone()),
        ]);
        fields.extend(flag_fields([
            ("refreshReadings", self.refresh_readings),
            ("relaxedParsing", self.relaxed_parsing),
        ]));
        fields.push(FormField::new("timeSort", self.time_sort.as_str()));
        fields.extend(flag_fields([("useMeterZone", self.use_meter_zone)]));
        fields
    }
}
