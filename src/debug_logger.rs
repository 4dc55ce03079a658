use crate::config_utils;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const MAX_ENTRIES: usize = 1000;
const LOG_FILE_PREFIX: &str = "oed-csv-uploader.log";

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the default `oed_csv_uploader=info` filter. When
/// `log_dir` is given, events are also written to a daily rolling file; keep
/// the returned guard alive for as long as file logging should flush.
pub fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("oed_csv_uploader=info"));

    let appender = log_dir.and_then(|dir| {
        RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(LOG_FILE_PREFIX)
            .build(dir)
            .map_err(|e| eprintln!("File logging disabled: {}", e))
            .ok()
    });

    let (file_layer, guard) = match appender {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().json().with_writer(writer)), Some(guard))
        }
        None => (None, None),
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(file_layer)
        .try_init();

    guard
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugLogEntry {
    pub timestamp: String,
    pub level: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugReport {
    pub generated_at: String,
    pub app_version: String,
    pub base_url: Option<String>,
    pub error_count: usize,
    pub log_entries: Vec<DebugLogEntry>,
}

#[derive(Default)]
struct LogBuffer {
    entries: Vec<DebugLogEntry>,
    error_count: usize,
}

/// Keeps the most recent log lines so they can be attached to a bug report.
/// Every line is forwarded to `tracing` as well.
#[derive(Default)]
pub struct DebugLogger {
    buffer: Mutex<LogBuffer>,
}

impl DebugLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self, level: &str, message: String) {
        match level {
            "ERROR" => tracing::error!("{}", message),
            "WARN" => tracing::warn!("{}", message),
            "DEBUG" => tracing::debug!("{}", message),
            _ => tracing::info!("{}", message),
        }

        let entry = DebugLogEntry {
            timestamp: Utc::now().to_rfc3339(),
            level: level.to_string(),
            message,
        };

        let mut buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        if level == "ERROR" {
            buffer.error_count += 1;
        }
        if buffer.entries.len() >= MAX_ENTRIES {
            buffer.entries.remove(0);
        }
        buffer.entries.push(entry);
    }

    pub fn info(&self, message: String) {
        self.log("INFO", message);
    }

    pub fn warn(&self, message: String) {
        self.log("WARN", message);
    }

    pub fn error(&self, message: String) {
        self.log("ERROR", message);
    }

    pub fn debug(&self, message: String) {
        self.log("DEBUG", message);
    }

    pub fn get_error_count(&self) -> usize {
        self.buffer.lock().unwrap_or_else(|e| e.into_inner()).error_count
    }

    pub fn entries(&self) -> Vec<DebugLogEntry> {
        self.buffer.lock().unwrap_or_else(|e| e.into_inner()).entries.clone()
    }

    pub fn generate_report(&self, base_url: Option<String>) -> DebugReport {
        DebugReport {
            generated_at: Utc::now().to_rfc3339(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            base_url,
            error_count: self.get_error_count(),
            log_entries: self.entries(),
        }
    }

    /// Write a report into the default logs directory
    pub fn save_report_to_file(&self, base_url: Option<String>) -> Result<PathBuf, String> {
        let logs_dir = config_utils::get_logs_dir()?;
        self.save_report_to_dir(&logs_dir, base_url)
    }

    pub fn save_report_to_dir(&self, dir: &Path, base_url: Option<String>) -> Result<PathBuf, String> {
        fs::create_dir_all(dir)
            .map_err(|e| format!("Failed to create logs directory: {}", e))?;

        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        let log_path = dir.join(format!("debug_log_{}.json", timestamp));

        let json = serde_json::to_string_pretty(&self.generate_report(base_url))
            .map_err(|e| format!("Failed to serialize report: {}", e))?;

        fs::write(&log_path, json)
            .map_err(|e| format!("Failed to write to log file: {}", e))?;

        Ok(log_path)
    }
}
