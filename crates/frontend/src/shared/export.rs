/// Export of dashboard datasets to CSV / JSON files
pub mod download;
pub mod serializer;

pub use download::{BrowserDownload, FileSink};
pub use serializer::{to_csv, to_json};

use crate::shared::api_utils::FetchError;
use chrono::NaiveDate;
use contracts::dashboards::d404_campus_pulse::Dataset;
use thiserror::Error;

/// Prefix of every exported file name
pub const EXPORT_FILE_PREFIX: &str = "campus_pulse_data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv;charset=utf-8;",
            ExportFormat::Json => "application/json;charset=utf-8;",
        }
    }

    /// Button caption suffix ("Export CSV")
    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Json => "JSON",
        }
    }

    pub fn serialize(self, data: &Dataset) -> Result<String, ExportError> {
        match self {
            ExportFormat::Csv => to_csv(data),
            ExportFormat::Json => to_json(data),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No data to export")]
    EmptyDataset,
    #[error("Failed to export data: {0}")]
    Fetch(#[from] FetchError),
    #[error("Failed to serialize data: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to download file: {0}")]
    Download(String),
}

impl ExportError {
    /// Text shown to the user in the alert box
    pub fn notice(&self) -> String {
        match self {
            ExportError::Fetch(_) => "Failed to export data".to_string(),
            other => other.to_string(),
        }
    }
}

/// `campus_pulse_data_<YYYY-MM-DD>.<ext>`
pub fn export_filename(format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "{}_{}.{}",
        EXPORT_FILE_PREFIX,
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(
            export_filename(ExportFormat::Csv, date),
            "campus_pulse_data_2024-03-05.csv"
        );
        assert_eq!(
            export_filename(ExportFormat::Json, date),
            "campus_pulse_data_2024-03-05.json"
        );
    }

    #[test]
    fn test_mime_types() {
        assert_eq!(ExportFormat::Csv.mime_type(), "text/csv;charset=utf-8;");
        assert_eq!(
            ExportFormat::Json.mime_type(),
            "application/json;charset=utf-8;"
        );
    }

    #[test]
    fn test_fetch_failure_notice_hides_details() {
        let err = ExportError::from(FetchError::Http(502));
        assert_eq!(err.notice(), "Failed to export data");
        assert_eq!(err.to_string(), "Failed to export data: HTTP error: 502");
        assert_eq!(ExportError::EmptyDataset.notice(), "No data to export");
    }
}
