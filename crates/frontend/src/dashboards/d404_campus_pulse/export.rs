//! Export of the filtered dataset: fetch, serialize, download.

use super::api::{DataSource, HttpDataSource};
use crate::shared::export::{export_filename, BrowserDownload, ExportError, ExportFormat, FileSink};
use crate::shared::notify::{BrowserAlert, Notifier};
use chrono::{NaiveDate, Utc};
use contracts::dashboards::d404_campus_pulse::FilteredDataQuery;

/// How an export attempt ended. The user has already been notified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Saved { filename: String },
    NoData,
    Failed,
}

pub struct ExportController<S = HttpDataSource, F = BrowserDownload, N = BrowserAlert> {
    source: S,
    sink: F,
    notifier: N,
}

impl ExportController {
    /// Controller wired to the backend, `<a download>` and `window.alert`
    pub fn browser() -> Self {
        Self::new(HttpDataSource, BrowserDownload, BrowserAlert)
    }
}

impl<S: DataSource, F: FileSink, N: Notifier> ExportController<S, F, N> {
    pub fn new(source: S, sink: F, notifier: N) -> Self {
        Self {
            source,
            sink,
            notifier,
        }
    }

    pub async fn export(&self, format: ExportFormat, query: &FilteredDataQuery) -> ExportOutcome {
        self.export_on(format, query, Utc::now().date_naive()).await
    }

    /// Same as [`Self::export`] with the file date fixed by the caller
    pub async fn export_on(
        &self,
        format: ExportFormat,
        query: &FilteredDataQuery,
        today: NaiveDate,
    ) -> ExportOutcome {
        match self.try_export(format, query, today).await {
            Ok(filename) => {
                log::info!("Exported {}", filename);
                ExportOutcome::Saved { filename }
            }
            Err(ExportError::EmptyDataset) => {
                self.notifier.alert(&ExportError::EmptyDataset.notice());
                ExportOutcome::NoData
            }
            Err(err) => {
                log::error!("Error exporting data: {}", err);
                self.notifier.alert(&err.notice());
                ExportOutcome::Failed
            }
        }
    }

    async fn try_export(
        &self,
        format: ExportFormat,
        query: &FilteredDataQuery,
        today: NaiveDate,
    ) -> Result<String, ExportError> {
        let data = self.source.fetch(query).await?;
        if data.is_empty() {
            return Err(ExportError::EmptyDataset);
        }

        let content = format.serialize(&data)?;
        let filename = export_filename(format, today);
        self.sink.save(&content, format.mime_type(), &filename)?;
        Ok(filename)
    }
}
