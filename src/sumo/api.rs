use anyhow::Result;

use crate::models::{CollectorSummary, RecordBody};

/// Remote ingestion capability consumed by the pipeline.
///
/// Collectors group sources by category; each uploaded file gets its own
/// freshly created source, and records are posted to the source's
/// ingestion URL. Tests substitute a mock or a recording fake.
#[cfg_attr(test, mockall::automock)]
pub trait IngestApi {
    /// List existing hosted collectors.
    fn list_collectors(&self) -> Result<Vec<CollectorSummary>>;

    /// Create a hosted collector and return its id.
    fn create_collector(&self, name: &str) -> Result<i64>;

    /// Create an HTTP source under a collector and return its ingestion URL.
    fn create_source(&self, collector_id: i64, name: &str, category: &str) -> Result<String>;

    /// Post one record to a source URL, returning the HTTP status code.
    fn post_record(&self, url: &str, body: &RecordBody, name: &str) -> Result<u16>;
}
