//! Per-application manifest aggregation.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::UNIX_EPOCH;

use anyhow::{Context, Result};
use serde_json::json;

use crate::models::RecordBody;

/// Accumulates component modification times per application during the
/// application walk. The map is owned by the pipeline for the duration of
/// one run and read once at flush time; the most recently observed time
/// wins when an (app, component) pair repeats.
#[derive(Debug, Default)]
pub struct AppManifest {
    entries: BTreeMap<String, BTreeMap<String, f64>>,
}

impl AppManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the modification time of one application component.
    pub fn record(&mut self, app: &str, component: &str, path: &Path) -> Result<()> {
        let modified = std::fs::metadata(path)
            .and_then(|meta| meta.modified())
            .with_context(|| format!("failed to stat {}", path.display()))?;
        let seconds = modified
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs_f64())
            .unwrap_or(0.0);
        self.entries
            .entry(app.to_string())
            .or_default()
            .insert(component.to_string(), seconds);
        Ok(())
    }

    /// Iterate aggregated applications as (name, record body) pairs, one
    /// record per application.
    pub fn records(&self) -> impl Iterator<Item = (&str, RecordBody)> + '_ {
        self.entries.iter().map(|(app, components)| {
            let fields = components
                .iter()
                .map(|(component, seconds)| (component.clone(), json!(seconds)))
                .collect();
            (app.as_str(), RecordBody::Fields(fields))
        })
    }
}
