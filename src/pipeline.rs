//! Orchestration of the collection stages.
//!
//! The stage order is fixed: configuration files, then application metadata
//! (followed by the manifest flush), then user search history. Each stage
//! provisions its collector up front, walks the whole tree, and uploads
//! every file its rule matches. A stage that finds nothing still provisions
//! its collector, and a stage failure never prevents later stages from
//! running.

use std::path::PathBuf;

use anyhow::Result;
use log::{info, warn};
use walkdir::WalkDir;

use crate::classify::classify;
use crate::constants::{
    APPLICATIONS_COLLECTOR, CONFIGS_COLLECTOR, HISTORY_COLLECTOR, MANIFEST_COLLECTOR, POST_TIME,
    WAIT_TIME,
};
use crate::manifest::AppManifest;
use crate::models::{Category, Classified};
use crate::registry::CollectorRegistry;
use crate::sumo::IngestApi;
use crate::upload;

/// Drives the fixed sequence of collection stages against one resolved
/// datasource root.
pub struct Pipeline<'a> {
    client: &'a dyn IngestApi,
    registry: CollectorRegistry,
    root: PathBuf,
    host_tag: String,
}

impl<'a> Pipeline<'a> {
    pub fn new(client: &'a dyn IngestApi, root: PathBuf, host_tag: String) -> Self {
        Pipeline {
            client,
            registry: CollectorRegistry::new(),
            root,
            host_tag,
        }
    }

    /// Run every stage in order. Stage failures are reported and contained.
    pub fn run(&mut self) {
        if let Err(err) = self.collect_config_files() {
            warn!("config collection failed: {err:#}");
        }
        if let Err(err) = self.collect_applications() {
            warn!("application collection failed: {err:#}");
        }
        if let Err(err) = self.collect_user_history() {
            warn!("history collection failed: {err:#}");
        }
    }

    /// Upload every `etc/system` configuration file, one source per file.
    fn collect_config_files(&mut self) -> Result<()> {
        info!("collecting configuration files");
        let collector_id = self.registry.resolve(self.client, CONFIGS_COLLECTOR)?;
        let category = format!("splunk/{}/configs", self.host_tag);
        for path in self.walk_files() {
            let Some(classified) = classify(&path) else {
                continue;
            };
            if classified.category() != Category::Config {
                continue;
            }
            let source_name = format!("{}_{}", self.host_tag, classified.source_name());
            let url = self.client.create_source(collector_id, &source_name, &category)?;
            upload::upload_file(self.client, &path, &source_name, &url, WAIT_TIME)?;
        }
        Ok(())
    }

    /// Upload application metadata files and feed the manifest aggregator,
    /// then flush the manifest once the walk completes.
    fn collect_applications(&mut self) -> Result<()> {
        info!("collecting application metadata");
        let collector_id = self.registry.resolve(self.client, APPLICATIONS_COLLECTOR)?;
        let category = format!("splunk/{}/applications/objectrbac", self.host_tag);

        let mut manifest = AppManifest::new();
        for path in self.walk_files() {
            let Some(classified) = classify(&path) else {
                continue;
            };
            let Classified::AppMeta { app, component } = &classified else {
                continue;
            };
            if let Err(err) = manifest.record(app, component, &path) {
                warn!("skipping manifest entry for {app}/{component}: {err:#}");
            }
            let source_name = format!("{}_{}", self.host_tag, classified.source_name());
            let url = self.client.create_source(collector_id, &source_name, &category)?;
            upload::upload_file(self.client, &path, &source_name, &url, WAIT_TIME)?;
        }

        self.post_manifest(&manifest)
    }

    /// Emit one aggregated record per application, each under its own
    /// freshly created source.
    fn post_manifest(&mut self, manifest: &AppManifest) -> Result<()> {
        info!("posting application manifest");
        let collector_id = self.registry.resolve(self.client, MANIFEST_COLLECTOR)?;
        let category = format!("splunk/{}/applications/manifest", self.host_tag);
        for (app, record) in manifest.records() {
            let source_name = format!("{}_{}", self.host_tag, app);
            let url = self.client.create_source(collector_id, &source_name, &category)?;
            upload::post_record(self.client, &url, &record, app);
        }
        Ok(())
    }

    /// Upload every user search-history file, one source per file.
    fn collect_user_history(&mut self) -> Result<()> {
        info!("collecting user search history");
        let collector_id = self.registry.resolve(self.client, HISTORY_COLLECTOR)?;
        let category = format!("splunk/{}/usage/history", self.host_tag);
        for path in self.walk_files() {
            let Some(classified) = classify(&path) else {
                continue;
            };
            if classified.category() != Category::UserHistory {
                continue;
            }
            let source_name = format!("{}_{}", self.host_tag, classified.source_name());
            let url = self.client.create_source(collector_id, &source_name, &category)?;
            upload::upload_file(self.client, &path, &source_name, &url, POST_TIME)?;
        }
        Ok(())
    }

    /// Enumerate regular files under the root. Walk order follows directory
    /// enumeration order and is not reproducible across filesystems.
    fn walk_files(&self) -> impl Iterator<Item = PathBuf> {
        WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
    }
}
