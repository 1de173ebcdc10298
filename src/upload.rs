//! Per-file record decomposition and posting.
//!
//! Splunk `.conf` and `.meta` files are sectioned key/value text; a file
//! that parses to at least one named section is shipped as one record per
//! section, each carrying the section's key/value map. Anything that fails
//! to parse (or parses to zero sections) falls back to a single raw record.
//! Posts are fire-and-forget: a non-2xx response or transport error is
//! logged and never retried.

use std::collections::BTreeMap;
use std::path::Path;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use ini::Ini;
use log::{debug, trace, warn};
use serde_json::Value;

use crate::models::RecordBody;
use crate::sumo::IngestApi;

/// Split file content into named INI-style sections.
///
/// Returns `None` when the content does not parse as sectioned key/value
/// text, yields no named sections, or carries keys before the first section
/// header — a file with a global preamble ships whole so nothing is lost.
pub fn parse_sections(content: &str) -> Option<Vec<(String, BTreeMap<String, Value>)>> {
    let parsed = Ini::load_from_str(content).ok()?;
    let mut sections = Vec::new();
    for (name, properties) in parsed.iter() {
        let Some(name) = name else {
            if properties.iter().next().is_some() {
                return None;
            }
            continue;
        };
        let fields = properties
            .iter()
            .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
            .collect();
        sections.push((name.to_string(), fields));
    }
    if sections.is_empty() {
        None
    } else {
        Some(sections)
    }
}

/// Upload one file to its source URL after the pacing delay: one record per
/// parsed section, or one raw record when the file is not sectioned
/// key/value text.
pub fn upload_file(
    client: &dyn IngestApi,
    path: &Path,
    name: &str,
    url: &str,
    pace: Duration,
) -> Result<()> {
    debug!("OBJECT: {name}");
    thread::sleep(pace);

    let raw = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let content = String::from_utf8_lossy(&raw).into_owned();

    let records = match parse_sections(&content) {
        Some(sections) => sections
            .into_iter()
            .map(|(_, fields)| RecordBody::Fields(fields))
            .collect(),
        None => vec![RecordBody::Raw(content)],
    };

    for record in &records {
        post_record(client, url, record, name);
    }
    Ok(())
}

/// Post a single record, observing (but never acting on) the response.
pub fn post_record(client: &dyn IngestApi, url: &str, record: &RecordBody, name: &str) {
    match client.post_record(url, record, name) {
        Ok(status) if (200..300).contains(&status) => trace!("RESPONSE: {status}"),
        Ok(status) => warn!("record {name} returned HTTP {status}"),
        Err(err) => warn!("record {name} failed to send: {err:#}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;
    use std::fs;

    use tempfile::TempDir;

    use crate::models::CollectorSummary;

    /// Records every posted body; management calls are unused here.
    #[derive(Default)]
    struct PostSink {
        posted: RefCell<Vec<(RecordBody, String)>>,
    }

    impl IngestApi for PostSink {
        fn list_collectors(&self) -> Result<Vec<CollectorSummary>> {
            Ok(Vec::new())
        }
        fn create_collector(&self, _name: &str) -> Result<i64> {
            Ok(0)
        }
        fn create_source(&self, _collector_id: i64, _name: &str, _category: &str) -> Result<String> {
            Ok(String::new())
        }
        fn post_record(&self, _url: &str, body: &RecordBody, name: &str) -> Result<u16> {
            self.posted
                .borrow_mut()
                .push((body.clone(), name.to_string()));
            Ok(200)
        }
    }

    #[test]
    fn sectioned_files_yield_one_record_per_section() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("indexes.conf");
        fs::write(
            &path,
            "[main]\nhomePath = $SPLUNK_DB/main\n\n[history]\nfrozenTimePeriodInSecs = 604800\n",
        )
        .unwrap();

        let sink = PostSink::default();
        upload_file(&sink, &path, "web01_indexes.conf", "url", Duration::ZERO).unwrap();

        let posted = sink.posted.borrow();
        assert_eq!(posted.len(), 2);
        assert!(posted.iter().all(|(_, name)| name == "web01_indexes.conf"));
        assert!(posted
            .iter()
            .all(|(body, _)| matches!(body, RecordBody::Fields(_))));
    }

    #[test]
    fn unsectioned_files_fall_back_to_one_raw_record() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("queries.csv");
        fs::write(&path, "time,search\n1700000000,index=main error\n").unwrap();

        let sink = PostSink::default();
        upload_file(&sink, &path, "web01_bob", "url", Duration::ZERO).unwrap();

        let posted = sink.posted.borrow();
        assert_eq!(posted.len(), 1);
        assert_eq!(
            posted[0].0,
            RecordBody::Raw("time,search\n1700000000,index=main error\n".to_string())
        );
    }

    #[test]
    fn empty_content_parses_to_no_sections() {
        assert_eq!(parse_sections(""), None);
    }

    #[test]
    fn global_preamble_forces_the_raw_fallback() {
        assert_eq!(
            parse_sections("globalKey = globalValue\n\n[main]\nhomePath = x\n"),
            None
        );
    }

    #[test]
    fn preamble_files_upload_whole_with_nothing_dropped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("server.conf");
        let content = "serverName = web01\n\n[general]\npass4SymmKey = secret\n";
        fs::write(&path, content).unwrap();

        let sink = PostSink::default();
        upload_file(&sink, &path, "web01_server.conf", "url", Duration::ZERO).unwrap();

        let posted = sink.posted.borrow();
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0].0, RecordBody::Raw(content.to_string()));
    }

    #[test]
    fn section_fields_survive_the_split() {
        let sections =
            parse_sections("[main]\nhomePath = $SPLUNK_DB/main\nmaxTotalDataSizeMB = 500000\n")
                .unwrap();
        assert_eq!(sections.len(), 1);
        let (name, fields) = &sections[0];
        assert_eq!(name, "main");
        assert_eq!(
            fields.get("homePath"),
            Some(&Value::String("$SPLUNK_DB/main".to_string()))
        );
        assert_eq!(
            fields.get("maxTotalDataSizeMB"),
            Some(&Value::String("500000".to_string()))
        );
    }
}
