//! Idempotent hosted-collector provisioning.

use std::collections::HashMap;

use anyhow::Result;
use log::debug;

use crate::sumo::IngestApi;

/// Resolves collector names to ids, creating each collector at most once
/// per run. Lookups consult the remote listing first so a collector left by
/// an earlier run is reused rather than duplicated. The check-then-create
/// is not atomic against other writers; the run is the sole writer for its
/// duration, so that is acceptable.
#[derive(Debug, Default)]
pub struct CollectorRegistry {
    cache: HashMap<String, i64>,
}

impl CollectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id of the collector with the given name, creating it only
    /// when no existing collector carries that name.
    pub fn resolve(&mut self, client: &dyn IngestApi, name: &str) -> Result<i64> {
        if let Some(id) = self.cache.get(name) {
            return Ok(*id);
        }
        let existing = client
            .list_collectors()?
            .into_iter()
            .find(|collector| collector.name == name)
            .map(|collector| collector.id);
        let id = match existing {
            Some(id) => {
                debug!("reusing collector {name} ({id})");
                id
            }
            None => {
                let id = client.create_collector(name)?;
                debug!("created collector {name} ({id})");
                id
            }
        };
        self.cache.insert(name.to_string(), id);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CollectorSummary;
    use crate::sumo::MockIngestApi;

    #[test]
    fn existing_collector_is_reused_without_a_create() {
        let mut mock = MockIngestApi::new();
        mock.expect_list_collectors().times(1).returning(|| {
            Ok(vec![CollectorSummary {
                id: 42,
                name: "splunk_configs".to_string(),
            }])
        });
        mock.expect_create_collector().times(0);

        let mut registry = CollectorRegistry::new();
        assert_eq!(registry.resolve(&mock, "splunk_configs").unwrap(), 42);
        // Second resolve hits the cache; the listing is not consulted again.
        assert_eq!(registry.resolve(&mock, "splunk_configs").unwrap(), 42);
    }

    #[test]
    fn missing_collector_is_created_once() {
        let mut mock = MockIngestApi::new();
        mock.expect_list_collectors()
            .times(1)
            .returning(|| Ok(Vec::new()));
        mock.expect_create_collector()
            .times(1)
            .returning(|_| Ok(7));

        let mut registry = CollectorRegistry::new();
        assert_eq!(registry.resolve(&mock, "splunk_history").unwrap(), 7);
        assert_eq!(registry.resolve(&mock, "splunk_history").unwrap(), 7);
    }
}
